/// End-to-end tests for the prediction pipeline
///
/// Run with: cargo test --test priority_pipeline -- --nocapture

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use ndarray::Array1;
use serde_json::json;

use maint_predictor::config::InputMode;
use maint_predictor::inputs::FILL_IN_MESSAGE;
use maint_predictor::model::{
    Engine, ModelFile, PriorityModel, RawClass, ScalerArtifact, ScalerFile,
};
use maint_predictor::pipeline::{self, DEFAULT_CONFIDENCE, DEMO_CONFIDENCE};
use maint_predictor::report::Priority;
use maint_predictor::types::{FeatureVector, FEATURE_NAMES};

fn identity_scaler() -> ScalerArtifact {
    ScalerArtifact::from_file(ScalerFile {
        feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
        mean: vec![0.0; 6],
        scale: vec![1.0; 6],
    })
    .expect("identity scaler is valid")
}

fn scenario_readings() -> FeatureVector {
    FeatureVector::from_values([75.0, 1.5, 5.0, 30.0, 1000.0, 85.0])
}

struct StubModel {
    raw: RawClass,
}

impl PriorityModel for StubModel {
    fn predict(&self, _features: &Array1<f64>) -> Result<RawClass> {
        Ok(self.raw.clone())
    }
}

struct CountingModel {
    calls: Arc<AtomicUsize>,
}

impl PriorityModel for CountingModel {
    fn predict(&self, _features: &Array1<f64>) -> Result<RawClass> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(RawClass::Code(0))
    }
}

#[test]
fn test_demo_mode_end_to_end() {
    println!("\n=== Test: Demo Mode End to End ===");
    let engine = Engine::Demo;

    for _ in 0..20 {
        let p = pipeline::run(&engine, &scenario_readings()).expect("demo prediction");
        assert!(p.demo, "demo engine must flag its predictions");
        assert_eq!(p.confidence, DEMO_CONFIDENCE, "demo confidence is fixed");
        assert!(
            matches!(p.priority, Priority::Low | Priority::Medium | Priority::High),
            "label must stay inside the closed set"
        );
    }
    println!("✓ 20 demo predictions, all labeled, confidence fixed at {}", DEMO_CONFIDENCE);
}

#[test]
fn test_stub_class_code_two_maps_to_high() {
    println!("\n=== Test: Class Code 2 ===");
    let engine = Engine::live(
        identity_scaler(),
        Box::new(StubModel {
            raw: RawClass::Code(2),
        }),
    );

    let p = pipeline::run(&engine, &scenario_readings()).expect("prediction");
    assert_eq!(p.priority, Priority::High);
    assert_eq!(p.priority.recommendation(), "Immediate action required");
    assert_eq!(p.priority.risk_score(), 85);
    assert_eq!(p.confidence, DEFAULT_CONFIDENCE, "stub exposes no probabilities");
    println!(
        "✓ code 2 -> {} / {:?} / risk {}",
        p.priority.as_str(),
        p.priority.recommendation(),
        p.priority.risk_score()
    );
}

#[test]
fn test_validation_failure_never_reaches_the_model() {
    println!("\n=== Test: Validation Short-Circuit ===");
    let calls = Arc::new(AtomicUsize::new(0));
    let engine = Engine::live(
        identity_scaler(),
        Box::new(CountingModel {
            calls: Arc::clone(&calls),
        }),
    );

    // One field left at its placeholder, as submitted by an untouched form
    let body = json!({
        "temperature": "e.g., 75",
        "vibration": "1.5",
        "pressure": "5.0",
        "inspection_duration": "30",
        "downtime_cost": "1000",
        "technician_availability": "85"
    });

    match InputMode::Freeform.collect(body) {
        Err(err) => assert_eq!(err.to_string(), FILL_IN_MESSAGE),
        Ok(features) => {
            // Collection must fail before this point
            pipeline::run(&engine, &features).ok();
            panic!("placeholder input was accepted");
        }
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0, "predict must not be called");
    println!("✓ rejected with {:?}, model saw 0 calls", FILL_IN_MESSAGE);
}

#[test]
fn test_freeform_and_bounded_agree_on_equal_input() {
    println!("\n=== Test: Input Policy Equivalence ===");
    let freeform = InputMode::Freeform
        .collect(json!({
            "temperature": "75",
            "vibration": "1.5",
            "pressure": "5.0",
            "inspection_duration": "30",
            "downtime_cost": "1000",
            "technician_availability": "85"
        }))
        .expect("freeform input");
    let bounded = InputMode::Bounded
        .collect(json!({
            "temperature": 75,
            "vibration": 1.5,
            "pressure": 5.0,
            "inspection_duration": 30,
            "downtime_cost": 1000,
            "technician_availability": 85
        }))
        .expect("bounded input");

    assert_eq!(freeform, bounded, "equal decimal input must parse identically");
    assert_eq!(freeform, scenario_readings());
    println!("✓ both policies produced {:?}", freeform.to_array());
}

#[test]
fn test_artifact_round_trip_through_files() {
    println!("\n=== Test: Artifact Round Trip ===");
    let dir = tempfile::tempdir().expect("tempdir");
    let scaler_path = dir.path().join("scaler.bin");
    let model_path = dir.path().join("model.bin");

    let scaler = ScalerFile {
        feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
        mean: vec![0.0; 6],
        scale: vec![1.0; 6],
    };
    // Intercept-only model whose third class dominates every input
    let model = ModelFile {
        classes: vec![RawClass::Code(0), RawClass::Code(1), RawClass::Code(2)],
        n_features: 6,
        weights: vec![0.0; 18],
        intercepts: vec![0.0, 0.0, 5.0],
    };

    std::fs::write(&scaler_path, bincode::serialize(&scaler).expect("encode scaler"))
        .expect("write scaler");
    std::fs::write(&model_path, bincode::serialize(&model).expect("encode model"))
        .expect("write model");

    let engine = Engine::from_paths(
        scaler_path.to_str().expect("utf-8 path"),
        model_path.to_str().expect("utf-8 path"),
    );
    assert!(engine.is_live(), "valid artifacts must load");

    let p = pipeline::run(&engine, &scenario_readings()).expect("prediction");
    assert_eq!(p.priority, Priority::High);
    assert!(!p.demo);

    // Confidence comes from the softmax over the intercepts
    let e5 = 5.0_f64.exp();
    let expected = e5 / (2.0 + e5) * 100.0;
    assert!(
        (p.confidence - expected).abs() < 1e-9,
        "confidence {} != softmax max {}",
        p.confidence,
        expected
    );
    println!("✓ loaded from disk, predicted High at {:.1}% confidence", p.confidence);
}

#[test]
fn test_missing_artifacts_degrade_to_demo() {
    println!("\n=== Test: Missing Artifacts ===");
    let dir = tempfile::tempdir().expect("tempdir");
    let scaler_path = dir.path().join("absent-scaler.bin");
    let model_path = dir.path().join("absent-model.bin");

    let engine = Engine::from_paths(
        scaler_path.to_str().expect("utf-8 path"),
        model_path.to_str().expect("utf-8 path"),
    );
    assert!(!engine.is_live());

    let p = pipeline::run(&engine, &scenario_readings()).expect("demo prediction");
    assert!(p.demo);
    assert_eq!(p.confidence, DEMO_CONFIDENCE);
    println!("✓ degraded to demo mode, confidence {}", p.confidence);
}
