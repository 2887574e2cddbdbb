use rand::Rng;

use crate::error::AppError;
use crate::model::Engine;
use crate::report::Priority;
use crate::types::FeatureVector;

/// Confidence reported when the model exposes no usable probability estimate.
pub const DEFAULT_CONFIDENCE: f64 = 85.0;

/// Confidence reported by demo-mode predictions.
pub const DEMO_CONFIDENCE: f64 = 75.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub priority: Priority,
    pub confidence: f64,
    pub demo: bool,
}

/// Run one prediction: scale, predict, map the raw class to a priority, and
/// attach a confidence percentage. Demo engines fabricate a uniformly random
/// label instead.
pub fn run(engine: &Engine, features: &FeatureVector) -> Result<Prediction, AppError> {
    match engine {
        Engine::Live { scaler, model } => {
            let scaled = scaler.transform(features);
            let raw = model
                .predict(&scaled)
                .map_err(|e| AppError::Prediction(e.to_string()))?;
            let priority = Priority::from_raw(&raw);

            // Probability lookup is best-effort; anything unusable falls
            // back to the fixed default.
            let confidence = model
                .predict_proba(&scaled)
                .as_deref()
                .and_then(max_probability)
                .map(|p| p * 100.0)
                .unwrap_or(DEFAULT_CONFIDENCE);

            tracing::debug!(
                "predicted {:?} (raw {:?}) confidence {:.1}%",
                priority,
                raw,
                confidence
            );
            Ok(Prediction {
                priority,
                confidence,
                demo: false,
            })
        }
        Engine::Demo => {
            let priority = match rand::thread_rng().gen_range(0..3) {
                0 => Priority::Low,
                1 => Priority::Medium,
                _ => Priority::High,
            };
            Ok(Prediction {
                priority,
                confidence: DEMO_CONFIDENCE,
                demo: true,
            })
        }
    }
}

fn max_probability(probs: &[f64]) -> Option<f64> {
    probs
        .iter()
        .copied()
        .filter(|p| p.is_finite())
        .fold(None, |best, p| {
            Some(match best {
                Some(b) if b >= p => b,
                _ => p,
            })
        })
}
