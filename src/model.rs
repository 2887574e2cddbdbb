use anyhow::{bail, Context, Result};
use ndarray::{Array1, Array2};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{fs, path::Path};

use crate::config::AppConfig;
use crate::types::{FeatureVector, FEATURE_NAMES};

// ---------- Artifact wire formats ----------

/// On-disk scaler artifact, bincode-encoded. Produced by the external
/// training pipeline; this service only ever reads it.
#[derive(Debug, Serialize, Deserialize)]
pub struct ScalerFile {
    /// Feature names in the order the scaler was fitted with.
    pub feature_names: Vec<String>,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// On-disk classifier artifact, bincode-encoded: a softmax linear model
/// exported as its class list, flattened weight matrix, and intercepts.
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelFile {
    pub classes: Vec<RawClass>,
    pub n_features: usize,
    /// Row-major `[n_classes][n_features]`.
    pub weights: Vec<f64>,
    pub intercepts: Vec<f64>,
}

/// Raw classifier output before mapping to a priority label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RawClass {
    Code(i64),
    Label(String),
}

// ---------- Model interface ----------

/// The capability surface the pipeline needs from a classifier. Implemented
/// by the deserialized artifact, and by test doubles.
pub trait PriorityModel: Send + Sync {
    /// Predict the raw class for one scaled feature vector.
    fn predict(&self, features: &Array1<f64>) -> Result<RawClass>;

    /// Class probability distribution, if this model can provide one.
    fn predict_proba(&self, _features: &Array1<f64>) -> Option<Vec<f64>> {
        None
    }
}

// ---------- Scaler ----------

/// Per-feature centering and scaling, validated against the canonical
/// feature schema at load time.
pub struct ScalerArtifact {
    mean: Array1<f64>,
    scale: Array1<f64>,
}

impl ScalerArtifact {
    pub fn from_file(file: ScalerFile) -> Result<Self> {
        let n = FEATURE_NAMES.len();
        if file.feature_names.len() != n
            || file.feature_names.iter().map(String::as_str).ne(FEATURE_NAMES)
        {
            bail!(
                "scaler feature schema {:?} does not match expected {:?}",
                file.feature_names,
                FEATURE_NAMES
            );
        }
        if file.mean.len() != n || file.scale.len() != n {
            bail!(
                "scaler parameter length mismatch: mean {}, scale {}, expected {}",
                file.mean.len(),
                file.scale.len(),
                n
            );
        }
        if file.scale.iter().any(|s| !s.is_finite() || *s == 0.0) {
            bail!("scaler has zero or non-finite scale entries");
        }

        Ok(Self {
            mean: Array1::from(file.mean),
            scale: Array1::from(file.scale),
        })
    }

    pub fn transform(&self, features: &FeatureVector) -> Array1<f64> {
        (features.to_array() - &self.mean) / &self.scale
    }
}

// ---------- Softmax linear classifier ----------

pub struct SoftmaxArtifact {
    classes: Vec<RawClass>,
    weights: Array2<f64>,
    intercepts: Array1<f64>,
}

impl SoftmaxArtifact {
    pub fn from_file(file: ModelFile) -> Result<Self> {
        let n_classes = file.classes.len();
        if n_classes < 2 {
            bail!("model must carry at least two classes, got {}", n_classes);
        }
        if file.n_features != FEATURE_NAMES.len() {
            bail!(
                "model expects {} features, this service provides {}",
                file.n_features,
                FEATURE_NAMES.len()
            );
        }
        if file.intercepts.len() != n_classes {
            bail!(
                "model intercept length mismatch: got {}, expected {}",
                file.intercepts.len(),
                n_classes
            );
        }
        let weights = Array2::from_shape_vec((n_classes, file.n_features), file.weights)
            .context("model weight matrix has invalid shape")?;

        Ok(Self {
            classes: file.classes,
            weights,
            intercepts: Array1::from(file.intercepts),
        })
    }

    fn scores(&self, features: &Array1<f64>) -> Array1<f64> {
        self.weights.dot(features) + &self.intercepts
    }
}

impl PriorityModel for SoftmaxArtifact {
    fn predict(&self, features: &Array1<f64>) -> Result<RawClass> {
        if features.len() != self.weights.ncols() {
            bail!(
                "feature length mismatch: got {}, expected {}",
                features.len(),
                self.weights.ncols()
            );
        }
        let scores = self.scores(features);
        let best = scores
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(i, _)| i)
            .context("empty score vector")?;
        Ok(self.classes[best].clone())
    }

    fn predict_proba(&self, features: &Array1<f64>) -> Option<Vec<f64>> {
        if features.len() != self.weights.ncols() {
            return None;
        }
        let scores = self.scores(features);
        let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let exp: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
        let sum: f64 = exp.iter().sum();
        if !sum.is_finite() || sum <= 0.0 {
            return None;
        }
        Some(exp.into_iter().map(|e| e / sum).collect())
    }
}

// ---------- Engine ----------

/// Prediction context, built once at startup and read-only afterwards.
/// Demo mode fabricates random labels when the artifacts are unavailable.
pub enum Engine {
    Live {
        scaler: ScalerArtifact,
        model: Box<dyn PriorityModel>,
    },
    Demo,
}

impl Engine {
    pub fn live(scaler: ScalerArtifact, model: Box<dyn PriorityModel>) -> Self {
        Engine::Live { scaler, model }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, Engine::Live { .. })
    }

    pub fn load(cfg: &AppConfig) -> Self {
        Self::from_paths(&cfg.scaler_path, &cfg.model_path)
    }

    /// Load both artifacts, falling back to demo mode on any failure.
    /// The fallback is permanent for the process lifetime.
    pub fn from_paths(scaler_path: &str, model_path: &str) -> Self {
        match Self::try_load(scaler_path, model_path) {
            Ok(engine) => {
                tracing::info!("scaler and model loaded; feature order: {:?}", FEATURE_NAMES);
                engine
            }
            Err(e) => {
                tracing::warn!("artifacts unavailable ({:#}); running in demo mode", e);
                Engine::Demo
            }
        }
    }

    fn try_load(scaler_path: &str, model_path: &str) -> Result<Engine> {
        let scaler = ScalerArtifact::from_file(read_artifact::<ScalerFile>(scaler_path, "scaler")?)?;
        let model = SoftmaxArtifact::from_file(read_artifact::<ModelFile>(model_path, "model")?)?;

        // Warmup probe with a zero vector to catch shape problems up front
        let dummy = Array1::zeros(FEATURE_NAMES.len());
        model.predict(&dummy).context("warmup predict failed")?;
        tracing::info!("warmup predict ok");

        Ok(Engine::Live {
            scaler,
            model: Box::new(model),
        })
    }
}

fn read_artifact<T: DeserializeOwned>(path: &str, what: &str) -> Result<T> {
    let bytes =
        fs::read(Path::new(path)).with_context(|| format!("failed to read {} at {}", what, path))?;
    bincode::deserialize(&bytes).with_context(|| format!("failed to decode {} at {}", what, path))
}
