use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::report::Priority;

/// Canonical feature order. The scaler and model artifacts were fitted with
/// features in exactly this order; the artifact loader rejects anything else.
pub const FEATURE_NAMES: [&str; 6] = [
    "temperature",
    "vibration",
    "pressure",
    "inspection_duration",
    "downtime_cost",
    "technician_availability",
];

/// One set of equipment readings, in canonical feature order.
///
/// Doubles as the request body in bounded input mode, where every field
/// arrives as a JSON number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub temperature: f64,
    pub vibration: f64,
    pub pressure: f64,
    pub inspection_duration: f64,
    pub downtime_cost: f64,
    pub technician_availability: f64,
}

impl FeatureVector {
    pub fn from_values(values: [f64; 6]) -> Self {
        let [temperature, vibration, pressure, inspection_duration, downtime_cost, technician_availability] =
            values;
        Self {
            temperature,
            vibration,
            pressure,
            inspection_duration,
            downtime_cost,
            technician_availability,
        }
    }

    /// Readings as a dense vector, ordered per [`FEATURE_NAMES`].
    pub fn to_array(&self) -> Array1<f64> {
        Array1::from(vec![
            self.temperature,
            self.vibration,
            self.pressure,
            self.inspection_duration,
            self.downtime_cost,
            self.technician_availability,
        ])
    }
}

/// Request body in freeform input mode: every field is raw text from the
/// form and must be validated and parsed before prediction.
#[derive(Debug, Clone, Deserialize)]
pub struct FreeformReadings {
    pub temperature: String,
    pub vibration: String,
    pub pressure: String,
    pub inspection_duration: String,
    pub downtime_cost: String,
    pub technician_availability: String,
}

#[derive(Debug, Serialize)]
pub struct PredictOut {
    pub ts_ms: i64,
    pub priority: Priority,
    pub confidence: f64,
    pub recommendation: &'static str,
    pub risk_score: u8,
    pub demo_mode: bool,
    pub radar: [f64; 6],
}

#[derive(Debug, Serialize)]
pub struct StatusOut {
    pub model_loaded: bool,
    pub mode: &'static str,
    pub version: &'static str,
}
