use serde::Serialize;
use serde_json::Value;

use crate::config::InputMode;
use crate::error::AppError;
use crate::types::{FeatureVector, FreeformReadings};

/// User-facing message for any freeform validation failure. The whole
/// request is rejected; no partial prediction is attempted.
pub const FILL_IN_MESSAGE: &str = "Please fill in all the input fields correctly.";

/// One form field: bounds and defaults for the bounded policy, placeholder
/// text for the freeform policy, and the warn threshold for the gauges.
#[derive(Debug, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub unit: &'static str,
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub step: f64,
    pub placeholder: &'static str,
    pub warn: Option<f64>,
}

/// The six input fields, in canonical feature order.
pub const FIELDS: [FieldSpec; 6] = [
    FieldSpec {
        name: "temperature",
        label: "Temperature",
        unit: "°C",
        min: -50.0,
        max: 200.0,
        default: 25.0,
        step: 0.1,
        placeholder: "e.g., 75",
        warn: Some(80.0),
    },
    FieldSpec {
        name: "vibration",
        label: "Vibration",
        unit: "mm/s",
        min: 0.0,
        max: 10.0,
        default: 1.5,
        step: 0.1,
        placeholder: "e.g., 1.5",
        warn: Some(2.5),
    },
    FieldSpec {
        name: "pressure",
        label: "Pressure",
        unit: "bar",
        min: 0.0,
        max: 100.0,
        default: 5.0,
        step: 0.1,
        placeholder: "e.g., 5.0",
        warn: None,
    },
    FieldSpec {
        name: "inspection_duration",
        label: "Inspection Duration",
        unit: "min",
        min: 1.0,
        max: 480.0,
        default: 30.0,
        step: 1.0,
        placeholder: "e.g., 30",
        warn: None,
    },
    FieldSpec {
        name: "downtime_cost",
        label: "Downtime Cost",
        unit: "USD",
        min: 0.0,
        max: 100000.0,
        default: 1000.0,
        step: 50.0,
        placeholder: "e.g., 1000",
        warn: None,
    },
    FieldSpec {
        name: "technician_availability",
        label: "Technician Availability",
        unit: "%",
        min: 0.0,
        max: 100.0,
        default: 85.0,
        step: 1.0,
        placeholder: "e.g., 85",
        warn: None,
    },
];

impl InputMode {
    /// Turn a request body into a validated feature vector, or reject the
    /// whole request with a user-facing validation error.
    pub fn collect(self, body: Value) -> Result<FeatureVector, AppError> {
        match self {
            InputMode::Bounded => collect_bounded(body),
            InputMode::Freeform => collect_freeform(body),
        }
    }
}

fn collect_bounded(body: Value) -> Result<FeatureVector, AppError> {
    let readings: FeatureVector = serde_json::from_value(body)
        .map_err(|e| AppError::Validation(format!("malformed request: {e}")))?;

    for (spec, value) in FIELDS.iter().zip(readings.to_array().iter()) {
        if !value.is_finite() || *value < spec.min || *value > spec.max {
            return Err(AppError::Validation(format!(
                "{} must be between {} and {}",
                spec.label, spec.min, spec.max
            )));
        }
    }
    Ok(readings)
}

fn collect_freeform(body: Value) -> Result<FeatureVector, AppError> {
    let raw: FreeformReadings = serde_json::from_value(body)
        .map_err(|e| AppError::Validation(format!("malformed request: {e}")))?;

    let texts = [
        &raw.temperature,
        &raw.vibration,
        &raw.pressure,
        &raw.inspection_duration,
        &raw.downtime_cost,
        &raw.technician_availability,
    ];

    let mut values = [0.0_f64; 6];
    for (i, (spec, text)) in FIELDS.iter().zip(texts).enumerate() {
        let text = text.trim();
        // Untouched placeholder text counts as an empty field
        if text.is_empty() || text == spec.placeholder || text.starts_with("e.g.") {
            return Err(AppError::Validation(FILL_IN_MESSAGE.to_string()));
        }
        values[i] = text
            .parse()
            .map_err(|_| AppError::Validation(FILL_IN_MESSAGE.to_string()))?;
    }
    Ok(FeatureVector::from_values(values))
}
