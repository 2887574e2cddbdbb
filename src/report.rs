use serde::Serialize;

use crate::model::RawClass;
use crate::types::FeatureVector;

/// Maintenance-priority label. The closed output set of every prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    /// Map a raw classifier output to a priority. Integer codes go through
    /// the fixed table, unknown codes default to Medium; label strings match
    /// exactly, unknown strings fall back to Low.
    pub fn from_raw(raw: &RawClass) -> Priority {
        match raw {
            RawClass::Code(0) => Priority::Low,
            RawClass::Code(1) => Priority::Medium,
            RawClass::Code(2) => Priority::High,
            RawClass::Code(_) => Priority::Medium,
            RawClass::Label(s) => match s.as_str() {
                "High" => Priority::High,
                "Medium" => Priority::Medium,
                "Low" => Priority::Low,
                _ => Priority::Low,
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }

    pub fn recommendation(self) -> &'static str {
        match self {
            Priority::High => "Immediate action required",
            Priority::Medium => "Schedule maintenance",
            Priority::Low => "Monitor regularly",
        }
    }

    pub fn risk_score(self) -> u8 {
        match self {
            Priority::High => 85,
            Priority::Medium => 55,
            Priority::Low => 25,
        }
    }
}

/// Readings normalized against dashboard reference spans, clamped to [0, 1].
/// Feeds the decorative radar chart on the form page.
pub fn radar_profile(f: &FeatureVector) -> [f64; 6] {
    [
        (f.temperature / 100.0).clamp(0.0, 1.0),
        (f.vibration / 5.0).clamp(0.0, 1.0),
        (f.pressure / 20.0).clamp(0.0, 1.0),
        (f.inspection_duration / 60.0).clamp(0.0, 1.0),
        (f.downtime_cost / 5000.0).clamp(0.0, 1.0),
        (f.technician_availability / 100.0).clamp(0.0, 1.0),
    ]
}
