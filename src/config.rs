//! Numeric tolerances of the traverse checks.
use crate::store::TraverseError;
use serde::{Serialize, Deserialize};
use serde_json::Value;

/// Every field has a default, so a partial JSON document overrides only what it names.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerances {
    /// Epsilon for height comparisons, meters.
    pub height_epsilon_m: f64,
    /// `k` in the allowable closure error `k * sqrt(L[km])`, meters.
    pub allowable_coefficient_m: f64,
    /// Epsilon for comparing the closure error with the correction total, millimeters.
    pub correction_epsilon_mm: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            height_epsilon_m: 0.001,
            allowable_coefficient_m: 0.015,
            correction_epsilon_mm: 0.5,
        }
    }
}

impl Tolerances {
    /// Reads a JSON object of overrides. Any other JSON value is rejected.
    pub fn from_json(json: &str) -> Result<Self, TraverseError> {
        match serde_json::from_str::<Value>(json)? {
            value @ Value::Object(_) => Ok(serde_json::from_value(value)?),
            other => Err(TraverseError::InvalidConfig(format!(
                "tolerances must be a JSON object, got {}",
                kind(&other)
            ))),
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
