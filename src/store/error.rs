//! Defines the error type shared by the traverse store and the evaluator.
use super::types::{PointId, Reading, Role};
use thiserror::Error;

/// Structural failures. Missing readings are never errors; they resolve to `None`.
#[derive(Error, Debug)]
pub enum TraverseError {
    #[error("Traverse has {points} point(s); at least 2 are required")]
    InsufficientData { points: usize },
    #[error("No point with identity {0}")]
    UnknownPoint(PointId),
    #[error("Index {index} is out of bounds for a traverse of {len} points")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("The endpoint at index {index} is fixed and cannot be moved or removed")]
    EndpointLocked { index: usize },
    #[error("The {reading} of point '{label}' is not editable")]
    ReadingNotEditable { label: String, reading: Reading },
    #[error("Role {role:?} cannot be used for an interior point")]
    InvalidRole { role: Role },
    #[error("Every point identity is already in use")]
    IdentitiesExhausted,
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Failed to decode traverse record: {0}")]
    Decode(#[from] serde_json::Error),
}
