//! The traverse data model: points, identities and the owned point sequence.
pub mod error;
pub mod legacy;
pub mod traverse;
pub mod types;

pub use error::TraverseError;
pub use traverse::Traverse;
pub use types::{Point, PointId, Position, Reading, Role};
