//! Foreign-language facades over the engine.
pub mod python;
