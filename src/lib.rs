//! Leveling traverse core: resolves height differences from rod readings,
//! propagates elevations along the line and evaluates its closure.
//!
//! The engine is pure. Callers own the [`Traverse`] and the
//! [`CorrectionLedger`]; each call returns freshly derived values.
//!
//! ```
//! use leveling_core::{evaluate, propagate, CorrectionLedger, Reading, Role, Traverse};
//!
//! let mut line = Traverse::new("MB1", 100.0, "MB2", 100.834, 1.0);
//! let start = line.points()[0].id;
//! let w1 = line.insert_before_end(Role::ChangePoint)?;
//! let end = line.points()[2].id;
//! line.set_reading(start, Reading::BackSight, Some(1.234))?;
//! line.set_reading(w1, Reading::BackSight, Some(1.500))?;
//! line.set_reading(w1, Reading::ForeSight, Some(0.800))?;
//! line.set_reading(end, Reading::ForeSight, Some(1.100))?;
//!
//! let ledger = CorrectionLedger::new();
//! let derived = propagate(&line, 100.0, &ledger);
//! let evaluation = evaluate(&derived, &ledger)?;
//! assert!(evaluation.closure_ok);
//! # Ok::<(), leveling_core::TraverseError>(())
//! ```

pub mod analysis;
pub mod compute;
pub mod config;
pub mod display;
pub mod store;

#[cfg(feature = "python")]
pub mod bindings;

pub use analysis::{classify, evaluate, renumber, suggest_next_role, Evaluation, Evaluator};
pub use compute::{propagate, propagate_from_start, resolve_delta_h, CorrectionLedger};
pub use config::Tolerances;
pub use store::{Point, PointId, Position, Reading, Role, Traverse, TraverseError};

#[cfg(feature = "python")]
use pyo3::prelude::*;

// --- Module Definition ---
/// This function defines the `leveling._core` Python module.
/// The name `_core` is chosen to indicate it's an internal, compiled component.
#[cfg(feature = "python")]
#[pymodule]
fn _core(_py: Python, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(bindings::python::core_version, m)?)?;
    m.add_class::<bindings::python::PyTraverse>()?;
    Ok(())
}
