//! Height resolution and propagation along the point sequence.
pub mod engine;
pub mod ledger;
pub mod resolver;

pub use engine::{propagate, propagate_from_start};
pub use ledger::{CorrectionLedger, CORRECTION_STEP_MM};
pub use resolver::resolve_delta_h;
