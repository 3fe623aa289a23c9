//! Classification, relabeling and evaluation of a traverse.
pub mod classify;
pub mod evaluation;
pub mod renumber;

pub use classify::{classify, suggest_next_role, Classification};
pub use evaluation::{allowable_error, evaluate, CheckStatus, Evaluation, Evaluator, MidSightCheck};
pub use renumber::renumber;
