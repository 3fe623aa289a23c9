//! Plain-text rendering of evaluation results.
pub mod report;

pub use report::format_report;
