// =============================================================================
// Analysis Pipeline
// =============================================================================
//
// Turns a fetched price series into an `AnalysisSnapshot` (numbers, tags and
// aligned chart data) and renders snapshots into localized reports.

pub mod interpretation;
pub mod report;
pub mod snapshot;

pub use interpretation::evaluate_investment;
pub use report::{calculator_message, LocalizedReport};
pub use snapshot::{analyze, AnalysisSnapshot};
