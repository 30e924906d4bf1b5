//! Data structures for selection results and statistics

mod result;
mod stats;
mod warning;

pub use result::{ExcludedFile, ExtractionResult, IncludedFile, Rejection, SelectionStatus};
pub use stats::{SelectionStats, StatsCollector};
pub use warning::{Warning, WarningCategory};
