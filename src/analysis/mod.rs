//! The analyses derived from a `Ledger`.
//!
//! Each analysis is a pure function of the ledger (or of a `PeriodMatrix` built from it) and can
//! fail independently: an analysis that needs two periods returns `InsufficientHistory` without
//! affecting analyses that only need one.

mod bucket;
mod change;
mod matrix;
mod rank;
mod summary;
mod trend;

pub use bucket::{
    consolidate, consolidate_period, CategoryValue, Consolidation, DEFAULT_THRESHOLD, OTHER_LABEL,
};
pub use change::{matrix_delta, percentage_change, ratio_change, DeltaMatrix, Percent};
pub use matrix::{monthly_totals, MatrixCell, PeriodMatrix, PeriodTotal};
pub use rank::{change_report, ChangeReport, RankedChange, DEFAULT_TOP_N};
pub use summary::{compare, period_report, summarize, Metric, PeriodFigures, PeriodReport, Summary};
pub use trend::{daily_totals, DateTotal};
