//! Headline figures for a period and their change against the previous period.

use crate::analysis::bucket::select_period;
use crate::analysis::change::{ratio_change, Percent};
use crate::analysis::PeriodMatrix;
use crate::error::{Error, ErrorType, Result};
use crate::model::{Kind, Ledger, Period, Record};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

/// The headline figures of a single period. Computing these never needs a second period.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PeriodFigures {
    pub period: Period,
    /// The number of records in the period.
    pub records: usize,
    pub total: Decimal,
    /// Spend of kind `Credit`.
    pub credit: Decimal,
    /// Spend of kind `Debit`.
    pub debit: Decimal,
    /// `total / records`. Zero when the period has no records.
    pub average_daily: Decimal,
}

impl PeriodFigures {
    pub fn compute(ledger: &Ledger, period: Period) -> Self {
        let records: Vec<&Record> = ledger.in_period(period).collect();
        let total: Decimal = records.iter().map(|r| r.amount()).sum();
        let average_daily = if records.is_empty() {
            Decimal::ZERO
        } else {
            total
                .checked_div(Decimal::from(records.len()))
                .unwrap_or(Decimal::ZERO)
        };
        Self {
            period,
            records: records.len(),
            total,
            credit: ledger.total_of_kind(period, Kind::Credit),
            debit: ledger.total_of_kind(period, Kind::Debit),
            average_daily,
        }
    }
}

/// A figure in the current and previous period.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Metric {
    pub current: Decimal,
    pub previous: Decimal,
    pub change: Percent,
}

impl Metric {
    pub fn new(current: Decimal, previous: Decimal) -> Self {
        Self {
            current,
            previous,
            change: Percent::new(ratio_change(current, previous)),
        }
    }
}

/// The headline figures of `current` compared with `previous`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Summary {
    pub current: Period,
    pub previous: Period,
    pub total: Metric,
    pub credit: Metric,
    pub debit: Metric,
    pub average_daily: Metric,
}

/// Compares two explicit periods. Either may be absent from the ledger, in which case its
/// figures are all zero.
pub fn compare(ledger: &Ledger, current: Period, previous: Period) -> Summary {
    let now = PeriodFigures::compute(ledger, current);
    let before = PeriodFigures::compute(ledger, previous);
    Summary {
        current,
        previous,
        total: Metric::new(now.total, before.total),
        credit: Metric::new(now.credit, before.credit),
        debit: Metric::new(now.debit, before.debit),
        average_daily: Metric::new(now.average_daily, before.average_daily),
    }
}

/// Summarizes `period` (the latest period when `None`) against the period present before it.
///
/// # Errors
/// - `UnknownPeriod` when `period` is not in the data or the data is empty.
/// - `InsufficientHistory` when there is no earlier period to compare with.
pub fn summarize(ledger: &Ledger, period: Option<Period>) -> Result<Summary> {
    let matrix = PeriodMatrix::build(ledger);
    let current = select_period(&matrix, period)?;
    let previous = matrix.previous(current).ok_or_else(|| {
        Error::msg(
            ErrorType::InsufficientHistory,
            format!("There is no period before {current} to compare with"),
        )
    })?;
    let summary = compare(ledger, current, previous);
    debug!(
        "Total spend {current} is {} against {} in {previous}",
        summary.total.current, summary.total.previous
    );
    Ok(summary)
}

/// The figures of one period, with the comparison against the previous period when there is one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PeriodReport {
    pub figures: PeriodFigures,
    /// `None` when no period is present before `figures.period`.
    pub comparison: Option<Summary>,
}

/// Like `summarize`, but a period without a predecessor still yields its own figures.
///
/// # Errors
/// - `UnknownPeriod` when `period` is not in the data or the data is empty.
pub fn period_report(ledger: &Ledger, period: Option<Period>) -> Result<PeriodReport> {
    let matrix = PeriodMatrix::build(ledger);
    let current = select_period(&matrix, period)?;
    let comparison = matrix
        .previous(current)
        .map(|previous| compare(ledger, current, previous));
    if comparison.is_none() {
        debug!("{current} has no earlier period, reporting its figures alone");
    }
    Ok(PeriodReport {
        figures: PeriodFigures::compute(ledger, current),
        comparison,
    })
}
