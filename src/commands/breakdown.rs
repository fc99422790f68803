use crate::analysis::{
    consolidate_period, daily_totals, monthly_totals, Consolidation, DateTotal, MatrixCell,
    PeriodMatrix, PeriodTotal,
};
use crate::commands::{load, Out};
use crate::load::Loader;
use crate::model::{Amount, Period};
use crate::{Config, Result};
use rust_decimal::Decimal;
use serde::Serialize;

/// The consolidated category breakdown of one period.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PeriodBreakdown {
    pub period: Period,
    pub consolidation: Consolidation,
}

/// The monthly view of a selection of categories.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct MonthlyBreakdown {
    /// The total of each period over the selection.
    pub totals: Vec<PeriodTotal>,
    /// Each selected category in each period, zero-filled.
    pub series: Vec<MatrixCell>,
}

/// The total of each period over the selected categories, and the per-category series behind it.
/// All categories are selected when `categories` is empty.
pub async fn monthly(
    config: &Config,
    loader: &dyn Loader,
    categories: &[String],
) -> Result<Out<MonthlyBreakdown>> {
    let ledger = load(config, loader).await?;
    let matrix = PeriodMatrix::build(&ledger);
    let breakdown = MonthlyBreakdown {
        totals: monthly_totals(&matrix, categories),
        series: matrix.series_for(categories),
    };
    let selection = if categories.is_empty() {
        "all categories".to_string()
    } else {
        categories.join(", ")
    };
    Ok(Out::new(
        format!(
            "Monthly totals over {} periods for {selection}",
            breakdown.totals.len()
        ),
        breakdown,
    ))
}

/// Breaks `period` (the latest when `None`) down by category, folding categories below
/// `threshold` (the config's `other_threshold` when `None`) of the total.
///
/// # Errors
/// - `UnknownPeriod` when `period` does not occur in the data.
pub async fn categories(
    config: &Config,
    loader: &dyn Loader,
    period: Option<Period>,
    threshold: Option<Decimal>,
) -> Result<Out<PeriodBreakdown>> {
    let ledger = load(config, loader).await?;
    let matrix = PeriodMatrix::build(&ledger);
    let (period, consolidation) = consolidate_period(
        &matrix,
        period,
        threshold.unwrap_or_else(|| config.other_threshold()),
        config.other_label(),
    )?;
    let message = format!(
        "Spend in {period} was {} across {} categories, {} in '{}'",
        Amount::new(consolidation.total),
        consolidation.large.len(),
        Amount::new(consolidation.other),
        consolidation.other_label
    );
    Ok(Out::new(
        message,
        PeriodBreakdown {
            period,
            consolidation,
        },
    ))
}

/// The spend of each transaction date, ascending.
pub async fn trend(config: &Config, loader: &dyn Loader) -> Result<Out<Vec<DateTotal>>> {
    let ledger = load(config, loader).await?;
    let totals = daily_totals(&ledger);
    let message = match (totals.first(), totals.last()) {
        (Some(first), Some(last)) => format!(
            "Spend on {} dates from {} to {}",
            totals.len(),
            first.date,
            last.date
        ),
        _ => "There are no transactions".to_string(),
    };
    Ok(Out::new(message, totals))
}
