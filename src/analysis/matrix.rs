//! Groups ledger records into a period × category matrix of summed amounts.

use crate::model::{Ledger, Period};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::trace;

/// Summed amounts keyed by (period, category).
///
/// Only combinations observed in the ledger have a cell. Every lookup of a missing combination
/// yields zero, and the dense views (`row`, `series`) fill every category in every period.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PeriodMatrix {
    periods: BTreeSet<Period>,
    categories: BTreeSet<String>,
    cells: BTreeMap<Period, BTreeMap<String, Decimal>>,
}

/// One dense cell of the matrix.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct MatrixCell {
    pub period: Period,
    pub category: String,
    pub value: Decimal,
}

/// The total of one period.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PeriodTotal {
    pub period: Period,
    pub value: Decimal,
}

impl PeriodMatrix {
    /// Builds the matrix from scratch. An empty ledger gives an empty matrix.
    pub fn build(ledger: &Ledger) -> Self {
        let mut matrix = PeriodMatrix::default();
        for record in ledger {
            let period = record.period();
            matrix.periods.insert(period);
            if !matrix.categories.contains(record.category()) {
                matrix.categories.insert(record.category().to_string());
            }
            *matrix
                .cells
                .entry(period)
                .or_default()
                .entry(record.category().to_string())
                .or_insert(Decimal::ZERO) += record.amount();
        }
        trace!(
            "Built a matrix of {} periods and {} categories",
            matrix.periods.len(),
            matrix.categories.len()
        );
        matrix
    }

    /// The distinct periods, ascending.
    pub fn periods(&self) -> &BTreeSet<Period> {
        &self.periods
    }

    /// The distinct categories, ascending by label.
    pub fn categories(&self) -> &BTreeSet<String> {
        &self.categories
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    pub fn contains_period(&self, period: Period) -> bool {
        self.periods.contains(&period)
    }

    /// The summed amount for the combination, zero if it was never observed.
    pub fn get(&self, period: Period, category: &str) -> Decimal {
        self.cells
            .get(&period)
            .and_then(|row| row.get(category))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// The categories observed in `period` with their sums. Empty if the period is absent.
    pub fn observed(&self, period: Period) -> BTreeMap<String, Decimal> {
        self.cells.get(&period).cloned().unwrap_or_default()
    }

    /// Every category with its sum in `period`, zero-filled.
    pub fn row(&self, period: Period) -> BTreeMap<String, Decimal> {
        self.categories
            .iter()
            .map(|c| (c.clone(), self.get(period, c)))
            .collect()
    }

    pub fn period_total(&self, period: Period) -> Decimal {
        self.cells
            .get(&period)
            .map(|row| row.values().copied().sum())
            .unwrap_or(Decimal::ZERO)
    }

    /// The most recent period present.
    pub fn latest(&self) -> Option<Period> {
        self.periods.last().copied()
    }

    /// The period present in the data immediately before `period`. This is not necessarily the
    /// previous calendar month.
    pub fn previous(&self, period: Period) -> Option<Period> {
        self.periods.range(..period).next_back().copied()
    }

    /// The dense grid in period then category order, for trend lines.
    pub fn series(&self) -> Vec<MatrixCell> {
        self.series_for(&[])
    }

    /// The dense grid restricted to the `selected` categories. An empty selection means every
    /// category, and selected categories that do not occur are ignored.
    pub fn series_for(&self, selected: &[String]) -> Vec<MatrixCell> {
        let categories = self.selection(selected);
        self.periods
            .iter()
            .flat_map(|period| {
                categories.iter().map(move |category| MatrixCell {
                    period: *period,
                    category: category.to_string(),
                    value: self.get(*period, category),
                })
            })
            .collect()
    }

    fn selection<'a>(&'a self, selected: &'a [String]) -> BTreeSet<&'a str> {
        if selected.is_empty() {
            self.categories.iter().map(String::as_str).collect()
        } else {
            selected
                .iter()
                .map(String::as_str)
                .filter(|c| self.categories.contains(*c))
                .collect()
        }
    }
}

/// The total of each period over the `selected` categories. An empty selection means every
/// category. Selected categories that do not occur are ignored.
pub fn monthly_totals(matrix: &PeriodMatrix, selected: &[String]) -> Vec<PeriodTotal> {
    let selected = matrix.selection(selected);
    matrix
        .periods()
        .iter()
        .map(|period| PeriodTotal {
            period: *period,
            value: selected.iter().map(|c| matrix.get(*period, c)).sum(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{ledger, ledger_of, period};
    use rust_decimal_macros::dec;

    #[test]
    fn test_build() {
        let matrix = PeriodMatrix::build(&ledger());
        let periods: Vec<String> = matrix.periods().iter().map(|p| p.to_string()).collect();
        assert_eq!(periods, vec!["2024-01", "2024-02", "2024-04"]);
        assert_eq!(matrix.categories().len(), 6);
        assert_eq!(matrix.get(period("2024-01"), "Mercado"), dec!(140));
        assert_eq!(matrix.get(period("2024-02"), "Lazer"), dec!(30));
    }

    #[test]
    fn test_missing_combination_is_zero() {
        let matrix = PeriodMatrix::build(&ledger());
        assert_eq!(matrix.get(period("2024-01"), "Viagem"), Decimal::ZERO);
        assert_eq!(matrix.get(period("2023-12"), "Mercado"), Decimal::ZERO);
        assert!(!matrix.observed(period("2024-01")).contains_key("Viagem"));
        assert_eq!(matrix.row(period("2024-01"))["Viagem"], Decimal::ZERO);
    }

    #[test]
    fn test_empty_ledger() {
        let matrix = PeriodMatrix::build(&Ledger::default());
        assert!(matrix.is_empty());
        assert!(matrix.categories().is_empty());
        assert_eq!(matrix.latest(), None);
        assert!(matrix.series().is_empty());
    }

    #[test]
    fn test_row_sums_match_ledger_totals() {
        let ledger = ledger();
        let matrix = PeriodMatrix::build(&ledger);
        for period in matrix.periods() {
            let direct: Decimal = ledger.in_period(*period).map(|r| r.amount()).sum();
            let from_row: Decimal = matrix.row(*period).values().copied().sum();
            assert_eq!(direct, from_row);
            assert_eq!(direct, matrix.period_total(*period));
        }
    }

    #[test]
    fn test_previous_skips_absent_periods() {
        let matrix = PeriodMatrix::build(&ledger());
        assert_eq!(matrix.previous(period("2024-04")), Some(period("2024-02")));
        assert_eq!(matrix.previous(period("2024-01")), None);
        assert_eq!(matrix.latest(), Some(period("2024-04")));
    }

    #[test]
    fn test_series_is_dense() {
        let matrix = PeriodMatrix::build(&ledger());
        let series = matrix.series();
        assert_eq!(series.len(), 3 * 6);
        assert_eq!(series[0].period, period("2024-01"));
        assert_eq!(series[0].category, "Aluguel");
    }

    #[test]
    fn test_series_for_selection() {
        let matrix = PeriodMatrix::build(&ledger());
        let selected = vec!["Viagem".to_string(), "Lazer".to_string(), "Nope".to_string()];
        let series = matrix.series_for(&selected);
        let cells: Vec<(String, &str, Decimal)> = series
            .iter()
            .map(|c| (c.period.to_string(), c.category.as_str(), c.value))
            .collect();
        assert_eq!(
            cells,
            vec![
                ("2024-01".to_string(), "Lazer", dec!(50)),
                ("2024-01".to_string(), "Viagem", dec!(0)),
                ("2024-02".to_string(), "Lazer", dec!(30)),
                ("2024-02".to_string(), "Viagem", dec!(0)),
                ("2024-04".to_string(), "Lazer", dec!(20)),
                ("2024-04".to_string(), "Viagem", dec!(300)),
            ]
        );
        assert_eq!(matrix.series_for(&[]), matrix.series());
    }

    #[test]
    fn test_monthly_totals() {
        let matrix = PeriodMatrix::build(&ledger());
        let all = monthly_totals(&matrix, &[]);
        let values: Vec<Decimal> = all.iter().map(|t| t.value).collect();
        assert_eq!(values, vec![dec!(1220), dec!(1260), dec!(1515)]);

        let some = monthly_totals(&matrix, &["Lazer".to_string(), "Nope".to_string()]);
        let values: Vec<Decimal> = some.iter().map(|t| t.value).collect();
        assert_eq!(values, vec![dec!(50), dec!(30), dec!(20)]);
    }

    #[test]
    fn test_refunds_reduce_the_sum() {
        let ledger = ledger_of(&[
            ("2024-01-10", dec!(100), "Mercado"),
            ("2024-01-20", dec!(-40), "Mercado"),
        ]);
        let matrix = PeriodMatrix::build(&ledger);
        assert_eq!(matrix.get(period("2024-01"), "Mercado"), dec!(60));
    }
}
