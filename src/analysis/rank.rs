//! The largest increases and reductions of the latest period.

use crate::analysis::change::{sort_by_delta, Percent};
use crate::analysis::{matrix_delta, PeriodMatrix};
use crate::error::{Error, ErrorType, Result};
use crate::model::Period;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

/// How many categories each ranked list holds unless configured otherwise.
pub const DEFAULT_TOP_N: usize = 5;

/// One row of a ranked list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RankedChange {
    pub category: String,
    /// Latest total minus previous total.
    pub delta: Decimal,
    /// `percentage_change(delta, previous total)`: the delta measured against the category's
    /// total in the previous period. A category absent from the previous period is `+inf` when
    /// its delta is positive.
    pub percent: Percent,
}

/// The ranked changes from `previous` to `latest`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ChangeReport {
    pub previous: Period,
    pub latest: Period,
    /// Largest delta first.
    pub increases: Vec<RankedChange>,
    /// Smallest (most negative) delta first.
    pub reductions: Vec<RankedChange>,
}

/// Ranks every category by its change into the latest period and keeps `top_n` of each end.
///
/// Both lists are drawn from all categories, so with few categories the same category can appear in
/// both, and a category whose delta is zero is not filtered out. Equal deltas are ordered by
/// category label.
///
/// # Errors
/// `InsufficientHistory` when the matrix has fewer than two periods.
pub fn change_report(matrix: &PeriodMatrix, top_n: usize) -> Result<ChangeReport> {
    let deltas = matrix_delta(matrix)?;
    let (latest, row) = deltas.latest().ok_or_else(|| {
        Error::msg(
            ErrorType::InsufficientHistory,
            "There is no period with a predecessor",
        )
    })?;
    let previous = matrix.previous(latest).ok_or_else(|| {
        Error::msg(
            ErrorType::InsufficientHistory,
            format!("There is no period before {latest}"),
        )
    })?;

    let pairs: Vec<(String, Decimal)> = row.iter().map(|(c, d)| (c.clone(), *d)).collect();
    let ranked = |descending: bool| -> Vec<RankedChange> {
        let mut sorted = pairs.clone();
        sort_by_delta(&mut sorted, descending);
        sorted
            .into_iter()
            .take(top_n)
            .map(|(category, delta)| RankedChange {
                percent: Percent::between(delta, matrix.get(previous, &category)),
                category,
                delta,
            })
            .collect()
    };

    let report = ChangeReport {
        previous,
        latest,
        increases: ranked(true),
        reductions: ranked(false),
    };
    debug!(
        "Ranked {} categories from {previous} to {latest}",
        pairs.len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::percentage_change;
    use crate::test::{ledger, ledger_of, period};
    use rust_decimal_macros::dec;

    fn categories(list: &[RankedChange]) -> Vec<&str> {
        list.iter().map(|r| r.category.as_str()).collect()
    }

    #[test]
    fn test_change_report() {
        let matrix = PeriodMatrix::build(&ledger());
        let report = change_report(&matrix, DEFAULT_TOP_N).unwrap();
        assert_eq!(report.previous, period("2024-02"));
        assert_eq!(report.latest, period("2024-04"));
        assert_eq!(
            categories(&report.increases),
            vec!["Viagem", "Aluguel", "Transporte", "Lazer", "Mercado"]
        );
        assert_eq!(
            categories(&report.reductions),
            vec!["Saúde", "Mercado", "Lazer", "Transporte", "Aluguel"]
        );
    }

    #[test]
    fn test_change_report_percentages() {
        let matrix = PeriodMatrix::build(&ledger());
        let report = change_report(&matrix, DEFAULT_TOP_N).unwrap();
        let viagem = &report.increases[0];
        assert_eq!(viagem.delta, dec!(300));
        assert!(viagem.percent.is_infinite());
        let aluguel = &report.increases[1];
        assert_eq!(aluguel.percent.value(), -95.0);
        let saude = &report.reductions[0];
        assert_eq!(saude.delta, dec!(-80));
        assert_eq!(saude.percent.value(), -200.0);
    }

    #[test]
    fn test_percent_measures_delta_against_previous_total() {
        let ledger = ledger_of(&[
            ("2024-01-10", dec!(1000), "Aluguel"),
            ("2024-02-10", dec!(1050), "Aluguel"),
        ]);
        let report = change_report(&PeriodMatrix::build(&ledger), 5).unwrap();
        let aluguel = &report.increases[0];
        assert_eq!(aluguel.delta, dec!(50));
        assert_eq!(
            aluguel.percent.value(),
            percentage_change(dec!(50), dec!(1000))
        );
        assert_eq!(aluguel.percent.value(), -95.0);
    }

    #[test]
    fn test_change_report_limit() {
        let matrix = PeriodMatrix::build(&ledger());
        let report = change_report(&matrix, 2).unwrap();
        assert_eq!(report.increases.len(), 2);
        assert_eq!(report.reductions.len(), 2);
    }

    #[test]
    fn test_ties_ordered_by_category() {
        let ledger = ledger_of(&[
            ("2024-01-10", dec!(10), "Zebra"),
            ("2024-01-10", dec!(10), "Alpha"),
            ("2024-01-10", dec!(10), "Mid"),
            ("2024-02-10", dec!(110), "Zebra"),
            ("2024-02-10", dec!(110), "Alpha"),
            ("2024-02-10", dec!(20), "Mid"),
        ]);
        let matrix = PeriodMatrix::build(&ledger);
        for _ in 0..3 {
            let report = change_report(&matrix, 5).unwrap();
            assert_eq!(categories(&report.increases), vec!["Alpha", "Zebra", "Mid"]);
            assert_eq!(categories(&report.reductions), vec!["Mid", "Alpha", "Zebra"]);
        }
    }

    #[test]
    fn test_zero_delta_can_appear_in_both_lists() {
        let ledger = ledger_of(&[
            ("2024-01-10", dec!(10), "Same"),
            ("2024-02-10", dec!(10), "Same"),
        ]);
        let report = change_report(&PeriodMatrix::build(&ledger), 5).unwrap();
        assert_eq!(categories(&report.increases), vec!["Same"]);
        assert_eq!(categories(&report.reductions), vec!["Same"]);
        // A zero delta against a baseline of 10
        assert_eq!(report.increases[0].percent.value(), -100.0);
    }

    #[test]
    fn test_insufficient_history() {
        let ledger = ledger_of(&[("2024-01-10", dec!(10), "Only")]);
        let err = change_report(&PeriodMatrix::build(&ledger), 5).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::InsufficientHistory);
    }
}
