//! Folds the categories with a small share of a period's total into a single "other" row.

use crate::analysis::PeriodMatrix;
use crate::error::{Error, ErrorType, Result};
use crate::model::Period;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

/// Categories below 1% of the total are folded by default.
pub const DEFAULT_THRESHOLD: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// The label of the synthetic row that absorbs the small categories.
pub const OTHER_LABEL: &str = "Outros";

/// A category and its value.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CategoryValue {
    pub category: String,
    pub value: Decimal,
}

/// A breakdown of one total with the small categories folded together.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Consolidation {
    /// The sum of every category.
    pub total: Decimal,
    /// `threshold fraction × total`; categories strictly below it are folded.
    pub cutoff: Decimal,
    /// The categories at or above the cutoff, in input order.
    pub large: Vec<CategoryValue>,
    /// The label of the folded row.
    pub other_label: String,
    /// The sum of the folded categories. Zero when nothing was folded.
    pub other: Decimal,
}

impl Consolidation {
    /// The rows to display: the large categories followed by the "other" row. The "other" row is
    /// always present, even when its value is zero.
    pub fn rows(&self) -> Vec<CategoryValue> {
        let mut rows = self.large.clone();
        rows.push(CategoryValue {
            category: self.other_label.clone(),
            value: self.other,
        });
        rows
    }
}

/// Folds every category whose value is strictly less than `threshold × total` into one row named
/// `other_label`.
///
/// The comparison uses the signed total, so a zero or negative total (refunds) is not special-cased:
/// with a total of zero only negative categories are folded.
pub fn consolidate<I, S>(breakdown: I, threshold: Decimal, other_label: &str) -> Consolidation
where
    I: IntoIterator<Item = (S, Decimal)>,
    S: Into<String>,
{
    let values: Vec<CategoryValue> = breakdown
        .into_iter()
        .map(|(category, value)| CategoryValue {
            category: category.into(),
            value,
        })
        .collect();
    let total: Decimal = values.iter().map(|cv| cv.value).sum();
    let cutoff = threshold * total;

    let (small, large): (Vec<CategoryValue>, Vec<CategoryValue>) =
        values.into_iter().partition(|cv| cv.value < cutoff);
    let other = small.iter().map(|cv| cv.value).sum();
    debug!(
        "Folded {} of {} categories into '{other_label}'",
        small.len(),
        small.len() + large.len()
    );

    Consolidation {
        total,
        cutoff,
        large,
        other_label: other_label.to_string(),
        other,
    }
}

/// Consolidates the categories observed in `period`, or in the latest period when `period` is
/// `None`.
///
/// # Errors
/// `UnknownPeriod` when the requested period is not in the data, or the data is empty.
pub fn consolidate_period(
    matrix: &PeriodMatrix,
    period: Option<Period>,
    threshold: Decimal,
    other_label: &str,
) -> Result<(Period, Consolidation)> {
    let period = select_period(matrix, period)?;
    let consolidation = consolidate(matrix.observed(period), threshold, other_label);
    Ok((period, consolidation))
}

/// Returns `requested` if present in the matrix, otherwise the latest period when nothing was
/// requested.
pub(crate) fn select_period(matrix: &PeriodMatrix, requested: Option<Period>) -> Result<Period> {
    match requested {
        Some(period) if matrix.contains_period(period) => Ok(period),
        Some(period) => Err(Error::msg(
            ErrorType::UnknownPeriod,
            format!("There are no transactions in {period}"),
        )),
        None => matrix
            .latest()
            .ok_or_else(|| Error::msg(ErrorType::UnknownPeriod, "There are no transactions")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Ledger;
    use crate::test::{ledger, period};
    use rust_decimal_macros::dec;

    fn rows(c: &Consolidation) -> Vec<(String, Decimal)> {
        c.rows()
            .into_iter()
            .map(|cv| (cv.category, cv.value))
            .collect()
    }

    #[test]
    fn test_nothing_folded() {
        let c = consolidate(
            [
                ("A", dec!(700)),
                ("B", dec!(200)),
                ("C", dec!(60)),
                ("D", dec!(40)),
            ],
            DEFAULT_THRESHOLD,
            OTHER_LABEL,
        );
        assert_eq!(c.total, dec!(1000));
        assert_eq!(c.cutoff, dec!(10));
        assert_eq!(c.large.len(), 4);
        assert_eq!(c.other, Decimal::ZERO);
        assert_eq!(rows(&c).last().unwrap(), &("Outros".to_string(), dec!(0)));
    }

    #[test]
    fn test_small_categories_folded() {
        let c = consolidate(
            [("A", dec!(990)), ("B", dec!(5)), ("C", dec!(5))],
            DEFAULT_THRESHOLD,
            OTHER_LABEL,
        );
        assert_eq!(
            rows(&c),
            vec![
                ("A".to_string(), dec!(990)),
                ("Outros".to_string(), dec!(10))
            ]
        );
    }

    #[test]
    fn test_exactly_at_cutoff_is_kept() {
        let c = consolidate(
            [("A", dec!(990)), ("B", dec!(10))],
            DEFAULT_THRESHOLD,
            OTHER_LABEL,
        );
        assert_eq!(c.cutoff, dec!(10));
        assert_eq!(c.large.len(), 2);
    }

    #[test]
    fn test_everything_folded() {
        let c = consolidate([("A", dec!(10)), ("B", dec!(10))], dec!(0.9), "Other");
        assert!(c.large.is_empty());
        assert_eq!(c.other, c.total);
        assert_eq!(rows(&c), vec![("Other".to_string(), dec!(20))]);
    }

    #[test]
    fn test_negative_total_uses_signed_arithmetic() {
        // total = -100, cutoff = -1: only values below -1 are folded
        let c = consolidate(
            [("Refund", dec!(-150)), ("Small", dec!(50))],
            DEFAULT_THRESHOLD,
            OTHER_LABEL,
        );
        assert_eq!(c.total, dec!(-100));
        assert_eq!(c.other, dec!(-150));
        assert_eq!(c.large[0].category, "Small");
    }

    #[test]
    fn test_empty_breakdown() {
        let c = consolidate(Vec::<(String, Decimal)>::new(), DEFAULT_THRESHOLD, OTHER_LABEL);
        assert_eq!(c.total, Decimal::ZERO);
        assert_eq!(rows(&c).len(), 1);
    }

    #[test]
    fn test_consolidate_period_defaults_to_latest() {
        let matrix = PeriodMatrix::build(&ledger());
        let (p, c) = consolidate_period(&matrix, None, dec!(0.05), OTHER_LABEL).unwrap();
        assert_eq!(p, period("2024-04"));
        assert_eq!(c.total, dec!(1515));
        // cutoff 75.75: Lazer (20) and Transporte (25) are folded
        assert_eq!(c.other, dec!(45));
        let large: Vec<&str> = c.large.iter().map(|cv| cv.category.as_str()).collect();
        assert_eq!(large, vec!["Aluguel", "Mercado", "Viagem"]);
    }

    #[test]
    fn test_consolidate_period_unknown() {
        let matrix = PeriodMatrix::build(&ledger());
        let err = consolidate_period(&matrix, Some(period("2024-03")), DEFAULT_THRESHOLD, "x")
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::UnknownPeriod);

        let empty = PeriodMatrix::build(&Ledger::default());
        let err = consolidate_period(&empty, None, DEFAULT_THRESHOLD, "x").unwrap_err();
        assert_eq!(err.error_type(), ErrorType::UnknownPeriod);
    }
}
