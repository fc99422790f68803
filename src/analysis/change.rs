//! Period-over-period changes, absolute and in percent.

use crate::analysis::PeriodMatrix;
use crate::error::{Error, ErrorType, Result};
use crate::model::Period;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use tracing::debug;

/// The percentage change from `previous` to `current`.
///
/// A zero baseline has no ratio: the change is `+infinity` when `current` is positive and `0`
/// otherwise (including when `current` is negative).
///
/// ```
/// # use expense_compare::analysis::percentage_change;
/// # use rust_decimal::Decimal;
/// assert_eq!(percentage_change(Decimal::from(150), Decimal::from(100)), 50.0);
/// assert_eq!(percentage_change(Decimal::from(50), Decimal::ZERO), f64::INFINITY);
/// ```
pub fn percentage_change(current: Decimal, previous: Decimal) -> f64 {
    if previous.is_zero() {
        return zero_baseline(current);
    }
    (current - previous)
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|scaled| scaled.checked_div(previous))
        .and_then(|pct| pct.to_f64())
        .unwrap_or_else(|| {
            let (c, p) = (to_f64(current), to_f64(previous));
            (c - p) / p * 100.0
        })
}

/// The percentage change written as `100 * (current / previous - 1)`. The ratio is undefined for a
/// zero baseline, which is answered the same way as `percentage_change`.
pub fn ratio_change(current: Decimal, previous: Decimal) -> f64 {
    if previous.is_zero() {
        return zero_baseline(current);
    }
    current
        .checked_div(previous)
        .and_then(|ratio| (ratio - Decimal::ONE).checked_mul(Decimal::ONE_HUNDRED))
        .and_then(|pct| pct.to_f64())
        .unwrap_or_else(|| 100.0 * (to_f64(current) / to_f64(previous) - 1.0))
}

fn zero_baseline(current: Decimal) -> f64 {
    if current > Decimal::ZERO {
        f64::INFINITY
    } else {
        0.0
    }
}

fn to_f64(d: Decimal) -> f64 {
    d.to_f64().unwrap_or_default()
}

/// A percentage that may be infinite. It serializes as a number, or as the string `"inf"` since
/// JSON has no infinity.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Percent(f64);

impl Percent {
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    pub fn between(current: Decimal, previous: Decimal) -> Self {
        Self(percentage_change(current, previous))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn is_infinite(&self) -> bool {
        self.0.is_infinite()
    }
}

impl Display for Percent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.0.is_infinite() {
            write!(f, "{}inf", if self.0 < 0.0 { "-" } else { "+" })
        } else {
            write!(f, "{:+.2}%", self.0)
        }
    }
}

impl Serialize for Percent {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if self.0.is_finite() {
            serializer.serialize_f64(self.0)
        } else if self.0.is_nan() {
            serializer.serialize_none()
        } else if self.0 > 0.0 {
            serializer.serialize_str("inf")
        } else {
            serializer.serialize_str("-inf")
        }
    }
}

/// The change of every category between each period and the period present before it.
///
/// The first period has no predecessor and so has no row.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DeltaMatrix {
    deltas: BTreeMap<Period, BTreeMap<String, Decimal>>,
}

impl DeltaMatrix {
    /// The periods that have a delta row, ascending.
    pub fn periods(&self) -> impl Iterator<Item = Period> + '_ {
        self.deltas.keys().copied()
    }

    /// The change of every category into `period`.
    pub fn get(&self, period: Period) -> Option<&BTreeMap<String, Decimal>> {
        self.deltas.get(&period)
    }

    /// The delta row of the latest period.
    pub fn latest(&self) -> Option<(Period, &BTreeMap<String, Decimal>)> {
        self.deltas.iter().next_back().map(|(p, r)| (*p, r))
    }
}

/// Computes `matrix[period] - matrix[previous present period]` for every category, treating absent
/// cells as zero.
///
/// # Errors
/// `InsufficientHistory` when the matrix has fewer than two periods.
pub fn matrix_delta(matrix: &PeriodMatrix) -> Result<DeltaMatrix> {
    require_history(matrix)?;
    let periods: Vec<Period> = matrix.periods().iter().copied().collect();
    let deltas = periods
        .windows(2)
        .map(|pair| {
            let (previous, current) = (pair[0], pair[1]);
            let row = matrix
                .categories()
                .iter()
                .map(|c| (c.clone(), matrix.get(current, c) - matrix.get(previous, c)))
                .collect();
            (current, row)
        })
        .collect();
    debug!("Computed deltas over {} periods", periods.len());
    Ok(DeltaMatrix { deltas })
}

/// Fails with `InsufficientHistory` unless at least two periods are present.
pub(crate) fn require_history(matrix: &PeriodMatrix) -> Result<()> {
    let count = matrix.periods().len();
    if count < 2 {
        return Err(Error::msg(
            ErrorType::InsufficientHistory,
            format!("At least two periods are needed for a comparison, found {count}"),
        ));
    }
    Ok(())
}

/// Orders `(category, delta)` pairs by delta, descending when `descending`, with ties broken by
/// category label ascending either way.
pub(crate) fn sort_by_delta(pairs: &mut [(String, Decimal)], descending: bool) {
    pairs.sort_by(|(cat_a, a), (cat_b, b)| {
        let by_delta = if descending { b.cmp(a) } else { a.cmp(b) };
        by_delta.then_with(|| cat_a.cmp(cat_b))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Ledger;
    use crate::test::{ledger, ledger_of, period};
    use rust_decimal_macros::dec;

    #[test]
    fn test_percentage_change() {
        assert_eq!(percentage_change(dec!(0), dec!(0)), 0.0);
        assert_eq!(percentage_change(dec!(50), dec!(0)), f64::INFINITY);
        assert_eq!(percentage_change(dec!(150), dec!(100)), 50.0);
        assert_eq!(percentage_change(dec!(50), dec!(100)), -50.0);
    }

    #[test]
    fn test_percentage_change_negative_over_zero() {
        assert_eq!(percentage_change(dec!(-20), dec!(0)), 0.0);
    }

    #[test]
    fn test_percentage_change_negative_baseline() {
        // Refund-heavy months can have a negative baseline; the arithmetic is applied as is
        assert_eq!(percentage_change(dec!(-50), dec!(-100)), -50.0);
    }

    #[test]
    fn test_ratio_change_matches() {
        for (c, p) in [
            (dec!(0), dec!(0)),
            (dec!(50), dec!(0)),
            (dec!(150), dec!(100)),
            (dec!(50), dec!(100)),
            (dec!(-3), dec!(0)),
        ] {
            assert_eq!(ratio_change(c, p), percentage_change(c, p), "{c} vs {p}");
        }
    }

    #[test]
    fn test_percent_serialize() {
        let json = serde_json::to_string(&[Percent::new(12.5), Percent::new(f64::INFINITY)]);
        assert_eq!(json.unwrap(), "[12.5,\"inf\"]");
    }

    #[test]
    fn test_percent_display() {
        assert_eq!(Percent::new(-33.333).to_string(), "-33.33%");
        assert_eq!(Percent::new(f64::INFINITY).to_string(), "+inf");
    }

    #[test]
    fn test_matrix_delta_uses_previous_present_period() {
        let matrix = PeriodMatrix::build(&ledger());
        let deltas = matrix_delta(&matrix).unwrap();
        let periods: Vec<Period> = deltas.periods().collect();
        assert_eq!(periods, vec![period("2024-02"), period("2024-04")]);

        let (latest, row) = deltas.latest().unwrap();
        assert_eq!(latest, period("2024-04"));
        assert_eq!(row["Viagem"], dec!(300));
        assert_eq!(row["Saúde"], dec!(-80));
        assert_eq!(row["Aluguel"], dec!(50));

        let feb = deltas.get(period("2024-02")).unwrap();
        assert_eq!(feb["Saúde"], dec!(80));
        assert_eq!(feb["Viagem"], Decimal::ZERO);
        assert_eq!(feb.len(), 6);
    }

    #[test]
    fn test_matrix_delta_insufficient_history() {
        let one_period = ledger_of(&[
            ("2024-01-10", dec!(100), "Mercado"),
            ("2024-01-20", dec!(40), "Lazer"),
        ]);
        let err = matrix_delta(&PeriodMatrix::build(&one_period)).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::InsufficientHistory);

        let err = matrix_delta(&PeriodMatrix::build(&Ledger::default())).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::InsufficientHistory);
    }

    #[test]
    fn test_sort_by_delta_tie_break() {
        let mut pairs = vec![
            ("Zoo".to_string(), dec!(100)),
            ("Bar".to_string(), dec!(-5)),
            ("Abc".to_string(), dec!(100)),
        ];
        sort_by_delta(&mut pairs, true);
        let cats: Vec<&str> = pairs.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(cats, vec!["Abc", "Zoo", "Bar"]);

        sort_by_delta(&mut pairs, false);
        let cats: Vec<&str> = pairs.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(cats, vec!["Bar", "Abc", "Zoo"]);
    }
}
