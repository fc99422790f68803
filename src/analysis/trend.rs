//! Spend over the transaction date, for a spending trend line.

use crate::model::Ledger;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::trace;

/// The summed spend of one transaction date.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DateTotal {
    pub date: NaiveDate,
    pub value: Decimal,
}

/// Sums the amounts per transaction date (not payment date), ascending by date. Only dates that
/// have records appear.
pub fn daily_totals(ledger: &Ledger) -> Vec<DateTotal> {
    let mut by_date: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for record in ledger {
        *by_date.entry(record.date()).or_insert(Decimal::ZERO) += record.amount();
    }
    trace!("Spend spread over {} dates", by_date.len());
    by_date
        .into_iter()
        .map(|(date, value)| DateTotal { date, value })
        .collect()
}
