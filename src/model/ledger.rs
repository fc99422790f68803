use crate::error::{Error, ErrorType, Res};
use crate::model::mapping::Mapping;
use crate::model::record::REQUIRED_COLUMNS;
use crate::model::{Kind, Period, Record, Source};
use anyhow::{bail, Context};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// The unified set of transaction records from both sources.
///
/// Records from the invoice and the statement are simply concatenated. There is no deduplication,
/// so a purchase that appears in both sources is counted twice. Nothing downstream depends on the
/// order of the records.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Ledger {
    records: Vec<Record>,
}

impl Ledger {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Parses the rows of one source. The first row must be the header row. Empty rows are skipped.
    pub fn parse<S, R>(rows: impl IntoIterator<Item = R>, source: Source) -> Res<Self>
    where
        S: Into<String>,
        R: IntoIterator<Item = S>,
    {
        let mut rows = rows.into_iter();
        let mapping = match rows.next() {
            Some(header_row) => Mapping::new(header_row)?,
            None => bail!("An empty data set cannot be parsed into {source} records"),
        };
        mapping
            .require(REQUIRED_COLUMNS)
            .with_context(|| format!("The {source} data has no usable header row"))?;

        let mut records = Vec::new();
        for (row_ix, row) in rows.enumerate() {
            let values: Vec<String> = row.into_iter().map(|s| s.into()).collect();
            if values.iter().all(|v| v.trim().is_empty()) {
                continue;
            }
            // Row numbers are 1-based and the header is row 1
            let row_number = row_ix + 2;
            let record = Record::from_row(&mapping, &values, source).map_err(|e| {
                warn!("Malformed {source} row {row_number}: {e:#}");
                e.context(format!("Unable to parse {source} row {row_number}"))
            })?;
            records.push(record);
        }
        debug!("Parsed {} {source} records", records.len());
        Ok(Self { records })
    }

    /// Combines the invoice and statement records into one ledger. Records keep their `source`
    /// tag and amounts are not altered.
    pub fn merge(invoice: Ledger, statement: Ledger) -> Res<Self> {
        if let Some(bad) = invoice.records.iter().find(|r| r.source() != Source::Invoice) {
            return Err(mislabeled(bad, Source::Invoice));
        }
        if let Some(bad) = statement
            .records
            .iter()
            .find(|r| r.source() != Source::Statement)
        {
            return Err(mislabeled(bad, Source::Statement));
        }
        debug!(
            "Merging {} invoice records with {} statement records",
            invoice.len(),
            statement.len()
        );
        let mut records = invoice.records;
        records.extend(statement.records);
        Ok(Self { records })
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The distinct periods present, ascending.
    pub fn periods(&self) -> BTreeSet<Period> {
        self.records.iter().map(Record::period).collect()
    }

    /// The distinct categories present.
    pub fn categories(&self) -> BTreeSet<&str> {
        self.records.iter().map(Record::category).collect()
    }

    /// The records whose payment date falls in `period`.
    pub fn in_period(&self, period: Period) -> impl Iterator<Item = &Record> {
        self.records.iter().filter(move |r| r.period() == period)
    }

    /// The sum of every amount.
    pub fn total(&self) -> Decimal {
        self.records.iter().map(Record::amount).sum()
    }

    /// The sum of the amounts of `kind` in `period`.
    pub fn total_of_kind(&self, period: Period, kind: Kind) -> Decimal {
        self.in_period(period)
            .filter(|r| r.kind() == kind)
            .map(Record::amount)
            .sum()
    }
}

fn mislabeled(record: &Record, expected: Source) -> anyhow::Error {
    Error::msg(
        ErrorType::MalformedRecord,
        format!(
            "A {} record in category '{}' was passed as {expected} data",
            record.source(),
            record.category()
        ),
    )
    .into()
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
