use crate::error::{Error, ErrorType, Res};
use crate::model::mapping::Mapping;
use crate::model::{Amount, Period};
use anyhow::{bail, Context};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The transaction type. Only statement rows usually carry one.
#[derive(
    Debug, Default, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    Credit,
    Debit,
    #[default]
    Unspecified,
}

serde_plain::derive_display_from_serialize!(Kind);

impl Kind {
    /// Parses the English or Portuguese spelling of a kind. A blank cell is `Unspecified`.
    pub fn parse(s: &str) -> Res<Kind> {
        match s.trim().to_lowercase().as_str() {
            "" => Ok(Kind::Unspecified),
            "credit" | "crédito" | "credito" => Ok(Kind::Credit),
            "debit" | "débito" | "debito" => Ok(Kind::Debit),
            bad => bail!("Invalid transaction kind '{bad}'"),
        }
    }
}

/// Which of the two datasets a record came from.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// The card invoice history.
    Invoice,
    /// The account statement history.
    Statement,
}

serde_plain::derive_display_from_serialize!(Source);
serde_plain::derive_fromstr_from_deserialize!(Source);

/// A single transaction, as used by all of the analyses. Records are never mutated after they
/// are created.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Record {
    date: NaiveDate,
    payment_date: NaiveDate,
    amount: Decimal,
    category: String,
    kind: Kind,
    source: Source,
}

impl Record {
    pub fn new(
        date: NaiveDate,
        payment_date: NaiveDate,
        amount: Decimal,
        category: impl Into<String>,
        kind: Kind,
        source: Source,
    ) -> Res<Self> {
        let category = category.into().trim().to_string();
        if category.is_empty() {
            bail!("A record must have a category");
        }
        Ok(Self {
            date,
            payment_date,
            amount,
            category,
            kind,
            source,
        })
    }

    /// Builds a record from one row of a source file. `mapping` describes the header row. Every
    /// failure is a `MalformedRecord` error.
    pub fn from_row(mapping: &Mapping, row: &[String], source: Source) -> Res<Self> {
        Self::parse_row(mapping, row, source)
            .map_err(|e| Error::new(ErrorType::MalformedRecord, e).into())
    }

    fn parse_row(mapping: &Mapping, row: &[String], source: Source) -> Res<Self> {
        if row.len() > mapping.len() {
            bail!("The row has more cells than there are headers");
        }

        let payment_date = match mapping.get(RecordColumn::PaymentDate, row) {
            Some(s) => parse_date(s)?,
            None => bail!("The payment date is missing"),
        };
        let date = match mapping.get(RecordColumn::Date, row) {
            Some(s) => parse_date(s)?,
            None => payment_date,
        };
        let amount = match mapping.get(RecordColumn::Amount, row) {
            Some(s) => Amount::from_str(s)?.value(),
            None => bail!("The amount is missing"),
        };
        let category = mapping
            .get(RecordColumn::Category, row)
            .context("The category is missing")?;
        let kind = match mapping.get(RecordColumn::Kind, row) {
            Some(s) => Kind::parse(s)?,
            None => Kind::Unspecified,
        };

        Record::new(date, payment_date, amount, category, kind, source)
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn payment_date(&self) -> NaiveDate {
        self.payment_date
    }

    /// The period is always derived from the payment date.
    pub fn period(&self) -> Period {
        Period::from_date(self.payment_date)
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn source(&self) -> Source {
        self.source
    }
}

/// Parses the date formats seen in exported spreadsheets.
pub(crate) fn parse_date(s: &str) -> Res<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Ok(datetime.date());
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Ok(datetime.date());
    }
    NaiveDate::parse_from_str(s, "%d/%m/%Y").with_context(|| format!("Invalid date '{s}'"))
}

/// The columns of a source file that a `Record` is built from.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordColumn {
    Date,
    PaymentDate,
    Amount,
    Category,
    Kind,
}

serde_plain::derive_display_from_serialize!(RecordColumn);

impl RecordColumn {
    /// Matches a header, case-insensitively, against the known English and Portuguese names.
    pub fn from_header(header: impl AsRef<str>) -> Option<RecordColumn> {
        let header = header.as_ref().trim().to_lowercase();
        match header.as_str() {
            DATE_STR | DATE_PT => Some(RecordColumn::Date),
            PAYMENT_DATE_STR | PAYMENT_DATE_PT => Some(RecordColumn::PaymentDate),
            AMOUNT_STR | AMOUNT_PT => Some(RecordColumn::Amount),
            CATEGORY_STR | CATEGORY_PT => Some(RecordColumn::Category),
            KIND_STR | TRANSACTION_TYPE_STR | KIND_PT => Some(RecordColumn::Kind),
            _ => None,
        }
    }
}

pub(crate) const REQUIRED_COLUMNS: &[RecordColumn] = &[
    RecordColumn::PaymentDate,
    RecordColumn::Amount,
    RecordColumn::Category,
];

const DATE_STR: &str = "date";
const DATE_PT: &str = "data";

const PAYMENT_DATE_STR: &str = "payment date";
const PAYMENT_DATE_PT: &str = "data_pagamento";

const AMOUNT_STR: &str = "amount";
const AMOUNT_PT: &str = "valor";

const CATEGORY_STR: &str = "category";
const CATEGORY_PT: &str = "categoria";

const KIND_STR: &str = "kind";
const TRANSACTION_TYPE_STR: &str = "transaction type";
const KIND_PT: &str = "tipo";
