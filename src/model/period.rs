//! The year-month `Period` used to bucket transactions.

use anyhow::{bail, Context};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// A year-month bucket, written as `YYYY-MM`.
///
/// Ordering is chronological, which is also the lexicographic order of the string form.
///
/// ```
/// # use expense_compare::model::Period;
/// # use std::str::FromStr;
/// let period = Period::from_str("2024-03").unwrap();
/// assert_eq!(period.to_string(), "2024-03");
/// assert!(period < Period::from_str("2024-11").unwrap());
/// ```
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    pub fn new(year: i32, month: u32) -> anyhow::Result<Self> {
        if !(0..=9999).contains(&year) {
            bail!("The year {year} cannot be represented as a four digit period");
        }
        if !(1..=12).contains(&month) {
            bail!("The month {month} is not between 1 and 12");
        }
        Ok(Self { year, month })
    }

    /// Truncates `date` to its year and month.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }
}

impl From<NaiveDate> for Period {
    fn from(date: NaiveDate) -> Self {
        Period::from_date(date)
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Period {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (year, month) = trimmed
            .split_once('-')
            .with_context(|| format!("Expected a period like YYYY-MM but got '{s}'"))?;
        if year.len() != 4 || month.len() != 2 {
            bail!("Expected a period like YYYY-MM but got '{s}'");
        }
        let year = year
            .parse::<i32>()
            .with_context(|| format!("Invalid year in period '{s}'"))?;
        let month = month
            .parse::<u32>()
            .with_context(|| format!("Invalid month in period '{s}'"))?;
        Period::new(year, month)
    }
}

impl Serialize for Period {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Period {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Period::from_str(&s).map_err(serde::de::Error::custom)
    }
}
