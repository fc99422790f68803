//! Loading the two transaction sources and merging them into a `Ledger`.
//!
//! A `Loader` only knows how to turn a `Location` into raw rows. Converting those rows into typed
//! records, and combining the two sources, happens in `merge_rows` so that every loader gets the
//! same validation.

mod file_loader;
mod memory;
mod workbook;

use crate::error::{ErrorType, IntoResult, Result};
use crate::model::{Ledger, Source};
use anyhow::Context;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};
use url::Url;

pub use file_loader::FileLoader;
pub use memory::MemoryLoader;

/// Where one of the datasets lives: a local file or an `http(s)` URL.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Location {
    Path(PathBuf),
    Url(Url),
}

impl Location {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Location::Path(path.into())
    }

    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Location::Path(p) => Some(p),
            Location::Url(_) => None,
        }
    }
}

impl FromStr for Location {
    type Err = std::convert::Infallible;

    /// Anything that parses as an `http` or `https` URL is a URL, everything else is a path.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        match Url::parse(s) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(Location::Url(url)),
            _ => Ok(Location::Path(PathBuf::from(s))),
        }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Location::Path(p) => write!(f, "{}", p.display()),
            Location::Url(u) => write!(f, "{u}"),
        }
    }
}

/// Fetches raw tabular rows. The first row returned is the header row.
#[async_trait::async_trait]
pub trait Loader: Send + Sync {
    async fn load(&self, location: &Location) -> anyhow::Result<Vec<Vec<String>>>;
}

/// Parses the raw rows of both sources and concatenates them, invoice first.
///
/// A malformed row fails the whole merge with `MalformedRecord`. Rows that cannot be read at all
/// (no header row, missing required columns) fail with `SourceUnavailable`.
pub fn merge_rows(
    invoice_rows: Vec<Vec<String>>,
    statement_rows: Vec<Vec<String>>,
) -> Result<Ledger> {
    let invoice = Ledger::parse(invoice_rows, Source::Invoice)
        .context("Unable to read the invoice data")
        .pub_result(ErrorType::SourceUnavailable)?;
    let statement = Ledger::parse(statement_rows, Source::Statement)
        .context("Unable to read the statement data")
        .pub_result(ErrorType::SourceUnavailable)?;
    Ledger::merge(invoice, statement).pub_result(ErrorType::MalformedRecord)
}

/// Loads both sources concurrently and merges them.
///
/// Both loads must finish before the merge. If either fails the other result is dropped and the
/// error is returned as `SourceUnavailable`; no partial ledger is produced.
pub async fn load_ledger(
    loader: &dyn Loader,
    invoice: &Location,
    statement: &Location,
) -> Result<Ledger> {
    debug!("Loading invoice from {invoice} and statement from {statement}");
    let (invoice_rows, statement_rows) = tokio::try_join!(
        async {
            loader
                .load(invoice)
                .await
                .with_context(|| format!("Unable to load the invoice from {invoice}"))
        },
        async {
            loader
                .load(statement)
                .await
                .with_context(|| format!("Unable to load the statement from {statement}"))
        },
    )
    .pub_result(ErrorType::SourceUnavailable)?;

    let ledger = merge_rows(invoice_rows, statement_rows)?;
    info!(
        "Loaded {} records across {} periods",
        ledger.len(),
        ledger.periods().len()
    );
    Ok(ledger)
}
