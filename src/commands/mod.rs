//! Command handlers for the expenses CLI.
//!
//! This module contains implementations for all CLI subcommands. Each handler loads the ledger
//! through the given `Loader`, runs one analysis and returns an `Out` holding a short message and
//! the analysis result.

mod breakdown;
mod init;
mod overview;
mod summary;

use crate::error::{ErrorType, IntoResult};
use crate::load::{load_ledger, Loader};
use crate::model::Ledger;
use crate::{Config, Result};
use serde::Serialize;
use std::fmt::Debug;
use std::io::Write;
use tracing::info;

pub use breakdown::{categories, monthly, trend, MonthlyBreakdown, PeriodBreakdown};
pub use init::init;
pub use overview::overview;
pub use summary::summary;

/// The output type for a command. This allows the command to return a consistent message and,
/// optionally, structured data.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    /// Get the `message`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured data stored in `structure`.
    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to `info!` and the structured data (if it exists) as JSON to stdout.
    pub fn print(&self) -> Result<()> {
        info!("{}", self.message);
        let Some(structure) = self.structure() else {
            return Ok(());
        };
        let mut stdout = std::io::stdout().lock();
        serde_json::to_writer_pretty(&mut stdout, structure)
            .map_err(anyhow::Error::from)
            .and_then(|_| writeln!(stdout).map_err(anyhow::Error::from))
            .pub_result(ErrorType::Output)
    }
}

/// Loads both sources named in `config` and merges them.
async fn load(config: &Config, loader: &dyn Loader) -> Result<Ledger> {
    load_ledger(loader, config.invoice(), config.statement()).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_from_message() {
        let out: Out<()> = "done".into();
        assert_eq!(out.message(), "done");
        assert!(out.structure().is_none());
        out.print().unwrap();
    }

    #[test]
    fn test_out_serializes() {
        let out = Out::new("two", vec![1, 2]);
        let json = serde_json::to_string(&out).unwrap();
        assert_eq!(json, r#"{"message":"two","structure":[1,2]}"#);
    }
}
