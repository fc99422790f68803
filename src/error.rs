//! Error types for the public API.
//!
//! Internally the crate works with `anyhow` (`Res<T>`) so that context can be attached freely. At
//! the public boundary errors are converted with [`IntoResult::pub_result`] into an [`Error`] that
//! carries an [`ErrorType`], which lets a presentation layer decide how to surface the failure
//! without inspecting message text.

use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt::{Display, Formatter};

/// The internal result type.
pub(crate) type Res<T> = anyhow::Result<T>;

/// The public result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Classifies the errors that can be returned by the public API.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// A source row could not be converted into a transaction record.
    MalformedRecord,
    /// One or both of the transaction sources could not be loaded.
    SourceUnavailable,
    /// A period-over-period comparison was requested with fewer than two periods in the data.
    InsufficientHistory,
    /// A specific period was requested that is not present in the data.
    UnknownPeriod,
    /// The configuration file is missing or invalid.
    Config,
    /// Writing results failed.
    Output,
}

serde_plain::derive_display_from_serialize!(ErrorType);
serde_plain::derive_fromstr_from_deserialize!(ErrorType);

/// An error returned by the public API.
#[derive(Debug)]
pub struct Error {
    error_type: ErrorType,
    source: anyhow::Error,
}

impl Error {
    pub fn new(error_type: ErrorType, source: impl Into<anyhow::Error>) -> Self {
        Self {
            error_type,
            source: source.into(),
        }
    }

    /// Creates an error from a message.
    pub fn msg(error_type: ErrorType, message: impl Display) -> Self {
        Self::new(error_type, anyhow::anyhow!("{message}"))
    }

    pub fn error_type(&self) -> ErrorType {
        self.error_type
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {:#}", self.error_type, self.source)
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        let inner: &(dyn StdError + 'static) = self.source.as_ref();
        Some(inner)
    }
}

/// Converts an internal result into a public `Result` with the given `ErrorType`.
pub(crate) trait IntoResult<T> {
    /// If the error already wraps a public [`Error`] (possibly under added context), that error and
    /// its type are kept; otherwise the error is wrapped with `error_type`.
    fn pub_result(self, error_type: ErrorType) -> Result<T>;
}

impl<T, E> IntoResult<T> for std::result::Result<T, E>
where
    E: Into<anyhow::Error>,
{
    fn pub_result(self, error_type: ErrorType) -> Result<T> {
        self.map_err(|e| {
            let e: anyhow::Error = e.into();
            match e.downcast::<Error>() {
                Ok(typed) => typed,
                Err(e) => Error::new(error_type, e),
            }
        })
    }
}
