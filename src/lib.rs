//! Merges a card invoice history with an account statement history and compares spending by
//! category from one month to the next.
//!
//! The analyses in [`analysis`] are pure functions of a [`model::Ledger`]. The [`load`] module
//! produces the ledger from two sources, and [`commands`] wraps each analysis for the CLI.

pub mod analysis;
pub mod args;
pub mod commands;
mod config;
mod error;
pub mod load;
pub mod model;
mod utils;


pub use config::Config;
pub use error::{Error, ErrorType, Result};
