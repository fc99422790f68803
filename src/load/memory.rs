//! Implements the `Loader` trait using in-memory data.
//!
//! This is compiled into the library so that a presentation shell that already holds the rows
//! (for example, rows read from a spreadsheet widget) can use the same merge path.

use crate::load::{Loader, Location};
use anyhow::Context;
use std::collections::HashMap;

/// A `Loader` that serves rows from memory. Rows are keyed by the `Display` form of the location.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    data: HashMap<String, Vec<Vec<String>>>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `rows` under `location`.
    pub fn with(mut self, location: impl Into<String>, rows: Vec<Vec<String>>) -> Self {
        self.insert(location, rows);
        self
    }

    pub fn insert(&mut self, location: impl Into<String>, rows: Vec<Vec<String>>) {
        self.data.insert(location.into(), rows);
    }
}

#[async_trait::async_trait]
impl Loader for MemoryLoader {
    async fn load(&self, location: &Location) -> anyhow::Result<Vec<Vec<String>>> {
        let key = location.to_string();
        self.data
            .get(&key)
            .with_context(|| format!("No data found for '{key}'"))
            .cloned()
    }
}
