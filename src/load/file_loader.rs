//! Implements the `Loader` trait for spreadsheet exports read from disk or fetched over HTTP.
//! CSV and workbook files are both supported, told apart by the file extension.

use crate::error::Res;
use crate::load::workbook::{parse_workbook, WORKBOOK_EXTENSIONS};
use crate::load::{Loader, Location};
use crate::utils;
use anyhow::Context;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, trace};

/// How the bytes at a `Location` are parsed.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum Format {
    Csv,
    Workbook,
}

impl Format {
    /// Workbook extensions select `Workbook`. Everything else, including no extension, is CSV.
    fn of(location: &Location) -> Self {
        let extension = match location {
            Location::Path(path) => extension(path),
            Location::Url(url) => extension(Path::new(url.path())),
        };
        match extension {
            Some(ext) if WORKBOOK_EXTENSIONS.contains(&ext.as_str()) => Format::Workbook,
            _ => Format::Csv,
        }
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Reads CSV or workbook exports of the invoice and statement spreadsheets.
#[derive(Debug, Clone, Default)]
pub struct FileLoader {
    client: reqwest::Client,
}

impl FileLoader {
    pub fn new() -> Self {
        Self::default()
    }

    async fn fetch(&self, url: &url::Url) -> Res<Vec<u8>> {
        trace!("GET {url}");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("Request to {url} failed"))?
            .error_for_status()
            .with_context(|| format!("Request to {url} was not successful"))?;
        let body = response
            .bytes()
            .await
            .with_context(|| format!("Unable to read the response body from {url}"))?;
        Ok(body.to_vec())
    }
}

#[async_trait::async_trait]
impl Loader for FileLoader {
    async fn load(&self, location: &Location) -> anyhow::Result<Vec<Vec<String>>> {
        let bytes = match location {
            Location::Path(path) => utils::read_bytes(path).await?,
            Location::Url(url) => self.fetch(url).await?,
        };
        let rows = match Format::of(location) {
            Format::Workbook => parse_workbook(bytes)
                .with_context(|| format!("Unable to read the workbook at {location}"))?,
            Format::Csv => {
                let text = String::from_utf8(bytes)
                    .with_context(|| format!("{location} is not UTF-8 text"))?;
                parse_csv(&text).with_context(|| format!("Unable to parse CSV from {location}"))?
            }
        };
        debug!("Loaded {} rows from {location}", rows.len());
        Ok(rows)
    }
}

/// Loads data from a CSV-formatted string. The header row is returned as the first row.
pub(crate) fn parse_csv(csv_data: &str) -> Res<Vec<Vec<String>>> {
    // A UTF-8 byte order mark is common in spreadsheet exports
    let csv_data = csv_data.strip_prefix('\u{feff}').unwrap_or(csv_data);
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(Cursor::new(csv_data.as_bytes()));

    let mut rows: Vec<Vec<String>> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let row: Vec<String> = record.iter().map(|field| field.to_string()).collect();
        rows.push(row);
    }
    Ok(rows)
}
