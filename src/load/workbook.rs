//! Reads the first worksheet of a spreadsheet workbook (xlsx, xlsm, xlsb, xls, ods) into rows of
//! cell text, in the same shape `parse_csv` produces.

use crate::error::Res;
use anyhow::{anyhow, bail};
use calamine::{open_workbook_auto_from_rs, Data, Reader, Sheets};
use std::io::Cursor;
use tracing::{debug, warn};

/// File extensions that are opened as workbooks rather than CSV.
pub(crate) const WORKBOOK_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Loads the first worksheet of the workbook held in `bytes`. The header row is returned as the
/// first row. Other worksheets are ignored.
pub(crate) fn parse_workbook(bytes: Vec<u8>) -> Res<Vec<Vec<String>>> {
    let mut workbook: Sheets<_> = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| anyhow!("Failed to open workbook: {e}"))?;
    let sheet_names = workbook.sheet_names();
    let Some(sheet_name) = sheet_names.first().cloned() else {
        bail!("Workbook contains no sheets");
    };
    if sheet_names.len() > 1 {
        warn!(
            "Workbook has {} sheets, only '{sheet_name}' is read",
            sheet_names.len()
        );
    }
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| anyhow!("Failed to read sheet '{sheet_name}': {e}"))?;
    let rows: Vec<Vec<String>> = range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect();
    debug!("Read {} rows from sheet '{sheet_name}'", rows.len());
    Ok(rows)
}

/// The text of one cell as a CSV export would show it.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        // Integral floats print without decimals
        Data::Float(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
        Data::Float(n) => format!("{n}"),
        Data::Int(n) => format!("{n}"),
        Data::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        Data::Error(e) => format!("#{e:?}"),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(datetime) if datetime.time() == chrono::NaiveTime::MIN => {
                datetime.date().format("%Y-%m-%d").to_string()
            }
            Some(datetime) => datetime.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => format!("{}", dt.as_f64()),
        },
    }
}
