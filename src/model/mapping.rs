use crate::model::record::RecordColumn;
use std::collections::{HashMap, HashSet};
use std::error::Error as StdError;
use std::fmt::{Display, Formatter};

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct MappingError(String);

impl Display for MappingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl StdError for MappingError {}

/// Maps the header row of a source file to the record columns we understand. Headers that are not
/// recognized are kept (for error messages) but otherwise ignored.
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct Mapping {
    headers: Vec<String>,
    column_map: HashMap<RecordColumn, usize>,
}

impl Mapping {
    pub fn new<S, I>(headers: I) -> Result<Self, MappingError>
    where
        S: Into<String>,
        I: IntoIterator<Item = S>,
    {
        let headers: Vec<String> = headers.into_iter().map(|s| s.into()).collect();

        let mut seen = HashSet::new();
        for header in &headers {
            let normalized = header.trim().to_lowercase();
            if !normalized.is_empty() && !seen.insert(normalized) {
                return Err(MappingError(format!(
                    "Encountered a duplicate header '{header}'"
                )));
            }
        }

        let mut column_map = HashMap::new();
        for (idx, header) in headers.iter().enumerate() {
            let Some(column) = RecordColumn::from_header(header) else {
                continue;
            };
            if let Some(prev) = column_map.insert(column, idx) {
                return Err(MappingError(format!(
                    "The headers '{}' and '{header}' both map to the {column} column",
                    headers[prev]
                )));
            }
        }

        Ok(Self {
            headers,
            column_map,
        })
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn index(&self, column: RecordColumn) -> Option<usize> {
        self.column_map.get(&column).copied()
    }

    /// Returns an error naming the first of `required` that has no header.
    pub fn require(&self, required: &[RecordColumn]) -> Result<(), MappingError> {
        match required.iter().find(|c| self.index(**c).is_none()) {
            None => Ok(()),
            Some(missing) => Err(MappingError(format!(
                "No header found for the required {missing} column, headers are: {}",
                self.headers.join(", ")
            ))),
        }
    }

    /// Gets the trimmed value of `column` from `row`. Absent and blank cells are `None`.
    pub fn get<'a>(&self, column: RecordColumn, row: &'a [String]) -> Option<&'a str> {
        self.index(column)
            .and_then(|ix| row.get(ix))
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }
}
