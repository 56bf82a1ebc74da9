// Raw tabular snapshots loaded from CSV
// Headers are normalized on load; rows keep their source order

use crate::error::{PipelineError, Result};
use csv::ReaderBuilder;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Lowercase a header and replace every space with an underscore.
///
/// Leading and trailing spaces are replaced too, never trimmed, so
/// `" Game ID"` becomes `"_game_id"`.
pub fn normalize_column_name(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}

/// RawTable - one CSV file held fully in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    name: String,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Build a table directly from normalized parts (used by tests and fixtures)
    pub fn new(name: &str, headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        RawTable {
            name: name.to_string(),
            headers: headers.iter().map(|h| normalize_column_name(h)).collect(),
            rows,
        }
    }

    /// Open and read a CSV file
    pub fn load(name: &str, path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| PipelineError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_reader(name, file)
    }

    /// Read a comma-separated source with a header row
    pub fn from_reader<R: Read>(name: &str, reader: R) -> Result<Self> {
        let csv_err = |source| PipelineError::Csv {
            source_name: name.to_string(),
            source,
        };

        // Short rows are padded with empty cells; only overlong rows are rejected
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = reader
            .headers()
            .map_err(csv_err)?
            .iter()
            .map(normalize_column_name)
            .collect();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result.map_err(csv_err)?;
            if record.len() > headers.len() {
                return Err(PipelineError::TooManyFields {
                    source_name: name.to_string(),
                    line: record.position().map(|p| p.line()).unwrap_or(0),
                    expected: headers.len(),
                    found: record.len(),
                });
            }

            let mut row: Vec<String> = record.iter().map(|field| field.to_string()).collect();
            row.resize(headers.len(), String::new());
            rows.push(row);
        }

        tracing::debug!(source = name, rows = rows.len(), columns = headers.len(), "loaded table");

        Ok(RawTable {
            name: name.to_string(),
            headers,
            rows,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column, if present
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == column)
    }

    /// Position of a column that must appear exactly once
    pub fn require_column(&self, column: &str) -> Result<usize> {
        let idx = self
            .column_index(column)
            .ok_or_else(|| PipelineError::schema(&self.name, column, &self.headers))?;

        if self.headers.iter().filter(|h| *h == column).count() > 1 {
            return Err(self.ambiguous(column));
        }
        Ok(idx)
    }

    /// Rename a column in place. Fails if `from` is absent or `to` already exists.
    pub fn rename_column(&mut self, from: &str, to: &str) -> Result<()> {
        let idx = self.require_column(from)?;
        if self.column_index(to).is_some() {
            return Err(self.ambiguous(to));
        }

        self.headers[idx] = to.to_string();
        Ok(())
    }

    fn ambiguous(&self, column: &str) -> PipelineError {
        PipelineError::AmbiguousColumn {
            source_name: self.name.clone(),
            column: column.to_string(),
        }
    }

    /// Values of one column in row order
    pub fn column_values(&self, column: &str) -> Result<Vec<&str>> {
        let idx = self.require_column(column)?;
        Ok(self.rows.iter().map(|row| cell(row, idx)).collect())
    }

    /// Iterate raw rows in source order
    pub fn rows(&self) -> impl Iterator<Item = &[String]> {
        self.rows.iter().map(|row| row.as_slice())
    }
}

/// Read a cell; the csv reader guarantees rectangular rows, but be lenient
/// with tables built by hand
pub(crate) fn cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map(String::as_str).unwrap_or("")
}
