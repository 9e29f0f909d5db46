//! Positional row assembly.
//!
//! Columns extracted independently from the same table are zipped by index.
//! The row count is the length of the shortest column; surplus cells in
//! longer columns are discarded. Rows that fail a required-field check are
//! dropped without failing the list.

use thiserror::Error;
use tracing::debug;

/// A single row that could not be turned into a record.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RowError {
    #[error("missing required field {0}")]
    MissingField(&'static str),

    #[error("malformed {field}: {value:?}")]
    Malformed { field: &'static str, value: String },
}

/// Collects column lengths for one list and yields the aligned row count.
#[derive(Debug, Default)]
pub struct Assembler {
    columns: Vec<(&'static str, usize)>,
}

impl Assembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn column<T>(mut self, name: &'static str, values: &[T]) -> Self {
        self.columns.push((name, values.len()));
        self
    }

    /// Number of complete rows across every registered column.
    pub fn len(&self) -> usize {
        self.columns.iter().map(|(_, len)| *len).min().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Builds one record per aligned index, in document order.
    pub fn build<R, F>(self, row: F) -> Vec<R>
    where
        F: FnMut(usize) -> Result<R, RowError>,
    {
        let rows = self.len();
        if self.columns.iter().any(|(_, len)| *len != rows) {
            debug!(rows, columns = ?self.columns, "column lengths differ, truncating");
        }
        collect_rows((0..rows).map(row))
    }
}

/// Keeps successful rows in order and logs the dropped ones.
pub fn collect_rows<R>(rows: impl IntoIterator<Item = Result<R, RowError>>) -> Vec<R> {
    rows.into_iter()
        .enumerate()
        .filter_map(|(index, row)| match row {
            Ok(record) => Some(record),
            Err(e) => {
                debug!(index, error = %e, "dropping row");
                None
            }
        })
        .collect()
}

/// Unwraps a discriminating field, treating blank text as missing.
pub fn required(field: &'static str, value: Option<String>) -> Result<String, RowError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(RowError::MissingField(field))
}
