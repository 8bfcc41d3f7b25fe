//! Reference tables consulted when a document yields no transactions.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ReferenceError;

/// A pre-existing table for the same logical dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceTable {
    /// Column names as written in the table.
    pub headers: Vec<String>,

    /// Data rows, one string per header column.
    pub rows: Vec<Vec<String>>,
}

impl ReferenceTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }
}

/// Trait for keyed reference table lookups.
pub trait ReferenceReader {
    /// Load the table keyed by `document`. `Ok(None)` means no such table exists.
    fn load(&self, document: &str) -> Result<Option<ReferenceTable>, ReferenceError>;
}

impl ReferenceReader for HashMap<String, ReferenceTable> {
    fn load(&self, document: &str) -> Result<Option<ReferenceTable>, ReferenceError> {
        Ok(self.get(document).cloned())
    }
}

/// Reads `<document base name>.<extension>` as CSV.
#[derive(Debug, Clone)]
pub struct CsvReferenceReader {
    extension: String,
}

impl CsvReferenceReader {
    /// Create a reader looking for the given extension next to the document.
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
        }
    }

    /// Path of the reference table for a document.
    pub fn path_for(&self, document: &str) -> PathBuf {
        Path::new(document).with_extension(&self.extension)
    }

    /// Read a whole CSV file into a table.
    pub fn read_table(path: &Path) -> Result<ReferenceTable, ReferenceError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_path(path)?;

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if headers.iter().all(|h| h.is_empty()) {
            return Err(ReferenceError::EmptyTable);
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(ReferenceTable { headers, rows })
    }
}

impl Default for CsvReferenceReader {
    fn default() -> Self {
        Self::new("csv")
    }
}

impl ReferenceReader for CsvReferenceReader {
    fn load(&self, document: &str) -> Result<Option<ReferenceTable>, ReferenceError> {
        let path = self.path_for(document);
        if !path.exists() {
            debug!("No reference table at {}", path.display());
            return Ok(None);
        }

        let table = Self::read_table(&path)?;
        debug!(
            "Loaded reference table {} with {} rows",
            path.display(),
            table.rows.len()
        );
        Ok(Some(table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_for_swaps_extension() {
        let reader = CsvReferenceReader::default();
        assert_eq!(
            reader.path_for("data/icici/icici sample.json"),
            PathBuf::from("data/icici/icici sample.csv")
        );
    }

    #[test]
    fn test_load_csv() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("statement.csv");
        std::fs::write(
            &csv_path,
            "Date,Narration,Withdrawal,Deposit,Balance\n01-08-2024,Salary,,5000.00,5000.00\n",
        )
        .unwrap();

        let document = dir.path().join("statement.json");
        let table = CsvReferenceReader::default()
            .load(document.to_str().unwrap())
            .unwrap()
            .unwrap();

        assert_eq!(table.headers[1], "Narration");
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0][3], "5000.00");
    }

    #[test]
    fn test_missing_table_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let document = dir.path().join("nothing.json");

        let loaded = CsvReferenceReader::default()
            .load(document.to_str().unwrap())
            .unwrap();
        assert!(loaded.is_none());
    }
}
