//! Error types for the stmt-core library.

use thiserror::Error;

/// Main error type for the stmt library.
#[derive(Error, Debug)]
pub enum StmtError {
    /// No header row was recognized on any page of the document.
    #[error("{document}: no transaction header row found in any page")]
    HeaderNotFound { document: String },

    /// Fallback was required but no reference table could be loaded.
    #[error("{document}: no transactions extracted and no reference table available ({reason})")]
    ReferenceNotFound { document: String, reason: String },

    /// Document reader error.
    #[error("document error: {0}")]
    Reader(#[from] ReaderError),

    /// Reference table error.
    #[error("reference table error: {0}")]
    Reference(#[from] ReferenceError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised by a document reader.
#[derive(Error, Debug)]
pub enum ReaderError {
    /// The page dump could not be decoded.
    #[error("failed to parse document: {0}")]
    Parse(String),

    /// Invalid page index requested.
    #[error("invalid page number: {0}")]
    InvalidPage(usize),

    /// I/O error while reading the document.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while reading a reference table.
#[derive(Error, Debug)]
pub enum ReferenceError {
    /// Malformed CSV.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error while opening the table.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The table has no header line.
    #[error("reference table has no header")]
    EmptyTable,
}

/// A single cell that failed typed conversion.
///
/// Never fatal: the normalizer degrades the field to null.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("unparseable date: {value:?}")]
    Date { value: String },

    #[error("unparseable amount: {value:?}")]
    Amount { value: String },
}

/// Result type for the stmt library.
pub type Result<T> = std::result::Result<T, StmtError>;
