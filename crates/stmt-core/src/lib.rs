//! Core library for bank statement table extraction.
//!
//! This crate provides:
//! - Row reconstruction from grid-extracted tables or positioned text tokens
//! - Header detection and mapping onto a canonical column set
//! - Row classification (footers, repeated headers, wrapped narration)
//! - Date and amount normalization
//! - A reference table fallback producing the same output schema

pub mod document;
pub mod error;
pub mod layout;
pub mod models;
pub mod statement;

pub use document::{CsvReferenceReader, DocumentReader, JsonDocument, Page, ReferenceReader, ReferenceTable, Token};
pub use error::{Result, StmtError};
pub use layout::{Row, TokenClusterer};
pub use models::config::{HeaderPolicy, StmtConfig};
pub use models::record::{CanonicalColumn, ParseResult, RecordSource, TransactionRecord};
pub use statement::{HeaderMapping, StatementExtractor, StatementParser};
