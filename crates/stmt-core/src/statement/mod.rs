//! Statement table reconstruction and normalization.

mod fallback;
mod header;
mod normalize;
mod parser;
mod rows;
pub mod rules;
mod schema;

pub use fallback::FallbackLoader;
pub use header::{HeaderColumn, HeaderDetector, HeaderMapping};
pub use normalize::FieldNormalizer;
pub use parser::StatementParser;
pub use rows::{MergedRow, RowClassifier, RowKind, RowMerger};
pub use schema::SchemaReconciler;

use crate::document::DocumentReader;
use crate::error::Result;
use crate::models::record::ParseResult;

/// Trait for statement extractors.
pub trait StatementExtractor {
    /// Extract the canonical transaction table from a document.
    fn extract(&self, document: &dyn DocumentReader) -> Result<ParseResult>;
}
