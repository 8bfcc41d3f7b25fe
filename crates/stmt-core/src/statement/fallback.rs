//! Reference table fallback for documents that yield no transactions.

use std::time::Instant;

use tracing::{info, warn};

use super::header::HeaderMapping;
use super::normalize::FieldNormalizer;
use super::schema::SchemaReconciler;
use crate::document::ReferenceReader;
use crate::error::{Result, StmtError};
use crate::layout::Row;
use crate::models::record::{CanonicalColumn, ParseResult, RecordSource};

/// Loads and normalizes the reference table for a document.
///
/// Reference rows go through the same normalizer, reconciler and date filter
/// as extracted rows, so the result is shaped exactly like a document parse.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackLoader {
    normalizer: FieldNormalizer,
    reconciler: SchemaReconciler,
}

impl FallbackLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the reference table keyed by `document`.
    pub fn load(&self, document: &str, reader: &dyn ReferenceReader) -> Result<ParseResult> {
        let start = Instant::now();

        let table = reader
            .load(document)?
            .ok_or_else(|| StmtError::ReferenceNotFound {
                document: document.to_string(),
                reason: "no reference table exists for this document".to_string(),
            })?;

        let mapping = HeaderMapping::from_labels(table.headers.as_slice());
        let mut warnings = Vec::new();

        for column in [
            CanonicalColumn::Date,
            CanonicalColumn::Description,
            CanonicalColumn::DebitAmt,
            CanonicalColumn::CreditAmt,
            CanonicalColumn::Balance,
        ] {
            let derived = matches!(column, CanonicalColumn::DebitAmt | CanonicalColumn::CreditAmt)
                && mapping.has_single_amount();
            if !mapping.has(column) && !derived {
                warn!("{}: reference table has no {} column", document, column);
                warnings.push(format!("reference table has no {} column, filled with null", column));
            }
        }

        let rows: Vec<Row> = table
            .rows
            .iter()
            .map(|cells| cells.iter().map(String::as_str).collect())
            .collect();

        let mut records = self.normalizer.normalize_all(&rows, &mapping);
        self.reconciler.reconcile(&mut records);

        let before = records.len();
        records.retain(|r| r.date.is_some());
        let dropped = before - records.len();
        if dropped > 0 {
            warnings.push(format!("{} reference rows without a parseable date dropped", dropped));
        }

        info!(
            "{}: loaded {} records from reference table",
            document,
            records.len()
        );

        Ok(ParseResult {
            document: document.to_string(),
            source: RecordSource::Reference,
            header: mapping.labels(),
            records,
            has_cheque_no: mapping.has(CanonicalColumn::ChequeNo),
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        })
    }
}
