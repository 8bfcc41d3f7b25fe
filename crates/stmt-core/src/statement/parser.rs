//! Statement parser driving the page-by-page extraction pipeline.

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::document::{CsvReferenceReader, DocumentReader, ReferenceReader};
use crate::error::{Result, StmtError};
use crate::layout::{page_rows, TokenClusterer};
use crate::models::config::{HeaderPolicy, StmtConfig};
use crate::models::record::{CanonicalColumn, ParseResult, RecordSource, TransactionRecord};

use super::fallback::FallbackLoader;
use super::header::{HeaderDetector, HeaderMapping};
use super::normalize::FieldNormalizer;
use super::rows::{RowClassifier, RowKind, RowMerger};
use super::schema::SchemaReconciler;
use super::StatementExtractor;

/// Where the parser stands while walking a document.
///
/// `mapping` indexes the header mappings seen so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// No header recognized yet.
    AwaitingHeader,
    /// Rows are classified under the active mapping.
    Accepting { mapping: usize },
    /// A footer closed the current block; resumes at the next page.
    Terminated { mapping: usize },
}

/// Per-document row tallies, reported in the summary log.
#[derive(Debug, Default)]
struct RowTally {
    raw: usize,
    skipped: usize,
    merged: usize,
    orphaned: usize,
}

/// Bank statement parser.
pub struct StatementParser {
    policy: HeaderPolicy,
    clusterer: TokenClusterer,
    detector: HeaderDetector,
    classifier: RowClassifier,
    normalizer: FieldNormalizer,
    reconciler: SchemaReconciler,
    fallback: FallbackLoader,
    reference: Option<Box<dyn ReferenceReader + Send + Sync>>,
}

impl StatementParser {
    /// Create a parser from configuration.
    pub fn new(config: &StmtConfig) -> Result<Self> {
        let detector = HeaderDetector::new(&config.header);
        let classifier = RowClassifier::new(&config.rows, detector.clone())?;

        let reference: Option<Box<dyn ReferenceReader + Send + Sync>> = if config.fallback.enabled {
            Some(Box::new(CsvReferenceReader::new(config.fallback.extension.as_str())))
        } else {
            None
        };

        Ok(Self {
            policy: config.header.policy,
            clusterer: TokenClusterer::new(&config.cluster),
            detector,
            classifier,
            normalizer: FieldNormalizer::new(),
            reconciler: SchemaReconciler::new(),
            fallback: FallbackLoader::new(),
            reference,
        })
    }

    /// Use a custom reference table reader for the fallback path.
    pub fn with_reference<R>(mut self, reader: R) -> Self
    where
        R: ReferenceReader + Send + Sync + 'static,
    {
        self.reference = Some(Box::new(reader));
        self
    }

    /// Disable the reference table fallback.
    pub fn without_fallback(mut self) -> Self {
        self.reference = None;
        self
    }

    /// Set the policy for headers repeated on later pages.
    pub fn with_header_policy(mut self, policy: HeaderPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Parse a document into canonical transaction records.
    pub fn parse(&self, document: &dyn DocumentReader) -> Result<ParseResult> {
        let start = Instant::now();
        let id = document.document_id();

        let mut state = ParseState::AwaitingHeader;
        let mut mappings: Vec<HeaderMapping> = Vec::new();
        let mut merger = RowMerger::new();
        let mut tally = RowTally::default();

        for index in 0..document.page_count() {
            let page = document.page(index)?;
            let page = page_rows(&page, &self.clusterer);
            tally.raw += page.rows.len();

            if let ParseState::Terminated { mapping } = state {
                state = ParseState::Accepting { mapping };
            }

            let detected = self.detector.detect(&page.rows);
            let (first_row, mapping) = match (state, detected) {
                (ParseState::AwaitingHeader, None) => {
                    debug!("Page {}: no header yet, skipping {} rows", page.number, page.rows.len());
                    tally.skipped += page.rows.len();
                    continue;
                }
                (ParseState::AwaitingHeader, Some((row, found))) => {
                    debug!("Page {}: header adopted", page.number);
                    mappings.push(found);
                    (row + 1, mappings.len() - 1)
                }
                (
                    ParseState::Accepting { mapping } | ParseState::Terminated { mapping },
                    Some((row, found)),
                ) => (row + 1, self.page_mapping(&mut mappings, mapping, found)),
                (ParseState::Accepting { mapping } | ParseState::Terminated { mapping }, None) => {
                    (0, mapping)
                }
            };
            tally.skipped += first_row;
            state = ParseState::Accepting { mapping };

            for row in &page.rows[first_row..] {
                let ParseState::Accepting { mapping } = state else {
                    tally.skipped += 1;
                    continue;
                };

                let (kind, fitted) = self.classifier.classify(row, &mappings[mapping]);
                match kind {
                    RowKind::Transaction => merger.push(fitted, mapping),
                    RowKind::Continuation => {
                        if merger.extend_last(&fitted, mapping, &mappings) {
                            tally.merged += 1;
                        } else {
                            debug!("Page {}: continuation with no preceding transaction", page.number);
                            tally.orphaned += 1;
                        }
                    }
                    RowKind::RepeatedHeader => {
                        tally.skipped += 1;
                        let found = HeaderMapping::from_labels(row.cells.as_slice())
                            .with_spans(row.spans.clone());
                        state = ParseState::Accepting {
                            mapping: self.page_mapping(&mut mappings, mapping, found),
                        };
                    }
                    RowKind::Footer if page.origin.footer_ends_block() => {
                        debug!("Page {}: footer {:?} ends the block", page.number, row.cells);
                        tally.skipped += 1;
                        state = ParseState::Terminated { mapping };
                    }
                    RowKind::Footer | RowKind::Blank | RowKind::Sparse => {
                        debug!("Page {}: {:?} row skipped", page.number, kind);
                        tally.skipped += 1;
                    }
                }
            }
        }

        if state == ParseState::AwaitingHeader && tally.raw > 0 {
            return Err(StmtError::HeaderNotFound {
                document: id.to_string(),
            });
        }

        if merger.is_empty() {
            let reason = if tally.raw == 0 {
                "document yielded no rows"
            } else {
                "no transaction rows accepted"
            };
            return self.load_reference(id, reason);
        }

        let rows = merger.into_rows();
        let mut records: Vec<TransactionRecord> = rows
            .iter()
            .map(|merged| self.normalizer.normalize(&merged.row, &mappings[merged.mapping]))
            .collect();
        self.reconciler.reconcile(&mut records);

        let mut warnings = Vec::new();
        let before = records.len();
        records.retain(|r| r.date.is_some());
        let dropped = before - records.len();
        if dropped > 0 {
            debug!("Dropped {} rows without a parseable date", dropped);
            warnings.push(format!("{} rows without a parseable date dropped", dropped));
        }
        if tally.orphaned > 0 {
            warnings.push(format!(
                "{} continuation rows had no preceding transaction",
                tally.orphaned
            ));
        }

        info!(
            "{}: {} records from {} raw rows ({} merged, {} skipped)",
            id,
            records.len(),
            tally.raw,
            tally.merged,
            tally.skipped
        );

        Ok(ParseResult {
            document: id.to_string(),
            source: RecordSource::Document,
            header: mappings.first().map(HeaderMapping::labels).unwrap_or_default(),
            records,
            has_cheque_no: mappings.iter().any(|m| m.has(CanonicalColumn::ChequeNo)),
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Resolve the mapping for rows following a re-detected header.
    fn page_mapping(
        &self,
        mappings: &mut Vec<HeaderMapping>,
        active: usize,
        found: HeaderMapping,
    ) -> usize {
        match self.policy {
            HeaderPolicy::FirstWins => active,
            // A summary line can score like a header; only a dated header re-maps
            HeaderPolicy::Refresh if found == mappings[active] || !found.has(CanonicalColumn::Date) => {
                active
            }
            HeaderPolicy::Refresh => {
                debug!("Header mapping refreshed: {:?}", found.labels());
                mappings.push(found);
                mappings.len() - 1
            }
        }
    }

    fn load_reference(&self, document: &str, reason: &str) -> Result<ParseResult> {
        let Some(reader) = self.reference.as_deref() else {
            return Err(StmtError::ReferenceNotFound {
                document: document.to_string(),
                reason: format!("{} and the reference fallback is disabled", reason),
            });
        };

        warn!("{}: {}, falling back to reference table", document, reason);
        let mut result = self.fallback.load(document, reader)?;
        result.warnings.insert(0, format!("{}, records loaded from reference table", reason));
        Ok(result)
    }
}

impl StatementExtractor for StatementParser {
    fn extract(&self, document: &dyn DocumentReader) -> Result<ParseResult> {
        self.parse(document)
    }
}
