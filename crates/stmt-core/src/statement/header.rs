//! Header row detection and mapping to canonical columns.

use serde::Serialize;
use tracing::debug;

use super::rules::patterns::{HEADER_KEYWORD, HEADER_SEPARATOR};
use super::rules::{clean_text, parse_date};
use crate::layout::Row;
use crate::models::config::HeaderConfig;
use crate::models::record::CanonicalColumn;

/// One position of a header mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum HeaderColumn {
    /// Recognized canonical column.
    Canonical(CanonicalColumn),
    /// Unrecognized column, keeping its cleaned text or a positional name.
    Other(String),
}

impl HeaderColumn {
    /// Display label.
    pub fn label(&self) -> &str {
        match self {
            HeaderColumn::Canonical(column) => column.label(),
            HeaderColumn::Other(name) => name,
        }
    }
}

/// Canonical column names aligned positionally to a header row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderMapping {
    columns: Vec<HeaderColumn>,

    /// Horizontal extent of each header cell, when the header was clustered.
    #[serde(skip)]
    spans: Vec<(f32, f32)>,
}

impl HeaderMapping {
    /// Map raw header cell texts to canonical columns.
    ///
    /// Each canonical column is assigned at most once; a later cell resolving
    /// to an already-used column keeps its cleaned text.
    pub fn from_labels<S: AsRef<str>>(labels: &[S]) -> Self {
        let mut columns: Vec<HeaderColumn> = Vec::with_capacity(labels.len());

        for (index, label) in labels.iter().enumerate() {
            let cleaned = clean_text(label.as_ref());
            let column = match canonical_column(&cleaned) {
                Some(canonical) if !columns.contains(&HeaderColumn::Canonical(canonical)) => {
                    HeaderColumn::Canonical(canonical)
                }
                _ if cleaned.is_empty() => HeaderColumn::Other(format!("Column {}", index + 1)),
                _ => HeaderColumn::Other(cleaned),
            };
            columns.push(column);
        }

        Self {
            columns,
            spans: Vec::new(),
        }
    }

    /// Attach header cell extents. Ignored unless there is one per column.
    pub fn with_spans(mut self, spans: Vec<(f32, f32)>) -> Self {
        if spans.len() == self.columns.len() {
            self.spans = spans;
        }
        self
    }

    /// Whether columns can be matched by horizontal position.
    pub fn is_positioned(&self) -> bool {
        !self.spans.is_empty()
    }

    /// Column whose header overlaps `span` the most, or the nearest one by
    /// center when nothing overlaps.
    pub fn column_at(&self, span: (f32, f32)) -> Option<usize> {
        let overlap = |h: &(f32, f32)| span.1.min(h.1) - span.0.max(h.0);
        let center = (span.0 + span.1) / 2.0;
        let distance = |h: &(f32, f32)| (center - (h.0 + h.1) / 2.0).abs();

        let best = self
            .spans
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| overlap(a).total_cmp(&overlap(b)))?;
        if overlap(best.1) > 0.0 {
            return Some(best.0);
        }

        self.spans
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| distance(a).total_cmp(&distance(b)))
            .map(|(index, _)| index)
    }

    /// Columns in positional order.
    pub fn columns(&self) -> &[HeaderColumn] {
        &self.columns
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Position of a canonical column.
    pub fn position(&self, column: CanonicalColumn) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| *c == HeaderColumn::Canonical(column))
    }

    /// Whether a canonical column is present.
    pub fn has(&self, column: CanonicalColumn) -> bool {
        self.position(column).is_some()
    }

    /// Position of the Date column, or the first column.
    pub fn date_index(&self) -> usize {
        self.position(CanonicalColumn::Date).unwrap_or(0)
    }

    /// Position of the Description column, or the second column when absent.
    pub fn description_index(&self) -> usize {
        self.position(CanonicalColumn::Description)
            .unwrap_or_else(|| 1.min(self.width().saturating_sub(1)))
    }

    /// Whether amounts arrive in a single signed column.
    pub fn has_single_amount(&self) -> bool {
        self.has(CanonicalColumn::Amount)
            && !self.has(CanonicalColumn::DebitAmt)
            && !self.has(CanonicalColumn::CreditAmt)
    }

    /// Display labels in positional order.
    pub fn labels(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.label().to_string()).collect()
    }
}

/// Scores rows against the header vocabulary.
#[derive(Debug, Clone)]
pub struct HeaderDetector {
    min_score: usize,
    scan_rows: usize,
}

impl HeaderDetector {
    /// Create a detector from configuration.
    pub fn new(config: &HeaderConfig) -> Self {
        Self {
            min_score: config.min_score,
            scan_rows: config.scan_rows,
        }
    }

    /// Number of cells containing a header keyword.
    pub fn score(&self, row: &Row) -> usize {
        row.cells
            .iter()
            .filter(|cell| HEADER_KEYWORD.is_match(cell))
            .count()
    }

    /// Whether the row qualifies as a header.
    ///
    /// A row with a parseable date cell is transaction data, whatever its
    /// narration says.
    pub fn is_header(&self, row: &Row) -> bool {
        self.score(row) >= self.min_score
            && !row.cells.iter().any(|cell| parse_date(cell).is_some())
    }

    /// Find the header among the leading rows of a page.
    ///
    /// Returns the row index and its mapping; the highest score wins, ties
    /// going to the earliest row.
    pub fn detect(&self, rows: &[Row]) -> Option<(usize, HeaderMapping)> {
        let mut best: Option<(usize, usize)> = None;

        for (index, row) in rows.iter().take(self.scan_rows).enumerate() {
            if !self.is_header(row) {
                continue;
            }
            let score = self.score(row);
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((index, score));
            }
        }

        best.map(|(index, score)| {
            let row = &rows[index];
            let mapping =
                HeaderMapping::from_labels(row.cells.as_slice()).with_spans(row.spans.clone());
            debug!(
                "Header found at row {} (score {}): {:?}",
                index,
                score,
                mapping.labels()
            );
            (index, mapping)
        })
    }
}

impl Default for HeaderDetector {
    fn default() -> Self {
        Self::new(&HeaderConfig::default())
    }
}

/// Resolve one cleaned header cell to a canonical column.
fn canonical_column(cleaned: &str) -> Option<CanonicalColumn> {
    let lower = cleaned.to_lowercase();

    // Exact synonyms first
    let exact = match lower.as_str() {
        "dr/cr" | "cr/dr" | "dr / cr" | "type" | "txn type" | "transaction type" => {
            Some(CanonicalColumn::Type)
        }
        "dr" | "debit" | "debits" => Some(CanonicalColumn::DebitAmt),
        "cr" | "credit" | "credits" => Some(CanonicalColumn::CreditAmt),
        "bal" | "balance" => Some(CanonicalColumn::Balance),
        "particulars" | "narration" | "details" | "remarks" => Some(CanonicalColumn::Description),
        _ => None,
    };
    if exact.is_some() {
        return exact;
    }

    let words: Vec<&str> = HEADER_SEPARATOR
        .split(&lower)
        .filter(|w| !w.is_empty())
        .collect();
    let has = |candidates: &[&str]| words.iter().any(|w| candidates.contains(w));

    let debit = has(&["withdrawal", "withdrawals", "debit", "debits", "dr", "out"]);
    let credit = has(&["deposit", "deposits", "credit", "credits", "cr", "in"]);
    let amount = has(&["amount", "amt"]);

    if has(&["cheque", "chq", "ref", "reference"]) {
        Some(CanonicalColumn::ChequeNo)
    } else if has(&["date", "dt"]) {
        Some(CanonicalColumn::Date)
    } else if has(&["balance", "bal"]) {
        Some(CanonicalColumn::Balance)
    } else if amount && debit && credit {
        // "Amount (Dr/Cr)" names one signed column
        Some(CanonicalColumn::Amount)
    } else if debit {
        Some(CanonicalColumn::DebitAmt)
    } else if credit {
        Some(CanonicalColumn::CreditAmt)
    } else if amount {
        Some(CanonicalColumn::Amount)
    } else if has(&["type"]) {
        Some(CanonicalColumn::Type)
    } else if has(&[
        "description",
        "particulars",
        "narration",
        "details",
        "detail",
        "remarks",
        "transaction",
        "txn",
    ]) {
        Some(CanonicalColumn::Description)
    } else {
        None
    }
}
