//! Row classification and continuation merging.

use regex::{Regex, RegexBuilder};
use tracing::debug;

use super::header::{HeaderDetector, HeaderMapping};
use super::rules::parse_date;
use crate::error::StmtError;
use crate::layout::Row;
use crate::models::config::RowConfig;
use crate::models::record::CanonicalColumn;

/// What a row turned out to be once a header mapping is in force.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// The header repeated on a later page.
    RepeatedHeader,
    /// Summary or footer line.
    Footer,
    /// Nothing but whitespace.
    Blank,
    /// Wrapped narration belonging to the previous transaction.
    Continuation,
    /// Too few filled cells to start a transaction.
    Sparse,
    /// A new transaction.
    Transaction,
}

/// Decides the fate of each row after the header.
#[derive(Debug, Clone)]
pub struct RowClassifier {
    detector: HeaderDetector,
    footer: Option<Regex>,
    min_fill_ratio: f32,
}

impl RowClassifier {
    /// Build a classifier. Fails when the footer keywords do not form a valid pattern.
    pub fn new(config: &RowConfig, detector: HeaderDetector) -> Result<Self, StmtError> {
        let keywords: Vec<String> = config
            .footer_keywords
            .iter()
            .map(|k| k.split_whitespace().map(regex::escape).collect::<Vec<_>>().join(r"\s+"))
            .filter(|k| !k.is_empty())
            .collect();

        let footer = if keywords.is_empty() {
            None
        } else {
            let pattern = format!(r"\b(?:{})\b", keywords.join("|"));
            let regex = RegexBuilder::new(&pattern)
                .case_insensitive(true)
                .build()
                .map_err(|e| StmtError::Config(format!("invalid footer keywords: {}", e)))?;
            Some(regex)
        };

        Ok(Self {
            detector,
            footer,
            min_fill_ratio: config.min_fill_ratio,
        })
    }

    /// Whether any cell carries a footer keyword.
    pub fn is_footer(&self, row: &Row) -> bool {
        self.footer
            .as_ref()
            .is_some_and(|footer| row.cells.iter().any(|cell| footer.is_match(cell)))
    }

    /// Reshape a row to the mapping's width.
    ///
    /// Short rows are padded with empty cells. On overflow the columns after
    /// Description stay right-aligned and everything between is folded into
    /// the Description cell.
    pub fn fit(&self, row: &Row, mapping: &HeaderMapping) -> Row {
        if row.is_positioned() && mapping.is_positioned() {
            return Self::align(row, mapping);
        }

        let width = mapping.width();
        let n = row.len();

        if n <= width {
            let mut cells = row.cells.clone();
            cells.resize(width, String::new());
            return Row::new(cells);
        }

        let desc = mapping.description_index();
        let after = width - desc - 1;
        let overflow = row.cells[desc..n - after]
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        debug!(
            "Row of {} cells folded into {} columns at position {}",
            n, width, desc
        );

        let mut cells = Vec::with_capacity(width);
        cells.extend_from_slice(&row.cells[..desc]);
        cells.push(overflow);
        cells.extend_from_slice(&row.cells[n - after..]);
        Row::new(cells)
    }

    /// Place clustered cells under the header cell they line up with.
    fn align(row: &Row, mapping: &HeaderMapping) -> Row {
        let mut cells = vec![String::new(); mapping.width()];

        for (cell, span) in row.cells.iter().zip(&row.spans) {
            let Some(target) = mapping.column_at(*span) else {
                continue;
            };
            let slot = &mut cells[target];
            if !slot.is_empty() {
                slot.push(' ');
            }
            slot.push_str(cell.trim());
        }

        Row::new(cells)
    }

    /// Classify a raw row and return it fitted to the mapping.
    pub fn classify(&self, row: &Row, mapping: &HeaderMapping) -> (RowKind, Row) {
        if self.detector.is_header(row) {
            return (RowKind::RepeatedHeader, row.clone());
        }

        let fitted = self.fit(row, mapping);
        // A dated row is a transaction even when its narration names a footer keyword
        if self.is_footer(row) && parse_date(fitted.cell(mapping.date_index())).is_none() {
            return (RowKind::Footer, row.clone());
        }

        let kind = if fitted.is_blank() {
            RowKind::Blank
        } else if self.is_continuation(&fitted, mapping) {
            RowKind::Continuation
        } else if (fitted.filled() as f32) < mapping.width() as f32 * self.min_fill_ratio {
            RowKind::Sparse
        } else {
            RowKind::Transaction
        };

        (kind, fitted)
    }

    fn is_continuation(&self, fitted: &Row, mapping: &HeaderMapping) -> bool {
        let date = mapping.date_index();
        if !fitted.cell(date).trim().is_empty() {
            return false;
        }

        if mapping.has(CanonicalColumn::Description) {
            !fitted.cell(mapping.description_index()).trim().is_empty()
        } else {
            fitted
                .cells
                .iter()
                .skip(date + 1)
                .any(|c| !c.trim().is_empty())
        }
    }
}

/// An accepted row and the mapping it was read under.
#[derive(Debug, Clone)]
pub struct MergedRow {
    pub row: Row,
    pub mapping: usize,
}

/// Accumulates accepted rows and folds continuation lines into them.
///
/// The merge target survives page boundaries, so narration wrapped onto the
/// next page still joins its transaction.
#[derive(Debug, Default)]
pub struct RowMerger {
    rows: Vec<MergedRow>,
}

impl RowMerger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept a new transaction row.
    pub fn push(&mut self, row: Row, mapping: usize) {
        self.rows.push(MergedRow { row, mapping });
    }

    /// Append a continuation row onto the last accepted row.
    ///
    /// Returns `false` when there is nothing to merge into.
    pub fn extend_last(&mut self, row: &Row, mapping: usize, mappings: &[HeaderMapping]) -> bool {
        let Some(last) = self.rows.last_mut() else {
            return false;
        };

        for (index, cell) in row.cells.iter().enumerate() {
            let text = cell.trim();
            if text.is_empty() {
                continue;
            }

            let target = if last.mapping == mapping {
                index
            } else {
                let target_mapping = &mappings[last.mapping];
                mappings[mapping]
                    .columns()
                    .get(index)
                    .and_then(|column| target_mapping.columns().iter().position(|c| c == column))
                    .unwrap_or_else(|| target_mapping.description_index())
            };

            if last.row.cells.len() <= target {
                last.row.cells.resize(target + 1, String::new());
            }
            let existing = &mut last.row.cells[target];
            if existing.trim().is_empty() {
                *existing = text.to_string();
            } else {
                existing.push(' ');
                existing.push_str(text);
            }
        }

        true
    }

    /// Number of accepted rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Accepted rows in input order.
    pub fn into_rows(self) -> Vec<MergedRow> {
        self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(cells: &[&str]) -> Row {
        cells.iter().copied().collect()
    }

    fn classifier() -> RowClassifier {
        RowClassifier::new(&RowConfig::default(), HeaderDetector::default()).unwrap()
    }

    fn mapping() -> HeaderMapping {
        HeaderMapping::from_labels(&["Date", "Description", "Debit", "Credit", "Balance"])
    }

    #[test]
    fn test_classification_order() {
        let classifier = classifier();
        let mapping = mapping();

        let cases = [
            (row(&["Date", "Narration", "Withdrawal", "Deposit", "Balance"]), RowKind::RepeatedHeader),
            (row(&["", "Closing Balance", "", "", "12,000.00"]), RowKind::Footer),
            (row(&["", " ", ""]), RowKind::Blank),
            (row(&["", "XYZ Corp"]), RowKind::Continuation),
            (row(&["01/01/2024", ""]), RowKind::Sparse),
            (row(&["01/01/2024", "ATM", "100.00", "", "900.00"]), RowKind::Transaction),
        ];

        for (input, expected) in cases {
            let (kind, _) = classifier.classify(&input, &mapping);
            assert_eq!(kind, expected, "row {:?}", input.cells);
        }
    }

    #[test]
    fn test_footer_keywords_are_words() {
        let classifier = classifier();

        assert!(classifier.is_footer(&row(&["TOTAL", "5,000.00"])));
        assert!(classifier.is_footer(&row(&["Opening  Balance"])));
        assert!(classifier.is_footer(&row(&["Page 2 of 3"])));
        assert!(!classifier.is_footer(&row(&["01/01/2024", "TOTALENERGIES FUEL", "50.00"])));
    }

    #[test]
    fn test_dated_row_is_never_footer() {
        let classifier = classifier();
        let mapping = mapping();

        let (kind, fitted) = classifier.classify(
            &row(&["02/01/2024", "Credit card statement payment", "1,200.00", "", "7,800.00"]),
            &mapping,
        );
        assert_eq!(kind, RowKind::Transaction);
        assert_eq!(fitted.cell(1), "Credit card statement payment");

        let (kind, _) = classifier.classify(&row(&["", "Closing Balance", "", "", "7,800.00"]), &mapping);
        assert_eq!(kind, RowKind::Footer);
    }

    #[test]
    fn test_no_footer_keywords() {
        let config = RowConfig {
            footer_keywords: Vec::new(),
            ..RowConfig::default()
        };
        let classifier = RowClassifier::new(&config, HeaderDetector::default()).unwrap();
        assert!(!classifier.is_footer(&row(&["Total"])));
    }

    #[test]
    fn test_fit_pads_short_rows() {
        let fitted = classifier().fit(&row(&["01/01/2024", "ATM"]), &mapping());
        assert_eq!(fitted.cells, vec!["01/01/2024", "ATM", "", "", ""]);
    }

    #[test]
    fn test_fit_folds_overflow_into_description() {
        let fitted = classifier().fit(
            &row(&["01/01/2024", "UPI", "Coffee", "", "Shop", "45.00", "", "955.00"]),
            &mapping(),
        );

        assert_eq!(
            fitted.cells,
            vec!["01/01/2024", "UPI Coffee Shop", "45.00", "", "955.00"]
        );
    }

    #[test]
    fn test_fit_keeps_trailing_columns_with_cheque_no() {
        let mapping =
            HeaderMapping::from_labels(&["Date", "Particulars", "Chq No", "Withdrawal", "Deposit", "Balance"]);

        let fitted = classifier().fit(
            &row(&[
                "03/01/2024",
                "NEFT",
                "ACME",
                "Industries",
                "Ltd",
                "000451",
                "12,500.00",
                "",
                "40,250.00",
            ]),
            &mapping,
        );

        assert_eq!(
            fitted.cells,
            vec!["03/01/2024", "NEFT ACME Industries Ltd", "000451", "12,500.00", "", "40,250.00"]
        );
    }

    #[test]
    fn test_fit_aligns_clustered_cells() {
        let mapping = mapping().with_spans(vec![
            (10.0, 30.0),
            (100.0, 155.0),
            (250.0, 275.0),
            (320.0, 350.0),
            (400.0, 435.0),
        ]);

        let wrapped = Row::new(vec!["XYZ Corp".to_string()]).with_spans(vec![(100.0, 140.0)]);
        let fitted = classifier().fit(&wrapped, &mapping);
        assert_eq!(fitted.cells, vec!["", "XYZ Corp", "", "", ""]);

        let (kind, _) = classifier().classify(&wrapped, &mapping);
        assert_eq!(kind, RowKind::Continuation);

        let debit_only = Row::new(vec!["05/01/2024".into(), "Payment to".into(), "500.00".into(), "1,500.00".into()])
            .with_spans(vec![(10.0, 60.0), (100.0, 150.0), (245.0, 275.0), (395.0, 435.0)]);
        let fitted = classifier().fit(&debit_only, &mapping);
        assert_eq!(fitted.cells, vec!["05/01/2024", "Payment to", "500.00", "", "1,500.00"]);
    }

    #[test]
    fn test_continuation_merges_description() {
        let mappings = vec![mapping()];
        let mut merger = RowMerger::new();

        assert!(!merger.extend_last(&row(&["", "orphan"]), 0, &mappings));

        merger.push(row(&["05/01/2024", "Payment to", "500.00", "", "1,500.00"]), 0);
        assert!(merger.extend_last(&row(&["", "XYZ Corp", "", "", ""]), 0, &mappings));

        let rows = merger.into_rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].row.cell(1), "Payment to XYZ Corp");
        assert_eq!(rows[0].row.cell(2), "500.00");
    }

    #[test]
    fn test_continuation_across_mappings() {
        let mappings = vec![
            mapping(),
            HeaderMapping::from_labels(&["Txn Date", "Remarks", "Ref No", "Dr", "Cr", "Bal"]),
        ];
        let mut merger = RowMerger::new();

        merger.push(row(&["05/01/2024", "NEFT", "", "250.00", "2,000.00"]), 0);
        merger.extend_last(&row(&["", "ACME Ltd", "REF99", "", "", ""]), 1, &mappings);

        let rows = merger.into_rows();
        assert_eq!(rows[0].row.cell(1), "NEFT ACME Ltd REF99");
    }
}
