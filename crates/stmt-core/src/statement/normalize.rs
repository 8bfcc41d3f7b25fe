//! Typed conversion of fitted rows into transaction records.

use super::header::{HeaderColumn, HeaderMapping};
use super::rules::{clean_optional, clean_text, parse_amount, parse_date};
use crate::layout::Row;
use crate::models::record::{CanonicalColumn, EntrySide, TransactionRecord};

/// Converts rows to records under a header mapping.
///
/// Unparseable cells become null; normalization never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldNormalizer;

impl FieldNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Normalize one row.
    pub fn normalize(&self, row: &Row, mapping: &HeaderMapping) -> TransactionRecord {
        let mut record = TransactionRecord::new(None, String::new());
        let single_amount = mapping.has_single_amount();

        for (index, column) in mapping.columns().iter().enumerate() {
            let HeaderColumn::Canonical(column) = column else {
                continue;
            };
            let cell = row.cell(index);

            match column {
                CanonicalColumn::Date => record.date = parse_date(cell),
                CanonicalColumn::Description => record.description = clean_text(cell),
                CanonicalColumn::ChequeNo => record.cheque_no = clean_optional(cell),
                CanonicalColumn::DebitAmt => record.debit = parse_amount(cell),
                CanonicalColumn::CreditAmt => record.credit = parse_amount(cell),
                CanonicalColumn::Balance => record.balance = parse_amount(cell),
                CanonicalColumn::Amount if single_amount => record.amount = parse_amount(cell),
                CanonicalColumn::Amount => {}
                CanonicalColumn::Type => record.side = entry_side(cell),
            }
        }

        record
    }

    /// Normalize a batch of rows under the same mapping.
    pub fn normalize_all<'a, I>(&self, rows: I, mapping: &HeaderMapping) -> Vec<TransactionRecord>
    where
        I: IntoIterator<Item = &'a Row>,
    {
        rows.into_iter()
            .map(|row| self.normalize(row, mapping))
            .collect()
    }
}

/// Read a Dr/Cr indicator cell.
fn entry_side(raw: &str) -> Option<EntrySide> {
    let cleaned = clean_text(raw).to_lowercase();
    let cleaned = cleaned.trim_end_matches('.');
    match cleaned {
        "dr" | "d" | "debit" | "withdrawal" => Some(EntrySide::Debit),
        "cr" | "c" | "credit" | "deposit" => Some(EntrySide::Credit),
        _ => None,
    }
}
