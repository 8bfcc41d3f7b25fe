//! Reconciliation of single-amount statements onto the split schema.

use rust_decimal::Decimal;
use tracing::debug;

use crate::models::record::{EntrySide, TransactionRecord};

/// Derives Debit/Credit from a signed Amount column.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaReconciler;

impl SchemaReconciler {
    pub fn new() -> Self {
        Self
    }

    /// Split signed amounts in place.
    ///
    /// A Dr/Cr indicator decides the side when present; otherwise negative
    /// values are debits and everything else (zero included) is a credit.
    pub fn reconcile(&self, records: &mut [TransactionRecord]) {
        let mut derived = 0usize;

        for record in records.iter_mut() {
            let side = record.side.take();
            let Some(amount) = record.amount.take() else {
                continue;
            };

            match side {
                Some(EntrySide::Debit) => record.debit = Some(amount.abs()),
                Some(EntrySide::Credit) => record.credit = Some(amount.abs()),
                None if amount < Decimal::ZERO => record.debit = Some(-amount),
                None => record.credit = Some(amount),
            }
            derived += 1;
        }

        if derived > 0 {
            debug!("Derived debit/credit for {} records from a single amount column", derived);
        }
    }
}
