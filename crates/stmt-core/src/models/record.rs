//! Canonical transaction records produced by the statement engine.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A canonical column name every statement is normalized to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CanonicalColumn {
    #[serde(rename = "Date")]
    Date,
    #[serde(rename = "Description")]
    Description,
    #[serde(rename = "Cheque No")]
    ChequeNo,
    #[serde(rename = "Debit Amt")]
    DebitAmt,
    #[serde(rename = "Credit Amt")]
    CreditAmt,
    /// Single signed amount column. Never part of the output schema.
    #[serde(rename = "Amount")]
    Amount,
    #[serde(rename = "Balance")]
    Balance,
    /// Dr/Cr indicator column. Never part of the output schema.
    #[serde(rename = "Type")]
    Type,
}

impl CanonicalColumn {
    /// Display label used in headers and CSV output.
    pub fn label(&self) -> &'static str {
        match self {
            CanonicalColumn::Date => "Date",
            CanonicalColumn::Description => "Description",
            CanonicalColumn::ChequeNo => "Cheque No",
            CanonicalColumn::DebitAmt => "Debit Amt",
            CanonicalColumn::CreditAmt => "Credit Amt",
            CanonicalColumn::Amount => "Amount",
            CanonicalColumn::Balance => "Balance",
            CanonicalColumn::Type => "Type",
        }
    }

    /// Fixed output order.
    pub fn output_order(with_cheque_no: bool) -> Vec<CanonicalColumn> {
        let mut columns = vec![CanonicalColumn::Date, CanonicalColumn::Description];
        if with_cheque_no {
            columns.push(CanonicalColumn::ChequeNo);
        }
        columns.extend([
            CanonicalColumn::DebitAmt,
            CanonicalColumn::CreditAmt,
            CanonicalColumn::Balance,
        ]);
        columns
    }
}

impl std::fmt::Display for CanonicalColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Which side of the ledger a Dr/Cr indicator points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EntrySide {
    Debit,
    Credit,
}

/// One accepted transaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionRecord {
    /// Transaction date (null when unparseable).
    #[serde(rename = "Date")]
    pub date: Option<NaiveDate>,

    /// Trimmed narration text.
    #[serde(rename = "Description")]
    pub description: String,

    /// Cheque or reference number.
    #[serde(rename = "Cheque No")]
    pub cheque_no: Option<String>,

    /// Outflow amount.
    #[serde(rename = "Debit Amt")]
    pub debit: Option<Decimal>,

    /// Inflow amount.
    #[serde(rename = "Credit Amt")]
    pub credit: Option<Decimal>,

    /// Running balance after the transaction.
    #[serde(rename = "Balance")]
    pub balance: Option<Decimal>,

    /// Signed amount from a single Amount column, consumed by the reconciler.
    #[serde(skip)]
    pub(crate) amount: Option<Decimal>,

    /// Dr/Cr indicator from a Type column, consumed by the reconciler.
    #[serde(skip)]
    pub(crate) side: Option<EntrySide>,
}

impl TransactionRecord {
    /// Create a record with only a date and description.
    pub fn new(date: Option<NaiveDate>, description: impl Into<String>) -> Self {
        Self {
            date,
            description: description.into(),
            cheque_no: None,
            debit: None,
            credit: None,
            balance: None,
            amount: None,
            side: None,
        }
    }

    /// Render the given columns as text cells (empty string for null).
    pub fn cells(&self, columns: &[CanonicalColumn]) -> Vec<String> {
        fn amount(value: &Option<Decimal>) -> String {
            value.map(|v| v.to_string()).unwrap_or_default()
        }

        columns
            .iter()
            .map(|column| match column {
                CanonicalColumn::Date => self.date.map(|d| d.to_string()).unwrap_or_default(),
                CanonicalColumn::Description => self.description.clone(),
                CanonicalColumn::ChequeNo => self.cheque_no.clone().unwrap_or_default(),
                CanonicalColumn::DebitAmt => amount(&self.debit),
                CanonicalColumn::CreditAmt => amount(&self.credit),
                CanonicalColumn::Balance => amount(&self.balance),
                CanonicalColumn::Amount => amount(&self.amount),
                CanonicalColumn::Type => String::new(),
            })
            .collect()
    }
}

/// Where a result's records came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordSource {
    /// Extracted from the document pages.
    Document,
    /// Loaded from the reference table.
    Reference,
}

/// Ordered, schema-stable output of one parse invocation.
#[derive(Debug, Clone, Serialize)]
pub struct ParseResult {
    /// Identity of the parsed document.
    pub document: String,

    /// Origin of the records.
    pub source: RecordSource,

    /// Header labels as mapped from the source.
    pub header: Vec<String>,

    /// Accepted transactions in input order.
    pub records: Vec<TransactionRecord>,

    /// Whether the issuer exposes a cheque number column.
    pub has_cheque_no: bool,

    /// Non-fatal anomalies noticed along the way.
    pub warnings: Vec<String>,

    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

impl ParseResult {
    /// Output columns in their fixed order.
    pub fn columns(&self) -> Vec<CanonicalColumn> {
        CanonicalColumn::output_order(self.has_cheque_no)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no records were produced.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sum of all debits and all credits.
    pub fn totals(&self) -> (Decimal, Decimal) {
        self.records.iter().fold(
            (Decimal::ZERO, Decimal::ZERO),
            |(debit, credit), record| {
                (
                    debit + record.debit.unwrap_or_default(),
                    credit + record.credit.unwrap_or_default(),
                )
            },
        )
    }
}
