use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use stmt_core::{
    CanonicalColumn, JsonDocument, Page, ParseResult, RecordSource, StatementExtractor,
    StatementParser, StmtConfig, StmtError, Token,
};

fn grid(rows: &[&[&str]]) -> Vec<Vec<Option<String>>> {
    rows.iter()
        .map(|r| {
            r.iter()
                .map(|c| (!c.is_empty()).then(|| c.to_string()))
                .collect()
        })
        .collect()
}

fn grid_document(id: &str, pages: &[&[&[&str]]]) -> JsonDocument {
    JsonDocument::from_pages(
        id,
        pages.iter().map(|p| Page::from_grid(0, grid(p))).collect(),
    )
}

fn parser() -> StatementParser {
    StatementParser::new(&StmtConfig::default())
        .unwrap()
        .without_fallback()
}

fn dec(s: &str) -> Option<Decimal> {
    Some(Decimal::from_str(s).unwrap())
}

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

fn write(path: &Path, content: &str) {
    std::fs::write(path, content).unwrap();
}

#[test]
fn test_continuation_rows_merge_into_description() {
    let doc = grid_document(
        "wrapped.json",
        &[&[
            &["Date", "Description", "Debit", "Credit", "Balance"],
            &["2024-01-05", "Payment to", "500.00", "", "1,500.00"],
            &["", "XYZ Corp", "", "", ""],
            &["2024-01-06", "Salary", "", "2,000.00", "3,500.00"],
        ]],
    );

    let result = parser().parse(&doc).unwrap();

    assert_eq!(result.len(), 2);
    assert_eq!(result.records[0].date, date(2024, 1, 5));
    assert_eq!(result.records[0].description, "Payment to XYZ Corp");
    assert_eq!(result.records[0].debit, dec("500.00"));
    assert_eq!(result.records[1].credit, dec("2000.00"));
}

#[test]
fn test_footer_row_halts_block() {
    let doc = grid_document(
        "footer.json",
        &[&[
            &["Txn Date", "Particulars", "Withdrawal", "Deposit", "Balance"],
            &["01/01/2024", "ATM", "100.00", "", "900.00"],
            &["02/01/2024", "UPI", "50.00", "", "850.00"],
            &["", "Closing Balance", "", "", "850.00"],
            &["03/01/2024", "Interest", "", "5.00", "855.00"],
        ]],
    );

    let result = parser().parse(&doc).unwrap();

    let descriptions: Vec<&str> = result.records.iter().map(|r| r.description.as_str()).collect();
    assert_eq!(descriptions, vec!["ATM", "UPI"]);
}

#[test]
fn test_footer_keyword_in_dated_narration_is_kept() {
    let doc = grid_document(
        "narration.json",
        &[&[
            &["Date", "Description", "Debit", "Credit", "Balance"],
            &["01/01/2024", "ATM", "100.00", "", "900.00"],
            &["02/01/2024", "Credit card statement payment", "400.00", "", "500.00"],
            &["03/01/2024", "Salary", "", "2,000.00", "2,500.00"],
        ]],
    );

    let result = parser().parse(&doc).unwrap();

    let descriptions: Vec<&str> = result.records.iter().map(|r| r.description.as_str()).collect();
    assert_eq!(
        descriptions,
        vec!["ATM", "Credit card statement payment", "Salary"]
    );
}

#[test]
fn test_clustered_footer_skips_only_itself() {
    let token = |text: &str, x0: f32, x1: f32, top: f32| Token::new(text, x0, top).with_x1(x1);
    let tokens = vec![
        token("Date", 10.0, 30.0, 100.0),
        token("Description", 100.0, 155.0, 100.0),
        token("Debit", 250.0, 275.0, 100.0),
        token("Credit", 320.0, 350.0, 100.0),
        token("Balance", 400.0, 435.0, 100.0),
        token("05/01/2024", 10.0, 60.0, 120.0),
        token("ATM", 100.0, 115.0, 120.0),
        token("100.00", 245.0, 275.0, 120.0),
        token("900.00", 400.0, 430.0, 120.0),
        token("Page", 10.0, 30.0, 140.0),
        token("1", 34.0, 39.0, 140.0),
        token("06/01/2024", 10.0, 60.0, 160.0),
        token("Interest", 100.0, 140.0, 160.0),
        token("5.00", 330.0, 350.0, 160.0),
        token("905.00", 400.0, 430.0, 160.0),
    ];
    let doc = JsonDocument::from_pages("tokens.json", vec![Page::from_tokens(1, tokens)]);

    let result = parser().parse(&doc).unwrap();

    assert_eq!(result.len(), 2);
    assert_eq!(result.records[0].description, "ATM");
    assert_eq!(result.records[1].description, "Interest");
    assert_eq!(result.records[1].date, date(2024, 1, 6));
    assert_eq!(result.records[1].credit, dec("5.00"));
}

#[test]
fn test_single_amount_column_is_split() {
    let doc = grid_document(
        "signed.json",
        &[&[
            &["Date", "Narration", "Amount", "Balance"],
            &["05/01/2024", "Rent", "-500", "500"],
            &["06/01/2024", "Refund", "300", "800"],
        ]],
    );

    let result = parser().parse(&doc).unwrap();

    let debits: Vec<_> = result.records.iter().map(|r| r.debit).collect();
    let credits: Vec<_> = result.records.iter().map(|r| r.credit).collect();
    assert_eq!(debits, vec![dec("500"), None]);
    assert_eq!(credits, vec![None, dec("300")]);
    assert!(!result.header.is_empty());
}

#[test]
fn test_rows_without_dates_are_dropped() {
    let doc = grid_document(
        "nodate.json",
        &[&[
            &["Date", "Description", "Debit", "Credit", "Balance"],
            &["01/01/2024", "ATM", "100.00", "", "900.00"],
            &["B/F", "Brought forward", "", "", "900.00"],
        ]],
    );

    let result = parser().parse(&doc).unwrap();

    assert_eq!(result.len(), 1);
    assert!(result.records.iter().all(|r| r.date.is_some()));
    assert_eq!(result.warnings, vec!["1 rows without a parseable date dropped"]);
}

#[test]
fn test_schema_is_independent_of_header_layout() {
    let first = grid_document(
        "a.json",
        &[&[
            &["Date", "Description", "Debit", "Credit", "Balance"],
            &["01/01/2024", "ATM", "100.00", "", "900.00"],
        ]],
    );
    let second = grid_document(
        "b.json",
        &[&[
            &["Bal", "Cr", "Dr", "Remarks", "Value Date"],
            &["900.00", "", "100.00", "ATM", "01/01/2024"],
        ]],
    );

    let a = parser().parse(&first).unwrap();
    let b = parser().parse(&second).unwrap();

    assert_eq!(a.columns(), b.columns());
    assert_eq!(
        a.columns(),
        vec![
            CanonicalColumn::Date,
            CanonicalColumn::Description,
            CanonicalColumn::DebitAmt,
            CanonicalColumn::CreditAmt,
            CanonicalColumn::Balance,
        ]
    );
    assert_eq!(a.records, b.records);
}

#[test]
fn test_parsing_is_idempotent() {
    let doc = grid_document(
        "repeat.json",
        &[
            &[
                &["Date", "Description", "Chq No", "Debit", "Credit", "Balance"],
                &["01/01/2024", "Cheque paid", "000123", "1,000.00", "", "4,000.00"],
                &["", "to landlord", "", "", "", ""],
            ],
            &[&["02/01/2024", "NEFT", "", "", "(250.00)", "3,750.00"]],
        ],
    );
    let parser = parser();

    let first: ParseResult = parser.extract(&doc).unwrap();
    let second: ParseResult = parser.extract(&doc).unwrap();

    assert_eq!(first.records, second.records);
    assert_eq!(first.header, second.header);
    assert!(first.has_cheque_no);
    assert_eq!(first.columns()[2], CanonicalColumn::ChequeNo);
}

#[test]
fn test_missing_header_is_fatal() {
    let doc = grid_document(
        "headless.json",
        &[&[&["01/01/2024", "ATM", "100.00", "", "900.00"]]],
    );

    let err = parser().parse(&doc).unwrap_err();

    assert!(matches!(err, StmtError::HeaderNotFound { .. }));
    assert!(err.to_string().starts_with("headless.json:"));
}

#[test]
fn test_clustered_tokens_page() {
    let json = r#"{
        "pages": [{
            "tokens": [
                { "text": "ACCOUNT", "x0": 10.0, "x1": 60.0, "top": 60.0 },
                { "text": "STATEMENT", "x0": 64.0, "x1": 130.0, "top": 60.0 },
                { "text": "Date", "x0": 10.0, "x1": 30.0, "top": 100.0 },
                { "text": "Description", "x0": 100.0, "x1": 155.0, "top": 100.0 },
                { "text": "Debit", "x0": 250.0, "x1": 275.0, "top": 100.0 },
                { "text": "Credit", "x0": 320.0, "x1": 350.0, "top": 100.5 },
                { "text": "Balance", "x0": 400.0, "x1": 435.0, "top": 100.0 },
                { "text": "05/01/2024", "x0": 10.0, "x1": 60.0, "top": 120.0 },
                { "text": "Payment", "x0": 100.0, "x1": 135.0, "top": 120.0 },
                { "text": "to", "x0": 139.0, "x1": 149.0, "top": 121.0 },
                { "text": "500.00", "x0": 245.0, "x1": 275.0, "top": 120.0 },
                { "text": "1,500.00", "x0": 395.0, "x1": 435.0, "top": 120.0 },
                { "text": "XYZ", "x0": 100.0, "x1": 115.0, "top": 131.0 },
                { "text": "Corp", "x0": 119.0, "x1": 139.0, "top": 131.0 },
                { "text": "06/01/2024", "x0": 10.0, "x1": 60.0, "top": 150.0 },
                { "text": "Salary", "x0": 100.0, "x1": 130.0, "top": 150.0 },
                { "text": "2,000.00", "x0": 315.0, "x1": 350.0, "top": 150.0 },
                { "text": "3,500.00", "x0": 395.0, "x1": 435.0, "top": 150.0 },
                { "text": "Page", "x0": 10.0, "x1": 30.0, "top": 170.0 },
                { "text": "1", "x0": 34.0, "x1": 39.0, "top": 170.0 }
            ]
        }]
    }"#;
    let doc = JsonDocument::from_json("clustered.json", json).unwrap();

    let result = parser().parse(&doc).unwrap();

    assert_eq!(result.len(), 2);
    assert_eq!(result.records[0].description, "Payment to XYZ Corp");
    assert_eq!(result.records[0].debit, dec("500.00"));
    assert_eq!(result.records[0].credit, None);
    assert_eq!(result.records[0].balance, dec("1500.00"));
    assert_eq!(result.records[1].date, date(2024, 1, 6));
    assert_eq!(result.records[1].credit, dec("2000.00"));
}

#[test]
fn test_empty_document_falls_back_to_reference_csv() {
    let dir = tempfile::tempdir().unwrap();
    let document = dir.path().join("icici.json");
    write(&document, r#"{ "pages": [{ "number": 1 }, { "number": 2 }] }"#);

    let mut csv = String::from("Date,Description,Debit Amt,Credit Amt,Balance\n");
    for day in 1..=10 {
        let (debit, credit) = if day % 2 == 0 { ("", "100.00") } else { ("40.00", "") };
        csv.push_str(&format!(
            "{:02}-08-2024,Txn {},{},{},\"1,{:03}.00\"\n",
            day, day, debit, credit, day
        ));
    }
    write(&dir.path().join("icici.csv"), &csv);

    let doc = JsonDocument::from_path(&document).unwrap();
    let parser = StatementParser::new(&StmtConfig::default()).unwrap();
    let result = parser.parse(&doc).unwrap();

    assert_eq!(result.source, RecordSource::Reference);
    assert_eq!(result.len(), 10);
    assert_eq!(result.records[0].date, date(2024, 8, 1));
    assert_eq!(result.records[0].description, "Txn 1");
    assert_eq!(result.records[0].debit, dec("40.00"));
    assert_eq!(result.records[1].credit, dec("100.00"));
    assert_eq!(result.records[9].balance, dec("1010.00"));
    assert_eq!(result.columns(), CanonicalColumn::output_order(false));
}

#[test]
fn test_missing_reference_table_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let document = dir.path().join("empty.json");
    write(&document, r#"{ "pages": [] }"#);

    let doc = JsonDocument::from_path(&document).unwrap();
    let parser = StatementParser::new(&StmtConfig::default()).unwrap();
    let err = parser.parse(&doc).unwrap_err();

    assert!(matches!(err, StmtError::ReferenceNotFound { .. }));
    assert!(err.to_string().contains("empty.json"));
}
