//! Common regex patterns for statement normalization.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Day-first numeric dates: DD/MM/YYYY, DD-MM-YY, DD.MM.YYYY
    pub static ref DATE_DMY: Regex = Regex::new(
        r"\b(\d{1,2})[./\-](\d{1,2})[./\-](\d{4}|\d{2})\b"
    ).unwrap();

    // ISO-like dates: YYYY-MM-DD or YYYY/MM/DD
    pub static ref DATE_YMD: Regex = Regex::new(
        r"\b(\d{4})[./\-](\d{1,2})[./\-](\d{1,2})\b"
    ).unwrap();

    // Named month, day first: "05 Jan 2024", "05-Jan-24", "5 September, 2024"
    pub static ref DATE_NAMED_DMY: Regex = Regex::new(
        r"\b(\d{1,2})[\s\-./]+([A-Za-z]{3,9})\.?[\s\-./,]+(\d{4}|\d{2})\b"
    ).unwrap();

    // Named month, month first: "Jan 05, 2024"
    pub static ref DATE_NAMED_MDY: Regex = Regex::new(
        r"\b([A-Za-z]{3,9})\.?\s+(\d{1,2}),?\s+(\d{4})\b"
    ).unwrap();

    // Header vocabulary, matched per word
    pub static ref HEADER_KEYWORD: Regex = Regex::new(
        r"(?i)\b(?:date|txn|transaction|tran|description|particulars|narration|remarks|details?|debits?|credits?|withdrawals?|deposits?|amount|amt|balance|bal|cheque|chq|ref|type|dr|cr)\b"
    ).unwrap();

    // Characters that separate words in a header cell
    pub static ref HEADER_SEPARATOR: Regex = Regex::new(r"[^\p{L}\p{N}]+").unwrap();
}
