//! Text cell cleanup.

/// Trim and collapse internal whitespace (Unicode-aware).
pub fn clean_text(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cleaned text, `None` when blank or a null placeholder.
pub fn clean_optional(raw: &str) -> Option<String> {
    let cleaned = clean_text(raw);
    if cleaned.is_empty() || cleaned.eq_ignore_ascii_case("nan") {
        None
    } else {
        Some(cleaned)
    }
}
