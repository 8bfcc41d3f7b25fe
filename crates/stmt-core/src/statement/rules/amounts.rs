//! Amount normalization for statement cells.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::FieldParser;
use crate::error::FieldError;

/// Amount field parser.
pub struct AmountParser;

impl AmountParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AmountParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldParser for AmountParser {
    type Output = Decimal;

    fn parse_strict(&self, raw: &str) -> Result<Decimal, FieldError> {
        parse_amount_strict(raw)
    }
}

/// Parse an amount cell.
///
/// Every character other than digits, `.`, `-`, `,` and parentheses is
/// stripped first, so currency symbols and Dr/Cr suffixes outside the
/// parentheses do not hide a negative. A value wrapped in parentheses is
/// negated, then thousands-separator commas are removed.
pub fn parse_amount_strict(raw: &str) -> Result<Decimal, FieldError> {
    let fail = || FieldError::Amount {
        value: raw.to_string(),
    };

    let kept: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | ',' | '(' | ')'))
        .collect();

    let (negative, body) = match kept
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
    {
        Some(inner) => (true, inner),
        None => (false, kept.as_str()),
    };

    let cleaned: String = body
        .chars()
        .filter(|c| !matches!(c, ',' | '(' | ')'))
        .collect();

    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return Err(fail());
    }

    let value = Decimal::from_str(&cleaned).map_err(|_| fail())?;
    Ok(if negative { -value } else { value })
}

/// Parse an amount cell, `None` when blank or unparseable.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    AmountParser.parse(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Option<Decimal> {
        Some(Decimal::from_str(s).unwrap())
    }

    #[test]
    fn test_parse_amount_table() {
        let cases: &[(&str, Option<Decimal>)] = &[
            ("(1,234.50)", dec("-1234.50")),
            ("1,234.50", dec("1234.50")),
            ("", None),
            ("   ", None),
            ("1234.50", dec("1234.50")),
            ("-250.75", dec("-250.75")),
            ("1,23,456.00", dec("123456.00")),
            ("₹ 12,000", dec("12000")),
            ("$1,000.00", dec("1000.00")),
            ("€ 99.99", dec("99.99")),
            ("(₹500.00)", dec("-500.00")),
            ("$(1,000.00)", dec("-1000.00")),
            ("₹ (500.00)", dec("-500.00")),
            ("(500.00) Dr", dec("-500.00")),
            ("500.00 Cr", dec("500.00")),
            (" 42 ", dec("42")),
            ("0.00", dec("0.00")),
            ("-", None),
            ("nan", None),
            ("N/A", None),
            ("1.2.3", None),
            ("12-50", None),
        ];

        for (input, expected) in cases {
            assert_eq!(parse_amount(input), *expected, "input {:?}", input);
        }
    }

    #[test]
    fn test_strict_reports_value() {
        assert_eq!(
            parse_amount_strict("abc"),
            Err(FieldError::Amount {
                value: "abc".to_string()
            })
        );
    }

    #[test]
    fn test_parser_trait() {
        let parser = AmountParser::new();
        assert_eq!(parser.parse("(10)"), dec("-10"));
        assert!(parser.parse_strict("").is_err());
    }
}
