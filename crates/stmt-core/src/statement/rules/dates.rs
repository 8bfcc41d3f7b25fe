//! Date normalization for statement cells (day-first convention).

use chrono::NaiveDate;

use super::patterns::{DATE_DMY, DATE_NAMED_DMY, DATE_NAMED_MDY, DATE_YMD};
use super::FieldParser;
use crate::error::FieldError;

/// Date field parser.
pub struct DateParser;

impl DateParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DateParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldParser for DateParser {
    type Output = NaiveDate;

    fn parse_strict(&self, raw: &str) -> Result<NaiveDate, FieldError> {
        parse_date_strict(raw)
    }
}

/// Parse a date cell. Numeric dates are read day-first unless the year leads.
pub fn parse_date_strict(raw: &str) -> Result<NaiveDate, FieldError> {
    let text = raw.trim();

    // YYYY-MM-DD
    if let Some(caps) = DATE_YMD.captures(text) {
        let year: i32 = caps[1].parse().unwrap_or(0);
        let month: u32 = caps[2].parse().unwrap_or(0);
        let day: u32 = caps[3].parse().unwrap_or(0);

        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            return Ok(date);
        }
    }

    // DD/MM/YYYY, DD-MM-YY, DD.MM.YYYY
    if let Some(caps) = DATE_DMY.captures(text) {
        let day: u32 = caps[1].parse().unwrap_or(0);
        let month: u32 = caps[2].parse().unwrap_or(0);
        let year = parse_year(&caps[3]);

        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            return Ok(date);
        }
    }

    // 05 Jan 2024, 05-Jan-24
    if let Some(caps) = DATE_NAMED_DMY.captures(text) {
        let day: u32 = caps[1].parse().unwrap_or(0);
        let year = parse_year(&caps[3]);

        if let Some(month) = month_to_number(&caps[2]) {
            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                return Ok(date);
            }
        }
    }

    // Jan 05, 2024
    if let Some(caps) = DATE_NAMED_MDY.captures(text) {
        let day: u32 = caps[2].parse().unwrap_or(0);
        let year: i32 = caps[3].parse().unwrap_or(0);

        if let Some(month) = month_to_number(&caps[1]) {
            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                return Ok(date);
            }
        }
    }

    Err(FieldError::Date {
        value: raw.to_string(),
    })
}

/// Parse a date cell, `None` when blank or unparseable.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    DateParser.parse(raw)
}

fn parse_year(s: &str) -> i32 {
    let year: i32 = s.parse().unwrap_or(0);
    if year < 100 {
        // Two-digit year: assume 2000s for 00-50, 1900s for 51-99
        if year <= 50 {
            2000 + year
        } else {
            1900 + year
        }
    } else {
        year
    }
}

fn month_to_number(month: &str) -> Option<u32> {
    let month = month.to_lowercase();
    let number = match month.as_str() {
        "jan" | "january" => 1,
        "feb" | "february" => 2,
        "mar" | "march" => 3,
        "apr" | "april" => 4,
        "may" => 5,
        "jun" | "june" => 6,
        "jul" | "july" => 7,
        "aug" | "august" => 8,
        "sep" | "sept" | "september" => 9,
        "oct" | "october" => 10,
        "nov" | "november" => 11,
        "dec" | "december" => 12,
        _ => return None,
    };
    Some(number)
}
