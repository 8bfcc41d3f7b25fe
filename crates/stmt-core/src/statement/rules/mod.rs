//! Typed field conversion for statement cells.

pub mod amounts;
pub mod dates;
pub mod patterns;
pub mod text;

pub use amounts::{parse_amount, parse_amount_strict, AmountParser};
pub use dates::{parse_date, parse_date_strict, DateParser};
pub use text::{clean_optional, clean_text};

use tracing::debug;

use crate::error::FieldError;

/// Trait for cell parsers.
pub trait FieldParser {
    /// The typed value this parser produces.
    type Output;

    /// Parse a cell, reporting why it failed.
    fn parse_strict(&self, raw: &str) -> Result<Self::Output, FieldError>;

    /// Parse a cell, degrading failures to `None`.
    fn parse(&self, raw: &str) -> Option<Self::Output> {
        match self.parse_strict(raw) {
            Ok(value) => Some(value),
            Err(e) => {
                if !raw.trim().is_empty() {
                    debug!("Field parse failure: {}", e);
                }
                None
            }
        }
    }
}
