//! Input boundary: pages of positioned tokens and/or grid-extracted rows.

mod json;
mod reference;

pub use json::JsonDocument;
pub use reference::{CsvReferenceReader, ReferenceReader, ReferenceTable};

use serde::{Deserialize, Serialize};

use crate::error::ReaderError;

/// Result type for document reader operations.
pub type Result<T> = std::result::Result<T, ReaderError>;

/// A positioned text fragment on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Text content.
    pub text: String,

    /// Horizontal start coordinate.
    pub x0: f32,

    /// Horizontal end coordinate, when the reader reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x1: Option<f32>,

    /// Vertical coordinate of the token's top edge.
    pub top: f32,
}

impl Token {
    pub fn new(text: impl Into<String>, x0: f32, top: f32) -> Self {
        Self {
            text: text.into(),
            x0,
            x1: None,
            top,
        }
    }

    /// Set the horizontal end coordinate.
    pub fn with_x1(mut self, x1: f32) -> Self {
        self.x1 = Some(x1);
        self
    }

    /// Horizontal end coordinate, estimated from `char_width` when the reader gave none.
    pub fn right(&self, char_width: f32) -> f32 {
        self.x1
            .unwrap_or_else(|| self.x0 + self.text.chars().count() as f32 * char_width)
    }
}

/// Everything the reader could extract from one page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-indexed).
    #[serde(default)]
    pub number: usize,

    /// Grid-extracted table rows, `None` cells meaning empty.
    #[serde(default)]
    pub grid: Vec<Vec<Option<String>>>,

    /// Positioned tokens.
    #[serde(default)]
    pub tokens: Vec<Token>,
}

impl Page {
    /// Page carrying only a grid table.
    pub fn from_grid(number: usize, grid: Vec<Vec<Option<String>>>) -> Self {
        Self {
            number,
            grid,
            tokens: Vec::new(),
        }
    }

    /// Page carrying only positioned tokens.
    pub fn from_tokens(number: usize, tokens: Vec<Token>) -> Self {
        Self {
            number,
            grid: Vec::new(),
            tokens,
        }
    }

    /// Whether the grid path yielded anything usable.
    pub fn has_grid(&self) -> bool {
        self.grid
            .iter()
            .any(|row| row.iter().flatten().any(|cell| !cell.trim().is_empty()))
    }
}

/// Trait for document readers feeding the engine.
pub trait DocumentReader {
    /// Identity of the document, used in errors and to key the reference table.
    fn document_id(&self) -> &str;

    /// Number of pages.
    fn page_count(&self) -> usize;

    /// Read one page (0-indexed).
    fn page(&self, index: usize) -> Result<Page>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_grid_ignores_blank_cells() {
        let page = Page::from_grid(1, vec![vec![None, Some("  ".to_string())]]);
        assert!(!page.has_grid());

        let page = Page::from_grid(1, vec![vec![None, Some("Date".to_string())]]);
        assert!(page.has_grid());
    }
}
