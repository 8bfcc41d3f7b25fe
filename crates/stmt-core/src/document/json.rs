//! Page dumps stored as JSON.
//!
//! The external document reader writes one JSON object per document:
//!
//! ```json
//! {
//!   "pages": [
//!     { "grid": [["Date", "Narration", "Balance"], ["01/01/2024", "ATM", "100.00"]] },
//!     { "tokens": [{ "text": "Date", "x0": 30.0, "top": 100.0 }] }
//!   ]
//! }
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use super::{DocumentReader, Page, Result};
use crate::error::ReaderError;

#[derive(Deserialize)]
struct DocumentDump {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    pages: Vec<Page>,
}

/// Document reader over an in-memory page dump.
#[derive(Debug, Clone)]
pub struct JsonDocument {
    id: String,
    pages: Vec<Page>,
}

impl JsonDocument {
    /// Build a document from already-read pages.
    pub fn from_pages(id: impl Into<String>, pages: Vec<Page>) -> Self {
        let mut pages = pages;
        for (index, page) in pages.iter_mut().enumerate() {
            if page.number == 0 {
                page.number = index + 1;
            }
        }

        Self {
            id: id.into(),
            pages,
        }
    }

    /// Decode a page dump. An `id` inside the dump overrides `default_id`.
    pub fn from_json(default_id: &str, json: &str) -> Result<Self> {
        let dump: DocumentDump =
            serde_json::from_str(json).map_err(|e| ReaderError::Parse(e.to_string()))?;

        let id = dump.id.unwrap_or_else(|| default_id.to_string());
        Ok(Self::from_pages(id, dump.pages))
    }

    /// Read a page dump from disk.
    ///
    /// The document identity is always the path itself, so an `id` inside the
    /// dump is ignored here. The reference table is keyed by that identity and
    /// must stay resolvable next to the file. Use [`JsonDocument::from_json`]
    /// when the dump's own `id` should win.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let dump: DocumentDump =
            serde_json::from_str(&content).map_err(|e| ReaderError::Parse(e.to_string()))?;

        debug!("Loaded {} pages from {}", dump.pages.len(), path.display());

        Ok(Self::from_pages(path.display().to_string(), dump.pages))
    }
}

impl DocumentReader for JsonDocument {
    fn document_id(&self) -> &str {
        &self.id
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page(&self, index: usize) -> Result<Page> {
        self.pages
            .get(index)
            .cloned()
            .ok_or(ReaderError::InvalidPage(index + 1))
    }
}
