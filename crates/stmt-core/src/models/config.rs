//! Configuration structures for the statement engine.

use serde::{Deserialize, Serialize};

/// Main configuration for the stmt engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StmtConfig {
    /// Token clustering configuration.
    pub cluster: ClusterConfig,

    /// Header detection configuration.
    pub header: HeaderConfig,

    /// Row classification configuration.
    pub rows: RowConfig,

    /// Reference table fallback configuration.
    pub fallback: FallbackConfig,
}

/// Token clustering configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Maximum vertical distance from the row anchor for a token to join the row.
    pub row_tolerance: f32,

    /// Horizontal gap at or above which a new cell starts.
    pub column_gap: f32,

    /// Advance per character used when a token has no end coordinate.
    pub char_width: f32,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            row_tolerance: 3.0,
            column_gap: 15.0,
            char_width: 5.0,
        }
    }
}

/// What to do when a later page carries its own header row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderPolicy {
    /// Keep the first header mapping for the whole document.
    #[default]
    FirstWins,
    /// Re-map the remaining rows of the page to its own header.
    Refresh,
}

/// Header detection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderConfig {
    /// Minimum number of keyword-matching cells for a row to be a header.
    pub min_score: usize,

    /// Number of leading rows per page searched for a header.
    pub scan_rows: usize,

    /// Policy for headers repeated on later pages.
    pub policy: HeaderPolicy,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            min_score: 2,
            scan_rows: 3,
            policy: HeaderPolicy::FirstWins,
        }
    }
}

/// Row classification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RowConfig {
    /// Minimum share of non-blank cells for a new transaction row.
    pub min_fill_ratio: f32,

    /// Phrases marking footer or summary rows.
    pub footer_keywords: Vec<String>,
}

impl Default for RowConfig {
    fn default() -> Self {
        Self {
            min_fill_ratio: 0.5,
            footer_keywords: ["total", "opening balance", "closing balance", "page", "statement"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Reference table fallback configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    /// Load the reference table when no rows were extracted.
    pub enabled: bool,

    /// Extension of the reference table next to the document.
    pub extension: String,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            extension: "csv".to_string(),
        }
    }
}

impl StmtConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
