//! Row and cell reconstruction from positioned tokens.
//!
//! Used when a page has no grid table. Tokens are grouped into physical rows
//! by vertical proximity to a drifting anchor, then merged into cells
//! left-to-right wherever the horizontal gap is below the column gap.

use tracing::trace;

use super::Row;
use crate::document::Token;
use crate::models::config::ClusterConfig;

/// Groups positioned tokens into rows and cells.
#[derive(Debug, Clone)]
pub struct TokenClusterer {
    row_tolerance: f32,
    column_gap: f32,
    char_width: f32,
}

impl TokenClusterer {
    /// Create a clusterer from configuration.
    pub fn new(config: &ClusterConfig) -> Self {
        Self {
            row_tolerance: config.row_tolerance,
            column_gap: config.column_gap,
            char_width: config.char_width,
        }
    }

    /// Set the vertical row tolerance.
    pub fn with_row_tolerance(mut self, tolerance: f32) -> Self {
        self.row_tolerance = tolerance;
        self
    }

    /// Set the horizontal column gap.
    pub fn with_column_gap(mut self, gap: f32) -> Self {
        self.column_gap = gap;
        self
    }

    /// Cluster one page of tokens into rows in reading order.
    pub fn cluster(&self, tokens: &[Token]) -> Vec<Row> {
        let mut sorted: Vec<&Token> = tokens
            .iter()
            .filter(|t| !t.text.trim().is_empty())
            .collect();

        sorted.sort_by(|a, b| a.top.total_cmp(&b.top).then(a.x0.total_cmp(&b.x0)));

        let mut lines: Vec<Vec<&Token>> = Vec::new();
        let mut anchor = 0.0f32;
        let mut members = 0usize;

        for token in sorted {
            match lines.last_mut() {
                Some(line) if (token.top - anchor).abs() <= self.row_tolerance => {
                    line.push(token);
                    members += 1;
                    // Running mean absorbs baseline jitter within the row
                    anchor += (token.top - anchor) / members as f32;
                }
                _ => {
                    lines.push(vec![token]);
                    anchor = token.top;
                    members = 1;
                }
            }
        }

        lines
            .into_iter()
            .map(|mut line| {
                line.sort_by(|a, b| a.x0.total_cmp(&b.x0));
                self.merge_cells(&line)
            })
            .collect()
    }

    fn merge_cells(&self, line: &[&Token]) -> Row {
        let mut cells: Vec<String> = Vec::new();
        let mut spans: Vec<(f32, f32)> = Vec::new();
        let mut right_edge = f32::NEG_INFINITY;

        for token in line {
            let text = token.text.trim();
            let gap = token.x0 - right_edge;

            match (cells.last_mut(), spans.last_mut()) {
                (Some(cell), Some(span)) if gap < self.column_gap => {
                    cell.push(' ');
                    cell.push_str(text);
                    right_edge = right_edge.max(token.right(self.char_width));
                    span.1 = right_edge;
                }
                _ => {
                    cells.push(text.to_string());
                    right_edge = token.right(self.char_width);
                    spans.push((token.x0, right_edge));
                }
            }
        }

        trace!("Clustered row with {} cells: {:?}", cells.len(), cells);
        Row::new(cells).with_spans(spans)
    }
}

impl Default for TokenClusterer {
    fn default() -> Self {
        Self::new(&ClusterConfig::default())
    }
}
