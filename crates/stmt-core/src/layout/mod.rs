//! Row reconstruction: grid rows or clustered tokens, normalized to one shape.

mod cluster;
mod source;

pub use cluster::TokenClusterer;
pub use source::{page_rows, ClusteredRows, GridRows, PageRows, RowOrigin, RowSource};

/// An ordered sequence of cell texts, one per detected column position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    pub cells: Vec<String>,

    /// Horizontal extent `(x0, x1)` of each cell. Empty for grid rows.
    pub spans: Vec<(f32, f32)>,
}

impl Row {
    pub fn new(cells: Vec<String>) -> Self {
        Self {
            cells,
            spans: Vec::new(),
        }
    }

    /// Attach cell extents.
    pub fn with_spans(mut self, spans: Vec<(f32, f32)>) -> Self {
        self.spans = spans;
        self
    }

    /// Whether every cell has a known horizontal extent.
    pub fn is_positioned(&self) -> bool {
        !self.cells.is_empty() && self.spans.len() == self.cells.len()
    }

    /// Cell text at `index`, empty when out of range.
    pub fn cell(&self, index: usize) -> &str {
        self.cells.get(index).map(String::as_str).unwrap_or("")
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the row has no cells at all.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of cells carrying non-blank text.
    pub fn filled(&self) -> usize {
        self.cells.iter().filter(|c| !c.trim().is_empty()).count()
    }

    /// Whether every cell is blank.
    pub fn is_blank(&self) -> bool {
        self.filled() == 0
    }
}

impl<S: Into<String>> FromIterator<S> for Row {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_helpers() {
        let row: Row = ["01/01/2024", " ", "100.00"].into_iter().collect();

        assert_eq!(row.len(), 3);
        assert_eq!(row.filled(), 2);
        assert_eq!(row.cell(2), "100.00");
        assert_eq!(row.cell(7), "");
        assert!(!row.is_blank());
        assert!(Row::new(vec![String::new()]).is_blank());
    }
}
