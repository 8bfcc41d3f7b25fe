//! Uniform row sources over the two upstream page representations.

use tracing::debug;

use super::{Row, TokenClusterer};
use crate::document::{Page, Token};

/// Which extraction path produced a page's rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOrigin {
    /// Rows delimited by ruling lines.
    Grid,
    /// Rows rebuilt from positioned tokens.
    Clustered,
    /// Nothing usable on the page.
    Empty,
}

impl RowOrigin {
    /// Whether a footer row ends the rest of the block.
    ///
    /// A ruled table ends at its summary line. Clustered pages also carry
    /// running page furniture, so only the footer row itself is dropped there.
    pub fn footer_ends_block(&self) -> bool {
        matches!(self, RowOrigin::Grid)
    }
}

/// Anything that can yield the ordered rows of cell text for one page.
pub trait RowSource {
    /// Rows in reading order.
    fn rows(&self) -> Vec<Row>;

    /// Extraction path of these rows.
    fn origin(&self) -> RowOrigin;
}

/// Rows from a grid-extracted table.
pub struct GridRows<'a> {
    grid: &'a [Vec<Option<String>>],
}

impl<'a> GridRows<'a> {
    pub fn new(grid: &'a [Vec<Option<String>>]) -> Self {
        Self { grid }
    }
}

impl RowSource for GridRows<'_> {
    fn rows(&self) -> Vec<Row> {
        self.grid
            .iter()
            .map(|cells| {
                cells
                    .iter()
                    .map(|cell| cell.as_deref().unwrap_or("").trim().to_string())
                    .collect::<Row>()
            })
            .collect()
    }

    fn origin(&self) -> RowOrigin {
        RowOrigin::Grid
    }
}

/// Rows clustered from positioned tokens.
pub struct ClusteredRows<'a> {
    tokens: &'a [Token],
    clusterer: &'a TokenClusterer,
}

impl<'a> ClusteredRows<'a> {
    pub fn new(tokens: &'a [Token], clusterer: &'a TokenClusterer) -> Self {
        Self { tokens, clusterer }
    }
}

impl RowSource for ClusteredRows<'_> {
    fn rows(&self) -> Vec<Row> {
        self.clusterer.cluster(self.tokens)
    }

    fn origin(&self) -> RowOrigin {
        RowOrigin::Clustered
    }
}

/// Rows of one page together with their origin.
#[derive(Debug, Clone)]
pub struct PageRows {
    pub number: usize,
    pub origin: RowOrigin,
    pub rows: Vec<Row>,
}

impl PageRows {
    fn from_source(number: usize, source: &dyn RowSource) -> Self {
        Self {
            number,
            origin: source.origin(),
            rows: source.rows(),
        }
    }
}

/// Pick the row source for a page: the grid table when it yields anything,
/// clustered tokens otherwise.
pub fn page_rows(page: &Page, clusterer: &TokenClusterer) -> PageRows {
    if page.has_grid() {
        return PageRows::from_source(page.number, &GridRows::new(&page.grid));
    }

    if !page.tokens.is_empty() {
        debug!(
            "Page {} has no grid table, clustering {} tokens",
            page.number,
            page.tokens.len()
        );
        return PageRows::from_source(page.number, &ClusteredRows::new(&page.tokens, clusterer));
    }

    debug!("Page {} yielded no rows", page.number);
    PageRows {
        number: page.number,
        origin: RowOrigin::Empty,
        rows: Vec::new(),
    }
}
