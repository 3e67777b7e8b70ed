//! Flat, header-keyed view of one worksheet.

use serde::{Deserialize, Serialize};

use crate::cell::Cell;

static EMPTY: Cell = Cell::Empty;

/// A worksheet as a header row plus data rows.
///
/// This is the shape visits take once they leave the typed world: the
/// in-memory sink stores it, the xlsx reader produces it, and the verifier
/// consumes it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SheetRows {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl SheetRows {
    pub fn new(name: impl Into<String>, headers: Vec<String>) -> Self {
        Self {
            name: name.into(),
            headers,
            rows: Vec::new(),
        }
    }

    /// Index of the column labelled `header`.
    pub fn column(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }

    /// Cell at (`row`, `header`), with `row` counted from the first data row.
    /// Short rows read as empty.
    pub fn cell(&self, row: usize, header: &str) -> Option<&Cell> {
        let col = self.column(header)?;
        self.rows.get(row).map(|r| r.get(col).unwrap_or(&EMPTY))
    }

    /// Number of spreadsheet rows including the header.
    pub fn total_rows(&self) -> usize {
        self.rows.len() + 1
    }
}
