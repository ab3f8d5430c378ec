//! Table structures recovered from a saved presentation.

use serde::{Deserialize, Serialize};

/// Horizontal alignment for table cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellAlignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl CellAlignment {
    /// Parse a DrawingML `algn` attribute value.
    pub fn from_algn(value: &str) -> Self {
        match value {
            "ctr" => CellAlignment::Center,
            "r" => CellAlignment::Right,
            "just" => CellAlignment::Justify,
            _ => CellAlignment::Left,
        }
    }
}

/// A cell in a table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cell {
    /// Cell text; paragraphs joined with `\n`
    #[serde(default)]
    pub text: String,

    /// Horizontal alignment of the first paragraph
    #[serde(default, skip_serializing_if = "is_default_cell_alignment")]
    pub alignment: CellAlignment,

    /// Whether the first run is bold
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub bold: bool,

    /// Font size of the first run in points
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,

    /// Solid background colour (hex `RRGGBB`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
}

fn is_default_cell_alignment(a: &CellAlignment) -> bool {
    *a == CellAlignment::Left
}

impl Cell {
    /// Create a new empty cell.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cell with text content.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::new()
        }
    }

    /// Get the plain text content.
    pub fn plain_text(&self) -> &str {
        &self.text
    }

    /// Check if this cell is empty.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// A row in a table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Row {
    /// Cells in this row
    #[serde(default)]
    pub cells: Vec<Cell>,

    /// Row height in EMU
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<i64>,
}

impl Row {
    /// Create a new empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a cell to this row.
    pub fn add_cell(&mut self, cell: Cell) {
        self.cells.push(cell);
    }

    /// Get the number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the row is empty.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Texts of all cells in order.
    pub fn texts(&self) -> Vec<&str> {
        self.cells.iter().map(|c| c.plain_text()).collect()
    }
}

/// A table read from a slide's graphic frame.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Table {
    /// Shape name (`cNvPr/@name`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Rows in this table
    #[serde(default)]
    pub rows: Vec<Row>,

    /// Column widths in EMU
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub column_widths: Vec<i64>,
}

impl Table {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a row to this table.
    pub fn add_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns (from the first row).
    pub fn column_count(&self) -> usize {
        self.rows.first().map(|r| r.len()).unwrap_or(0)
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell at `(row, col)`.
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.cells.get(col))
    }

    /// Cell texts as a grid.
    pub fn texts(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|r| r.cells.iter().map(|c| c.text.clone()).collect())
            .collect()
    }

    /// Get plain text representation, tab-separated.
    pub fn plain_text(&self) -> String {
        let mut text = String::new();
        for row in &self.rows {
            text.push_str(&row.texts().join("\t"));
            text.push('\n');
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_creation() {
        let cell = Cell::with_text("Hello");
        assert_eq!(cell.plain_text(), "Hello");
        assert!(!cell.is_empty());
        assert!(Cell::with_text("  ").is_empty());
    }

    #[test]
    fn test_column_count_is_cell_count() {
        let mut table = Table::new();
        let mut row = Row::new();
        row.add_cell(Cell::with_text("Merged"));
        row.add_cell(Cell::with_text("Single"));
        table.add_row(row);
        assert_eq!(table.column_count(), 2);
        assert_eq!(Table::new().column_count(), 0);
    }

    #[test]
    fn test_table_access() {
        let mut table = Table::new();
        for texts in [["Name", "Value"], ["foo", "bar"]] {
            let mut row = Row::new();
            for t in texts {
                row.add_cell(Cell::with_text(t));
            }
            table.add_row(row);
        }

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.cell(1, 0).map(|c| c.plain_text()), Some("foo"));
        assert_eq!(table.texts()[0], vec!["Name", "Value"]);
        assert_eq!(table.plain_text(), "Name\tValue\nfoo\tbar\n");
    }

    #[test]
    fn test_alignment_from_algn() {
        assert_eq!(CellAlignment::from_algn("ctr"), CellAlignment::Center);
        assert_eq!(CellAlignment::from_algn("r"), CellAlignment::Right);
        assert_eq!(CellAlignment::from_algn("l"), CellAlignment::Left);
    }
}
