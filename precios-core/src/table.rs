//! Table data structures

use serde::Serialize;
use std::fmt;

/// A single cell value. Report cells are loosely typed: whatever does not
/// parse cleanly as a number stays text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Empty,
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Parse a raw text field, inferring a number when unambiguous.
    pub fn parse(field: &str) -> Self {
        let trimmed = field.trim();
        if trimmed.is_empty() {
            return CellValue::Empty;
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => CellValue::Number(n),
            _ => CellValue::Text(field.to_string()),
        }
    }

    /// Check if the cell carries no data (empty or blank text)
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(_) => false,
        }
    }

    /// Text representation used for substring matching and display
    pub fn display_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Text(s) => s.clone(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_text())
    }
}

/// Render whole numbers without a trailing ".0"
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// A named column with its ordered cells
#[derive(Debug, Clone, Serialize)]
pub struct Column {
    pub name: String,
    pub cells: Vec<CellValue>,
}

/// A uniform row/column table. Invariants: every column holds exactly
/// `row_count` cells and column names are unique.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Build a table from header names and row-major data. Rows shorter than
    /// the header are padded with empty cells; longer rows are truncated.
    pub fn from_rows(names: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = names.len();
        let mut columns: Vec<Column> = names
            .into_iter()
            .map(|name| Column {
                name,
                cells: Vec::with_capacity(rows.len()),
            })
            .collect();

        for mut row in rows {
            row.resize(width, CellValue::Empty);
            for (col, cell) in columns.iter_mut().zip(row) {
                col.cells.push(cell);
            }
        }

        Table { columns }
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |c| c.cells.len())
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Get a column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Get one row as cell references, in column order
    pub fn row(&self, index: usize) -> Vec<&CellValue> {
        self.columns.iter().map(|c| &c.cells[index]).collect()
    }

    /// Check if every cell in a row is blank
    pub fn is_row_blank(&self, index: usize) -> bool {
        self.columns.iter().all(|c| c.cells[index].is_blank())
    }

    /// New table holding only the given rows, in the given order
    pub fn select_rows(&self, indices: &[usize]) -> Table {
        let columns = self
            .columns
            .iter()
            .map(|c| Column {
                name: c.name.clone(),
                cells: indices.iter().map(|&i| c.cells[i].clone()).collect(),
            })
            .collect();
        Table { columns }
    }

    /// Keep only the rows whose predicate returns true
    pub fn retain_rows<F: FnMut(usize) -> bool>(&mut self, mut keep: F) {
        let kept: Vec<usize> = (0..self.row_count()).filter(|&i| keep(i)).collect();
        for col in &mut self.columns {
            col.cells = kept.iter().map(|&i| col.cells[i].clone()).collect();
        }
    }

    /// Remove the columns whose predicate returns true
    pub fn drop_columns_where<F: FnMut(&Column) -> bool>(&mut self, mut drop: F) {
        self.columns.retain(|c| !drop(c));
    }

    pub(crate) fn set_column_names(&mut self, names: Vec<String>) {
        debug_assert_eq!(names.len(), self.columns.len());
        for (col, name) in self.columns.iter_mut().zip(names) {
            col.name = name;
        }
    }
}
