//! Case-insensitive substring search over a normalized table

use crate::table::Table;

/// Return the rows whose cells contain `query`, preserving the original row
/// order (a stable filter, not a relevance sort).
///
/// With a `target_column` only that column's text is matched; otherwise any
/// cell in the row may match. Non-text cells are matched on their display
/// text. An empty query returns the table unchanged, and a query matching
/// nothing returns an empty table rather than an error. A target column the
/// table does not have matches no rows.
pub fn filter(table: &Table, query: &str, target_column: Option<&str>) -> Table {
    if query.is_empty() {
        return table.clone();
    }
    let needle = query.to_lowercase();

    let indices: Vec<usize> = match target_column {
        Some(name) => match table.column(name) {
            Some(column) => column
                .cells
                .iter()
                .enumerate()
                .filter(|(_, cell)| cell.display_text().to_lowercase().contains(&needle))
                .map(|(i, _)| i)
                .collect(),
            None => Vec::new(),
        },
        None => (0..table.row_count())
            .filter(|&i| {
                table
                    .row(i)
                    .iter()
                    .any(|cell| cell.display_text().to_lowercase().contains(&needle))
            })
            .collect(),
    };

    table.select_rows(&indices)
}
