//! Row/column cleanup and canonical renaming

use crate::error::SchemaError;
use crate::table::Table;
use std::collections::BTreeSet;

/// Normalization knobs, taken from [`crate::config::ReportConfig`]
#[derive(Debug, Clone, Default)]
pub struct NormalizeOptions {
    pub drop_empty_rows: bool,
    pub drop_empty_columns: bool,
    /// Columns removed by name regardless of content, used to strip
    /// spreadsheet-export placeholders such as `Unnamed: 7`
    pub drop_columns: BTreeSet<String>,
    /// Positional renames applied after dropping; must match the post-drop
    /// column count exactly
    pub column_renames: Option<Vec<String>>,
}

/// Normalize in place: drop all-blank rows, drop all-blank and explicitly
/// listed columns, then apply the positional renames. A rename list whose
/// length does not match the surviving columns is a configuration defect
/// and fails before any name is touched.
pub fn normalize(table: &mut Table, options: &NormalizeOptions) -> Result<(), SchemaError> {
    if options.drop_empty_rows {
        let blanks: Vec<bool> = (0..table.row_count())
            .map(|i| table.is_row_blank(i))
            .collect();
        table.retain_rows(|i| !blanks[i]);
    }

    table.drop_columns_where(|col| {
        if options.drop_columns.contains(&col.name) {
            return true;
        }
        options.drop_empty_columns && col.cells.iter().all(|c| c.is_blank())
    });

    if let Some(renames) = &options.column_renames {
        if renames.len() != table.column_count() {
            return Err(SchemaError::RenameCountMismatch {
                expected: table.column_count(),
                provided: renames.len(),
            });
        }
        table.set_column_names(renames.clone());
    }

    Ok(())
}
