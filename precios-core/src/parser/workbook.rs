//! Workbook payload reading using calamine

use crate::error::ParseError;
use crate::table::CellValue;
use calamine::{Data, Reader, open_workbook_auto_from_rs};
use std::io::Cursor;

/// Read the raw cell grid of one sheet. Rows are absolute: calamine trims
/// leading blank rows/columns from its range, so the range offset is padded
/// back to keep header offsets aligned with the file as authored.
pub fn read_rows(
    bytes: &[u8],
    sheet_name: Option<&str>,
) -> Result<Vec<Vec<CellValue>>, ParseError> {
    let cursor = Cursor::new(bytes);
    let mut workbook = open_workbook_auto_from_rs(cursor).map_err(|e| ParseError::Decode {
        format: "workbook",
        message: e.to_string(),
    })?;

    let target = match sheet_name {
        Some(name) => {
            if !workbook.sheet_names().iter().any(|s| s == name) {
                return Err(ParseError::SheetNotFound(name.to_string()));
            }
            name.to_string()
        }
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ParseError::Decode {
                format: "workbook",
                message: "workbook has no sheets".to_string(),
            })?,
    };

    let range = workbook
        .worksheet_range(&target)
        .map_err(|e| ParseError::Decode {
            format: "workbook",
            message: e.to_string(),
        })?;

    let (row_offset, col_offset) = range
        .start()
        .map_or((0, 0), |(r, c)| (r as usize, c as usize));

    let mut rows: Vec<Vec<CellValue>> = vec![Vec::new(); row_offset];
    for sheet_row in range.rows() {
        let mut row = vec![CellValue::Empty; col_offset];
        row.extend(sheet_row.iter().map(convert));
        rows.push(row);
    }
    Ok(rows)
}

fn convert(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Text(b.to_string()),
        Data::Error(e) => CellValue::Text(e.to_string()),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_are_a_decode_error() {
        let err = read_rows(b"this is not a workbook", None).unwrap_err();
        assert!(matches!(err, ParseError::Decode { format: "workbook", .. }));
    }

    #[test]
    fn converts_cell_types() {
        assert_eq!(convert(&Data::Empty), CellValue::Empty);
        assert_eq!(convert(&Data::Float(3.5)), CellValue::Number(3.5));
        assert_eq!(convert(&Data::Int(4)), CellValue::Number(4.0));
        assert_eq!(
            convert(&Data::String("Pollo".to_string())),
            CellValue::Text("Pollo".to_string())
        );
    }
}
