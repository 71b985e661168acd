//! Delimited-text payload reading using the csv crate

use crate::error::ParseError;
use crate::table::CellValue;

/// Read comma-delimited text into a raw cell grid with standard quoting.
/// Header handling is done by the caller, so every record is a plain row
/// here; ragged rows are allowed and padded later.
pub fn read_rows(bytes: &[u8]) -> Result<Vec<Vec<CellValue>>, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ParseError::Decode {
            format: "delimited-text",
            message: e.to_string(),
        })?;
        rows.push(record.iter().map(CellValue::parse).collect());
    }
    Ok(rows)
}
