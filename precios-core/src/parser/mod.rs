//! Payload decoding into a uniform table shape

use crate::error::ParseError;
use crate::fetch::{PayloadFormat, RawPayload};
use crate::table::{CellValue, Table};

pub mod delimited;
pub mod workbook;

/// Caller-supplied parsing knobs. The header offset is deployment
/// configuration, never a constant baked into logic: the ministry file
/// carries a title banner whose height has changed between report layouts.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions<'a> {
    /// Leading rows (titles, logos) discarded before the header row
    pub header_row_offset: usize,
    /// Workbook sheet to read; `None` means the first sheet
    pub sheet_name: Option<&'a str>,
}

/// A decoded sheet: the table proper plus the preamble rows that preceded
/// the header (kept so the report's printed date can be recovered).
#[derive(Debug, Clone)]
pub struct ParsedSheet {
    pub table: Table,
    pub preamble: Vec<Vec<CellValue>>,
}

/// Decode a payload as its declared format and split it into preamble,
/// header and data rows.
pub fn parse(payload: &RawPayload, options: &ParseOptions) -> Result<ParsedSheet, ParseError> {
    let rows = match payload.format {
        PayloadFormat::Workbook => workbook::read_rows(&payload.bytes, options.sheet_name)?,
        PayloadFormat::DelimitedText => delimited::read_rows(&payload.bytes)?,
    };
    assemble(rows, options.header_row_offset)
}

fn assemble(mut rows: Vec<Vec<CellValue>>, offset: usize) -> Result<ParsedSheet, ParseError> {
    if offset >= rows.len() {
        return Err(ParseError::HeaderOffsetOutOfRange {
            offset,
            rows: rows.len(),
        });
    }

    let mut data = rows.split_off(offset);
    let preamble = rows;
    let header = data.remove(0);
    let names = header_names(&header);

    Ok(ParsedSheet {
        table: Table::from_rows(names, data),
        preamble,
    })
}

/// Turn the header row into unique column names. Blank header cells get a
/// `Unnamed: {index}` placeholder (the name the normalizer's drop list
/// targets) and duplicates get `.1`, `.2` suffixes.
fn header_names(header: &[CellValue]) -> Vec<String> {
    let mut seen: std::collections::HashMap<String, usize> = std::collections::HashMap::new();
    header
        .iter()
        .enumerate()
        .map(|(index, cell)| {
            let base = if cell.is_blank() {
                format!("Unnamed: {}", index)
            } else {
                cell.display_text().trim().to_string()
            };
            let count = seen.entry(base.clone()).or_insert(0);
            let name = if *count == 0 {
                base
            } else {
                format!("{}.{}", base, count)
            };
            *count += 1;
            name
        })
        .collect()
}
