//! Excel file parser (xlsx, xls, ods)

use std::borrow::Cow;
use std::path::Path;

use anyhow::{bail, Context, Result};
use calamine::{open_workbook_auto, Data, Range, Reader};

use crate::config::Config;
use crate::model::{CellValue, Column, Table};

use super::{parse_temporal, Parser};

/// Parser for Excel files
pub struct ExcelParser;

impl Parser for ExcelParser {
    fn parse(&self, path: &Path, config: &Config) -> Result<Table> {
        let mut workbook = open_workbook_auto(path)
            .with_context(|| format!("Failed to open Excel file: {}", path.display()))?;

        let sheet_name = match config.sheet_name {
            Some(ref name) => name.clone(),
            None => workbook
                .sheet_names()
                .first()
                .cloned()
                .context("No sheets found in workbook")?,
        };

        let range: Range<Data> = workbook
            .worksheet_range(&sheet_name)
            .with_context(|| format!("Failed to read sheet: {}", sheet_name))?;

        parse_range(&range, config)
    }

    fn supports_extension(&self, ext: &str) -> bool {
        matches!(ext.to_lowercase().as_str(), "xlsx" | "xls" | "ods" | "xlsm")
    }
}

/// Turn a sheet range into a table; the first row is the header
fn parse_range(range: &Range<Data>, config: &Config) -> Result<Table> {
    let (row_count, col_count) = range.get_size();

    if row_count == 0 {
        bail!("Empty sheet");
    }

    let header_row = range.rows().next().context("No header row found")?;
    let columns: Vec<Column> = header_row
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let name = cell_to_string(cell);
            Column::new(if name.is_empty() { format!("Column{}", i + 1) } else { name }, i)
        })
        .collect();

    let mut table = Table::new(columns);
    let width = table.column_count();

    for (line_num, row) in range.rows().skip(1).enumerate() {
        let mut cells: Vec<CellValue> = row
            .iter()
            .take(col_count)
            .map(|cell| convert_cell(cell, config))
            .collect();
        cells.resize(width, CellValue::Null);

        table.add_row(cells, line_num + 2); // +2 for 1-indexing and header
    }

    Ok(table)
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.to_string(),
        Data::Error(e) => format!("#{:?}", e),
    }
}

fn convert_cell(cell: &Data, config: &Config) -> CellValue {
    match cell {
        Data::Empty => CellValue::Null,
        // Whitespace-only text is data here, not a missing value
        Data::String(s) if config.is_na(s) => CellValue::Null,
        Data::String(s) => CellValue::String(Cow::Owned(s.clone())),
        // Whole numbers stored as floats read back as integers
        Data::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => CellValue::Int(*f as i64),
        Data::Float(f) => CellValue::Float(*f),
        Data::Int(i) => CellValue::Int(*i),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(_) | Data::DateTimeIso(_) => {
            let text = cell_to_string(cell);
            parse_temporal(&text).unwrap_or(CellValue::String(Cow::Owned(text)))
        }
        Data::DurationIso(_) | Data::Error(_) => CellValue::String(Cow::Owned(cell_to_string(cell))),
    }
}
