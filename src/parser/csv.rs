//! CSV/TSV file parser

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::model::{CellValue, Column, Table};

use super::{parse_temporal, Parser};

/// Parser for delimited text files
pub struct CsvParser;

impl CsvParser {
    /// Read a delimited table from any reader; the first record is the header
    pub fn parse_reader<R: Read>(reader: R, delimiter: u8, config: &Config) -> Result<Table> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(reader);

        // Read headers
        let headers = csv_reader
            .headers()
            .context("Failed to read CSV headers")?
            .clone();

        let columns: Vec<Column> = headers
            .iter()
            .enumerate()
            .map(|(i, name)| Column::new(name.to_string(), i))
            .collect();

        let mut table = Table::new(columns);
        let width = table.column_count();

        for (line_num, result) in csv_reader.records().enumerate() {
            let record = result.with_context(|| format!("Failed to read CSV row {}", line_num + 2))?; // +2 for 1-indexing and header

            let mut cells: Vec<CellValue> = record
                .iter()
                .map(|s| parse_cell_value(s, config))
                .collect();

            // Short rows are padded with nulls, long rows lose the extra fields
            cells.resize(width, CellValue::Null);

            table.add_row(cells, line_num + 2);
        }

        Ok(table)
    }
}

impl Parser for CsvParser {
    fn parse(&self, path: &Path, config: &Config) -> Result<Table> {
        let file =
            File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
        let reader = BufReader::new(file);

        let is_tsv = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("tsv"));
        let delimiter = if is_tsv { b'\t' } else { b',' };

        Self::parse_reader(reader, delimiter, config)
    }

    fn supports_extension(&self, ext: &str) -> bool {
        matches!(ext.to_lowercase().as_str(), "csv" | "tsv" | "txt")
    }
}

/// Parse a raw field into a CellValue with type inference.
///
/// Typed values are recognised on the trimmed text, but strings keep their
/// original whitespace.
fn parse_cell_value(s: &str, config: &Config) -> CellValue {
    if config.is_na(s) {
        return CellValue::Null;
    }

    let trimmed = s.trim();
    if trimmed.is_empty() {
        return CellValue::String(Cow::Owned(s.to_string()));
    }

    match trimmed {
        "true" | "True" | "TRUE" => return CellValue::Bool(true),
        "false" | "False" | "FALSE" => return CellValue::Bool(false),
        _ => {}
    }

    if let Ok(i) = trimmed.parse::<i64>() {
        return CellValue::Int(i);
    }

    // Rust also parses "inf"/"infinity"; only accept spellings that start like a number
    if trimmed.starts_with(|c: char| c.is_ascii_digit() || matches!(c, '-' | '+' | '.')) {
        if let Ok(f) = trimmed.parse::<f64>() {
            return CellValue::Float(f);
        }
    }

    if let Some(temporal) = parse_temporal(trimmed) {
        return temporal;
    }

    CellValue::String(Cow::Owned(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CellType;

    #[test]
    fn test_parse_cell_value() {
        let config = Config::default();
        assert_eq!(parse_cell_value("", &config), CellValue::Null);
        assert_eq!(parse_cell_value("NA", &config), CellValue::Null);
        assert_eq!(parse_cell_value("true", &config), CellValue::Bool(true));
        assert_eq!(parse_cell_value("FALSE", &config), CellValue::Bool(false));
        assert_eq!(parse_cell_value("42", &config), CellValue::Int(42));
        assert_eq!(parse_cell_value(" 42 ", &config), CellValue::Int(42));
        assert_eq!(parse_cell_value("3.14", &config), CellValue::Float(3.14));
        assert_eq!(parse_cell_value("inf", &config), CellValue::from("inf"));
        assert_eq!(parse_cell_value("  ", &config), CellValue::from("  "));
        assert_eq!(parse_cell_value(" hi ", &config), CellValue::from(" hi "));
        assert!(matches!(
            parse_cell_value("2024-01-31", &config),
            CellValue::Date(_)
        ));
    }

    #[test]
    fn test_custom_na_values() {
        let config = Config::default().with_na_values(vec!["-".to_string()]);
        assert_eq!(parse_cell_value("-", &config), CellValue::Null);
        assert_eq!(parse_cell_value("", &config), CellValue::from(""));
    }

    #[test]
    fn test_parse_reader() {
        let data = "id,name,score\n1,alice,0.5\n2,,1\n3,bob\n";
        let table = CsvParser::parse_reader(data.as_bytes(), b',', &Config::default()).unwrap();

        assert_eq!(table.row_count(), 3);
        assert_eq!(table.columns[0].cell_type, CellType::Int);
        assert_eq!(table.columns[1].cell_type, CellType::String);
        assert_eq!(table.columns[2].cell_type, CellType::Float);
        assert_eq!(table.value(1, "name"), Some(&CellValue::Null));
        assert_eq!(table.value(2, "score"), Some(&CellValue::Null));
        assert_eq!(table.rows[2].source_line, 4);
    }

    #[test]
    fn test_parse_tab_delimited() {
        let data = "a\tb\nx y\t1\n";
        let table = CsvParser::parse_reader(data.as_bytes(), b'\t', &Config::default()).unwrap();
        assert_eq!(table.value(0, "a"), Some(&CellValue::from("x y")));
        assert_eq!(table.value(0, "b"), Some(&CellValue::Int(1)));
    }
}
