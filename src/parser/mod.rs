//! Parser layer for reading various tabular data formats

mod csv;
mod excel;
mod json;
mod parquet;

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use anyhow::{bail, Result};

use crate::config::Config;
use crate::model::{CellValue, Table};

pub use self::csv::CsvParser;
pub use self::excel::ExcelParser;
pub use self::json::JsonParser;
pub use self::parquet::ParquetParser;

/// Trait for parsing tabular data files
pub trait Parser: Send + Sync {
    /// Parse a file and return a Table
    fn parse(&self, path: &Path, config: &Config) -> Result<Table>;

    /// Check if this parser can handle the given file extension
    fn supports_extension(&self, ext: &str) -> bool;
}

/// Factory for creating parsers based on file extension
pub struct ParserFactory {
    parsers: Vec<Box<dyn Parser>>,
}

impl Default for ParserFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ParserFactory {
    /// Create a new parser factory with all supported parsers
    pub fn new() -> Self {
        Self {
            parsers: vec![
                Box::new(CsvParser),
                Box::new(ExcelParser),
                Box::new(ParquetParser),
                Box::new(JsonParser),
            ],
        }
    }

    /// Get a parser for the given file path.
    ///
    /// Files without an extension are sniffed with [`detect_format`].
    pub fn get_parser(&self, path: &Path) -> Result<&dyn Parser> {
        let ext = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => ext.to_lowercase(),
            None => detect_format(path).unwrap_or("csv").to_string(),
        };

        for parser in &self.parsers {
            if parser.supports_extension(&ext) {
                return Ok(parser.as_ref());
            }
        }

        bail!("Unsupported file format: {}", ext)
    }

    /// Parse a file using the appropriate parser.
    ///
    /// Columns whose kind was inferred from the data and that hold only
    /// missing cells come back as `Float`.
    pub fn parse(&self, path: &Path, config: &Config) -> Result<Table> {
        let parser = self.get_parser(path)?;
        let mut table = parser.parse(path, config)?;
        table.type_missing_columns_as_float();
        Ok(table)
    }
}

/// Datetime layouts tried in order by [`parse_temporal`]
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Read `text` as an ISO date or datetime
pub(crate) fn parse_temporal(text: &str) -> Option<CellValue> {
    if let Ok(date) = chrono::NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(CellValue::Date(date));
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| chrono::NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(CellValue::DateTime)
}

/// Detect file format from content (for files without extension)
pub fn detect_format(path: &Path) -> Option<&'static str> {
    let file = File::open(path).ok()?;
    let mut reader = BufReader::new(file);
    let mut buffer = [0u8; 8];
    let bytes_read = reader.read(&mut buffer).ok()?;

    if bytes_read < 4 {
        return None;
    }

    // Check for Parquet magic bytes
    if &buffer[0..4] == b"PAR1" {
        return Some("parquet");
    }

    // Check for Excel ZIP format (xlsx)
    if &buffer[0..4] == b"PK\x03\x04" {
        return Some("xlsx");
    }

    // Check for old Excel format (xls)
    if &buffer[0..4] == b"\xD0\xCF\x11\xE0" {
        return Some("xls");
    }

    // Try to detect JSON
    reader.seek_relative(-(bytes_read as i64)).ok()?;
    let mut line = String::new();
    reader.read_line(&mut line).ok()?;
    let trimmed = line.trim_start();
    if trimmed.starts_with('[') {
        return Some("json");
    }
    if trimmed.starts_with('{') {
        return Some("jsonl");
    }

    Some("csv")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    #[test]
    fn test_parser_selection_by_extension() {
        let factory = ParserFactory::new();
        assert!(factory.get_parser(Path::new("data.CSV")).is_ok());
        assert!(factory.get_parser(Path::new("data.tsv")).is_ok());
        assert!(factory.get_parser(Path::new("data.ndjson")).is_ok());
        assert!(factory.get_parser(Path::new("book.xlsx")).is_ok());
        assert!(factory.get_parser(Path::new("part.parquet")).is_ok());
        assert!(factory.get_parser(Path::new("notes.pdf")).is_err());
    }

    #[test]
    fn test_detect_format() {
        let dir = tempfile::tempdir().unwrap();

        let write = |name: &str, content: &[u8]| -> PathBuf {
            let path = dir.path().join(name);
            File::create(&path).unwrap().write_all(content).unwrap();
            path
        };

        assert_eq!(detect_format(&write("a", b"PAR1....")), Some("parquet"));
        assert_eq!(detect_format(&write("b", b"[{\"a\": 1}]")), Some("json"));
        assert_eq!(detect_format(&write("c", b"{\"a\": 1}\n{\"a\": 2}\n")), Some("jsonl"));
        assert_eq!(detect_format(&write("d", b"a,b\n1,2\n")), Some("csv"));
    }

    #[test]
    fn test_parse_file_without_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records");
        std::fs::write(&path, "{\"x\": 1}\n{\"x\": 2}\n").unwrap();

        let table = ParserFactory::new().parse(&path, &Config::default()).unwrap();
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_all_missing_csv_column_is_numeric() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gaps.csv");
        std::fs::write(&path, "a,b\n1,\n2,NA\n").unwrap();

        let table = ParserFactory::new().parse(&path, &Config::default()).unwrap();
        assert_eq!(table.columns[1].cell_type, crate::model::CellType::Float);

        let stats = crate::profile::summarize_numeric(&table).unwrap();
        assert_eq!(stats.row_count(), 2);
        assert_eq!(stats.value(1, "column"), Some(&CellValue::from("b")));
        assert_eq!(stats.value(1, "mean"), Some(&CellValue::Null));
    }

    #[test]
    fn test_parse_temporal() {
        assert!(matches!(parse_temporal("2024-01-15"), Some(CellValue::Date(_))));
        assert!(matches!(parse_temporal("2024-01-15T08:00:00"), Some(CellValue::DateTime(_))));
        assert!(matches!(parse_temporal("2024-01-15 08:00:00.250"), Some(CellValue::DateTime(_))));
        assert_eq!(parse_temporal("15/01/2024"), None);
    }
}
