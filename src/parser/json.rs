//! JSON array and newline-delimited JSON parser

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{bail, Context, Result};
use indexmap::IndexSet;
use serde_json::Value;

use crate::config::Config;
use crate::model::{CellValue, Column, Table};

use super::{detect_format, Parser};

/// Parser for JSON files
pub struct JsonParser;

impl JsonParser {
    /// Build a table from already decoded records.
    ///
    /// Columns are the union of object keys in first-seen order; a key absent
    /// from an object reads as missing.
    pub fn from_values(items: Vec<Value>) -> Result<Table> {
        if items.is_empty() {
            bail!("JSON input contains no records");
        }

        // Collect all unique keys across all objects to build column list
        let mut column_names: IndexSet<String> = IndexSet::new();
        for item in &items {
            if let Value::Object(obj) = item {
                for key in obj.keys() {
                    column_names.insert(key.clone());
                }
            }
        }
        if column_names.is_empty() {
            column_names.insert("value".to_string());
        }

        let columns: Vec<Column> = column_names
            .iter()
            .enumerate()
            .map(|(i, name)| Column::new(name.clone(), i))
            .collect();

        let mut table = Table::new(columns);

        for (line_num, item) in items.iter().enumerate() {
            let cells = match item {
                Value::Object(obj) => column_names
                    .iter()
                    .map(|key| json_value_to_cell(obj.get(key)))
                    .collect(),
                _ => {
                    // Non-object item: put in first column
                    let mut cells = vec![json_value_to_cell(Some(item))];
                    cells.resize(column_names.len(), CellValue::Null);
                    cells
                }
            };

            table.add_row(cells, line_num + 1);
        }

        Ok(table)
    }

    fn read_lines(path: &Path) -> Result<Vec<Value>> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open JSON file: {}", path.display()))?;

        let mut items = Vec::new();
        for (line_num, line) in BufReader::new(file).lines().enumerate() {
            let line = line.context("Failed to read JSON line")?;
            if line.trim().is_empty() {
                continue;
            }
            let value: Value = serde_json::from_str(&line)
                .with_context(|| format!("Failed to parse JSON on line {}", line_num + 1))?;
            items.push(value);
        }
        Ok(items)
    }

    fn read_document(path: &Path) -> Result<Vec<Value>> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open JSON file: {}", path.display()))?;
        let value: Value = serde_json::from_reader(BufReader::new(file))
            .context("Failed to parse JSON file")?;

        // Handle both arrays and single objects
        match value {
            Value::Array(arr) => Ok(arr),
            Value::Object(_) => Ok(vec![value]),
            _ => bail!("JSON must be an array or object"),
        }
    }
}

impl Parser for JsonParser {
    fn parse(&self, path: &Path, _config: &Config) -> Result<Table> {
        let line_delimited = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => matches!(ext.to_lowercase().as_str(), "jsonl" | "ndjson"),
            None => detect_format(path) == Some("jsonl"),
        };

        let items = if line_delimited {
            Self::read_lines(path)?
        } else {
            Self::read_document(path)?
        };
        Self::from_values(items)
    }

    fn supports_extension(&self, ext: &str) -> bool {
        matches!(ext.to_lowercase().as_str(), "json" | "jsonl" | "ndjson")
    }
}

fn json_value_to_cell(value: Option<&Value>) -> CellValue {
    match value {
        None | Some(Value::Null) => CellValue::Null,
        Some(Value::Bool(b)) => CellValue::Bool(*b),
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                CellValue::Int(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(Cow::Owned(n.to_string()))
            }
        }
        Some(Value::String(s)) => CellValue::String(Cow::Owned(s.clone())),
        // Nested structures are profiled through their JSON text
        Some(nested @ (Value::Array(_) | Value::Object(_))) => {
            CellValue::String(Cow::Owned(nested.to_string()))
        }
    }
}
