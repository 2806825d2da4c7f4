//! JSON output format

use std::io::Write;

use anyhow::Result;
use indexmap::IndexMap;
use serde::Serialize;

use crate::model::{CellValue, Table};
use crate::report::Report;

use super::OutputFormatter;

/// JSON output formatter
pub struct JsonOutput {
    pretty: bool,
}

impl JsonOutput {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

/// One profile row keyed by output column, in column order
type JsonRow = IndexMap<String, serde_json::Value>;

#[derive(Serialize)]
struct JsonReport {
    source: String,
    row_count: usize,
    column_count: usize,
    reports: IndexMap<&'static str, Vec<JsonRow>>,
}

fn cell_value_to_json(value: &CellValue) -> serde_json::Value {
    match value {
        CellValue::Null => serde_json::Value::Null,
        CellValue::Bool(b) => serde_json::Value::Bool(*b),
        CellValue::Int(i) => serde_json::json!(*i),
        // NaN and infinities have no JSON number form and become null
        CellValue::Float(f) => serde_json::json!(*f),
        CellValue::String(s) => serde_json::Value::String(s.to_string()),
        CellValue::Date(d) => serde_json::Value::String(d.to_string()),
        CellValue::DateTime(dt) => serde_json::Value::String(dt.to_string()),
    }
}

fn table_to_rows(table: &Table) -> Vec<JsonRow> {
    table
        .rows
        .iter()
        .map(|row| {
            table
                .columns
                .iter()
                .zip(&row.cells)
                .map(|(column, cell)| (column.name.clone(), cell_value_to_json(cell)))
                .collect()
        })
        .collect()
}

impl OutputFormatter for JsonOutput {
    fn render(&self, report: &Report, writer: &mut dyn Write) -> Result<()> {
        let output = JsonReport {
            source: report.source.display().to_string(),
            row_count: report.row_count,
            column_count: report.column_count,
            reports: report
                .sections
                .iter()
                .map(|section| (section.kind.name(), table_to_rows(&section.table)))
                .collect(),
        };

        if self.pretty {
            serde_json::to_writer_pretty(&mut *writer, &output)?;
        } else {
            serde_json::to_writer(&mut *writer, &output)?;
        }
        writeln!(writer)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReportKind;
    use crate::profile::profile_uniqueness;
    use crate::report::Section;
    use std::path::PathBuf;

    #[test]
    fn test_render_keeps_column_order() {
        let mut input = Table::with_column_names(&["tag"]);
        input.push_row(vec![CellValue::from("a")]);
        input.push_row(vec![CellValue::from("a")]);

        let report = Report {
            source: PathBuf::from("tags.csv"),
            row_count: 2,
            column_count: 1,
            sections: vec![Section {
                kind: ReportKind::Nullique,
                table: profile_uniqueness(&input).unwrap(),
            }],
        };

        let mut out = Vec::new();
        JsonOutput::compact().render(&report, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains(
            r#"{"column":"tag","is_unique":false,"distinct_count":1,"null_type":"filled"}"#
        ));

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["source"], "tags.csv");
        assert_eq!(value["reports"]["nullique"][0]["distinct_count"], 1);
    }

    #[test]
    fn test_nan_becomes_null() {
        assert_eq!(cell_value_to_json(&CellValue::Float(f64::NAN)), serde_json::Value::Null);
    }
}
