//! CSV output: one block per profile

use std::io::Write;

use anyhow::{Context, Result};

use crate::model::CellValue;
use crate::report::{Report, Section};

use super::OutputFormatter;

/// CSV output formatter.
///
/// Each section starts with a `# <profile>` comment line followed by a
/// header record; sections are separated by a blank line.
pub struct CsvOutput;

impl CsvOutput {
    pub fn new() -> Self {
        Self
    }

    fn write_section(&self, section: &Section, writer: &mut dyn Write) -> Result<()> {
        writeln!(writer, "# {}", section.kind.name())?;

        let mut csv_writer = csv::Writer::from_writer(&mut *writer);
        csv_writer
            .write_record(section.table.columns.iter().map(|c| c.name.as_str()))
            .context("Failed to write CSV header")?;

        for row in &section.table.rows {
            let record: Vec<String> = row.cells.iter().map(raw_cell).collect();
            csv_writer
                .write_record(&record)
                .context("Failed to write CSV record")?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

impl Default for CsvOutput {
    fn default() -> Self {
        Self::new()
    }
}

/// Cell text as written to CSV: missing is an empty field, everything else
/// keeps its exact characters (the writer quotes when needed)
fn raw_cell(cell: &CellValue) -> String {
    match cell {
        CellValue::Null => String::new(),
        other => other.display().into_owned(),
    }
}

impl OutputFormatter for CsvOutput {
    fn render(&self, report: &Report, writer: &mut dyn Write) -> Result<()> {
        for (i, section) in report.sections.iter().enumerate() {
            if i > 0 {
                writeln!(writer)?;
            }
            self.write_section(section, writer)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReportKind;
    use crate::model::Table;
    use crate::profile::{profile_characters, summarize_numeric};
    use std::path::PathBuf;

    #[test]
    fn test_render_blocks() {
        let mut input = Table::with_column_names(&["v"]);
        input.push_row(vec![CellValue::Int(7)]);
        input.push_row(vec![CellValue::Int(8)]);

        let report = Report {
            source: PathBuf::from("v.csv"),
            row_count: 2,
            column_count: 1,
            sections: vec![
                Section {
                    kind: ReportKind::Characters,
                    table: profile_characters(&input).unwrap(),
                },
                Section {
                    kind: ReportKind::Stats,
                    table: summarize_numeric(&input).unwrap(),
                },
            ],
        };

        let mut out = Vec::new();
        CsvOutput::new().render(&report, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "# characters");
        assert!(lines[1].starts_with("column,numeric,letters_lowercase"));
        assert_eq!(lines[2], "v,78,,,,,,,,");
        assert_eq!(lines[3], "");
        assert_eq!(lines[4], "# stats");
        assert_eq!(lines[5], "column,min,max,mean,median,std_sample,std_pop");
        assert_eq!(lines[6], "v,7.0,8.0,7.5,7.5,0.7071067811865476,0.5");
    }
}
