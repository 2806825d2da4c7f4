//! Boxed-table terminal output

use std::io::Write;

use anyhow::Result;
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::model::Table;
use crate::report::{Report, Section};

use super::{format_cell, OutputFormatter};

/// Terminal output: one box-drawn table per section
pub struct TerminalOutput;

impl TerminalOutput {
    pub fn new() -> Self {
        Self
    }

    fn write_header(&self, report: &Report, writer: &mut dyn Write) -> Result<()> {
        writeln!(writer, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(
            writer,
            " dataprofile: {} ({} rows × {} columns)",
            report.source.display(),
            report.row_count,
            report.column_count
        )?;
        writeln!(writer, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(writer)?;
        Ok(())
    }

    fn write_section(&self, section: &Section, writer: &mut dyn Write) -> Result<()> {
        writeln!(writer, "{}:", section.kind.title())?;
        if section.table.row_count() == 0 {
            writeln!(writer, "  (no columns to report)")?;
        } else {
            writeln!(writer, "{}", build_table(&section.table))?;
        }
        writeln!(writer)?;
        Ok(())
    }
}

impl Default for TerminalOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for TerminalOutput {
    fn render(&self, report: &Report, writer: &mut dyn Write) -> Result<()> {
        self.write_header(report, writer)?;

        if report.sections.is_empty() {
            writeln!(writer, "No profiles requested.")?;
            return Ok(());
        }

        for section in &report.sections {
            self.write_section(section, writer)?;
        }

        Ok(())
    }
}

/// Build a formatted table from a profile table
fn build_table(table: &Table) -> String {
    let mut builder = Builder::default();
    builder.push_record(table.columns.iter().map(|c| c.name.clone()));

    for row in &table.rows {
        builder.push_record(
            row.cells
                .iter()
                .zip(&table.columns)
                .map(|(cell, column)| format_cell(cell, column.cell_type)),
        );
    }

    let mut rendered = builder.build();
    rendered.with(Style::modern());
    rendered.to_string()
}
