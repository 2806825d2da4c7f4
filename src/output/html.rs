//! HTML report output

use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;
use tera::Tera;

use crate::report::Report;

use super::{format_cell, OutputFormatter};

/// Standalone HTML page, rendered through a Tera template with autoescaping
pub struct HtmlOutput;

impl HtmlOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HtmlOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct PageView {
    source: String,
    row_count: usize,
    column_count: usize,
    sections: Vec<SectionView>,
}

#[derive(Serialize)]
struct SectionView {
    name: &'static str,
    title: &'static str,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl PageView {
    fn from_report(report: &Report) -> Self {
        let sections = report
            .sections
            .iter()
            .map(|section| SectionView {
                name: section.kind.name(),
                title: section.kind.title(),
                headers: section.table.columns.iter().map(|c| c.name.clone()).collect(),
                rows: section
                    .table
                    .rows
                    .iter()
                    .map(|row| {
                        row.cells
                            .iter()
                            .zip(&section.table.columns)
                            .map(|(cell, column)| format_cell(cell, column.cell_type))
                            .collect()
                    })
                    .collect(),
            })
            .collect();

        Self {
            source: report.source.display().to_string(),
            row_count: report.row_count,
            column_count: report.column_count,
            sections,
        }
    }
}

impl OutputFormatter for HtmlOutput {
    fn render(&self, report: &Report, writer: &mut dyn Write) -> Result<()> {
        let context = tera::Context::from_serialize(PageView::from_report(report))
            .context("Failed to build HTML template context")?;
        let page =
            Tera::one_off(TEMPLATE, &context, true).context("Failed to render HTML report")?;
        writer.write_all(page.as_bytes())?;
        Ok(())
    }
}

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>dataprofile: {{ source }}</title>
  <style>
    :root {
      --bg: #1a1b26;
      --fg: #c0caf5;
      --muted: #565f89;
      --accent: #7aa2f7;
      --border: #292e42;
    }
    body { background: var(--bg); color: var(--fg); font-family: ui-monospace, SFMono-Regular, Menlo, monospace; margin: 2rem; }
    h1 { color: var(--accent); margin-bottom: 0.25rem; }
    .files { color: var(--muted); margin-top: 0; }
    .section { margin-top: 2rem; }
    table { border-collapse: collapse; }
    th, td { border: 1px solid var(--border); padding: 0.3rem 0.6rem; text-align: left; white-space: pre; }
    th { color: var(--accent); }
    .empty { color: var(--muted); }
    .footer { margin-top: 3rem; color: var(--muted); font-size: 0.8rem; }
  </style>
</head>
<body>
  <div class="header">
    <h1>dataprofile</h1>
    <p class="files">{{ source }} ({{ row_count }} rows &times; {{ column_count }} columns)</p>
  </div>
{% for section in sections %}
  <div class="section" id="{{ section.name }}">
    <h2>{{ section.title }}</h2>
{% if section.rows | length == 0 %}
    <p class="empty">No columns to report.</p>
{% else %}
    <table>
      <tr>{% for header in section.headers %}<th>{{ header }}</th>{% endfor %}</tr>
{% for row in section.rows %}
      <tr>{% for cell in row %}<td>{{ cell }}</td>{% endfor %}</tr>
{% endfor %}
    </table>
{% endif %}
  </div>
{% endfor %}
  <div class="footer">
    <p>Generated by dataprofile</p>
  </div>
</body>
</html>
"#;
