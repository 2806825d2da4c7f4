//! Output formatting for profiling reports

mod csv;
mod html;
mod json;
mod terminal;

use std::io::Write;

use anyhow::Result;

use crate::config::{Config, OutputFormat};
use crate::model::{CellType, CellValue};
use crate::report::Report;

pub use self::csv::CsvOutput;
pub use html::HtmlOutput;
pub use json::JsonOutput;
pub use terminal::TerminalOutput;

/// Trait for output formatters
pub trait OutputFormatter {
    /// Render a report to a writer
    fn render(&self, report: &Report, writer: &mut dyn Write) -> Result<()>;
}

/// Factory for creating output formatters
pub struct OutputFactory;

impl OutputFactory {
    /// Create an output formatter based on format type
    pub fn create(format: OutputFormat) -> Box<dyn OutputFormatter> {
        match format {
            OutputFormat::Terminal => Box::new(TerminalOutput::new()),
            OutputFormat::Json => Box::new(JsonOutput::new()),
            OutputFormat::Csv => Box::new(CsvOutput::new()),
            OutputFormat::Html => Box::new(HtmlOutput::new()),
        }
    }

    /// Create the formatter described by a configuration
    pub fn from_config(config: &Config) -> Box<dyn OutputFormatter> {
        match config.output_format {
            OutputFormat::Json if !config.pretty_json => Box::new(JsonOutput::compact()),
            format => Self::create(format),
        }
    }
}

/// Render a report to stdout
pub fn render_to_stdout(report: &Report, config: &Config) -> Result<()> {
    let formatter = OutputFactory::from_config(config);
    let mut stdout = std::io::stdout().lock();
    formatter.render(report, &mut stdout)?;
    stdout.flush()?;
    Ok(())
}

/// Human-readable text for a cell in a column of the given kind.
///
/// Control characters are escaped so a whitespace inventory such as "\t\n"
/// stays on one line; undefined numbers read as `NaN`.
pub(crate) fn format_cell(cell: &CellValue, column_type: CellType) -> String {
    match cell {
        CellValue::Null if column_type == CellType::Float => "NaN".to_string(),
        CellValue::Null => String::new(),
        CellValue::Float(f) => format_float(*f),
        CellValue::String(s) => escape_controls(s),
        other => other.display().into_owned(),
    }
}

fn format_float(f: f64) -> String {
    if !f.is_finite() || f.fract() == 0.0 {
        return format!("{:?}", f);
    }
    let fixed = format!("{:.4}", f);
    let trimmed = fixed.trim_end_matches('0');
    if trimmed.ends_with('.') {
        format!("{}0", trimmed)
    } else {
        trimmed.to_string()
    }
}

fn escape_controls(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_control() {
                c.escape_default().to_string()
            } else {
                c.to_string()
            }
        })
        .collect()
}
