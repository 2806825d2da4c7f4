//! dataprofile - Column profiling for tabular data

use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use dataprofile::config::{Config, OutputFormat, ReportKind, DEFAULT_NA_VALUES};
use dataprofile::output::render_to_stdout;
use dataprofile::parser::ParserFactory;
use dataprofile::report::Report;

/// Column profiling for tabular data (CSV, Excel, Parquet, JSON)
#[derive(Parser, Debug)]
#[command(name = "dataprofile")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// File to profile
    file: PathBuf,

    /// Profile(s) to compute, comma-separated: characters, stats, nullique (all by default)
    #[arg(short, long, value_delimiter = ',')]
    report: Vec<ReportKind>,

    /// Output format: terminal, json, csv or html
    #[arg(short, long, default_value = "terminal")]
    format: OutputFormat,

    /// For Excel files: which sheet to read
    #[arg(long)]
    sheet: Option<String>,

    /// Text read as a missing value (repeatable); replaces the defaults
    #[arg(long = "na-value")]
    na_values: Vec<String>,

    /// Read empty fields as empty strings instead of missing values
    #[arg(long)]
    keep_empty: bool,

    /// Emit compact JSON
    #[arg(long)]
    compact: bool,

    /// Disable the per-column progress line
    #[arg(long)]
    no_progress: bool,

    /// Print nothing but the report (implies --no-progress)
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn into_config(self) -> Config {
        let reports = if self.report.is_empty() {
            ReportKind::ALL.to_vec()
        } else {
            self.report
        };

        let mut na_values = if self.na_values.is_empty() {
            DEFAULT_NA_VALUES.iter().map(|s| s.to_string()).collect()
        } else {
            self.na_values
        };
        if self.keep_empty {
            na_values.retain(|v| !v.is_empty());
        }

        let show_progress = !self.no_progress && !self.quiet && std::io::stderr().is_terminal();

        let mut config = Config::new(self.file)
            .with_reports(reports)
            .with_output_format(self.format)
            .with_na_values(na_values)
            .with_progress(show_progress)
            .with_pretty_json(!self.compact);
        if let Some(sheet) = self.sheet {
            config = config.with_sheet_name(sheet);
        }
        config
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<()> {
    let config = Cli::parse().into_config();

    let table = ParserFactory::new()
        .parse(&config.input_file, &config)
        .with_context(|| format!("Failed to parse file: {}", config.input_file.display()))?;

    let report = Report::build(&table, &config.input_file, &config)
        .with_context(|| format!("Failed to profile file: {}", config.input_file.display()))?;

    render_to_stdout(&report, &config)
}

fn report_error(e: &anyhow::Error) {
    let choice = if std::io::stderr().is_terminal() {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stderr = StandardStream::stderr(choice);
    let _ = stderr.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true));
    let _ = write!(stderr, "Error:");
    let _ = stderr.reset();
    let _ = writeln!(stderr, " {:#}", e);
}
