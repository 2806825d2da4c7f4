//! Configuration handling for dataprofile

use std::path::PathBuf;

use serde::Serialize;

/// Cell contents read as missing unless the caller overrides them
pub const DEFAULT_NA_VALUES: [&str; 7] = ["", "NA", "N/A", "NaN", "nan", "null", "NULL"];

/// Output format for profiling reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Terminal,
    Json,
    Csv,
    Html,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "terminal" => Ok(OutputFormat::Terminal),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "html" => Ok(OutputFormat::Html),
            _ => Err(format!(
                "Unknown output format: {} (expected terminal, json, csv or html)",
                s
            )),
        }
    }
}

/// Which profile to compute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    /// Character classes per column
    Characters,
    /// Numeric summary statistics
    Stats,
    /// Uniqueness and null pattern
    Nullique,
}

impl ReportKind {
    pub const ALL: [ReportKind; 3] = [ReportKind::Characters, ReportKind::Stats, ReportKind::Nullique];

    /// Machine name, as accepted by `FromStr` and the `--report` option
    pub fn name(self) -> &'static str {
        match self {
            ReportKind::Characters => "characters",
            ReportKind::Stats => "stats",
            ReportKind::Nullique => "nullique",
        }
    }

    /// Human-readable heading
    pub fn title(self) -> &'static str {
        match self {
            ReportKind::Characters => "Character Classes",
            ReportKind::Stats => "Numeric Summary",
            ReportKind::Nullique => "Uniqueness & Nulls",
        }
    }
}

impl std::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for ReportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "characters" => Ok(ReportKind::Characters),
            "stats" => Ok(ReportKind::Stats),
            "nullique" => Ok(ReportKind::Nullique),
            _ => Err(format!(
                "Unknown report: {} (expected characters, stats or nullique)",
                s
            )),
        }
    }
}

/// Configuration for a profiling run
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the file to profile
    pub input_file: PathBuf,
    /// Profiles to compute, in output order
    pub reports: Vec<ReportKind>,
    /// Output format
    pub output_format: OutputFormat,
    /// For Excel files: which sheet to read
    pub sheet_name: Option<String>,
    /// Text cells (CSV) read as missing
    pub na_values: Vec<String>,
    /// Show per-column progress on stderr
    pub show_progress: bool,
    /// Pretty-print JSON output
    pub pretty_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_file: PathBuf::new(),
            reports: ReportKind::ALL.to_vec(),
            output_format: OutputFormat::default(),
            sheet_name: None,
            na_values: DEFAULT_NA_VALUES.iter().map(|s| s.to_string()).collect(),
            show_progress: false,
            pretty_json: true,
        }
    }
}

impl Config {
    /// Create a new Config for an input file
    pub fn new(input_file: PathBuf) -> Self {
        Self {
            input_file,
            ..Default::default()
        }
    }

    /// Select the profiles to compute
    pub fn with_reports(mut self, reports: Vec<ReportKind>) -> Self {
        self.reports = reports;
        self
    }

    /// Set output format
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Set Excel sheet name
    pub fn with_sheet_name(mut self, name: String) -> Self {
        self.sheet_name = Some(name);
        self
    }

    /// Replace the missing-value markers
    pub fn with_na_values(mut self, values: Vec<String>) -> Self {
        self.na_values = values;
        self
    }

    /// Enable or disable the progress indicator
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Choose between pretty and compact JSON
    pub fn with_pretty_json(mut self, pretty: bool) -> Self {
        self.pretty_json = pretty;
        self
    }

    /// Whether a raw text cell should be read as missing
    pub fn is_na(&self, raw: &str) -> bool {
        self.na_values.iter().any(|na| na == raw)
    }
}
