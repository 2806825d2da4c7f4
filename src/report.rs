//! Profiling report: the requested profiles of one table

use std::path::{Path, PathBuf};

use crate::config::{Config, ReportKind};
use crate::error::Result;
use crate::model::Table;
use crate::profile::{self, ConsoleProgress, NoProgress, ProgressObserver};

/// Output of one profiler
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub kind: ReportKind,
    pub table: Table,
}

/// All profiles computed for a single input
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// Where the profiled table came from
    pub source: PathBuf,
    /// Rows in the profiled table
    pub row_count: usize,
    /// Columns in the profiled table
    pub column_count: usize,
    /// One section per requested profile, in request order
    pub sections: Vec<Section>,
}

impl Report {
    /// Run every profile in `config.reports` against `table`.
    ///
    /// Shows a console progress line per profile when `config.show_progress`
    /// is set.
    pub fn build(table: &Table, source: &Path, config: &Config) -> Result<Self> {
        let mut sections = Vec::with_capacity(config.reports.len());

        for &kind in &config.reports {
            let mut observer: Box<dyn ProgressObserver> = if config.show_progress {
                Box::new(ConsoleProgress::new(kind.title()))
            } else {
                Box::new(NoProgress)
            };

            let output = profile::run(kind, table, observer.as_mut())?;
            sections.push(Section {
                kind,
                table: output,
            });
        }

        Ok(Self {
            source: source.to_path_buf(),
            row_count: table.row_count(),
            column_count: table.column_count(),
            sections,
        })
    }

    /// Section for a profile kind, if it was requested
    pub fn section(&self, kind: ReportKind) -> Option<&Section> {
        self.sections.iter().find(|s| s.kind == kind)
    }
}
