//! Descriptive statistics for numeric columns

use serde::Serialize;

use crate::error::Result;
use crate::model::{CellType, CellValue, Column, Table};

use super::ensure_table;
use super::progress::{NoProgress, ProgressObserver};

/// Output column names, in order
pub const SUMMARY_COLUMNS: [&str; 7] = [
    "column",
    "min",
    "max",
    "mean",
    "median",
    "std_sample",
    "std_pop",
];

/// Summary of one numeric column over its non-missing values.
///
/// `None` marks a statistic that is undefined for the data seen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummary {
    pub column: String,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub std_sample: Option<f64>,
    pub std_pop: Option<f64>,
}

impl NumericSummary {
    /// Summarize a slice of values (missing values already removed)
    pub fn from_values(column: impl Into<String>, values: &[f64]) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let mean = mean(&sorted);
        Self {
            column: column.into(),
            min: sorted.first().copied(),
            max: sorted.last().copied(),
            mean,
            median: median(&sorted),
            std_sample: mean.and_then(|m| std_dev(&sorted, m, 1)),
            std_pop: mean.and_then(|m| std_dev(&sorted, m, 0)),
        }
    }

    fn cells(&self) -> Vec<CellValue> {
        vec![
            CellValue::from(self.column.clone()),
            CellValue::from(self.min),
            CellValue::from(self.max),
            CellValue::from(self.mean),
            CellValue::from(self.median),
            CellValue::from(self.std_sample),
            CellValue::from(self.std_pop),
        ]
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median of already sorted values
fn median(sorted: &[f64]) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    if n % 2 == 1 {
        Some(sorted[n / 2])
    } else {
        Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0)
    }
}

/// Standard deviation with `n - ddof` in the denominator; undefined when
/// that denominator is not positive.
fn std_dev(values: &[f64], mean: f64, ddof: usize) -> Option<f64> {
    let n = values.len();
    if n <= ddof {
        return None;
    }
    let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Some((sum_sq / (n - ddof) as f64).sqrt())
}

/// Computes [`NumericSummary`] rows for the numeric columns of a table
#[derive(Debug, Default, Clone, Copy)]
pub struct NumericSummarizer;

impl NumericSummarizer {
    pub fn new() -> Self {
        Self
    }

    /// One summary per numeric column, in column order; other columns are skipped
    pub fn records(
        &self,
        table: &Table,
        progress: &mut dyn ProgressObserver,
    ) -> Result<Vec<NumericSummary>> {
        ensure_table(table)?;

        let numeric: Vec<&Column> = table.numeric_columns().collect();
        let total = numeric.len();
        let mut summaries = Vec::with_capacity(total);

        for (i, column) in numeric.into_iter().enumerate() {
            progress.column_started(i, total, &column.name);

            let values: Vec<f64> = table
                .present_values(column.index)
                .filter_map(CellValue::as_f64)
                .collect();
            summaries.push(NumericSummary::from_values(column.name.clone(), &values));
        }
        progress.finished();

        Ok(summaries)
    }

    /// Summarize a table into a new table with one row per numeric column
    pub fn profile(&self, table: &Table, progress: &mut dyn ProgressObserver) -> Result<Table> {
        let summaries = self.records(table, progress)?;
        Ok(records_to_table(&summaries))
    }
}

/// Lay summaries out as a table; undefined statistics become null cells
pub fn records_to_table(summaries: &[NumericSummary]) -> Table {
    let columns = SUMMARY_COLUMNS
        .iter()
        .enumerate()
        .map(|(i, name)| match i {
            0 => Column::with_type(*name, i, CellType::String),
            _ => Column::with_type(*name, i, CellType::Float),
        })
        .collect();

    let mut table = Table::new(columns);
    for summary in summaries {
        table.push_row(summary.cells());
    }
    table
}

/// Convenience function to summarize numeric columns without progress reporting
pub fn summarize_numeric(table: &Table) -> Result<Table> {
    NumericSummarizer::new().profile(table, &mut NoProgress)
}
