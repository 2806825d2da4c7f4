//! Column profilers
//!
//! Three independent passes over a [`Table`], each returning a new table:
//!
//! - [`CharacterProfiler`]: character-class inventory of every column
//! - [`NumericSummarizer`]: descriptive statistics of numeric columns
//! - [`UniquenessProfiler`]: distinctness and null/empty pattern of every column
//!
//! Every entry point validates its input with [`ensure_table`] before
//! touching any cell.

pub mod chars;
pub mod nullique;
pub mod progress;
pub mod stats;

use crate::config::ReportKind;
use crate::error::{ProfileError, Result};
use crate::model::Table;

pub use chars::{classify, profile_characters, CharClass, CharacterClassSet, CharacterProfiler};
pub use nullique::{profile_uniqueness, NullType, UniquenessProfiler, UniquenessRecord};
pub use progress::{ConsoleProgress, NoProgress, ProgressObserver, RecordingProgress};
pub use stats::{summarize_numeric, NumericSummarizer, NumericSummary};

/// Check that `table` is well formed: rectangular, with column indices
/// matching positions and every non-missing cell admitted by its
/// column's declared kind.
pub fn ensure_table(table: &Table) -> Result<()> {
    let width = table.column_count();

    for (pos, column) in table.columns.iter().enumerate() {
        if column.index != pos {
            return Err(ProfileError::InvalidInputType(format!(
                "column '{}' is at position {} but records index {}",
                column.name, pos, column.index
            )));
        }
    }

    for row in &table.rows {
        if row.cells.len() != width {
            return Err(ProfileError::InvalidInputType(format!(
                "row {} has {} cells, expected {}",
                row.source_line,
                row.cells.len(),
                width
            )));
        }

        for (column, cell) in table.columns.iter().zip(&row.cells) {
            if !cell.is_missing() && !column.cell_type.admits(cell.cell_type()) {
                return Err(ProfileError::InvalidInputType(format!(
                    "row {} holds a {} value in {} column '{}'",
                    row.source_line,
                    cell.cell_type(),
                    column.cell_type,
                    column.name
                )));
            }
        }
    }

    Ok(())
}

/// Run one profiler by kind
pub fn run(kind: ReportKind, table: &Table, progress: &mut dyn ProgressObserver) -> Result<Table> {
    match kind {
        ReportKind::Characters => CharacterProfiler::new().profile(table, progress),
        ReportKind::Stats => NumericSummarizer::new().profile(table, progress),
        ReportKind::Nullique => UniquenessProfiler::new().profile(table, progress),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CellType, CellValue, Column, Row};

    fn sample() -> Table {
        let mut table = Table::with_column_names(&["id", "name"]);
        table.push_row(vec![CellValue::Int(1), CellValue::from("a")]);
        table.push_row(vec![CellValue::Int(2), CellValue::Null]);
        table
    }

    #[test]
    fn test_accepts_well_formed_table() {
        assert!(ensure_table(&sample()).is_ok());
        assert!(ensure_table(&Table::default()).is_ok());
    }

    #[test]
    fn test_rejects_ragged_rows() {
        let mut table = sample();
        table.rows.push(Row::new(vec![CellValue::Int(3)], 4));

        let err = ensure_table(&table).unwrap_err();
        assert!(matches!(err, ProfileError::InvalidInputType(_)));
        assert!(err.to_string().contains("row 4 has 1 cells"));
    }

    #[test]
    fn test_rejects_cell_outside_declared_kind() {
        let mut table = Table::new(vec![Column::with_type("n", 0, CellType::Int)]);
        table.push_row(vec![CellValue::from("oops")]);

        assert!(ensure_table(&table).is_err());
    }

    #[test]
    fn test_rejects_misnumbered_columns() {
        let table = Table::new(vec![Column::new("a", 1)]);
        assert!(ensure_table(&table).is_err());
    }

    #[test]
    fn test_profilers_fail_before_reporting_progress() {
        let mut table = sample();
        table.rows[0].cells.pop();

        for kind in ReportKind::ALL {
            let mut progress = RecordingProgress::default();
            assert!(run(kind, &table, &mut progress).is_err());
            assert!(progress.events.is_empty());
            assert!(!progress.finished);
        }
    }

    #[test]
    fn test_run_reports_each_column() {
        let table = sample();
        let mut progress = RecordingProgress::default();
        let out = run(ReportKind::Nullique, &table, &mut progress).unwrap();

        assert_eq!(out.row_count(), 2);
        assert_eq!(
            progress.events,
            vec![(0, 2, "id".to_string()), (1, 2, "name".to_string())]
        );
        assert!(progress.finished);
    }
}
