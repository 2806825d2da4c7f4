//! Distinctness and null/empty pattern per column

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::error::Result;
use crate::model::{CellType, CellValue, Column, Table};

use super::ensure_table;
use super::progress::{NoProgress, ProgressObserver};

/// Output column names, in order
pub const UNIQUENESS_COLUMNS: [&str; 4] = ["column", "is_unique", "distinct_count", "null_type"];

/// How a column mixes missing and empty values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NullType {
    /// Missing values, no empty strings
    #[serde(rename = "null")]
    Null,
    /// Empty strings, no missing values
    #[serde(rename = "empty")]
    Empty,
    /// Both
    #[serde(rename = "empty/null")]
    EmptyNull,
    /// Neither
    #[serde(rename = "filled")]
    Filled,
}

impl NullType {
    pub fn from_flags(has_null: bool, has_empty: bool) -> Self {
        match (has_null, has_empty) {
            (true, true) => NullType::EmptyNull,
            (true, false) => NullType::Null,
            (false, true) => NullType::Empty,
            (false, false) => NullType::Filled,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NullType::Null => "null",
            NullType::Empty => "empty",
            NullType::EmptyNull => "empty/null",
            NullType::Filled => "filled",
        }
    }
}

impl std::fmt::Display for NullType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cleaned cell as seen by the distinct count. Missing and empty get their
/// own categories, so they can never collide with real data.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum DistinctKey<'a> {
    Null,
    Empty,
    Value(&'a CellValue),
}

impl<'a> DistinctKey<'a> {
    fn of(value: &'a CellValue) -> Self {
        if value.is_missing() {
            DistinctKey::Null
        } else if value.is_blank() {
            DistinctKey::Empty
        } else {
            DistinctKey::Value(value)
        }
    }
}

/// Uniqueness and null pattern of one column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UniquenessRecord {
    pub column: String,
    pub is_unique: bool,
    pub distinct_count: usize,
    pub null_type: NullType,
}

impl UniquenessRecord {
    /// Build the record from a column's cells, top to bottom
    pub fn from_values<'a>(
        column: impl Into<String>,
        values: impl IntoIterator<Item = &'a CellValue>,
    ) -> Self {
        let mut counts: FxHashMap<DistinctKey<'a>, usize> = FxHashMap::default();
        for value in values {
            *counts.entry(DistinctKey::of(value)).or_insert(0) += 1;
        }

        let has_null = counts.contains_key(&DistinctKey::Null);
        let has_empty = counts.contains_key(&DistinctKey::Empty);

        Self {
            column: column.into(),
            // Two missing (or two empty) cells are duplicates of each other
            is_unique: counts.values().all(|&n| n == 1),
            distinct_count: counts.len(),
            null_type: NullType::from_flags(has_null, has_empty),
        }
    }

    fn cells(&self) -> Vec<CellValue> {
        vec![
            CellValue::from(self.column.clone()),
            CellValue::Bool(self.is_unique),
            CellValue::from(self.distinct_count),
            CellValue::from(self.null_type.as_str()),
        ]
    }
}

/// Computes [`UniquenessRecord`] rows for every column of a table
#[derive(Debug, Default, Clone, Copy)]
pub struct UniquenessProfiler;

impl UniquenessProfiler {
    pub fn new() -> Self {
        Self
    }

    /// One record per column, in column order
    pub fn records(
        &self,
        table: &Table,
        progress: &mut dyn ProgressObserver,
    ) -> Result<Vec<UniquenessRecord>> {
        ensure_table(table)?;

        let total = table.column_count();
        let mut records = Vec::with_capacity(total);

        for (idx, column) in table.columns.iter().enumerate() {
            progress.column_started(idx, total, &column.name);
            records.push(UniquenessRecord::from_values(
                column.name.clone(),
                table.column_values(idx),
            ));
        }
        progress.finished();

        Ok(records)
    }

    /// Profile a table into a new table with one row per column
    pub fn profile(&self, table: &Table, progress: &mut dyn ProgressObserver) -> Result<Table> {
        let records = self.records(table, progress)?;
        Ok(records_to_table(&records))
    }
}

/// Lay records out as a table
pub fn records_to_table(records: &[UniquenessRecord]) -> Table {
    let kinds = [CellType::String, CellType::Bool, CellType::Int, CellType::String];
    let columns = UNIQUENESS_COLUMNS
        .iter()
        .zip(kinds)
        .enumerate()
        .map(|(i, (name, kind))| Column::with_type(*name, i, kind))
        .collect();

    let mut table = Table::new(columns);
    for record in records {
        table.push_row(record.cells());
    }
    table
}

/// Convenience function to profile uniqueness without progress reporting
pub fn profile_uniqueness(table: &Table) -> Result<Table> {
    UniquenessProfiler::new().profile(table, &mut NoProgress)
}
