//! Table, Row, and Cell data structures

use std::borrow::Cow;
use std::hash::{Hash, Hasher};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::schema::{CellType, Column};

static MISSING: CellValue = CellValue::Null;

/// A cell value with type information
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(Cow<'static, str>),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CellValue::Null, CellValue::Null) => true,
            (CellValue::Bool(a), CellValue::Bool(b)) => a == b,
            (CellValue::Int(a), CellValue::Int(b)) => a == b,
            (CellValue::Float(a), CellValue::Float(b)) => {
                if a.is_nan() && b.is_nan() {
                    true
                } else {
                    a == b
                }
            }
            (CellValue::String(a), CellValue::String(b)) => a == b,
            (CellValue::Date(a), CellValue::Date(b)) => a == b,
            (CellValue::DateTime(a), CellValue::DateTime(b)) => a == b,
            // Cross-type numeric comparison
            (CellValue::Int(a), CellValue::Float(b)) | (CellValue::Float(b), CellValue::Int(a)) => {
                exact_int(*b) == Some(*a)
            }
            _ => false,
        }
    }
}

impl Eq for CellValue {}

impl Hash for CellValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            CellValue::Null => 0u8.hash(state),
            CellValue::Bool(b) => {
                1u8.hash(state);
                b.hash(state);
            }
            CellValue::Int(i) => {
                2u8.hash(state);
                i.hash(state);
            }
            // Integral floats hash like the equal Int so Hash agrees with Eq
            CellValue::Float(f) => match exact_int(*f) {
                Some(i) => {
                    2u8.hash(state);
                    i.hash(state);
                }
                None if f.is_nan() => 3u8.hash(state),
                None => {
                    3u8.hash(state);
                    f.to_bits().hash(state);
                }
            },
            CellValue::String(s) => {
                4u8.hash(state);
                s.hash(state);
            }
            CellValue::Date(d) => {
                5u8.hash(state);
                d.hash(state);
            }
            CellValue::DateTime(dt) => {
                6u8.hash(state);
                dt.hash(state);
            }
        }
    }
}

/// The `i64` a float is exactly equal to, if any
fn exact_int(f: f64) -> Option<i64> {
    // 2^63 is the first float past i64::MAX
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    (f.fract() == 0.0 && (-LIMIT..LIMIT).contains(&f)).then_some(f as i64)
}

impl CellValue {
    /// Check if the value counts as missing data (null or a NaN float)
    pub fn is_missing(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    /// Check if the value is a string that is empty or only whitespace
    pub fn is_blank(&self) -> bool {
        matches!(self, CellValue::String(s) if s.trim().is_empty())
    }

    /// Kind of this individual value
    pub fn cell_type(&self) -> CellType {
        match self {
            CellValue::Null => CellType::Null,
            CellValue::Bool(_) => CellType::Bool,
            CellValue::Int(_) => CellType::Int,
            CellValue::Float(_) => CellType::Float,
            CellValue::String(_) => CellType::String,
            CellValue::Date(_) => CellType::Date,
            CellValue::DateTime(_) => CellType::DateTime,
        }
    }

    /// Numeric view of the value, if it has one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Int(i) => Some(*i as f64),
            CellValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Convert to a display string
    pub fn display(&self) -> Cow<'_, str> {
        match self {
            CellValue::Null => Cow::Borrowed("NULL"),
            CellValue::Bool(b) => Cow::Owned(b.to_string()),
            CellValue::Int(i) => Cow::Owned(i.to_string()),
            // Debug keeps the fractional marker ("1.0") so floats never read as ints
            CellValue::Float(f) => Cow::Owned(format!("{:?}", f)),
            CellValue::String(s) => Cow::Borrowed(s.as_ref()),
            CellValue::Date(d) => Cow::Owned(d.to_string()),
            CellValue::DateTime(dt) => Cow::Owned(dt.to_string()),
        }
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(Cow::Owned(s.to_string()))
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(Cow::Owned(s))
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Float(f)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<usize> for CellValue {
    fn from(n: usize) -> Self {
        CellValue::Int(n as i64)
    }
}

impl<T> From<Option<T>> for CellValue
where
    T: Into<CellValue>,
{
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => CellValue::Null,
        }
    }
}

/// A row in the table
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Cell values in column order
    pub cells: Vec<CellValue>,
    /// Original line/row number in source file (1-indexed)
    pub source_line: usize,
}

impl Row {
    pub fn new(cells: Vec<CellValue>, source_line: usize) -> Self {
        Self { cells, source_line }
    }

    /// Get a cell value by column index
    pub fn get(&self, index: usize) -> Option<&CellValue> {
        self.cells.get(index)
    }
}

/// A table containing columns and rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    /// Column definitions
    pub columns: Vec<Column>,
    /// All rows in the table
    pub rows: Vec<Row>,
}

impl Table {
    /// Create a new empty table with column definitions
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Create an empty table with untyped columns named in order
    pub fn with_column_names<S: AsRef<str>>(names: &[S]) -> Self {
        Self::new(
            names
                .iter()
                .enumerate()
                .map(|(i, name)| Column::new(name.as_ref(), i))
                .collect(),
        )
    }

    /// Add a row to the table.
    ///
    /// Columns created with [`Column::new`] widen their kind to cover the
    /// new cells; declared columns keep their kind.
    pub fn add_row(&mut self, cells: Vec<CellValue>, source_line: usize) {
        for (column, cell) in self.columns.iter_mut().zip(&cells) {
            if !column.declared {
                column.cell_type = column.cell_type.widen(cell.cell_type());
            }
        }
        self.rows.push(Row::new(cells, source_line));
    }

    /// Give undeclared columns that saw rows but only missing cells the
    /// `Float` kind, so an all-missing column counts as numeric
    pub fn type_missing_columns_as_float(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        for column in &mut self.columns {
            if !column.declared && column.cell_type == CellType::Null {
                column.cell_type = CellType::Float;
            }
        }
    }

    /// Add a row numbered after the current last row
    pub fn push_row(&mut self, cells: Vec<CellValue>) {
        let line = self.rows.len() + 1;
        self.add_row(cells, line);
    }

    /// Get column index by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Column names in order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Iterate over the cells of one column, top to bottom
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &CellValue> {
        self.rows.iter().map(move |row| row.get(index).unwrap_or(&MISSING))
    }

    /// Iterate over the non-missing cells of one column
    pub fn present_values(&self, index: usize) -> impl Iterator<Item = &CellValue> {
        self.column_values(index).filter(|v| !v.is_missing())
    }

    /// Columns whose declared kind is numeric
    pub fn numeric_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.is_numeric())
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Cell at (row, column name)
    pub fn value(&self, row: usize, column: &str) -> Option<&CellValue> {
        let col_idx = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(col_idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(v: &CellValue) -> u64 {
        let mut hasher = DefaultHasher::new();
        v.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_missing_and_blank() {
        assert!(CellValue::Null.is_missing());
        assert!(CellValue::Float(f64::NAN).is_missing());
        assert!(!CellValue::Float(0.0).is_missing());
        assert!(!CellValue::from("").is_missing());

        assert!(CellValue::from("").is_blank());
        assert!(CellValue::from(" \t").is_blank());
        assert!(!CellValue::from(" x ").is_blank());
        assert!(!CellValue::Null.is_blank());
    }

    #[test]
    fn test_hash_agrees_with_eq() {
        assert_eq!(CellValue::Int(3), CellValue::Float(3.0));
        assert_eq!(hash_of(&CellValue::Int(3)), hash_of(&CellValue::Float(3.0)));
        assert_eq!(hash_of(&CellValue::Float(0.0)), hash_of(&CellValue::Float(-0.0)));
        assert_eq!(
            hash_of(&CellValue::Float(f64::NAN)),
            hash_of(&CellValue::Float(-f64::NAN))
        );
    }

    #[test]
    fn test_all_missing_columns_become_float() {
        let mut table = Table::new(vec![
            Column::new("a", 0),
            Column::new("b", 1),
            Column::with_type("c", 2, CellType::Null),
        ]);
        table.push_row(vec![CellValue::Int(1), CellValue::Null, CellValue::Null]);
        table.push_row(vec![CellValue::Int(2), CellValue::Null, CellValue::Null]);

        table.type_missing_columns_as_float();
        assert_eq!(table.columns[0].cell_type, CellType::Int);
        assert_eq!(table.columns[1].cell_type, CellType::Float);
        assert_eq!(table.columns[2].cell_type, CellType::Null);
        assert_eq!(table.numeric_columns().count(), 2);

        let mut header_only = Table::with_column_names(&["x"]);
        header_only.type_missing_columns_as_float();
        assert_eq!(header_only.columns[0].cell_type, CellType::Null);
    }

    #[test]
    fn test_int_float_equality_is_exact() {
        let big = 1i64 << 53;
        // big + 1 has no f64 of its own and rounds to big
        assert_ne!(CellValue::Int(big + 1), CellValue::Float(big as f64));
        assert_ne!(CellValue::Float(big as f64), CellValue::Int(big + 1));
        assert_eq!(CellValue::Int(big), CellValue::Float(big as f64));
        assert_eq!(hash_of(&CellValue::Int(big)), hash_of(&CellValue::Float(big as f64)));

        assert_ne!(CellValue::Int(i64::MAX), CellValue::Float(i64::MAX as f64));
        assert_eq!(CellValue::Int(i64::MIN), CellValue::Float(i64::MIN as f64));
        assert_ne!(CellValue::Int(0), CellValue::Float(0.5));
        assert_ne!(CellValue::Int(0), CellValue::Float(f64::NAN));
    }

    #[test]
    fn test_display() {
        assert_eq!(CellValue::Int(42).display(), "42");
        assert_eq!(CellValue::Float(1.0).display(), "1.0");
        assert_eq!(CellValue::Float(2.5).display(), "2.5");
        assert_eq!(CellValue::from("héllo").display(), "héllo");
        assert_eq!(CellValue::Bool(true).display(), "true");
    }

    #[test]
    fn test_add_row_widens_undeclared_columns() {
        let mut table = Table::new(vec![
            Column::new("a", 0),
            Column::with_type("b", 1, CellType::Float),
        ]);
        table.push_row(vec![CellValue::Int(1), CellValue::Int(2)]);
        table.push_row(vec![CellValue::Float(1.5), CellValue::Null]);

        assert_eq!(table.columns[0].cell_type, CellType::Float);
        assert_eq!(table.columns[1].cell_type, CellType::Float);

        table.push_row(vec![CellValue::from("x"), CellValue::Float(0.0)]);
        assert_eq!(table.columns[0].cell_type, CellType::Mixed);
    }

    #[test]
    fn test_column_access() {
        let mut table = Table::with_column_names(&["id", "name"]);
        table.push_row(vec![CellValue::Int(1), CellValue::from("a")]);
        table.push_row(vec![CellValue::Int(2), CellValue::Null]);

        assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["id", "name"]);
        assert_eq!(table.present_values(1).count(), 1);
        assert_eq!(table.numeric_columns().count(), 1);
        assert_eq!(table.value(1, "id"), Some(&CellValue::Int(2)));
        assert_eq!(table.rows[1].source_line, 2);
    }
}
