//! Column metadata and declared kinds

use serde::{Deserialize, Serialize};

/// Declared kind of a column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
    #[default]
    Null,
    Bool,
    Int,
    Float,
    String,
    Date,
    DateTime,
    Mixed,
}

impl CellType {
    /// Widen the type to accommodate another type
    pub fn widen(self, other: CellType) -> CellType {
        if self == other {
            return self;
        }

        match (self, other) {
            (CellType::Null, t) | (t, CellType::Null) => t,
            (CellType::Int, CellType::Float) | (CellType::Float, CellType::Int) => CellType::Float,
            (CellType::Date, CellType::DateTime) | (CellType::DateTime, CellType::Date) => {
                CellType::DateTime
            }
            _ => CellType::Mixed,
        }
    }

    /// Whether a column of this kind holds numbers
    pub fn is_numeric(self) -> bool {
        matches!(self, CellType::Int | CellType::Float)
    }

    /// Whether a cell of kind `other` may live in a column of this kind
    /// without changing the column's kind.
    pub fn admits(self, other: CellType) -> bool {
        other == CellType::Null || self.widen(other) == self
    }
}

impl std::fmt::Display for CellType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellType::Null => write!(f, "null"),
            CellType::Bool => write!(f, "bool"),
            CellType::Int => write!(f, "int"),
            CellType::Float => write!(f, "float"),
            CellType::String => write!(f, "string"),
            CellType::Date => write!(f, "date"),
            CellType::DateTime => write!(f, "datetime"),
            CellType::Mixed => write!(f, "mixed"),
        }
    }
}

/// Column metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name (from header)
    pub name: String,
    /// Column index (0-based position)
    pub index: usize,
    /// Declared kind
    pub cell_type: CellType,
    /// Whether the kind was declared up front rather than widened from data
    #[serde(default)]
    pub declared: bool,
}

impl Column {
    /// Create an untyped column; its kind is widened from the rows added to it
    pub fn new(name: impl Into<String>, index: usize) -> Self {
        Self {
            name: name.into(),
            index,
            cell_type: CellType::Null,
            declared: false,
        }
    }

    /// Create a column with a declared kind (e.g. from a Parquet schema)
    pub fn with_type(name: impl Into<String>, index: usize, cell_type: CellType) -> Self {
        Self {
            name: name.into(),
            index,
            cell_type,
            declared: true,
        }
    }

    /// Whether the column's kind is numeric
    pub fn is_numeric(&self) -> bool {
        self.cell_type.is_numeric()
    }
}
