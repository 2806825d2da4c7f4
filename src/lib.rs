//! dataprofile - Column profiling for tabular data
//!
//! Loads a table (CSV, Excel, Parquet, JSON) and profiles each column:
//! which character classes its values use, summary statistics for numeric
//! columns, and its distinct/missing pattern.

pub mod config;
pub mod error;
pub mod model;
pub mod output;
pub mod parser;
pub mod profile;
pub mod report;

pub use config::Config;
pub use error::{ProfileError, Result};
pub use model::Table;
pub use profile::{ensure_table, profile_characters, profile_uniqueness, summarize_numeric};
pub use report::Report;
