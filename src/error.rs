//! Error types for profiling operations

use thiserror::Error;

/// Errors raised by the profilers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    /// The argument is not a well-formed table.
    #[error("Invalid input type: expected a well-formed table ({0})")]
    InvalidInputType(String),
}

/// Result type alias for profiling operations.
pub type Result<T> = std::result::Result<T, ProfileError>;
