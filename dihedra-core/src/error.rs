//! Structured error types for the dihedra workspace.

use thiserror::Error;

/// Unified error type for all dihedra operations.
#[derive(Debug, Error)]
pub enum DihedraError {
    /// I/O error (file not found, permission denied, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error (malformed coordinate, alignment, or tabular input)
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid input (bad arguments, out-of-range values)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Decompression failure
    #[error("compression error: {0}")]
    Compression(String),

    /// An external program (TM-align, mkdssp) failed or could not be started
    #[error("external tool error: {0}")]
    ExternalTool(String),

    /// Configuration rejected during loading or validation
    #[error("configuration error: {0}")]
    Config(String),

    /// Catch-all for other errors
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the dihedra workspace.
pub type Result<T> = std::result::Result<T, DihedraError>;
