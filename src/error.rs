//! Error types for the swipe audit engine.
//!
//! Only conditions that must stop a run are errors. Unparseable rows,
//! missing overtime/leave records and unclassifiable shift labels are
//! handled inside the pipeline and never surface here.

use thiserror::Error;

/// The main error type for the swipe audit engine.
///
/// # Example
///
/// ```
/// use swipe_audit::error::AuditError;
///
/// let error = AuditError::MissingColumn {
///     column: "swipe_time".to_string(),
/// };
/// assert_eq!(error.to_string(), "missing column swipe_time");
/// ```
#[derive(Debug, Error)]
pub enum AuditError {
    /// A required input column is absent from the swipe table.
    #[error("missing column {column}")]
    MissingColumn {
        /// The canonical name of the missing column.
        column: String,
    },

    /// Two headers of the swipe table resolve to the same column.
    #[error("duplicate column {column}")]
    DuplicateColumn {
        /// The canonical name of the duplicated column.
        column: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration parsed but holds values the engine cannot run with.
    #[error("Invalid configuration field '{field}': {message}")]
    InvalidConfig {
        /// The offending field.
        field: String,
        /// Why the value was rejected.
        message: String,
    },
}

/// A type alias for Results that return AuditError.
pub type AuditResult<T> = Result<T, AuditError>;
