//! Error types for the spool CLI.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for spool operations.
///
/// Each variant maps to a specific exit code. Errors surface synchronously
/// to the command layer; none are silently swallowed.
#[derive(Error, Debug)]
pub enum SpoolError {
    /// User provided invalid arguments or an invalid job specification.
    #[error("{0}")]
    UserError(String),

    /// Recipe selection or rule-table construction failed, including a
    /// template referencing a rule key that was never supplied.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Reading a template, writing a generated script, or preparing log
    /// files failed.
    #[error("I/O error: {0}")]
    IoError(String),

    /// The scheduler invocation could not be launched.
    #[error("Submission failed: {0}")]
    SubmitError(String),
}

impl SpoolError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            SpoolError::UserError(_) => exit_codes::USER_ERROR,
            SpoolError::ConfigError(_) => exit_codes::CONFIG_FAILURE,
            SpoolError::IoError(_) => exit_codes::IO_FAILURE,
            SpoolError::SubmitError(_) => exit_codes::SUBMIT_FAILURE,
        }
    }
}

/// Result type alias for spool operations.
pub type Result<T> = std::result::Result<T, SpoolError>;
