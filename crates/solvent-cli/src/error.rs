//! CLI error types.

use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// A numeric argument could not be parsed by the selected backend.
    #[error("Invalid value for --{name}: {reason}")]
    InvalidNumber {
        /// Argument name.
        name: String,
        /// Why parsing failed.
        reason: String,
    },

    /// A guess was neither one value nor two comma-separated values.
    #[error("Invalid guess '{0}'. Use a value or two comma-separated values.")]
    InvalidGuess(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;
