//! Error types for TVM solving.

use solvent_math::MathError;
use thiserror::Error;

/// A specialized Result type for TVM operations.
pub type TvmResult<T> = Result<T, TvmError>;

/// Errors raised by [`Tvm`](crate::Tvm).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TvmError {
    /// Not exactly one parameter was left unknown.
    #[error("{}", parameter_count_message(.unknowns))]
    ParameterCount {
        /// Number of parameters without a value.
        unknowns: usize,
    },

    /// A parameter name outside `m, t, m0, pmt, i, p`.
    #[error("Unknown TVM parameter '{0}'")]
    UnknownParameter(String),

    /// The solver options were rejected.
    #[error("Invalid solver options: {0}")]
    InvalidOptions(String),

    /// The root search failed.
    #[error(transparent)]
    Math(#[from] MathError),
}

fn parameter_count_message(unknowns: &usize) -> &'static str {
    if *unknowns == 0 {
        "Nothing to solve"
    } else {
        "Too many unknowns"
    }
}

impl TvmError {
    /// Creates a parameter count error.
    #[must_use]
    pub fn parameter_count(unknowns: usize) -> Self {
        Self::ParameterCount { unknowns }
    }
}
