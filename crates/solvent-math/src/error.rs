//! Error types for root finding.

use solvent_core::CoreError;
use thiserror::Error;

/// A specialized Result type for root-finding operations.
pub type MathResult<T> = Result<T, MathError>;

/// Errors that can occur while setting up or running a root search.
///
/// A search that stops without a root (stalled derivative, exhausted
/// iteration budget) is not an error: it is reported through the solver's
/// `ok` flag and [`Reason`](crate::solvers::Reason).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// The guess list was empty after deduplication.
    #[error("Invalid guess: no feasible starting point")]
    InvalidGuess,

    /// The equation produced, or was asked to evaluate, a NaN or infinity.
    #[error("Non-finite value: f({x}) = {value}")]
    NonFinite {
        /// The trial point, rendered by the backend.
        x: String,
        /// The residual, rendered by the backend.
        value: String,
    },

    /// The equation descriptor was used inconsistently.
    #[error("Equation error: {reason}")]
    Equation {
        /// Description of the misuse.
        reason: String,
    },

    /// Invalid input parameter or option.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of the invalid input.
        reason: String,
    },

    /// Failure inside the numeric backend.
    #[error(transparent)]
    Numeric(#[from] CoreError),
}

impl MathError {
    /// Creates a non-finite value error.
    #[must_use]
    pub fn non_finite(x: impl ToString, value: impl ToString) -> Self {
        Self::NonFinite {
            x: x.to_string(),
            value: value.to_string(),
        }
    }

    /// Creates an equation error.
    #[must_use]
    pub fn equation(reason: impl Into<String>) -> Self {
        Self::Equation {
            reason: reason.into(),
        }
    }

    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}
