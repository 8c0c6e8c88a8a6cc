//! Error types for numeric operations.

use thiserror::Error;

/// A specialized Result type for numeric context operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised by a numeric context.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Division by an exact zero.
    #[error("Division by zero: {numerator} / 0")]
    DivisionByZero {
        /// The numerator, rendered by the backend.
        numerator: String,
    },

    /// The result does not fit the numeric type.
    #[error("Numerical overflow in {operation}")]
    Overflow {
        /// The operation that overflowed.
        operation: String,
    },

    /// The argument lies outside the domain of the operation.
    #[error("{operation} is undefined for {value}")]
    Domain {
        /// The operation attempted.
        operation: String,
        /// The offending argument, rendered by the backend.
        value: String,
    },

    /// A literal could not be converted into the numeric type.
    #[error("Cannot parse '{input}': {reason}")]
    Parse {
        /// The literal that failed to parse.
        input: String,
        /// Why it failed.
        reason: String,
    },
}

impl CoreError {
    /// Creates a division by zero error.
    #[must_use]
    pub fn division_by_zero(numerator: impl ToString) -> Self {
        Self::DivisionByZero {
            numerator: numerator.to_string(),
        }
    }

    /// Creates an overflow error.
    #[must_use]
    pub fn overflow(operation: impl Into<String>) -> Self {
        Self::Overflow {
            operation: operation.into(),
        }
    }

    /// Creates a domain error.
    #[must_use]
    pub fn domain(operation: impl Into<String>, value: impl ToString) -> Self {
        Self::Domain {
            operation: operation.into(),
            value: value.to_string(),
        }
    }

    /// Creates a parse error.
    #[must_use]
    pub fn parse(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            input: input.into(),
            reason: reason.into(),
        }
    }
}
