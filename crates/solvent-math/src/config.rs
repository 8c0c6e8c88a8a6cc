//! Solver configuration.
//!
//! [`SolverOptions`] is the explicit configuration record for a solver: the
//! tolerance, default guesses, iteration budget and step method. It can be
//! built in code or loaded from TOML:
//!
//! ```toml
//! method = "secant"
//! default_guesses = [1.0, 2.0]
//! max_iterations = 500
//!
//! [tolerance]
//! kind = "decimals"
//! value = 3
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use solvent_core::{NumericContext, Tolerance};
use thiserror::Error;

use crate::equation::EquationDescriptor;
use crate::error::MathError;
use crate::solvers::{
    ParameterizedSolver, RegulaFalsiSecant, Secant, SolverEngine, Strategy, MAX_ITERATIONS,
};

/// A specialized Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while loading or validating solver options.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A single field failed validation.
    #[error("Validation error in field '{field}': {message}")]
    Validation {
        /// The field that failed.
        field: String,
        /// Why it failed.
        message: String,
    },

    /// Several fields failed validation.
    #[error("Multiple validation errors: {0:?}")]
    MultipleValidationErrors(Vec<ValidationError>),

    /// The configuration file could not be read.
    #[error("Cannot read '{path}': {source}")]
    Io {
        /// Path of the file.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration text is not valid TOML for [`SolverOptions`].
    #[error("Deserialization error: {0}")]
    Deserialization(#[from] toml::de::Error),

    /// A default guess cannot be represented by the numeric context.
    #[error(transparent)]
    Math(#[from] MathError),
}

/// A single validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Field that failed validation.
    pub field: String,
    /// Validation error message.
    pub message: String,
}

impl ValidationError {
    /// Creates a new validation error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Types that can check their own consistency.
pub trait Validate {
    /// Returns every validation error, or an empty vector if valid.
    fn validate(&self) -> Vec<ValidationError>;

    /// Returns true if the value is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Validates and returns an error if invalid.
    fn validate_or_error(&self) -> ConfigResult<()> {
        let mut errors = self.validate();
        match errors.len() {
            0 => Ok(()),
            1 => {
                let err = errors.remove(0);
                Err(ConfigError::Validation {
                    field: err.field,
                    message: err.message,
                })
            }
            _ => Err(ConfigError::MultipleValidationErrors(errors)),
        }
    }
}

/// Per-iteration step method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    /// Secant with bisection fallback.
    Secant,
    /// Secant with regula-falsi fallback.
    #[default]
    RegulaFalsiSecant,
}

impl Method {
    /// Creates a fresh strategy for this method.
    pub fn strategy<C: NumericContext>(self) -> Box<dyn Strategy<C> + Send> {
        match self {
            Method::Secant => Box::new(Secant::<C>::new()),
            Method::RegulaFalsiSecant => Box::new(RegulaFalsiSecant::<C>::new()),
        }
    }

    /// Identifier used in configuration files and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Secant => "secant",
            Method::RegulaFalsiSecant => "regula_falsi_secant",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = MathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "secant" => Ok(Method::Secant),
            "regula_falsi_secant" | "regula_falsi" | "rf_secant" | "rfsecant" => {
                Ok(Method::RegulaFalsiSecant)
            }
            other => Err(MathError::invalid_input(format!("unknown method '{other}'"))),
        }
    }
}

fn default_max_iterations() -> u32 {
    MAX_ITERATIONS
}

/// Configuration record for a solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverOptions {
    /// Convergence tolerance for the residual.
    #[serde(default)]
    pub tolerance: Tolerance,

    /// Seeds appended after any explicit guesses (at most two).
    #[serde(default)]
    pub default_guesses: Vec<f64>,

    /// Iteration budget.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Step method.
    #[serde(default)]
    pub method: Method,
}

impl SolverOptions {
    /// Creates options with the given tolerance and defaults elsewhere.
    pub fn new(tolerance: Tolerance) -> Self {
        Self {
            tolerance,
            default_guesses: Vec::new(),
            max_iterations: MAX_ITERATIONS,
            method: Method::default(),
        }
    }

    /// Sets the default guesses.
    #[must_use]
    pub fn with_default_guesses(mut self, guesses: impl IntoIterator<Item = f64>) -> Self {
        self.default_guesses = guesses.into_iter().collect();
        self
    }

    /// Sets the iteration budget.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the step method.
    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Parses and validates options from TOML text.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let options: Self = toml::from_str(text)?;
        options.validate_or_error()?;
        Ok(options)
    }

    /// Loads and validates options from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Converts the default guesses into the context's number type.
    pub fn guesses<C: NumericContext>(&self, context: &C) -> ConfigResult<Vec<C::Num>> {
        self.default_guesses
            .iter()
            .map(|&g| context.from_f64(g).map_err(|e| ConfigError::Math(e.into())))
            .collect()
    }

    /// Builds an engine for a unary equation.
    pub fn engine<C: NumericContext>(
        &self,
        context: C,
    ) -> ConfigResult<SolverEngine<C, Box<dyn Strategy<C> + Send>>> {
        self.validate_or_error()?;
        let guesses = self.guesses(&context)?;
        Ok(SolverEngine::new(context, self.tolerance, self.method.strategy())
            .with_default_guesses(guesses)
            .with_max_iterations(self.max_iterations))
    }

    /// Builds a parameterized solver for an n-ary equation.
    pub fn parameterized<C: NumericContext>(
        &self,
        equation: EquationDescriptor<C::Num>,
        context: C,
    ) -> ConfigResult<ParameterizedSolver<C>> {
        self.validate_or_error()?;
        let guesses = self.guesses(&context)?;
        Ok(ParameterizedSolver::new(equation, context, self.tolerance)
            .with_method(self.method)
            .with_default_guesses(guesses)
            .with_max_iterations(self.max_iterations))
    }
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self::new(Tolerance::default())
    }
}

impl Validate for SolverOptions {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        match self.tolerance {
            Tolerance::Absolute(v) | Tolerance::Relative(v) if !(v.is_finite() && v > 0.0) => {
                errors.push(ValidationError::new(
                    "tolerance",
                    format!("must be positive and finite, got {v}"),
                ));
            }
            Tolerance::Ulps(0) => {
                errors.push(ValidationError::new("tolerance", "must be at least one ulp"));
            }
            _ => {}
        }

        if self.default_guesses.len() > 2 {
            errors.push(ValidationError::new(
                "default_guesses",
                format!("at most two guesses, got {}", self.default_guesses.len()),
            ));
        }
        if let Some(g) = self.default_guesses.iter().find(|g| !g.is_finite()) {
            errors.push(ValidationError::new(
                "default_guesses",
                format!("guesses must be finite, got {g}"),
            ));
        }

        if self.max_iterations == 0 {
            errors.push(ValidationError::new("max_iterations", "must be positive"));
        }

        errors
    }
}
