//! CLI command implementations.

pub mod describe;
pub mod tvm;

pub use describe::DescribeArgs;
pub use tvm::TvmArgs;

use anyhow::{Context, Result};
use solvent_core::NumericContext;
use solvent_math::config::SolverOptions;
use solvent_math::solvers::ParamValue;
use tracing::debug;

use crate::cli::{Cli, OutputFormat};
use crate::error::{CliError, CliResult};

/// Global settings shared by every command.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Output format.
    pub format: OutputFormat,
    /// Suppress non-essential output.
    pub quiet: bool,
    /// Use the decimal backend.
    pub decimal: bool,
    /// Solver options after applying the config file and flags.
    pub options: SolverOptions,
}

impl Settings {
    /// Resolves settings: flags override the config file, which overrides
    /// the defaults.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut options = match &cli.config {
            Some(path) => SolverOptions::from_file(path)
                .with_context(|| format!("loading solver options from {}", path.display()))?,
            None => SolverOptions::default(),
        };
        if let Some(tolerance) = cli.tolerance {
            options.tolerance = tolerance;
        }
        if let Some(method) = cli.method {
            options.method = method.into();
        }
        debug!(
            format = ?cli.format,
            decimal = cli.decimal,
            tolerance = %options.tolerance,
            method = %options.method,
            max_iterations = options.max_iterations,
            "settings resolved"
        );

        Ok(Self {
            format: cli.format,
            quiet: cli.quiet,
            decimal: cli.decimal,
            options,
        })
    }
}

/// Parses a numeric argument with the selected backend.
pub fn parse_number<C: NumericContext>(ctx: &C, name: &str, input: &str) -> CliResult<C::Num> {
    ctx.parse(input).map_err(|e| CliError::InvalidNumber {
        name: name.to_string(),
        reason: e.to_string(),
    })
}

/// Parses `"a"` or `"a,b"` into a starting guess.
pub fn parse_guess<C: NumericContext>(ctx: &C, input: &str) -> CliResult<ParamValue<C::Num>> {
    let parts: Vec<&str> = input.split(',').map(str::trim).collect();
    match parts.as_slice() {
        [x] => Ok(ParamValue::Guess(parse_number(ctx, "guess", x)?)),
        [a, b] => Ok(ParamValue::Interval(
            parse_number(ctx, "guess", a)?,
            parse_number(ctx, "guess", b)?,
        )),
        _ => Err(CliError::InvalidGuess(input.to_string())),
    }
}
