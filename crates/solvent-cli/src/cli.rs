//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use solvent_core::Tolerance;
use solvent_math::config::Method;

use crate::commands::{DescribeArgs, TvmArgs};

/// Solvent - secant root finding and time-value-of-money solving
#[derive(Parser)]
#[command(name = "solvent")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log solver progress to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Convergence tolerance, e.g. "3 decimals", "1e-9 absolute", "12 digits"
    #[arg(short, long, global = true, value_parser = parse_tolerance)]
    pub tolerance: Option<Tolerance>,

    /// Use 28-digit decimal arithmetic instead of f64
    #[arg(short, long, global = true)]
    pub decimal: bool,

    /// Step method
    #[arg(short, long, value_enum, global = true)]
    pub method: Option<MethodArg>,

    /// Solver options file (TOML)
    #[arg(short, long, global = true, env = "SOLVENT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Solve the TVM equation for the one omitted quantity
    Tvm(TvmArgs),

    /// List the TVM parameters
    Describe(DescribeArgs),
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
    /// Minimal output (just the value)
    Minimal,
}

/// Step method options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MethodArg {
    /// Secant with bisection fallback
    Secant,
    /// Secant with regula-falsi fallback
    RegulaFalsiSecant,
}

impl From<MethodArg> for Method {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Secant => Method::Secant,
            MethodArg::RegulaFalsiSecant => Method::RegulaFalsiSecant,
        }
    }
}

fn parse_tolerance(s: &str) -> Result<Tolerance, String> {
    s.parse().map_err(|e: solvent_core::CoreError| e.to_string())
}
