//! TVM command implementation.
//!
//! Solves the time-value-of-money equation for the one omitted quantity.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use solvent_core::{DecimalContext, F64Context, NumericContext};
use solvent_tvm::{Tvm, TvmParameter, TvmValues};

use crate::cli::OutputFormat;
use crate::commands::{parse_guess, parse_number, Settings};
use crate::output::{print_header, print_output, print_warning, KeyValue, MinimalLine};

/// Arguments for the tvm command. Omit exactly one quantity.
#[derive(Args, Debug)]
pub struct TvmArgs {
    /// Money value at time t
    #[arg(long, allow_hyphen_values = true)]
    pub m: Option<String>,

    /// Time, in periods
    #[arg(long, allow_hyphen_values = true)]
    pub t: Option<String>,

    /// Initial money value
    #[arg(long, allow_hyphen_values = true)]
    pub m0: Option<String>,

    /// Payment per period (negative when paid out)
    #[arg(long, allow_hyphen_values = true)]
    pub pmt: Option<String>,

    /// Percent interest per year (e.g., 3 for 3%)
    #[arg(long, allow_hyphen_values = true)]
    pub i: Option<String>,

    /// Number of periods per year
    #[arg(long, allow_hyphen_values = true)]
    pub p: Option<String>,

    /// Starting guess for the omitted quantity: one value or "a,b"
    #[arg(short, long, allow_hyphen_values = true)]
    pub guess: Option<String>,
}

impl TvmArgs {
    fn raw(&self, parameter: TvmParameter) -> Option<&str> {
        let value = match parameter {
            TvmParameter::M => &self.m,
            TvmParameter::T => &self.t,
            TvmParameter::M0 => &self.m0,
            TvmParameter::Pmt => &self.pmt,
            TvmParameter::I => &self.i,
            TvmParameter::P => &self.p,
        };
        value.as_deref()
    }
}

/// One solved quantity with the diagnostics of the search.
#[derive(Debug, Serialize, Tabled)]
struct SolutionRow {
    parameter: &'static str,
    description: &'static str,
    value: String,
    reason: String,
    converged: bool,
    iterations: u32,
    evaluations: u32,
}

impl MinimalLine for SolutionRow {
    fn minimal_line(&self) -> String {
        self.value.clone()
    }
}

/// Executes the tvm command.
pub fn execute(args: TvmArgs, settings: &Settings) -> Result<()> {
    if settings.decimal {
        run(DecimalContext, &args, settings)
    } else {
        run(F64Context, &args, settings)
    }
}

fn run<C: NumericContext>(ctx: C, args: &TvmArgs, settings: &Settings) -> Result<()> {
    let mut values = TvmValues::new();
    for parameter in TvmParameter::ALL {
        if let Some(raw) = args.raw(parameter) {
            values.set(parameter, Some(parse_number(&ctx, parameter.name(), raw)?));
        }
    }
    let guess = args
        .guess
        .as_deref()
        .map(|g| parse_guess(&ctx, g))
        .transpose()?;

    let mut tvm = Tvm::with_options(ctx, &settings.options)?;
    let solution = tvm.solve_with_guess(&values, guess)?;

    let report = tvm.report();
    let reason = tvm.reason();
    if !tvm.is_ok() && !settings.quiet {
        print_warning(&format!(
            "search for {} stopped without a root ({reason}); the value is the last iterate",
            solution.parameter
        ));
    }

    let row = SolutionRow {
        parameter: solution.parameter.name(),
        description: solution.parameter.description(),
        value: solution.value.to_string(),
        reason: reason.to_string(),
        converged: report.is_some_and(|r| r.converged),
        iterations: report.map_or(0, |r| r.iterations),
        evaluations: report.map_or(0, |r| r.evaluations),
    };

    match settings.format {
        OutputFormat::Table => {
            if !settings.quiet {
                print_header("TVM Solution");
            }
            let mut rows: Vec<KeyValue> = TvmParameter::ALL
                .into_iter()
                .filter_map(|p| values.get(p).map(|v| KeyValue::new(p.name(), v.to_string())))
                .collect();
            rows.push(KeyValue::new(format!("{} (solved)", row.parameter), row.value.clone()));
            if !settings.quiet {
                rows.push(KeyValue::new("", ""));
                rows.push(KeyValue::new("Backend", tvm.context().name()));
                rows.push(KeyValue::new("Method", settings.options.method.to_string()));
                rows.push(KeyValue::new("Tolerance", settings.options.tolerance.to_string()));
                rows.push(KeyValue::new("Reason", row.reason.clone()));
                rows.push(KeyValue::new("Iterations", row.iterations.to_string()));
            }
            print_output(&rows, settings.format)?;
        }
        OutputFormat::Json | OutputFormat::Csv | OutputFormat::Minimal => {
            print_output(&[row], settings.format)?;
        }
    }

    Ok(())
}
