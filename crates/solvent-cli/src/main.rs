//! Solvent CLI - solve time-value-of-money problems from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Monthly payment on a 20 year loan of 10000 at 3%
//! solvent tvm --t 240 --m0 10000 --m 0 --i 3 --p 12
//!
//! # Term of the same loan, in 28-digit decimal arithmetic
//! solvent --decimal tvm --pmt -55.4597597853912 --m0 10000 --m 0 --i 3 --p 12
//!
//! # List the TVM parameters
//! solvent describe
//! ```

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod commands;
mod error;
mod output;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let settings = commands::Settings::from_cli(&cli)?;

    match cli.command {
        Commands::Tvm(args) => commands::tvm::execute(args, &settings)?,
        Commands::Describe(args) => commands::describe::execute(args, &settings)?,
    }

    Ok(())
}

/// Logs go to stderr so that results on stdout stay machine-readable.
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "solvent=debug,solvent_math=debug,solvent_tvm=debug"
    } else {
        "solvent=warn,solvent_math=warn,solvent_tvm=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
