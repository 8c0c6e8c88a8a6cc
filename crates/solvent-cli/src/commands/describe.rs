//! Describe command implementation.
//!
//! Lists the TVM parameters and what they mean.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use solvent_core::F64Context;
use solvent_tvm::Tvm;

use crate::cli::OutputFormat;
use crate::commands::Settings;
use crate::output::{print_header, print_output, MinimalLine};

/// Arguments for the describe command.
#[derive(Args, Debug)]
pub struct DescribeArgs {}

#[derive(Debug, Serialize, Tabled)]
struct ParameterRow {
    #[tabled(rename = "Parameter")]
    name: &'static str,
    #[tabled(rename = "Description")]
    description: &'static str,
}

impl MinimalLine for ParameterRow {
    fn minimal_line(&self) -> String {
        self.name.to_string()
    }
}

/// Executes the describe command.
pub fn execute(_args: DescribeArgs, settings: &Settings) -> Result<()> {
    let rows: Vec<ParameterRow> = Tvm::<F64Context>::parameter_descriptions()
        .into_iter()
        .map(|(p, description)| ParameterRow {
            name: p.name(),
            description,
        })
        .collect();

    if settings.format == OutputFormat::Table && !settings.quiet {
        print_header("TVM Parameters");
    }
    print_output(&rows, settings.format)
}
