//! Output formatting utilities.

use std::io::{self, Write};

use colored::Colorize;
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

use crate::cli::OutputFormat;

/// Rows that can be reduced to a single bare line for `--format minimal`.
pub trait MinimalLine {
    /// The line printed for this row.
    fn minimal_line(&self) -> String;
}

/// Prints rows to stdout in the requested format.
pub fn print_output<T>(rows: &[T], format: OutputFormat) -> anyhow::Result<()>
where
    T: Serialize + Tabled + MinimalLine,
{
    let stdout = io::stdout();
    write_output(&mut stdout.lock(), rows, format)
}

/// Writes rows in the requested format.
///
/// Table output left-aligns the first column. JSON is a pretty-printed
/// array, CSV has a header row, and minimal prints one line per row.
pub fn write_output<W, T>(out: &mut W, rows: &[T], format: OutputFormat) -> anyhow::Result<()>
where
    W: Write,
    T: Serialize + Tabled + MinimalLine,
{
    match format {
        OutputFormat::Table if rows.is_empty() => writeln!(out, "No results.")?,
        OutputFormat::Table => {
            let table = Table::new(rows)
                .with(Style::rounded())
                .with(Modify::new(Columns::first()).with(Alignment::left()))
                .to_string();
            writeln!(out, "{table}")?;
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, rows)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(&mut *out);
            for row in rows {
                writer.serialize(row)?;
            }
            writer.flush()?;
        }
        OutputFormat::Minimal => {
            for row in rows {
                writeln!(out, "{}", row.minimal_line())?;
            }
        }
    }
    Ok(())
}

/// Prints a warning message.
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message);
}

/// Prints a header for a section.
pub fn print_header(title: &str) {
    println!("\n{}", title.bold().underline());
}

/// A labelled value in a two-column table.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct KeyValue {
    #[tabled(rename = "Quantity")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

impl KeyValue {
    /// Creates a new key-value pair.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl MinimalLine for KeyValue {
    fn minimal_line(&self) -> String {
        self.value.clone()
    }
}
