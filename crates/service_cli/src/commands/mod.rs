//! CLI command implementations
//!
//! Each submodule implements a specific CLI command. Results go to stdout
//! in one of three formats: `table`, `json` or `csv`.

pub mod bond;
pub mod irr;
pub mod rate;
pub mod xirr;

use finsolve_core::types::{Date, DayCountBasis, Frequency};
use serde::Serialize;

use crate::{CliError, Result};

/// One solved rate, as printed by every command
#[derive(Debug, Serialize)]
pub struct Solved<'a> {
    /// Spreadsheet function name
    pub function: &'a str,
    /// The rate that zeroes the objective
    pub value: f64,
}

/// Render a solved rate in the requested format.
pub fn render(solved: &Solved<'_>, format: &str) -> Result<String> {
    match format {
        "json" => Ok(serde_json::to_string_pretty(solved)?),
        "csv" => Ok(format!("function,value\n{},{}", solved.function, solved.value)),
        "table" => Ok([
            "┌────────────┬──────────────────────┐".to_string(),
            "│ Function   │ Value                │".to_string(),
            "├────────────┼──────────────────────┤".to_string(),
            format!("│ {:<10} │ {:>20.12} │", solved.function, solved.value),
            "└────────────┴──────────────────────┘".to_string(),
        ]
        .join("\n")),
        other => Err(CliError::InvalidArgument(format!(
            "Unknown format: {}. Supported: json, csv, table",
            other
        ))),
    }
}

/// Print a solved rate.
pub fn emit(function: &str, value: f64, format: &str) -> Result<()> {
    let rendered = render(&Solved { function, value }, format)?;
    println!("{}", rendered);
    Ok(())
}

/// CSV reader over in-memory text. Headers are left to the caller, fields
/// are trimmed and rows may differ in length.
pub(crate) fn csv_reader(text: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes())
}

pub(crate) fn parse_date(name: &str, value: &str) -> Result<Date> {
    Date::parse(value).map_err(|e| CliError::InvalidArgument(format!("{}: {}", name, e)))
}

pub(crate) fn parse_basis(value: &str) -> Result<DayCountBasis> {
    value.parse().map_err(CliError::InvalidArgument)
}

pub(crate) fn parse_frequency(value: u8) -> Result<Frequency> {
    Ok(Frequency::try_from(value)?)
}
