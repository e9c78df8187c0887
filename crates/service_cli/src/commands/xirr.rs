//! XIRR command implementation
//!
//! Reads dated cashflows from a file, either a JSON array
//!
//! ```json
//! [
//!   { "date": "2008-01-01", "amount": -10000.0 },
//!   { "date": "2008-03-01", "amount": 2750.0 }
//! ]
//! ```
//!
//! or CSV rows of `YYYY-MM-DD,amount` with an optional `date,amount` header.

use std::path::Path;

use finsolve_core::financial::{Cashflow, RateSolver};
use serde::Deserialize;
use tracing::info;

use super::{csv_reader, emit, parse_date};
use crate::{CliError, Result};

/// One `date,amount` CSV row
#[derive(Debug, Deserialize)]
struct Row {
    date: String,
    amount: f64,
}

/// Parse `date,amount` CSV rows. A first row whose first field is `date`
/// is taken as the header.
pub fn parse_csv(text: &str) -> Result<Vec<Cashflow>> {
    let mut reader = csv_reader(text);
    let mut flows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        if index == 0
            && record
                .get(0)
                .is_some_and(|field| field.eq_ignore_ascii_case("date"))
        {
            continue;
        }
        let line = record.position().map_or(0, |p| p.line());
        if record.len() != 2 {
            return Err(CliError::InvalidArgument(format!(
                "line {}: expected date,amount",
                line
            )));
        }
        let row: Row = record
            .deserialize(None)
            .map_err(|e| CliError::InvalidArgument(format!("line {}: {}", line, e)))?;
        flows.push(Cashflow::new(parse_date("date", &row.date)?, row.amount));
    }
    Ok(flows)
}

/// Load cashflows from a JSON or CSV file.
pub fn load(path: &str) -> Result<Vec<Cashflow>> {
    if !Path::new(path).exists() {
        return Err(CliError::FileNotFound(path.to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    if content.trim_start().starts_with('[') {
        Ok(serde_json::from_str(&content)?)
    } else {
        parse_csv(&content)
    }
}

/// Run the xirr command
pub fn run(solver: &RateSolver, path: &str, format: &str) -> Result<()> {
    let flows = load(path)?;
    info!(file = path, count = flows.len(), "Solving XIRR");

    let value = solver.xirr(&flows)?;
    emit("XIRR", value, format)
}
