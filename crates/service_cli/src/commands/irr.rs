//! IRR command implementation
//!
//! Cashflows come from `--flows` or from a CSV file holding amounts
//! separated by commas or newlines.

use std::path::Path;

use finsolve_core::financial::RateSolver;
use tracing::info;

use super::{csv_reader, emit};
use crate::{CliError, Result};

/// Parse amounts from CSV text, row by row. Empty fields are skipped.
pub fn parse_amounts(text: &str) -> Result<Vec<f64>> {
    let mut reader = csv_reader(text);
    let mut amounts = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map_or(0, |p| p.line());
        for field in record.iter().filter(|field| !field.is_empty()) {
            let amount = field.parse::<f64>().map_err(|_| {
                CliError::InvalidArgument(format!(
                    "line {}: not a cashflow amount: {}",
                    line, field
                ))
            })?;
            amounts.push(amount);
        }
    }
    Ok(amounts)
}

/// Load cashflows from a CSV file.
pub fn load(path: &str) -> Result<Vec<f64>> {
    if !Path::new(path).exists() {
        return Err(CliError::FileNotFound(path.to_string()));
    }
    parse_amounts(&std::fs::read_to_string(path)?)
}

/// Run the irr command
pub fn run(solver: &RateSolver, flows: &[f64], format: &str) -> Result<()> {
    if flows.is_empty() {
        return Err(CliError::InvalidArgument(
            "supply cashflows with --flows or --file".to_string(),
        ));
    }
    info!(count = flows.len(), "Solving IRR");

    let value = solver.irr(flows)?;
    emit("IRR", value, format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amounts() {
        let flows = parse_amounts("-100, 60\n60\n\n 60 ").unwrap();
        assert_eq!(flows, vec![-100.0, 60.0, 60.0, 60.0]);

        let err = parse_amounts("-100,sixty").unwrap_err();
        assert!(err.to_string().contains("sixty"));
    }

    #[test]
    fn test_parse_quoted_amounts() {
        let flows = parse_amounts("\"-100\",\"60\"\n\"60\",60,\n").unwrap();
        assert_eq!(flows, vec![-100.0, 60.0, 60.0, 60.0]);
    }

    #[test]
    fn test_parse_amounts_reports_line() {
        let err = parse_amounts("-100,60\n60,lots\n").unwrap_err();
        assert!(
            err.to_string().contains("line 2"),
            "unexpected message: {}",
            err
        );
    }

    #[test]
    fn test_load_missing_file() {
        let err = load("no/such/flows.csv").unwrap_err();
        assert!(matches!(err, CliError::FileNotFound(_)));
    }

    #[test]
    fn test_run_requires_cashflows() {
        let err = run(&RateSolver::with_defaults(), &[], "table").unwrap_err();
        assert!(matches!(err, CliError::InvalidArgument(_)));
    }

    #[test]
    fn test_run_surfaces_sign_errors() {
        let err = run(&RateSolver::with_defaults(), &[100.0, 50.0], "table").unwrap_err();
        assert!(matches!(err, CliError::Financial(_)));
        assert!(err.to_string().starts_with("IRR: "));
    }
}
