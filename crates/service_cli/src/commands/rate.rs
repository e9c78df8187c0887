//! Rate command implementation
//!
//! Solves RATE: the periodic rate of an annuity.

use finsolve_core::financial::RateSolver;
use tracing::info;

use super::emit;
use crate::Result;

/// Annuity terms for the rate command
#[derive(Debug, Clone, Copy)]
pub struct AnnuityTerms {
    pub nper: f64,
    pub pmt: f64,
    pub pv: f64,
    pub fv: f64,
    pub pay_in_advance: bool,
    pub guess: f64,
}

/// Solve for the periodic rate.
pub fn solve(solver: &RateSolver, terms: &AnnuityTerms) -> Result<f64> {
    Ok(solver.rate(
        terms.nper,
        terms.pmt,
        terms.pv,
        terms.fv,
        terms.pay_in_advance,
        terms.guess,
    )?)
}

/// Run the rate command
pub fn run(solver: &RateSolver, terms: &AnnuityTerms, format: &str) -> Result<()> {
    info!(
        nper = terms.nper,
        pmt = terms.pmt,
        pv = terms.pv,
        fv = terms.fv,
        guess = terms.guess,
        "Solving RATE"
    );
    let value = solve(solver, terms)?;
    emit("RATE", value, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_solve_loan_rate() {
        let terms = AnnuityTerms {
            nper: 48.0,
            pmt: -200.0,
            pv: 8000.0,
            fv: 0.0,
            pay_in_advance: false,
            guess: 0.1,
        };
        let value = solve(&RateSolver::with_defaults(), &terms).unwrap();
        assert_relative_eq!(value, 0.0077014725, epsilon = 1e-9);
    }

    #[test]
    fn test_solve_rejects_empty_annuity() {
        let terms = AnnuityTerms {
            nper: 10.0,
            pmt: 0.0,
            pv: 0.0,
            fv: 100.0,
            pay_in_advance: false,
            guess: 0.1,
        };
        assert!(solve(&RateSolver::with_defaults(), &terms).is_err());
    }
}
