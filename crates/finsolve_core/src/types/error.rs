//! Error types for structured error handling.
//!
//! This module provides:
//! - `SolverError`: Errors from the root-finding core
//! - `FinancialError`: Errors from the financial functions built on top of it
//! - `DateError`: Errors from date construction and parsing

use std::fmt;
use thiserror::Error;

/// Date-related errors.
///
/// Provides structured error handling for date construction and parsing
/// with descriptive context for each failure mode.
///
/// # Variants
/// - `InvalidDate`: Invalid date components (e.g., February 30th)
/// - `ParseError`: Failed to parse date string
/// - `OutOfRange`: Month arithmetic overflowed the calendar
///
/// # Examples
/// ```
/// use finsolve_core::types::DateError;
///
/// let err = DateError::InvalidDate { year: 2024, month: 2, day: 30 };
/// assert_eq!(format!("{}", err), "Invalid date: 2024-2-30");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    /// Invalid date components (e.g., February 30th).
    InvalidDate {
        /// Year component
        year: i32,
        /// Month component (1-12)
        month: u32,
        /// Day component (1-31)
        day: u32,
    },

    /// Failed to parse date string.
    ParseError(String),

    /// Month arithmetic left the representable calendar.
    OutOfRange {
        /// Starting date (ISO 8601)
        date: String,
        /// Months that were added
        months: i32,
    },
}

impl fmt::Display for DateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateError::InvalidDate { year, month, day } => {
                write!(f, "Invalid date: {}-{}-{}", year, month, day)
            }
            DateError::ParseError(msg) => write!(f, "Date parse error: {}", msg),
            DateError::OutOfRange { date, months } => {
                write!(f, "Date out of range: {} shifted by {} months", date, months)
            }
        }
    }
}

impl std::error::Error for DateError {}

/// Root-finding errors.
///
/// Every variant carries the values a caller needs to diagnose the failure
/// or retry with a different starting point. Bracket endpoints are stored
/// as `f64` regardless of the solver's float type.
///
/// # Examples
///
/// ```
/// use finsolve_core::types::SolverError;
///
/// let err = SolverError::NonConvergence { a: 1.0, b: 2.0, iterations: 100 };
/// assert!(format!("{}", err).contains("100 iterations"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolverError {
    /// Bracket endpoints supplied with `a >= b`.
    #[error("Arguments in wrong order: a = {a} must be less than b = {b}")]
    InvalidBracketOrder {
        /// Lower bracket endpoint as supplied
        a: f64,
        /// Upper bracket endpoint as supplied
        b: f64,
    },

    /// The function values at the endpoints share a sign.
    #[error("No sign change: f({a}) and f({b}) have the same sign")]
    NoSignChange {
        /// Lower bracket endpoint
        a: f64,
        /// Upper bracket endpoint
        b: f64,
    },

    /// Bracket expansion exhausted its budget without a sign change.
    #[error("Unable to bracket root: last tried {last} after {iterations} iterations")]
    UnableToBracket {
        /// The last endpoint evaluated
        last: f64,
        /// Evaluations spent searching
        iterations: usize,
    },

    /// Budget exhausted while the bracket was still wider than the tolerance.
    #[error("Failed to converge after {iterations} iterations: bracket [{a}, {b}]")]
    NonConvergence {
        /// Lower end of the last bracket
        a: f64,
        /// Upper end of the last bracket
        b: f64,
        /// Iterations consumed
        iterations: usize,
    },

    /// The objective returned NaN or infinity.
    #[error("Objective is not finite at x = {x}")]
    NonFiniteEvaluation {
        /// The point where evaluation failed
        x: f64,
    },
}

/// Errors from the financial functions.
///
/// Input validation failures are reported as [`FinancialError::DomainPrecondition`]
/// before any solver runs; solver failures are wrapped with the name of the
/// function that triggered them.
///
/// # Examples
///
/// ```
/// use finsolve_core::types::{FinancialError, SolverError};
///
/// let err = FinancialError::DomainPrecondition {
///     function: "IRR",
///     message: "no cashflows supplied".to_string(),
/// };
/// assert_eq!(format!("{}", err), "IRR: no cashflows supplied");
///
/// let wrapped = FinancialError::Solver {
///     function: "XIRR",
///     source: SolverError::NonFiniteEvaluation { x: -1.0 },
/// };
/// assert!(std::error::Error::source(&wrapped).is_some());
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FinancialError {
    /// Input validation failed.
    #[error("{function}: {message}")]
    DomainPrecondition {
        /// Financial function name (e.g. `"RATE"`)
        function: &'static str,
        /// What was wrong with the input
        message: String,
    },

    /// The solver finished but the answer was not accepted.
    #[error("{function}: no solution found ({reason}), try a different initial guess")]
    NoSolution {
        /// Financial function name
        function: &'static str,
        /// Why the result was rejected
        reason: String,
    },

    /// The underlying solver failed.
    #[error("{function}: {source}")]
    Solver {
        /// Financial function name
        function: &'static str,
        /// Solver failure
        #[source]
        source: SolverError,
    },

    /// Coupon schedule arithmetic failed.
    #[error(transparent)]
    Date(#[from] DateError),
}

impl FinancialError {
    /// Shorthand for a [`FinancialError::DomainPrecondition`].
    pub fn domain(function: &'static str, message: impl Into<String>) -> Self {
        FinancialError::DomainPrecondition {
            function,
            message: message.into(),
        }
    }

    /// Name of the financial function that failed.
    pub fn function(&self) -> &'static str {
        match self {
            FinancialError::DomainPrecondition { function, .. }
            | FinancialError::NoSolution { function, .. }
            | FinancialError::Solver { function, .. } => function,
            FinancialError::Date(_) => "DATE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_error_display() {
        let err = DateError::ParseError("bad".to_string());
        assert_eq!(format!("{}", err), "Date parse error: bad");
    }

    #[test]
    fn test_date_out_of_range_converts() {
        let err: FinancialError = DateError::OutOfRange {
            date: "9999-12-31".to_string(),
            months: 6,
        }
        .into();
        assert_eq!(err.function(), "DATE");
        assert!(format!("{}", err).contains("9999-12-31"));
    }

    #[test]
    fn test_solver_error_display() {
        let err = SolverError::InvalidBracketOrder { a: 2.0, b: 1.0 };
        assert!(format!("{}", err).contains("wrong order"));

        let err = SolverError::NoSignChange { a: 0.0, b: 1.0 };
        assert!(format!("{}", err).contains("same sign"));

        let err = SolverError::UnableToBracket {
            last: 1024.0,
            iterations: 50,
        };
        assert!(format!("{}", err).contains("1024"));
    }

    #[test]
    fn test_financial_error_function_name() {
        let err = FinancialError::domain("RATE", "pmt and pv cannot both be zero");
        assert_eq!(err.function(), "RATE");
        assert!(format!("{}", err).starts_with("RATE: "));

        let err = FinancialError::NoSolution {
            function: "YIELD",
            reason: "bracket too wide".to_string(),
        };
        assert!(format!("{}", err).contains("try a different initial guess"));
    }

    #[test]
    fn test_financial_error_source_chain() {
        use std::error::Error as _;

        let err = FinancialError::Solver {
            function: "IRR",
            source: SolverError::NonFiniteEvaluation { x: -1.0 },
        };
        let source = err.source().map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("Objective is not finite at x = -1"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_solver_error_serde() {
        let err = SolverError::NonConvergence {
            a: 0.5,
            b: 0.75,
            iterations: 100,
        };
        let json = serde_json::to_string(&err).unwrap();
        let back: SolverError = serde_json::from_str(&json).unwrap();
        assert_eq!(err, back);
    }
}
