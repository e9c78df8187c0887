//! Core date and error types.
//!
//! This module provides:
//! - `time`: Date wrapper, day-count bases and coupon frequencies
//! - `error`: Structured error types for dates, the solvers and the financial functions
//!
//! # Re-exports
//!
//! For convenience, commonly used types are re-exported at this module level:
//! - [`Date`], [`DayCountBasis`], [`Frequency`] from `time`
//! - [`DateError`], [`SolverError`], [`FinancialError`] from `error`

pub mod error;
pub mod time;

// Re-export commonly used types at module level
pub use error::{DateError, FinancialError, SolverError};
pub use time::{Date, DayCountBasis, Frequency};
