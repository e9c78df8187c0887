//! # finsolve_core: Root Finding for Spreadsheet Financial Functions
//!
//! ## Layers
//!
//! - `math::roots`: numeric primitives, the objective-function traits and
//!   five solvers (bisection, TOMS748, bracket expansion, Newton-Raphson,
//!   Halley)
//! - `types`: dates, day-count bases, coupon frequencies and the error types
//!   (`SolverError`, `FinancialError`, `DateError`)
//! - `financial`: closed-form functions (FV, NPV, PRICE, ODDFPRICE, ...) and
//!   the rate adapters that invert them (RATE, IRR, XIRR, YIELD, ODDFYIELD)
//!
//! ## Dependencies
//!
//! - num-traits: Generic floating-point solvers
//! - num-dual: Derivatives for the Newton-Raphson and Halley objectives (optional)
//! - chrono: Date arithmetic
//! - thiserror: Error types
//! - tracing: Diagnostic events from the solvers and adapters
//! - serde: Serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use finsolve_core::financial::{irr, rate, CouponBond, RateSolver};
//! use finsolve_core::math::roots::{SolverConfig, Toms748Solver};
//! use finsolve_core::types::{Date, DayCountBasis, Frequency};
//!
//! // Bracketed root
//! let solver = Toms748Solver::new(SolverConfig::default());
//! let bracket = solver.solve(&|x: f64| x * x * x - 8.0, 0.0, 5.0).unwrap();
//! assert!((bracket.midpoint() - 2.0).abs() < 1e-12);
//!
//! // Cashflow rates
//! let r = irr(&[-100.0, 60.0, 60.0, 60.0]).unwrap();
//! # assert!((r - 0.363096539).abs() < 1e-9);
//! let monthly = rate(48.0, -200.0, 8000.0, 0.0, false, 0.1).unwrap();
//! # assert!((monthly - 0.0077014725).abs() < 1e-9);
//!
//! // Bond yield
//! let bond = CouponBond {
//!     settlement: Date::from_ymd(2008, 2, 15).unwrap(),
//!     maturity: Date::from_ymd(2016, 11, 15).unwrap(),
//!     rate: 0.0575,
//!     redemption: 100.0,
//!     frequency: Frequency::SemiAnnual,
//!     basis: DayCountBasis::UsThirty360,
//! };
//! let yld = RateSolver::with_defaults().yield_to_maturity(&bond, 95.04287).unwrap();
//! assert!((yld - 0.065).abs() < 1e-6);
//! ```
//!
//! ## Feature Flags
//!
//! - `num-dual-mode` (default): `DualObjective` and `Dual2Objective` for
//!   automatic derivatives
//! - `serde` (default): Enable serialisation for dates, bases, cashflows,
//!   bonds, accumulators and solver errors

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod financial;
pub mod math;
pub mod types;
