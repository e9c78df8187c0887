//! Nonlinear root-finding core.
//!
//! Every financial function without a closed-form inverse (RATE, IRR,
//! XIRR, YIELD, ODDFYIELD) is solved by one of the algorithms here.
//!
//! ## Available Solvers
//!
//! ### Bracketing
//!
//! - [`Toms748Solver`]: Primary algorithm; secant, inverse quadratic and
//!   inverse cubic interpolation with a bisection safeguard
//! - [`BisectionSolver`]: One bit per evaluation; the simple fallback
//! - [`BracketSolver`]: Walks outward from a single guess until the sign
//!   changes, then hands over to TOMS748
//!
//! ### Derivative-Based
//!
//! - [`NewtonRaphsonSolver`]: First derivative, clamped to a shrinking bracket
//! - [`HalleySolver`]: Second derivative, with overflow and stall guards
//!
//! ## Configuration
//!
//! All solvers use [`SolverConfig`] for configuring:
//! - `digits`: Requested precision in bits (default: 53)
//! - `max_iterations`: Iteration budget (default: 100)
//!
//! Bracketing solvers terminate on the relative criterion of
//! [`EpsTolerance`] and return a [`RootBracket`]; iterators return a
//! [`RootEstimate`]. Budget exhaustion is reported as
//! `SolverError::NonConvergence` with the last bracket, never as a panic.
//!
//! ## Objectives
//!
//! Any closure `Fn(T) -> T` is an [`Objective`]; closures returning
//! `(f, f')` or `(f, f', f'')` feed the iterators. With the default
//! `num-dual-mode` feature, [`DualObjective`] and [`Dual2Objective`] supply
//! derivatives by automatic differentiation.
//!
//! ## Examples
//!
//! ```
//! use finsolve_core::math::roots::{BracketSolver, SolverConfig, Toms748Solver};
//!
//! // Known bracket
//! let solver = Toms748Solver::new(SolverConfig::default());
//! let bracket = solver.solve(&|x: f64| x * x - 2.0, 0.0, 2.0).unwrap();
//! assert!((bracket.midpoint() - std::f64::consts::SQRT_2).abs() < 1e-12);
//!
//! // Single guess
//! let search = BracketSolver::new(SolverConfig::default());
//! let bracket = search.bracket_and_solve(&|x: f64| x - 5.0, 1.0, 2.0, true).unwrap();
//! assert!((bracket.midpoint() - 5.0).abs() < 1e-12);
//! ```

mod bisection;
mod bracket;
mod config;
mod halley;
mod newton_raphson;
mod objective;
mod primitives;
mod result;
mod tolerance;
mod toms748;

// Re-export public types at module level
pub use bisection::BisectionSolver;
pub use bracket::BracketSolver;
pub use config::SolverConfig;
pub use halley::HalleySolver;
pub use newton_raphson::NewtonRaphsonSolver;
#[cfg(feature = "num-dual-mode")]
pub use objective::{Dual2Objective, DualObjective};
pub use objective::{FirstOrderObjective, Objective, SecondOrderObjective};
pub use primitives::{frexp, ldexp, safe_div, sign};
pub use result::{RootBracket, RootEstimate};
pub use tolerance::EpsTolerance;
pub use toms748::Toms748Solver;
