//! Bisection root-finding solver.

use super::objective::{evaluate, Objective};
use super::primitives::{lit, sign, to_f64};
use super::result::RootBracket;
use super::SolverConfig;
use crate::types::SolverError;
use num_traits::Float;
use tracing::debug;

/// Bracket-halving root finder.
///
/// Gains one bit of precision per evaluation and never leaves the supplied
/// bracket. Used as the safety fallback; [`super::Toms748Solver`] is the
/// primary strategy.
///
/// # Example
///
/// ```
/// use finsolve_core::math::roots::{BisectionSolver, SolverConfig};
///
/// let solver = BisectionSolver::new(SolverConfig::new(40, 100));
///
/// // Solve x³ - x - 2 = 0 in bracket [1, 2]
/// let f = |x: f64| x * x * x - x - 2.0;
///
/// let bracket = solver.solve(&f, 1.0, 2.0).unwrap();
/// assert!((bracket.midpoint() - 1.5213797068).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct BisectionSolver {
    /// Solver configuration
    config: SolverConfig,
}

impl BisectionSolver {
    /// Create a new bisection solver with the given configuration.
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Create a solver with default configuration.
    pub fn with_defaults() -> Self {
        Self {
            config: SolverConfig::default(),
        }
    }

    /// Narrow `[min, max]` around a root of `f`.
    ///
    /// Both endpoints are evaluated and count against the budget. An
    /// endpoint that is exactly a root is returned as a zero-width bracket.
    ///
    /// # Errors
    ///
    /// * `InvalidBracketOrder` - `min >= max` (checked before any evaluation)
    /// * `NoSignChange` - `f(min)` and `f(max)` share a sign
    /// * `NonFiniteEvaluation` - `f` returned NaN
    /// * `NonConvergence` - budget exhausted before the bracket became tolerant
    pub fn solve<T, F>(&self, f: &F, min: T, max: T) -> Result<RootBracket<T>, SolverError>
    where
        T: Float,
        F: Objective<T> + ?Sized,
    {
        if !(min < max) {
            return Err(SolverError::InvalidBracketOrder {
                a: to_f64(min),
                b: to_f64(max),
            });
        }

        let tol = self.config.tolerance::<T>();
        let budget = self.config.max_iterations;

        let mut min = min;
        let mut max = max;
        let mut fmin = evaluate(f, min)?;
        if fmin == T::zero() {
            return Ok(collapsed(min, 1));
        }
        let fmax = evaluate(f, max)?;
        if fmax == T::zero() {
            return Ok(collapsed(max, 2));
        }
        if sign(fmin) * sign(fmax) >= 0 {
            return Err(SolverError::NoSignChange {
                a: to_f64(min),
                b: to_f64(max),
            });
        }

        let half: T = lit(0.5);
        let mut used = 2;
        while !tol.tolerant(min, max) {
            if used >= budget {
                debug!(iterations = used, "bisection budget exhausted");
                return Err(SolverError::NonConvergence {
                    a: to_f64(min),
                    b: to_f64(max),
                    iterations: used,
                });
            }

            let mid = min + (max - min) * half;
            if mid == min || mid == max {
                // Adjacent floats: no further halving possible.
                break;
            }
            let fmid = evaluate(f, mid)?;
            used += 1;

            if fmid == T::zero() {
                min = mid;
                max = mid;
                break;
            }
            if sign(fmid) * sign(fmin) < 0 {
                max = mid;
            } else {
                min = mid;
                fmin = fmid;
            }
        }

        debug!(iterations = used, "bisection converged");
        Ok(RootBracket {
            lower: min,
            upper: max,
            iterations: used,
        })
    }

    /// Returns a reference to the solver configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }
}

fn collapsed<T: Float>(x: T, iterations: usize) -> RootBracket<T> {
    RootBracket {
        lower: x,
        upper: x,
        iterations,
    }
}
