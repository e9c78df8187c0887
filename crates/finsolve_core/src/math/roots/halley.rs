//! Halley root-finding iterator.

use super::newton_raphson::{step_tolerance, zero_derivative_step};
use super::objective::SecondOrderObjective;
use super::primitives::{lit, to_f64};
use super::result::RootEstimate;
use super::toms748::check_order;
use super::SolverConfig;
use crate::types::SolverError;
use num_traits::Float;
use tracing::{debug, trace};

/// Halley root finder.
///
/// Uses `f`, `f'` and `f''` for cubic local convergence:
/// `delta = 2 f f' / (2 f'^2 - f f'')`. Falls back to a Newton step when
/// that quotient would overflow, or when its sign disagrees with the
/// Newton direction (a symptom of cancellation error).
///
/// Shares the bracket safeguards of [`super::NewtonRaphsonSolver`], with two
/// additions:
///
/// - a stall band: if `|delta / delta2|` lies in `(0.8, 2)` the step is
///   replaced by bisection (never larger than `|x|` itself)
/// - a one-shot sentry: the first small overshoot of a bound (within a
///   factor of three) moves 99% of the way to that bound instead of halving
///
/// The zero-derivative step is taken whenever `f' == 0`, whatever `f''` is.
/// A vanishing `f'` with a nonzero `f''` would otherwise reach the Halley
/// quotient through `f'' / f'`.
///
/// # Example
///
/// ```
/// use finsolve_core::math::roots::{HalleySolver, SolverConfig};
///
/// let solver = HalleySolver::new(SolverConfig::default());
///
/// // Cube root of 10
/// let f = |x: f64| (x * x * x - 10.0, 3.0 * x * x, 6.0 * x);
///
/// let estimate = solver.iterate(&f, 2.0, 1.0, 3.0).unwrap();
/// assert!((estimate.root - 10.0_f64.cbrt()).abs() < 1e-14);
/// ```
#[derive(Debug, Clone)]
pub struct HalleySolver {
    /// Solver configuration
    config: SolverConfig,
}

impl HalleySolver {
    /// Create a new Halley solver with the given configuration.
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Create a solver with default configuration.
    pub fn with_defaults() -> Self {
        Self {
            config: SolverConfig::default(),
        }
    }

    /// Iterate from `guess` within the hard bounds `[min, max]`.
    ///
    /// # Returns
    ///
    /// * `Ok(RootEstimate)` - converged estimate and steps taken
    /// * `Err(SolverError::InvalidBracketOrder)` - `min >= max`
    /// * `Err(SolverError::NonFiniteEvaluation)` - `f` is not finite or a
    ///   derivative is NaN
    /// * `Err(SolverError::NonConvergence)` - budget exhausted while steps
    ///   were still larger than the requested precision
    pub fn iterate<T, F>(
        &self,
        f: &F,
        guess: T,
        min: T,
        max: T,
    ) -> Result<RootEstimate<T>, SolverError>
    where
        T: Float,
        F: SecondOrderObjective<T> + ?Sized,
    {
        check_order(min, max)?;

        let factor = step_tolerance::<T>(self.config.digits);
        let two: T = lit(2.0);
        let large: T = lit(1e7);

        let mut min = min;
        let mut max = max;
        let mut result = guess;
        let mut previous;
        let mut f0 = T::zero();
        let mut last_f0;
        // Arbitrarily large so the first step is never seen as stalling.
        let mut delta = (large * guess).max(large);
        let mut delta1 = delta;
        let mut delta2;
        let mut out_of_bounds_sentry = false;
        let mut count = self.config.max_iterations;
        let mut iterations = 0;

        loop {
            last_f0 = f0;
            delta2 = delta1;
            delta1 = delta;

            let (value, f1, f2) = f.value_and_derivatives(result);
            iterations += 1;
            if !value.is_finite() || f1.is_nan() || f2.is_nan() {
                return Err(SolverError::NonFiniteEvaluation { x: to_f64(result) });
            }
            f0 = value;
            if f0 == T::zero() {
                break;
            }

            delta = if f1 == T::zero() {
                let value_at = |x: T| f.value_and_derivatives(x).0;
                zero_derivative_step(value_at, last_f0, f0, delta, result, min, max)
            } else if f2 != T::zero() {
                halley_step(f0, f1, f2)
            } else {
                f0 / f1
            };

            let convergence = (delta / delta2).abs();
            if convergence > lit(0.8) && convergence < two {
                // Stalling: bisect, but never jump further than |x|.
                delta = if delta > T::zero() {
                    (result - min) / two
                } else {
                    (result - max) / two
                };
                if delta.abs() > result.abs() {
                    delta = if delta > T::zero() {
                        result.abs()
                    } else {
                        -result.abs()
                    };
                }
                // Next step compares against this value: keep it out of the band.
                delta1 = delta * lit(3.0);
            }

            previous = result;
            result = result - delta;

            if result < min || result > max {
                let bound = if result < min { min } else { max };
                let diff = overshoot_ratio(result, bound);
                if !out_of_bounds_sentry && diff > T::zero() && diff < lit(3.0) {
                    // Small overshoot: the root is probably near the bound.
                    delta = lit::<T>(0.99) * (previous - bound);
                    result = previous - delta;
                    out_of_bounds_sentry = true;
                } else {
                    delta = (previous - bound) / two;
                    result = previous - delta;
                    if result == min || result == max {
                        break;
                    }
                }
            }

            if delta > T::zero() {
                max = previous;
            } else {
                min = previous;
            }
            trace!(
                result = to_f64(result),
                delta = to_f64(delta),
                "halley step"
            );

            count = count.saturating_sub(1);
            if (result * factor).abs() >= delta.abs() {
                break;
            }
            if count == 0 {
                debug!(iterations, "halley budget exhausted");
                return Err(SolverError::NonConvergence {
                    a: to_f64(min),
                    b: to_f64(max),
                    iterations,
                });
            }
        }

        debug!(root = to_f64(result), iterations, "halley converged");
        Ok(RootEstimate {
            root: result,
            iterations,
        })
    }

    /// Iterate using derivatives obtained by automatic differentiation.
    ///
    /// `f` is written over [`num_dual::Dual2_64`], which carries the first
    /// and second derivatives alongside the value.
    ///
    /// # Example
    ///
    /// ```
    /// use finsolve_core::math::roots::{HalleySolver, SolverConfig};
    /// use num_dual::{Dual2_64, DualNum};
    ///
    /// let solver = HalleySolver::new(SolverConfig::default());
    /// let f = |x: Dual2_64| x.exp() - Dual2_64::from(5.0);
    ///
    /// let estimate = solver.iterate_ad(f, 1.0, 0.0, 3.0).unwrap();
    /// assert!((estimate.root - 5.0_f64.ln()).abs() < 1e-14);
    /// ```
    #[cfg(feature = "num-dual-mode")]
    pub fn iterate_ad<F>(
        &self,
        f: F,
        guess: f64,
        min: f64,
        max: f64,
    ) -> Result<RootEstimate<f64>, SolverError>
    where
        F: Fn(num_dual::Dual2_64) -> num_dual::Dual2_64,
    {
        self.iterate(&super::objective::Dual2Objective::new(f), guess, min, max)
    }

    /// Returns a reference to the solver configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }
}

/// Halley correction, falling back to Newton on overflow or sign conflict.
fn halley_step<T: Float>(f0: T, f1: T, f2: T) -> T {
    let two: T = lit(2.0);
    let denom = two * f0;
    let num = two * f1 - f0 * (f2 / f1);

    let delta = if num.abs() < T::one() && denom.abs() >= num.abs() * T::max_value() {
        f0 / f1
    } else {
        denom / num
    };

    if delta * f1 / f0 < T::zero() {
        f0 / f1
    } else {
        delta
    }
}

/// How far `result` overshot `bound`, as a ratio whose magnitude is at
/// least one (or `1000` where `result / bound` would overflow).
fn overshoot_ratio<T: Float>(result: T, bound: T) -> T {
    let overflow = bound.abs() < T::one() && result.abs() > T::max_value() * bound.abs();
    let diff = if overflow { lit(1000.0) } else { result / bound };
    if diff.abs() < T::one() {
        T::one() / diff
    } else {
        diff
    }
}
