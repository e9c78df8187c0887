//! Newton-Raphson root-finding iterator.

use super::objective::FirstOrderObjective;
use super::primitives::{ldexp, lit, sign, to_f64};
use super::result::RootEstimate;
use super::toms748::check_order;
use super::SolverConfig;
use crate::types::SolverError;
use num_traits::Float;
use tracing::{debug, trace};

/// Newton-Raphson root finder with bracket safeguards.
///
/// Uses Newton's method: `x_{n+1} = x_n - f(x_n) / f'(x_n)`, while keeping
/// the iterate inside `[min, max]`. The bracket is tightened after every
/// step from the sign of the correction, so even without an initial sign
/// change it acts as a safety net:
///
/// - oscillating steps (`|2 * delta| > |delta2|`) are replaced by bisection
///   toward the bound implied by the step direction
/// - steps that would leave `[min, max]` become half-steps toward the bound
/// - a zero derivative is handled by a pretend evaluation at the opposite
///   bound to pick a safe direction
///
/// Iteration stops when the relative step drops below `2^(1 - digits)`.
///
/// # Example
///
/// ```
/// use finsolve_core::math::roots::{NewtonRaphsonSolver, SolverConfig};
///
/// let solver = NewtonRaphsonSolver::new(SolverConfig::default());
///
/// // Solve x² - 2 = 0 (find √2)
/// let f = |x: f64| (x * x - 2.0, 2.0 * x);
///
/// let estimate = solver.iterate(&f, 1.0, 0.0, 2.0).unwrap();
/// assert!((estimate.root - std::f64::consts::SQRT_2).abs() < 1e-14);
/// ```
#[derive(Debug, Clone)]
pub struct NewtonRaphsonSolver {
    /// Solver configuration
    config: SolverConfig,
}

impl NewtonRaphsonSolver {
    /// Create a new Newton-Raphson solver with the given configuration.
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
    /// * `Err(SolverError::NonFiniteEvaluation)` - `f` or `f'` is not finite
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
        F: FirstOrderObjective<T> + ?Sized,
    {
        check_order(min, max)?;

        let factor = step_tolerance::<T>(self.config.digits);
        let half: T = lit(0.5);
        let two: T = lit(2.0);

        let mut min = min;
        let mut max = max;
        let mut result = guess;
        let mut previous;
        let mut f0 = T::zero();
        let mut last_f0;
        let mut delta = T::one();
        let mut delta1 = T::max_value();
        let mut delta2;
        let mut count = self.config.max_iterations;
        let mut iterations = 0;

        loop {
            last_f0 = f0;
            delta2 = delta1;
            delta1 = delta;

            let (value, derivative) = f.value_and_derivative(result);
            iterations += 1;
            if !value.is_finite() || derivative.is_nan() {
                return Err(SolverError::NonFiniteEvaluation { x: to_f64(result) });
            }
            f0 = value;
            if f0 == T::zero() {
                break;
            }

            delta = if derivative == T::zero() {
                let value_at = |x: T| f.value_and_derivative(x).0;
                zero_derivative_step(value_at, last_f0, f0, delta, result, min, max)
            } else {
                f0 / derivative
            };

            if (delta * two).abs() > delta2.abs() {
                // Last two steps have not converged: bisect instead.
                delta = if delta > T::zero() {
                    (result - min) / two
                } else {
                    (result - max) / two
                };
            }

            previous = result;
            result = result - delta;
            if result <= min {
                delta = half * (previous - min);
                result = previous - delta;
                if result == min || result == max {
                    break;
                }
            } else if result >= max {
                delta = half * (previous - max);
                result = previous - delta;
                if result == min || result == max {
                    break;
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
                "newton step"
            );

            count = count.saturating_sub(1);
            if (result * factor).abs() >= delta.abs() {
                break;
            }
            if count == 0 {
                debug!(iterations, "newton budget exhausted");
                return Err(SolverError::NonConvergence {
                    a: to_f64(min),
                    b: to_f64(max),
                    iterations,
                });
            }
        }

        debug!(root = to_f64(result), iterations, "newton converged");
        Ok(RootEstimate {
            root: result,
            iterations,
        })
    }

    /// Iterate using a derivative obtained by automatic differentiation.
    ///
    /// `f` is written over [`num_dual::Dual64`]; the derivative is read
    /// from the dual part, so no hand-written `f'` is needed.
    ///
    /// # Example
    ///
    /// ```
    /// use finsolve_core::math::roots::{NewtonRaphsonSolver, SolverConfig};
    /// use num_dual::Dual64;
    ///
    /// let solver = NewtonRaphsonSolver::new(SolverConfig::default());
    ///
    /// // Solve x² - 2 = 0 using AD
    /// let f = |x: Dual64| x * x - Dual64::from(2.0);
    ///
    /// let estimate = solver.iterate_ad(f, 1.0, 0.0, 2.0).unwrap();
    /// assert!((estimate.root - std::f64::consts::SQRT_2).abs() < 1e-14);
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
        F: Fn(num_dual::Dual64) -> num_dual::Dual64,
    {
        self.iterate(&super::objective::DualObjective::new(f), guess, min, max)
    }

    /// Returns a reference to the solver configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }
}

/// Relative step size `2^(1 - digits)` below which the iterators stop.
pub(crate) fn step_tolerance<T: Float>(digits: u32) -> T {
    let digits = i32::try_from(digits).unwrap_or(i32::MAX);
    ldexp(T::one(), 1_i32.saturating_sub(digits))
}

/// Picks a step when `f'(result) == 0`.
///
/// On the first step there is no previous value, so one is synthesised by
/// evaluating `f` at the bound opposite `result`. If the sign of `f` flipped
/// since the previous point the step reverses direction, otherwise it keeps
/// going; either way it moves halfway to the bound.
pub(crate) fn zero_derivative_step<T, V>(
    value_at: V,
    last_f0: T,
    f0: T,
    delta: T,
    result: T,
    min: T,
    max: T,
) -> T
where
    T: Float,
    V: Fn(T) -> T,
{
    let two: T = lit(2.0);
    let mut last_f0 = last_f0;
    let mut delta = delta;

    if last_f0 == T::zero() {
        let pretend = if result == min { max } else { min };
        last_f0 = value_at(pretend);
        delta = pretend - result;
    }

    let crossed = sign(last_f0) * sign(f0) < 0;
    match (crossed, delta < T::zero()) {
        (true, true) | (false, false) => (result - min) / two,
        (true, false) | (false, true) => (result - max) / two,
    }
}
