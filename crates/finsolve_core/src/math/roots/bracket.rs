//! Bracket-expansion search from a single guess.

use super::objective::{evaluate, Objective};
use super::primitives::{lit, sign, to_f64};
use super::result::RootBracket;
use super::toms748::toms748;
use super::SolverConfig;
use crate::types::SolverError;
use num_traits::Float;
use tracing::debug;

/// Number of expansion steps after which the growth factor doubles.
const FACTOR_DOUBLING_INTERVAL: usize = 20;

/// Finds a root from a single guess when no bracket is known.
///
/// The guess is scaled geometrically (multiplied or divided by `factor`)
/// until the objective changes sign; the discovered bracket is then handed
/// to the TOMS748 solver with whatever budget remains. The search direction
/// comes from the sign of `f(guess)` and the `rising` hint, which states
/// whether `f` increases through the root.
///
/// Because the walk is multiplicative, the search never crosses zero: a
/// positive guess finds positive roots and a negative guess negative ones.
///
/// # Example
///
/// ```
/// use finsolve_core::math::roots::{BracketSolver, SolverConfig};
///
/// let solver = BracketSolver::new(SolverConfig::default());
/// let f = |x: f64| x - 5.0;
///
/// let bracket = solver.bracket_and_solve(&f, 1.0, 2.0, true).unwrap();
/// assert!((bracket.midpoint() - 5.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct BracketSolver {
    /// Solver configuration
    config: SolverConfig,
}

impl BracketSolver {
    /// Create a new bracket-expansion solver with the given configuration.
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Create a solver with default configuration.
    pub fn with_defaults() -> Self {
        Self {
            config: SolverConfig::default(),
        }
    }

    /// Search outward from `guess` for a sign change, then solve.
    ///
    /// `factor` must be greater than one; it is doubled every 20 expansion
    /// steps. The budget covers both the search and the TOMS748 phase, and
    /// the returned `iterations` counts every evaluation including the guess.
    ///
    /// When a downward walk shrinks below the smallest positive normal
    /// value, the root is reported as zero with the bracket `(0, a)` or
    /// `(a, 0)`.
    ///
    /// # Errors
    ///
    /// * `UnableToBracket` - budget exhausted before a sign change was seen
    /// * `NonFiniteEvaluation` - `f` returned NaN
    /// * `NonConvergence` - the TOMS748 phase ran out of budget
    pub fn bracket_and_solve<T, F>(
        &self,
        f: &F,
        guess: T,
        factor: T,
        rising: bool,
    ) -> Result<RootBracket<T>, SolverError>
    where
        T: Float,
        F: Objective<T> + ?Sized,
    {
        let budget = self.config.max_iterations;
        let two: T = lit(2.0);
        let mut factor = factor;

        let f_guess = evaluate(f, guess)?;
        let mut used = 1;
        if f_guess == T::zero() {
            return Ok(RootBracket {
                lower: guess,
                upper: guess,
                iterations: used,
            });
        }

        let (mut a, mut b) = (guess, guess);
        let (mut fa, mut fb) = (f_guess, f_guess);

        let walk_up = (fa < T::zero()) == if guess < T::zero() { !rising } else { rising };
        if walk_up {
            // Root lies beyond b: scale b away from zero.
            while sign(fb) == sign(fa) {
                if used >= budget {
                    return Err(unable_to_bracket(b, used));
                }
                if used % FACTOR_DOUBLING_INTERVAL == 0 {
                    factor = factor * two;
                }
                a = b;
                fa = fb;
                b = b * factor;
                fb = evaluate(f, b)?;
                used += 1;
            }
        } else {
            // Root lies between a and zero: scale a toward zero.
            while sign(fb) == sign(fa) {
                if a.abs() < T::min_positive_value() {
                    debug!(
                        a = to_f64(a),
                        iterations = used,
                        "bracket search reached zero"
                    );
                    let (lower, upper) = if a > T::zero() {
                        (T::zero(), a)
                    } else {
                        (a, T::zero())
                    };
                    return Ok(RootBracket {
                        lower,
                        upper,
                        iterations: used,
                    });
                }
                if used >= budget {
                    return Err(unable_to_bracket(a, used));
                }
                if used % FACTOR_DOUBLING_INTERVAL == 0 {
                    factor = factor * two;
                }
                b = a;
                fb = fa;
                a = a / factor;
                fa = evaluate(f, a)?;
                used += 1;
            }
        }

        // For negative guesses the walk produced a > b.
        let (lower, upper, f_lower, f_upper) = if a < T::zero() {
            (b, a, fb, fa)
        } else {
            (a, b, fa, fb)
        };
        debug!(
            lower = to_f64(lower),
            upper = to_f64(upper),
            iterations = used,
            "bracket found"
        );

        let remaining = budget.saturating_sub(used);
        match toms748(
            f,
            lower,
            upper,
            f_lower,
            f_upper,
            self.config.tolerance(),
            remaining,
        ) {
            Ok(mut bracket) => {
                bracket.iterations += used;
                Ok(bracket)
            }
            Err(SolverError::NonConvergence { a, b, iterations }) => {
                Err(SolverError::NonConvergence {
                    a,
                    b,
                    iterations: iterations + used,
                })
            }
            Err(other) => Err(other),
        }
    }

    /// Returns a reference to the solver configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }
}

fn unable_to_bracket<T: Float>(last: T, iterations: usize) -> SolverError {
    debug!(last = to_f64(last), iterations, "bracket search exhausted");
    SolverError::UnableToBracket {
        last: to_f64(last),
        iterations,
    }
}
