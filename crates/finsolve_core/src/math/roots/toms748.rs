//! TOMS748 hybrid bracketing solver.
//!
//! Alefeld, Potra and Shi, "Algorithm 748: Enclosing Zeros of Continuous
//! Functions" (ACM TOMS, 1995). Each cycle combines inverse cubic (or
//! quadratic) interpolation, a double-length secant step and, when the
//! bracket has not halved, a forced bisection.

use super::objective::{evaluate, Objective};
use super::primitives::{lit, safe_div, sign, to_f64};
use super::result::RootBracket;
use super::tolerance::EpsTolerance;
use super::SolverConfig;
use crate::types::SolverError;
use num_traits::Float;
use tracing::{debug, trace};

/// TOMS748 root finder.
///
/// Requires a sign-changing bracket and never evaluates outside it. Every
/// evaluation of the objective consumes one unit of the iteration budget.
///
/// # Example
///
/// ```
/// use finsolve_core::math::roots::{SolverConfig, Toms748Solver};
///
/// let solver = Toms748Solver::new(SolverConfig::default());
///
/// // Solve x² - 2 = 0 in bracket [0, 2]
/// let f = |x: f64| x * x - 2.0;
///
/// let bracket = solver.solve(&f, 0.0, 2.0).unwrap();
/// assert!((bracket.midpoint() - std::f64::consts::SQRT_2).abs() < 1e-12);
/// assert!(bracket.iterations < 30);
/// ```
#[derive(Debug, Clone)]
pub struct Toms748Solver {
    /// Solver configuration
    config: SolverConfig,
}

impl Toms748Solver {
    /// Create a new TOMS748 solver with the given configuration.
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Create a solver with default configuration.
    pub fn with_defaults() -> Self {
        Self {
            config: SolverConfig::default(),
        }
    }

    /// Narrow `[a, b]` around a root of `f`.
    ///
    /// Evaluates both endpoints (counted against the budget) and then
    /// proceeds as [`Toms748Solver::solve_bracketed`].
    ///
    /// # Errors
    ///
    /// * `InvalidBracketOrder` - `a >= b` (checked before any evaluation)
    /// * `NoSignChange` - `f(a)` and `f(b)` are nonzero with the same sign
    /// * `NonFiniteEvaluation` - `f` returned NaN
    /// * `NonConvergence` - budget exhausted before the bracket became tolerant
    pub fn solve<T, F>(&self, f: &F, a: T, b: T) -> Result<RootBracket<T>, SolverError>
    where
        T: Float,
        F: Objective<T> + ?Sized,
    {
        check_order(a, b)?;
        let fa = evaluate(f, a)?;
        let fb = evaluate(f, b)?;
        let budget = self.config.max_iterations.saturating_sub(2);
        match toms748(f, a, b, fa, fb, self.config.tolerance(), budget) {
            Ok(mut bracket) => {
                bracket.iterations += 2;
                Ok(bracket)
            }
            Err(SolverError::NonConvergence { a, b, iterations }) => {
                Err(SolverError::NonConvergence {
                    a,
                    b,
                    iterations: iterations + 2,
                })
            }
            Err(other) => Err(other),
        }
    }

    /// Narrow `[a, b]` given the already known `fa = f(a)` and `fb = f(b)`.
    ///
    /// Returns immediately if either value is exactly zero (collapsing the
    /// bracket onto that endpoint) or if the bracket is already tolerant.
    ///
    /// # Errors
    ///
    /// Same as [`Toms748Solver::solve`].
    pub fn solve_bracketed<T, F>(
        &self,
        f: &F,
        a: T,
        b: T,
        fa: T,
        fb: T,
    ) -> Result<RootBracket<T>, SolverError>
    where
        T: Float,
        F: Objective<T> + ?Sized,
    {
        toms748(
            f,
            a,
            b,
            fa,
            fb,
            self.config.tolerance(),
            self.config.max_iterations,
        )
    }

    /// Returns a reference to the solver configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }
}

pub(crate) fn check_order<T: Float>(a: T, b: T) -> Result<(), SolverError> {
    if a < b {
        Ok(())
    } else {
        Err(SolverError::InvalidBracketOrder {
            a: to_f64(a),
            b: to_f64(b),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Interpolation {
    Quadratic,
    Cubic,
}

/// Working state: the bracket `(a, b)` plus the retained third and fourth
/// best points `d` and `e`, which always lie outside `(a, b)`.
struct State<T> {
    a: T,
    b: T,
    d: T,
    e: T,
    fa: T,
    fb: T,
    fd: T,
    fe: T,
}

impl<T: Float> State<T> {
    /// Evaluates `c` (nudged off the endpoints) and shrinks the bracket
    /// around the sign change. The discarded endpoint becomes `d`.
    ///
    /// A bracket narrower than a few ulps of `|a|` is bisected instead, so
    /// brackets on the negative axis keep shrinking too.
    fn bracket<F>(&mut self, f: &F, c: T) -> Result<(), SolverError>
    where
        F: Objective<T> + ?Sized,
    {
        let tol = lit::<T>(2.0) * T::epsilon();
        let (a, b) = (self.a, self.b);

        let c = if (b - a) < lit::<T>(2.0) * tol * a.abs() {
            a + (b - a) / lit(2.0)
        } else if c <= a + a.abs() * tol {
            a + a.abs() * tol
        } else if c >= b - b.abs() * tol {
            b - b.abs() * tol
        } else {
            c
        };

        let fc = evaluate(f, c)?;
        trace!(c = to_f64(c), fc = to_f64(fc), "toms748 evaluation");

        if fc == T::zero() {
            self.a = c;
            self.fa = T::zero();
            self.d = T::zero();
            self.fd = T::zero();
            return Ok(());
        }

        if sign(self.fa) * sign(fc) < 0 {
            self.d = self.b;
            self.fd = self.fb;
            self.b = c;
            self.fb = fc;
        } else {
            self.d = self.a;
            self.fd = self.fa;
            self.a = c;
            self.fa = fc;
        }
        Ok(())
    }

    fn secant(&self) -> T {
        secant_interpolate(self.a, self.b, self.fa, self.fb)
    }

    fn quadratic(&self, newton_steps: usize) -> T {
        let (a, b, d) = (self.a, self.b, self.d);
        let (fa, fb, fd) = (self.fa, self.fb, self.fd);

        // Coefficients of the interpolating quadratic through (a, b, d).
        let big_b = safe_div(fb - fa, b - a, T::max_value());
        let big_a = safe_div(fd - fb, d - b, T::max_value());
        let big_a = safe_div(big_a - big_b, d - a, T::zero());

        if big_a == T::zero() {
            return self.secant();
        }

        let mut c = if sign(big_a) * sign(fa) > 0 { a } else { b };
        let two: T = lit(2.0);
        for _ in 0..newton_steps {
            let value = fa + (big_b + big_a * (c - b)) * (c - a);
            let slope = big_b + big_a * (two * c - a - b);
            c = c - safe_div(value, slope, T::one() + c - a);
        }

        if c > a && c < b {
            c
        } else {
            self.secant()
        }
    }

    fn cubic(&self) -> T {
        let (a, b, d, e) = (self.a, self.b, self.d, self.e);
        let (fa, fb, fd, fe) = (self.fa, self.fb, self.fd, self.fe);

        // Inverse cubic interpolation through the four retained points.
        let q11 = (d - e) * fd / (fe - fd);
        let q21 = (b - d) * fb / (fd - fb);
        let q31 = (a - b) * fa / (fb - fa);
        let d21 = (b - d) * fd / (fd - fb);
        let d31 = (a - b) * fb / (fb - fa);

        let q22 = (d21 - q11) * fb / (fe - fb);
        let q32 = (d31 - q21) * fa / (fd - fa);
        let d32 = (d31 - q21) * fd / (fd - fa);
        let q33 = (d32 - q22) * fa / (fe - fa);

        let c = q31 + q32 + q33 + a;
        if c > a && c < b {
            c
        } else {
            self.quadratic(3)
        }
    }

    /// Interpolation order the current values allow. Read afresh before
    /// every interpolation step, since each rebracket replaces the values.
    fn interpolation(&self) -> Interpolation {
        if self.nearly_coincident() {
            Interpolation::Quadratic
        } else {
            Interpolation::Cubic
        }
    }

    /// Interpolated trial point; a quadratic fit takes `newton_steps`
    /// Newton substeps.
    fn interpolate(&self, newton_steps: usize) -> T {
        match self.interpolation() {
            Interpolation::Quadratic => self.quadratic(newton_steps),
            Interpolation::Cubic => self.cubic(),
        }
    }

    /// True when two of the retained function values are too close for the
    /// cubic fit to be well conditioned.
    fn nearly_coincident(&self) -> bool {
        let min_diff = lit::<T>(32.0) * T::epsilon();
        let (fa, fb, fd, fe) = (self.fa, self.fb, self.fd, self.fe);
        (fa - fb).abs() < min_diff
            || (fa - fd).abs() < min_diff
            || (fa - fe).abs() < min_diff
            || (fb - fd).abs() < min_diff
            || (fb - fe).abs() < min_diff
            || (fd - fe).abs() < min_diff
    }

    fn retire_d(&mut self) {
        self.e = self.d;
        self.fe = self.fd;
    }

    fn done(&self, tol: &EpsTolerance<T>) -> bool {
        self.fa == T::zero() || tol.tolerant(self.a, self.b)
    }
}

fn secant_interpolate<T: Float>(a: T, b: T, fa: T, fb: T) -> T {
    let tol = lit::<T>(5.0) * T::epsilon();
    let c = a - (fa / (fb - fa)) * (b - a);
    if c > a + a.abs() * tol && c < b - b.abs() * tol {
        c
    } else {
        (a + b) / lit(2.0)
    }
}

/// Core of the solver, shared with the bracket-expansion search.
///
/// `budget` caps the number of interior evaluations; the returned
/// `iterations` counts only those.
pub(crate) fn toms748<T, F>(
    f: &F,
    a: T,
    b: T,
    fa: T,
    fb: T,
    tol: EpsTolerance<T>,
    budget: usize,
) -> Result<RootBracket<T>, SolverError>
where
    T: Float,
    F: Objective<T> + ?Sized,
{
    check_order(a, b)?;

    if fa == T::zero() {
        return Ok(RootBracket {
            lower: a,
            upper: a,
            iterations: 0,
        });
    }
    if fb == T::zero() {
        return Ok(RootBracket {
            lower: b,
            upper: b,
            iterations: 0,
        });
    }
    if tol.tolerant(a, b) {
        return Ok(RootBracket {
            lower: a,
            upper: b,
            iterations: 0,
        });
    }
    if sign(fa) * sign(fb) > 0 {
        return Err(SolverError::NoSignChange {
            a: to_f64(a),
            b: to_f64(b),
        });
    }

    let sentinel: T = lit(1e5);
    let mut s = State {
        a,
        b,
        d: sentinel,
        e: sentinel,
        fa,
        fb,
        fd: sentinel,
        fe: sentinel,
    };
    let mu: T = lit(0.5);
    let mut count = budget;

    if count > 0 {
        // Secant step first.
        let c = s.secant();
        s.bracket(f, c)?;
        count -= 1;

        // Then quadratic interpolation with two Newton substeps.
        if count > 0 && !s.done(&tol) {
            let c = s.quadratic(2);
            s.retire_d();
            s.bracket(f, c)?;
            count -= 1;
        }
    }

    while count > 0 && !s.done(&tol) {
        let (a0, b0) = (s.a, s.b);

        let c = s.interpolate(2);
        s.retire_d();
        s.bracket(f, c)?;
        count -= 1;
        if count == 0 || s.done(&tol) {
            break;
        }

        let c = s.interpolate(3);
        s.bracket(f, c)?;
        count -= 1;
        if count == 0 || s.done(&tol) {
            break;
        }

        // Double-length secant step from the endpoint with the smaller |f|.
        let (u, fu) = if s.fa.abs() < s.fb.abs() {
            (s.a, s.fa)
        } else {
            (s.b, s.fb)
        };
        let half_width = (s.b - s.a) / lit(2.0);
        let mut c = u - lit::<T>(2.0) * (fu / (s.fb - s.fa)) * (s.b - s.a);
        if !((c - u).abs() <= half_width) {
            c = s.a + half_width;
        }
        s.retire_d();
        s.bracket(f, c)?;
        count -= 1;
        if count == 0 || s.done(&tol) {
            break;
        }

        // Force a bisection if the cycle did not halve the bracket.
        if (s.b - s.a) < mu * (b0 - a0) {
            continue;
        }
        s.retire_d();
        let mid = s.a + (s.b - s.a) / lit(2.0);
        s.bracket(f, mid)?;
        count -= 1;
    }

    let iterations = budget - count;

    if s.fa == T::zero() {
        s.b = s.a;
    } else if s.fb == T::zero() {
        s.a = s.b;
    } else if !tol.tolerant(s.a, s.b) {
        debug!(
            a = to_f64(s.a),
            b = to_f64(s.b),
            iterations,
            "toms748 budget exhausted"
        );
        return Err(SolverError::NonConvergence {
            a: to_f64(s.a),
            b: to_f64(s.b),
            iterations,
        });
    }

    debug!(
        a = to_f64(s.a),
        b = to_f64(s.b),
        iterations,
        "toms748 converged"
    );
    Ok(RootBracket {
        lower: s.a,
        upper: s.b,
        iterations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::cell::Cell;

    // ========================================
    // Basic Functionality Tests
    // ========================================

    #[test]
    fn test_sqrt_2() {
        let solver = Toms748Solver::with_defaults();
        let f = |x: f64| x * x - 2.0;

        let bracket = solver.solve(&f, 0.0, 2.0).unwrap();
        assert!(
            (bracket.midpoint() - std::f64::consts::SQRT_2).abs() < 1e-12,
            "Expected √2, got {}",
            bracket.midpoint()
        );
        assert!(
            bracket.iterations < 30,
            "took {} iterations",
            bracket.iterations
        );
    }

    #[test]
    fn test_cubic_polynomial() {
        let solver = Toms748Solver::with_defaults();
        let f = |x: f64| x * x * x - x - 2.0;

        let bracket = solver.solve(&f, 1.0, 2.0).unwrap();
        assert_relative_eq!(bracket.midpoint(), 1.5213797068045676, epsilon = 1e-13);
    }

    #[test]
    fn test_transcendental() {
        let solver = Toms748Solver::with_defaults();
        let f = |x: f64| x.cos() - x;

        let bracket = solver.solve(&f, 0.0, 1.0).unwrap();
        assert_relative_eq!(bracket.midpoint(), 0.7390851332151607, epsilon = 1e-13);
    }

    #[test]
    fn test_steep_exponential() {
        let solver = Toms748Solver::with_defaults();
        let f = |x: f64| (20.0 * x).exp() - 1e6;

        let bracket = solver.solve(&f, 0.0, 2.0).unwrap();
        assert_relative_eq!(bracket.midpoint(), 1e6_f64.ln() / 20.0, epsilon = 1e-12);
    }

    #[test]
    fn test_flat_near_root() {
        // Triple root: interpolation degenerates and bisection must carry it.
        let solver = Toms748Solver::new(SolverConfig::new(30, 200));
        let f = |x: f64| (x - 1.0).powi(3);

        let bracket = solver.solve(&f, 0.0, 3.5).unwrap();
        assert!(bracket.lower <= 1.0 && 1.0 <= bracket.upper);
    }

    #[test]
    fn test_bracket_stays_inside_and_tolerant() {
        let solver = Toms748Solver::with_defaults();
        let f = |x: f64| x.ln() - 0.5;
        let tol = solver.config().tolerance::<f64>();

        let bracket = solver.solve(&f, 1.0, 5.0).unwrap();
        assert!(bracket.lower >= 1.0 && bracket.upper <= 5.0);
        assert!(tol.tolerant(bracket.lower, bracket.upper));
        assert!(f(bracket.lower) <= 0.0 && f(bracket.upper) >= 0.0);
    }

    #[test]
    fn test_negative_root_reaches_tolerance() {
        // Root near -0.0212: the final brackets are a few ulps wide.
        let solver = Toms748Solver::with_defaults();
        let flows = [-70000.0, 12000.0, 15000.0, 18000.0, 21000.0];
        let npv = |r: f64| {
            flows
                .iter()
                .enumerate()
                .map(|(i, c)| c / (1.0 + r).powi(i as i32 + 1))
                .sum::<f64>()
        };

        let bracket = solver.solve(&npv, -0.1, 0.2).unwrap();
        assert!(
            bracket.iterations < 30,
            "stalled for {} iterations",
            bracket.iterations
        );
        assert_relative_eq!(bracket.midpoint(), -0.021244848273410943, epsilon = 1e-15);
    }

    #[test]
    fn test_decreasing_function() {
        let solver = Toms748Solver::with_defaults();
        let f = |x: f64| 3.0 - x;

        let bracket = solver.solve(&f, -10.0, 10.0).unwrap();
        assert_relative_eq!(bracket.midpoint(), 3.0, epsilon = 1e-14);
    }

    #[test]
    fn test_counts_every_evaluation() {
        let calls = Cell::new(0_usize);
        let f = |x: f64| {
            calls.set(calls.get() + 1);
            x.exp() - 2.0
        };
        let solver = Toms748Solver::with_defaults();

        let bracket = solver.solve(&f, -1.0, 3.0).unwrap();
        assert_eq!(bracket.iterations, calls.get());
    }

    #[test]
    fn test_deterministic() {
        let solver = Toms748Solver::with_defaults();
        let f = |x: f64| x.sin() - 0.3 * x;

        let first = solver.solve(&f, 1.0, 4.0).unwrap();
        let second = solver.solve(&f, 1.0, 4.0).unwrap();
        assert_eq!(first, second);
    }

    // ========================================
    // Degenerate Brackets
    // ========================================

    #[test]
    fn test_zero_at_lower_endpoint() {
        let solver = Toms748Solver::with_defaults();
        let f = |x: f64| x - 1.0;

        let bracket = solver.solve_bracketed(&f, 1.0, 2.0, 0.0, 1.0).unwrap();
        assert_eq!((bracket.lower, bracket.upper), (1.0, 1.0));
        assert_eq!(bracket.iterations, 0);
    }

    #[test]
    fn test_zero_at_upper_endpoint() {
        let solver = Toms748Solver::with_defaults();
        let f = |x: f64| x - 2.0;

        let bracket = solver.solve(&f, 1.0, 2.0).unwrap();
        assert_eq!((bracket.lower, bracket.upper), (2.0, 2.0));
    }

    #[test]
    fn test_already_tolerant_bracket() {
        let solver = Toms748Solver::with_defaults();
        let f = |x: f64| x - 1.0;
        let a = 1.0;
        let b = 1.0 + f64::EPSILON;

        // Pretend the root sits strictly inside one ulp.
        let bracket = solver.solve_bracketed(&f, a, b, -1e-17, 1e-17).unwrap();
        assert_eq!(bracket.iterations, 0);
        assert_eq!((bracket.lower, bracket.upper), (a, b));
    }

    #[test]
    fn test_exact_zero_hit_collapses() {
        let solver = Toms748Solver::with_defaults();
        let f = |x: f64| x;

        // The first secant step lands on 0 exactly.
        let bracket = solver.solve(&f, -1.0, 1.0).unwrap();
        assert_eq!((bracket.lower, bracket.upper), (0.0, 0.0));
    }

    // ========================================
    // Interpolation Order
    // ========================================

    #[test]
    fn test_rebracket_downgrades_cubic_to_quadratic() {
        let mut s = State {
            a: 0.0,
            b: 1.0,
            d: 2.0,
            e: 3.0,
            fa: -1.0,
            fb: 1.0,
            fd: 3.0,
            fe: 5.0,
        };
        assert_eq!(s.interpolation(), Interpolation::Cubic);

        // f(0.5) = 1 lands on the old fb, which becomes fd
        s.retire_d();
        s.bracket(&|x: f64| 2.0 * x, 0.5).unwrap();
        assert_eq!((s.a, s.b, s.d), (0.0, 0.5, 1.0));
        assert_eq!(s.fb, s.fd);

        assert_eq!(
            s.interpolation(),
            Interpolation::Quadratic,
            "second step must see the values left by the first rebracket"
        );
        assert_eq!(s.interpolate(3), s.quadratic(3));
    }

    #[test]
    fn test_distinct_values_keep_cubic() {
        let s = State {
            a: 1.0,
            b: 2.0,
            d: 3.0,
            e: 4.0,
            fa: -2.0,
            fb: 1.0,
            fd: 6.0,
            fe: 13.0,
        };
        assert_eq!(s.interpolation(), Interpolation::Cubic);
        assert_eq!(s.interpolate(3), s.cubic());
    }

    // ========================================
    // Error Cases
    // ========================================

    #[test]
    fn test_misordered_bracket() {
        let solver = Toms748Solver::with_defaults();
        let f = |x: f64| x - 1.5;

        let result = solver.solve(&f, 2.0, 1.0);
        assert_eq!(
            result,
            Err(SolverError::InvalidBracketOrder { a: 2.0, b: 1.0 })
        );
    }

    #[test]
    fn test_same_sign_endpoints() {
        let solver = Toms748Solver::with_defaults();
        let f = |x: f64| x;

        let result = solver.solve_bracketed(&f, 1.0, 2.0, 1.0, 2.0);
        assert_eq!(result, Err(SolverError::NoSignChange { a: 1.0, b: 2.0 }));
    }

    #[test]
    fn test_budget_exhausted() {
        let solver = Toms748Solver::new(SolverConfig::new(53, 4));
        let f = |x: f64| x.powi(5) - 3.0;

        match solver.solve(&f, 0.0, 10.0) {
            Err(SolverError::NonConvergence { a, b, iterations }) => {
                assert_eq!(iterations, 4);
                let root = 3.0_f64.powf(0.2);
                assert!(a <= root && root <= b, "[{}, {}] lost the root", a, b);
            }
            other => panic!("expected NonConvergence, got {:?}", other),
        }
    }

    #[test]
    fn test_nan_objective() {
        let solver = Toms748Solver::with_defaults();
        let f = |x: f64| if x > 0.0 { (x - 0.5).sqrt() } else { -1.0 };

        let result = solver.solve(&f, -1.0, 1.0);
        assert!(matches!(result, Err(SolverError::NonFiniteEvaluation { .. })));
    }

    #[test]
    fn test_f32() {
        let solver = Toms748Solver::with_defaults();
        let f = |x: f32| x * x - 2.0;

        let bracket = solver.solve(&f, 0.0_f32, 2.0).unwrap();
        assert!((bracket.midpoint() - std::f32::consts::SQRT_2).abs() < 1e-6);
    }
}
