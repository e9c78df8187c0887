//! Objective-function contract for the root finders.
//!
//! Solvers are tagged by the derivative order they consume:
//!
//! - [`Objective`]: `f(x)` (bisection, TOMS748, bracket search)
//! - [`FirstOrderObjective`]: `(f(x), f'(x))` (Newton-Raphson)
//! - [`SecondOrderObjective`]: `(f(x), f'(x), f''(x))` (Halley)
//!
//! Every trait has a blanket implementation for closures of the matching
//! shape, so most callers simply pass a closure. Implementations must be
//! deterministic and free of external side effects; the solvers may
//! evaluate the same point more than once.
//!
//! With the `num-dual-mode` feature, [`DualObjective`] and
//! [`Dual2Objective`] derive the required derivatives automatically from a
//! single closure written over dual numbers.

use super::primitives::to_f64;
use crate::types::SolverError;
use num_traits::Float;

/// A scalar function whose root is sought.
pub trait Objective<T: Float> {
    /// Evaluates `f(x)`.
    fn value(&self, x: T) -> T;
}

/// A scalar function that also supplies its first derivative.
pub trait FirstOrderObjective<T: Float> {
    /// Evaluates `(f(x), f'(x))`.
    fn value_and_derivative(&self, x: T) -> (T, T);
}

/// A scalar function that also supplies its first two derivatives.
pub trait SecondOrderObjective<T: Float> {
    /// Evaluates `(f(x), f'(x), f''(x))`.
    fn value_and_derivatives(&self, x: T) -> (T, T, T);
}

impl<T: Float, F> Objective<T> for F
where
    F: Fn(T) -> T,
{
    #[inline]
    fn value(&self, x: T) -> T {
        self(x)
    }
}

impl<T: Float, F> FirstOrderObjective<T> for F
where
    F: Fn(T) -> (T, T),
{
    #[inline]
    fn value_and_derivative(&self, x: T) -> (T, T) {
        self(x)
    }
}

impl<T: Float, F> SecondOrderObjective<T> for F
where
    F: Fn(T) -> (T, T, T),
{
    #[inline]
    fn value_and_derivatives(&self, x: T) -> (T, T, T) {
        self(x)
    }
}

/// Evaluates `f(x)`, rejecting NaN.
///
/// Infinities are passed through: they still carry a usable sign.
pub(crate) fn evaluate<T, F>(f: &F, x: T) -> Result<T, SolverError>
where
    T: Float,
    F: Objective<T> + ?Sized,
{
    let fx = f.value(x);
    if fx.is_nan() {
        return Err(SolverError::NonFiniteEvaluation { x: to_f64(x) });
    }
    Ok(fx)
}

/// First-order objective whose derivative comes from forward-mode AD.
///
/// Wraps a closure over [`num_dual::Dual64`]; each evaluation seeds the
/// dual part with `1.0` and reads back the value and derivative.
///
/// # Example
///
/// ```
/// use finsolve_core::math::roots::{DualObjective, FirstOrderObjective};
/// use num_dual::Dual64;
///
/// let f = DualObjective::new(|x: Dual64| x * x - Dual64::from(2.0));
/// let (value, derivative) = f.value_and_derivative(3.0);
/// assert_eq!(value, 7.0);
/// assert_eq!(derivative, 6.0);
/// ```
#[cfg(feature = "num-dual-mode")]
#[derive(Debug, Clone, Copy)]
pub struct DualObjective<F> {
    f: F,
}

#[cfg(feature = "num-dual-mode")]
impl<F> DualObjective<F>
where
    F: Fn(num_dual::Dual64) -> num_dual::Dual64,
{
    /// Wraps `f`.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[cfg(feature = "num-dual-mode")]
impl<F> FirstOrderObjective<f64> for DualObjective<F>
where
    F: Fn(num_dual::Dual64) -> num_dual::Dual64,
{
    fn value_and_derivative(&self, x: f64) -> (f64, f64) {
        let y = (self.f)(num_dual::Dual64::new(x, 1.0));
        (y.re, y.eps)
    }
}

#[cfg(feature = "num-dual-mode")]
impl<F> Objective<f64> for DualObjective<F>
where
    F: Fn(num_dual::Dual64) -> num_dual::Dual64,
{
    fn value(&self, x: f64) -> f64 {
        (self.f)(num_dual::Dual64::from(x)).re
    }
}

/// Second-order objective whose derivatives come from hyper-dual AD.
///
/// Wraps a closure over [`num_dual::Dual2_64`], which carries the value,
/// the first derivative and the second derivative through the computation.
///
/// # Example
///
/// ```
/// use finsolve_core::math::roots::{Dual2Objective, SecondOrderObjective};
/// use num_dual::{Dual2_64, DualNum};
///
/// let f = Dual2Objective::new(|x: Dual2_64| x.powi(3));
/// let (value, first, second) = f.value_and_derivatives(2.0);
/// assert_eq!((value, first, second), (8.0, 12.0, 12.0));
/// ```
#[cfg(feature = "num-dual-mode")]
#[derive(Debug, Clone, Copy)]
pub struct Dual2Objective<F> {
    f: F,
}

#[cfg(feature = "num-dual-mode")]
impl<F> Dual2Objective<F>
where
    F: Fn(num_dual::Dual2_64) -> num_dual::Dual2_64,
{
    /// Wraps `f`.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[cfg(feature = "num-dual-mode")]
impl<F> SecondOrderObjective<f64> for Dual2Objective<F>
where
    F: Fn(num_dual::Dual2_64) -> num_dual::Dual2_64,
{
    fn value_and_derivatives(&self, x: f64) -> (f64, f64, f64) {
        let y = (self.f)(num_dual::Dual2_64::new(x, 1.0, 0.0));
        (y.re, y.v1, y.v2)
    }
}

#[cfg(feature = "num-dual-mode")]
impl<F> FirstOrderObjective<f64> for Dual2Objective<F>
where
    F: Fn(num_dual::Dual2_64) -> num_dual::Dual2_64,
{
    fn value_and_derivative(&self, x: f64) -> (f64, f64) {
        let (value, first, _) = self.value_and_derivatives(x);
        (value, first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call<O: Objective<f64>>(f: &O, x: f64) -> f64 {
        f.value(x)
    }

    #[test]
    fn test_closure_is_objective() {
        let f = |x: f64| x * x - 2.0;
        assert_eq!(call(&f, 2.0), 2.0);
    }

    #[test]
    fn test_closure_is_first_order_objective() {
        let f = |x: f64| (x * x, 2.0 * x);
        assert_eq!(f.value_and_derivative(3.0), (9.0, 6.0));
    }

    #[test]
    fn test_closure_is_second_order_objective() {
        let f = |x: f64| (x * x * x, 3.0 * x * x, 6.0 * x);
        assert_eq!(f.value_and_derivatives(1.0), (1.0, 3.0, 6.0));
    }

    #[test]
    fn test_struct_objective_captures_parameters() {
        struct Shifted {
            target: f64,
        }
        impl Objective<f64> for Shifted {
            fn value(&self, x: f64) -> f64 {
                x - self.target
            }
        }

        let f = Shifted { target: 4.0 };
        assert_eq!(call(&f, 6.0), 2.0);
    }

    #[cfg(feature = "num-dual-mode")]
    mod dual {
        use super::super::*;
        use approx::assert_relative_eq;
        use num_dual::{Dual2_64, Dual64, DualNum};

        #[test]
        fn test_dual_objective_matches_analytic_derivative() {
            let f = DualObjective::new(|x: Dual64| x.exp() - Dual64::from(3.0) * x);
            for &x in &[-1.0, 0.0, 0.5, 2.0] {
                let (value, derivative) = f.value_and_derivative(x);
                assert_relative_eq!(value, x.exp() - 3.0 * x, epsilon = 1e-14);
                assert_relative_eq!(derivative, x.exp() - 3.0, epsilon = 1e-14);
                assert_relative_eq!(f.value(x), value, epsilon = 1e-14);
            }
        }

        #[test]
        fn test_dual2_objective_second_derivative() {
            let f = Dual2Objective::new(|x: Dual2_64| x.sin());
            let (value, first, second) = f.value_and_derivatives(0.3);
            assert_relative_eq!(value, 0.3_f64.sin(), epsilon = 1e-14);
            assert_relative_eq!(first, 0.3_f64.cos(), epsilon = 1e-14);
            assert_relative_eq!(second, -0.3_f64.sin(), epsilon = 1e-14);
            assert_eq!(f.value_and_derivative(0.3), (value, first));
        }
    }
}
