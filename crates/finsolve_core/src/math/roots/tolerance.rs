//! Relative-tolerance termination criterion.

use super::primitives::{ldexp, lit};
use num_traits::Float;

/// Relative tolerance derived from a requested precision in bits.
///
/// A bracket `(a, b)` is *tolerant* when
/// `|a - b| <= eps * min(|a|, |b|)`, with
/// `eps = max(2^(1 - bits), 2 * machine_epsilon)`.
///
/// This is the termination test used by every bracketing solver. Because it
/// is relative, a bracket with an endpoint at exactly zero is only tolerant
/// once it has collapsed to a single point.
///
/// # Examples
///
/// ```
/// use finsolve_core::math::roots::EpsTolerance;
///
/// let tol: EpsTolerance<f64> = EpsTolerance::new(20);
/// assert_eq!(tol.eps(), 2.0_f64.powi(-19));
/// assert!(tol.tolerant(1.0, 1.0 + 1e-7));
/// assert!(!tol.tolerant(1.0, 1.001));
///
/// // Requests beyond the type's precision are clamped to 2 * epsilon.
/// let tight: EpsTolerance<f64> = EpsTolerance::new(200);
/// assert_eq!(tight.eps(), 2.0 * f64::EPSILON);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpsTolerance<T: Float> {
    eps: T,
}

impl<T: Float> EpsTolerance<T> {
    /// Creates a tolerance for `bits` significant bits.
    pub fn new(bits: u32) -> Self {
        let exponent = 1_i32.saturating_sub(i32::try_from(bits).unwrap_or(i32::MAX));
        let requested = ldexp(T::one(), exponent);
        let floor = lit::<T>(2.0) * T::epsilon();
        Self {
            eps: requested.max(floor),
        }
    }

    /// Returns the full-precision tolerance for `T` (`2 * epsilon`).
    pub fn machine() -> Self {
        Self {
            eps: lit::<T>(2.0) * T::epsilon(),
        }
    }

    /// Relative threshold.
    pub fn eps(&self) -> T {
        self.eps
    }

    /// Returns `true` when `a` and `b` agree to within the relative threshold.
    #[inline]
    pub fn tolerant(&self, a: T, b: T) -> bool {
        (a - b).abs() <= self.eps * a.abs().min(b.abs())
    }
}

impl<T: Float> Default for EpsTolerance<T> {
    fn default() -> Self {
        Self::machine()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eps_from_bits() {
        let tol: EpsTolerance<f64> = EpsTolerance::new(10);
        assert_eq!(tol.eps(), 2.0_f64.powi(-9));
    }

    #[test]
    fn test_eps_clamped_to_machine_precision() {
        let tol: EpsTolerance<f64> = EpsTolerance::new(53);
        assert_eq!(tol.eps(), 2.0 * f64::EPSILON);
        assert_eq!(EpsTolerance::<f64>::new(u32::MAX).eps(), 2.0 * f64::EPSILON);
    }

    #[test]
    fn test_eps_f32() {
        let tol: EpsTolerance<f32> = EpsTolerance::new(53);
        assert_eq!(tol.eps(), 2.0 * f32::EPSILON);
    }

    #[test]
    fn test_tolerant_is_relative() {
        let tol: EpsTolerance<f64> = EpsTolerance::new(30);
        assert!(tol.tolerant(1e6, 1e6 + 1e-4));
        assert!(!tol.tolerant(1e-6, 1e-6 + 1e-4));
    }

    #[test]
    fn test_tolerant_with_zero_endpoint_requires_equality() {
        let tol: EpsTolerance<f64> = EpsTolerance::new(30);
        assert!(!tol.tolerant(0.0, 1e-300));
        assert!(tol.tolerant(0.0, 0.0));
    }

    #[test]
    fn test_tolerant_is_symmetric() {
        let tol: EpsTolerance<f64> = EpsTolerance::default();
        assert_eq!(tol.tolerant(2.0, 2.0 + 1e-16), tol.tolerant(2.0 + 1e-16, 2.0));
    }
}
