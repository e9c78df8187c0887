//! Solver configuration types.

use super::tolerance::EpsTolerance;
use num_traits::Float;

/// Configuration for root-finding algorithms.
///
/// Shared by every solver: the requested precision in significant bits and
/// the iteration budget (the number of objective evaluations a bracketing
/// solver may spend, or the number of steps an iterator may take).
///
/// # Example
///
/// ```
/// use finsolve_core::math::roots::SolverConfig;
///
/// // Use default configuration
/// let config = SolverConfig::default();
/// assert_eq!(config.digits, 53);
/// assert_eq!(config.max_iterations, 100);
///
/// // Custom configuration
/// let custom = SolverConfig {
///     digits: 40,
///     max_iterations: 200,
/// };
/// assert!(custom.tolerance::<f64>().eps() > f64::EPSILON);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolverConfig {
    /// Requested precision in significant bits.
    ///
    /// Bracketing solvers stop once the bracket is tolerant to
    /// `max(2^(1 - digits), 2 * epsilon)`; iterators stop once the relative
    /// step size drops below `2^(1 - digits)`.
    pub digits: u32,

    /// Maximum number of iterations before giving up.
    ///
    /// If the solver doesn't converge within this limit,
    /// it returns `SolverError::NonConvergence`.
    pub max_iterations: usize,
}

impl Default for SolverConfig {
    /// Create a default configuration with sensible values.
    ///
    /// Default values:
    /// - `digits`: 53 (full `f64` precision)
    /// - `max_iterations`: 100
    fn default() -> Self {
        Self {
            digits: 53,
            max_iterations: 100,
        }
    }
}

impl SolverConfig {
    /// Create a new configuration with specified values.
    ///
    /// # Panics
    ///
    /// Panics if `digits == 0` or `max_iterations == 0`.
    ///
    /// # Example
    ///
    /// ```
    /// use finsolve_core::math::roots::SolverConfig;
    ///
    /// let config = SolverConfig::new(48, 200);
    /// assert_eq!(config.max_iterations, 200);
    /// ```
    pub fn new(digits: u32, max_iterations: usize) -> Self {
        assert!(digits > 0, "digits must be > 0");
        assert!(max_iterations > 0, "max_iterations must be > 0");
        Self {
            digits,
            max_iterations,
        }
    }

    /// Create a configuration with high precision settings.
    ///
    /// Full `f64` precision and a budget of 500 iterations.
    pub fn high_precision() -> Self {
        Self {
            digits: 53,
            max_iterations: 500,
        }
    }

    /// Create a configuration optimised for fast convergence.
    ///
    /// Roughly eight significant decimal digits (27 bits) and 50 iterations.
    pub fn fast() -> Self {
        Self {
            digits: 27,
            max_iterations: 50,
        }
    }

    /// Returns the bracket termination criterion for `T`.
    pub fn tolerance<T: Float>(&self) -> EpsTolerance<T> {
        EpsTolerance::new(self.digits)
    }

    /// Returns a copy with a different iteration budget.
    pub fn with_max_iterations(self, max_iterations: usize) -> Self {
        Self {
            max_iterations,
            ..self
        }
    }
}
