//! Solver result types.

use super::primitives::lit;
use num_traits::Float;

/// A converged bracket returned by the bracketing solvers.
///
/// `lower <= upper` always holds, and the root lies in `[lower, upper]`.
/// When the solver hit an exact zero both ends are equal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootBracket<T: Float> {
    /// Lower end of the final bracket.
    pub lower: T,
    /// Upper end of the final bracket.
    pub upper: T,
    /// Objective evaluations consumed.
    pub iterations: usize,
}

impl<T: Float> RootBracket<T> {
    /// Point estimate of the root.
    pub fn midpoint(&self) -> T {
        self.lower + (self.upper - self.lower) / lit(2.0)
    }

    /// Absolute width of the bracket.
    pub fn width(&self) -> T {
        self.upper - self.lower
    }
}

/// Result of the derivative-based iterators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootEstimate<T: Float> {
    /// Final estimate.
    pub root: T,
    /// Steps taken.
    pub iterations: usize,
}
