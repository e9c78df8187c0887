//! Integration tests for the root-finding layer.
//!
//! Exercises the bracketing solvers and the derivative iterators through the
//! public API, with property tests for bracket containment, tolerant
//! termination and determinism.

use approx::assert_relative_eq;
use finsolve_core::math::roots::{
    sign, BisectionSolver, BracketSolver, HalleySolver, NewtonRaphsonSolver, SolverConfig,
    Toms748Solver,
};
use finsolve_core::types::SolverError;
use proptest::prelude::*;

// ========================================
// Reference Scenarios
// ========================================

#[test]
fn test_toms748_square_root_of_two() {
    let solver = Toms748Solver::with_defaults();
    let bracket = solver.solve(&|x: f64| x * x - 2.0, 0.0, 2.0).unwrap();

    assert_relative_eq!(bracket.midpoint(), std::f64::consts::SQRT_2, epsilon = 1e-12);
    assert!(
        bracket.iterations < 30,
        "TOMS748 should converge quickly, took {} evaluations",
        bracket.iterations
    );
}

#[test]
fn test_bracket_expansion_finds_five() {
    let solver = BracketSolver::with_defaults();
    let bracket = solver
        .bracket_and_solve(&|x: f64| x - 5.0, 1.0, 2.0, true)
        .unwrap();

    assert!(bracket.lower <= 5.0 && 5.0 <= bracket.upper);
    assert_relative_eq!(bracket.midpoint(), 5.0, epsilon = 1e-12);
}

#[test]
fn test_newton_square_root_of_nine() {
    let solver = NewtonRaphsonSolver::with_defaults();
    let estimate = solver
        .iterate(&|x: f64| (x * x - 9.0, 2.0 * x), 1.0, 0.0, 10.0)
        .unwrap();
    assert_relative_eq!(estimate.root, 3.0, epsilon = 1e-15);
}

#[test]
fn test_halley_and_newton_agree() {
    let newton = NewtonRaphsonSolver::with_defaults()
        .iterate(&|x: f64| (x.exp() - 3.0, x.exp()), 0.5, 0.0, 2.0)
        .unwrap();
    let halley = HalleySolver::with_defaults()
        .iterate(&|x: f64| (x.exp() - 3.0, x.exp(), x.exp()), 0.5, 0.0, 2.0)
        .unwrap();

    assert_relative_eq!(newton.root, 3.0_f64.ln(), epsilon = 1e-14);
    assert_relative_eq!(halley.root, newton.root, epsilon = 1e-14);
    assert!(
        halley.iterations <= newton.iterations,
        "Halley took {} steps, Newton {}",
        halley.iterations,
        newton.iterations
    );
}

#[test]
fn test_bisection_and_toms748_agree() {
    let f = |x: f64| x.cos() - x;
    let bisection = BisectionSolver::with_defaults().solve(&f, 0.0, 1.0).unwrap();
    let toms = Toms748Solver::with_defaults().solve(&f, 0.0, 1.0).unwrap();

    assert_relative_eq!(bisection.midpoint(), toms.midpoint(), epsilon = 1e-14);
    assert!(toms.iterations < bisection.iterations);
}

// ========================================
// Error Scenarios
// ========================================

#[test]
fn test_toms748_misordered_bracket() {
    let result = Toms748Solver::with_defaults().solve(&|x: f64| x, 2.0, 1.0);
    assert!(matches!(
        result,
        Err(SolverError::InvalidBracketOrder { a, b }) if a == 2.0 && b == 1.0
    ));
}

#[test]
fn test_toms748_same_sign_endpoints() {
    // f(0) = 1 and f(1) = 2
    let result = Toms748Solver::with_defaults().solve(&|x: f64| x + 1.0, 0.0, 1.0);
    assert!(matches!(result, Err(SolverError::NoSignChange { .. })));
}

#[test]
fn test_toms748_reports_budget_exhaustion() {
    let solver = Toms748Solver::new(SolverConfig::new(53, 3));
    let result = solver.solve(&|x: f64| x.powi(7) - 0.3, 0.0, 1.0);
    match result {
        Err(SolverError::NonConvergence { a, b, .. }) => {
            assert!(0.0 <= a && a < b && b <= 1.0, "bracket [{}, {}] left the input", a, b);
        }
        other => panic!("expected NonConvergence, got {:?}", other),
    }
}

// ========================================
// Property Tests
// ========================================

proptest! {
    #[test]
    fn prop_toms748_contains_and_tolerates(
        root in -50.0_f64..50.0,
        below in 0.01_f64..40.0,
        above in 0.01_f64..40.0,
        slope in 0.1_f64..10.0,
    ) {
        let f = move |x: f64| (x - root).powi(3) + slope * (x - root);
        let (a, b) = (root - below, root + above);
        let config = SolverConfig::default();
        let bracket = Toms748Solver::new(config).solve(&f, a, b).unwrap();

        prop_assert!(a <= bracket.lower, "lower {} below {}", bracket.lower, a);
        prop_assert!(bracket.lower <= bracket.upper);
        prop_assert!(bracket.upper <= b, "upper {} above {}", bracket.upper, b);
        prop_assert!(config.tolerance::<f64>().tolerant(bracket.lower, bracket.upper));

        let (fl, fu) = (f(bracket.lower), f(bracket.upper));
        prop_assert!(
            fl == 0.0 || fu == 0.0 || sign(fl) != sign(fu),
            "f({}) = {} and f({}) = {} share a sign",
            bracket.lower, fl, bracket.upper, fu
        );
    }

    #[test]
    fn prop_toms748_is_deterministic(
        target in 0.5_f64..100.0,
        upper in 10.0_f64..200.0,
    ) {
        let f = move |x: f64| x.sqrt() * x - target;
        let solver = Toms748Solver::with_defaults();
        let first = solver.solve(&f, 0.0, upper.max(target) + 1.0);
        let second = solver.solve(&f, 0.0, upper.max(target) + 1.0);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_bisection_contains_root(
        root in -10.0_f64..10.0,
        half_width in 0.1_f64..5.0,
    ) {
        let f = move |x: f64| (x - root).tanh();
        let bracket = BisectionSolver::with_defaults()
            .solve(&f, root - half_width, root + half_width * 0.7)
            .unwrap();
        prop_assert!(bracket.lower <= root + 1e-12 && root - 1e-12 <= bracket.upper);
    }

    #[test]
    fn prop_newton_square_roots(a in 1.0_f64..100.0, guess_fraction in 0.1_f64..1.0) {
        let max = a + 1.0;
        let estimate = NewtonRaphsonSolver::with_defaults()
            .iterate(&move |x: f64| (x * x - a, 2.0 * x), guess_fraction * max, 0.0, max)
            .unwrap();
        prop_assert!(
            (estimate.root - a.sqrt()).abs() <= 1e-12 * a.sqrt(),
            "sqrt({}) estimated as {}",
            a, estimate.root
        );
    }
}
