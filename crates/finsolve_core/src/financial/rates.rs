//! Rate adapters: RATE, IRR, XIRR, YIELD and ODDFYIELD.
//!
//! Each adapter validates its inputs, builds an objective whose root is the
//! requested rate, searches for a sign-changing bracket and narrows it with
//! TOMS748. The midpoint of the final bracket is the answer.
//!
//! Two bracket searches are used:
//!
//! - RATE expands both ends geometrically from `guess ± 0.01`
//! - the others walk outward in fixed steps of 0.1, preferring the side
//!   where the objective shrinks, and never step to or below -100%

use super::bond::{non_negative, CouponBond, OddFirstCouponBond};
use super::cashflow::{check_mixed_signs, npv_at, xnpv_at, Cashflow};
use super::tvm::future_value;
use crate::math::roots::{sign, SolverConfig, Toms748Solver};
use crate::types::{FinancialError, SolverError};
use tracing::debug;

/// Half-width of the initial RATE bracket.
const RATE_SEED_HALF_WIDTH: f64 = 0.01;

/// Growth applied to the RATE bracket on each expansion.
const RATE_EXPANSION: f64 = 1.6;

/// Expansion rounds allowed before RATE gives up.
const RATE_EXPANSION_LIMIT: usize = 100;

/// Step of the outward walk.
const WALK_STEP: f64 = 0.1;

/// Evaluations the outward walk may spend.
const WALK_EVALUATIONS: usize = 1000;

/// The walk never evaluates at or below this rate.
const RATE_FLOOR: f64 = -1.0;

/// Solves the financial functions that have no closed-form inverse.
///
/// The configuration controls the TOMS748 phase; the bracket searches have
/// fixed budgets.
///
/// # Examples
///
/// ```
/// use finsolve_core::financial::RateSolver;
///
/// let solver = RateSolver::with_defaults();
/// let irr = solver.irr(&[-70_000.0, 12_000.0, 15_000.0, 18_000.0, 21_000.0, 26_000.0]).unwrap();
/// assert!((irr - 0.0866309480).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct RateSolver {
    /// TOMS748 configuration
    config: SolverConfig,
}

impl RateSolver {
    /// Create a rate solver with the given TOMS748 configuration.
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Create a rate solver with the default configuration
    /// (53 bits, 100 evaluations).
    pub fn with_defaults() -> Self {
        Self {
            config: SolverConfig::default(),
        }
    }

    /// Returns a reference to the solver configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Interest rate per period of an annuity (RATE).
    ///
    /// Finds `r` such that `fv(r, nper, pmt, pv, pay_in_advance)` equals
    /// the target `fv`, starting from `guess` (0.1 is customary).
    ///
    /// # Errors
    ///
    /// * `DomainPrecondition` - `pmt` and `pv` are both zero
    /// * `NoSolution` - no sign change within the expansion budget, or the
    ///   TOMS748 phase did not converge
    pub fn rate(
        &self,
        nper: f64,
        pmt: f64,
        pv: f64,
        fv: f64,
        pay_in_advance: bool,
        guess: f64,
    ) -> Result<f64, FinancialError> {
        const FUNCTION: &str = "RATE";
        if pmt == 0.0 && pv == 0.0 {
            return Err(FinancialError::domain(
                FUNCTION,
                format!(
                    "either payment or present value must be non-zero (got {} and {})",
                    pmt, pv
                ),
            ));
        }
        let objective = |rate: f64| fv - future_value(rate, nper, pmt, pv, pay_in_advance);

        let mut a = guess - RATE_SEED_HALF_WIDTH;
        let mut b = guess + RATE_SEED_HALF_WIDTH;
        if a <= -1.0 {
            a = -1.0 + f64::EPSILON;
            b = b.max(a + 2.0 * RATE_SEED_HALF_WIDTH);
        }
        let mut fa = objective(a);
        let mut fb = objective(b);
        if !fa.is_finite() || !fb.is_finite() {
            return Err(no_solution(
                FUNCTION,
                format!("objective is not finite around the guess {}", guess),
            ));
        }

        let mut hold_a = false;
        let mut hold_b = false;
        let mut rounds = 0;
        while sign(fa) * sign(fb) > 0 {
            if rounds >= RATE_EXPANSION_LIMIT {
                return Err(no_solution(
                    FUNCTION,
                    format!("no sign change after {} expansions", rounds),
                ));
            }
            rounds += 1;

            let (old_a, old_b) = (a, b);
            if !hold_a {
                a -= RATE_EXPANSION * (b - a);
                let next = objective(a);
                if next.is_finite() {
                    fa = next;
                } else {
                    debug!(rate = a, "lower end of the RATE bracket frozen");
                    a = old_a;
                    hold_a = true;
                }
            }
            if !hold_b {
                // Measured from the lower end before this round moved it
                b += RATE_EXPANSION * (b - old_a);
                let next = objective(b);
                if next.is_finite() {
                    fb = next;
                } else {
                    debug!(rate = b, "upper end of the RATE bracket frozen");
                    b = old_b;
                    hold_b = true;
                }
            }
        }
        debug!(a, b, rounds, "RATE bracket found");

        self.narrow(FUNCTION, &objective, a, b, fa, fb)
    }

    /// Internal rate of return of periodic cashflows (IRR).
    ///
    /// The rate at which [`npv`](super::npv) of `flows` is zero.
    ///
    /// # Errors
    ///
    /// * `DomainPrecondition` - no flows, or not both signs (zero counts as
    ///   positive)
    /// * `NoSolution` - the walk or the TOMS748 phase failed
    /// * `Solver` (`NonFiniteEvaluation`) - the NPV overflowed or became NaN
    ///   during the walk
    pub fn irr(&self, flows: &[f64]) -> Result<f64, FinancialError> {
        const FUNCTION: &str = "IRR";
        check_mixed_signs(FUNCTION, flows.iter().copied())?;
        let objective = |rate: f64| npv_at(flows, rate);
        let bracket = walk(FUNCTION, &objective, 0.0, 0.2)?;
        self.narrow(FUNCTION, &objective, bracket.a, bracket.b, bracket.fa, bracket.fb)
    }

    /// Internal rate of return of dated cashflows (XIRR).
    ///
    /// Flows may be given in any order; they are sorted by date and
    /// discounted on Actual/365 from the earliest.
    ///
    /// # Errors
    ///
    /// As [`RateSolver::irr`].
    pub fn xirr(&self, flows: &[Cashflow]) -> Result<f64, FinancialError> {
        const FUNCTION: &str = "XIRR";
        check_mixed_signs(FUNCTION, flows.iter().map(|flow| flow.amount))?;
        let mut sorted = flows.to_vec();
        sorted.sort_by_key(|flow| flow.date);

        let objective = |rate: f64| xnpv_at(&sorted, rate);
        let bracket = walk(FUNCTION, &objective, 0.0, 0.2)?;
        self.narrow(FUNCTION, &objective, bracket.a, bracket.b, bracket.fa, bracket.fb)
    }

    /// Annual yield of a regular coupon bond bought at `price` (YIELD).
    ///
    /// The walk starts from the single-period yield estimate ± 0.1.
    ///
    /// # Errors
    ///
    /// * `DomainPrecondition` - invalid bond terms or `price <= 0`
    /// * `NoSolution` - the walk or the TOMS748 phase failed
    /// * `Solver` (`NonFiniteEvaluation`) - the price was not finite during
    ///   the walk
    pub fn yield_to_maturity(&self, bond: &CouponBond, price: f64) -> Result<f64, FinancialError> {
        const FUNCTION: &str = "YIELD";
        bond.validate(FUNCTION)?;
        positive_price(FUNCTION, price)?;

        let pricer = bond.pricer()?;
        let per_year = f64::from(bond.frequency.per_year());
        let to_maturity = bond.basis.day_count(bond.settlement, bond.maturity);
        let paid = price / 100.0 + pricer.accrued / pricer.period_length * bond.rate / per_year;
        let received = bond.redemption / 100.0 + bond.rate / per_year;
        let estimate = (received - paid) / paid * per_year * pricer.period_length / to_maturity;
        debug!(estimate, "YIELD first estimate");

        let objective = |yld: f64| price - pricer.price(yld);
        let bracket = walk(FUNCTION, &objective, estimate - WALK_STEP, estimate + WALK_STEP)?;
        self.narrow(FUNCTION, &objective, bracket.a, bracket.b, bracket.fa, bracket.fb)
    }

    /// Annual yield of a bond with an odd first period (ODDFYIELD).
    ///
    /// # Errors
    ///
    /// As [`RateSolver::yield_to_maturity`].
    pub fn odd_first_yield(
        &self,
        bond: &OddFirstCouponBond,
        price: f64,
    ) -> Result<f64, FinancialError> {
        const FUNCTION: &str = "ODDFYIELD";
        bond.validate(FUNCTION)?;
        positive_price(FUNCTION, price)?;

        let pricer = bond.pricer()?;
        let objective = |yld: f64| price - pricer.price(yld);
        let bracket = walk(FUNCTION, &objective, 0.4, 0.6)?;
        self.narrow(FUNCTION, &objective, bracket.a, bracket.b, bracket.fa, bracket.fb)
    }

    /// Runs TOMS748 on a sign-changing bracket and accepts the midpoint.
    ///
    /// A bracket still open when the budget runs out is accepted only if
    /// it is within `2 * f64::EPSILON`.
    fn narrow<F>(
        &self,
        function: &'static str,
        objective: &F,
        a: f64,
        b: f64,
        fa: f64,
        fb: f64,
    ) -> Result<f64, FinancialError>
    where
        F: Fn(f64) -> f64,
    {
        let solver = Toms748Solver::new(self.config);
        match solver.solve_bracketed(objective, a, b, fa, fb) {
            Ok(bracket) => {
                let root = bracket.midpoint();
                debug!(function, root, iterations = bracket.iterations, "rate solved");
                Ok(root)
            }
            Err(SolverError::NonConvergence { a, b, iterations })
                if (a - b).abs() <= 2.0 * f64::EPSILON =>
            {
                debug!(function, a, b, iterations, "accepting bracket at budget");
                Ok(a + (b - a) / 2.0)
            }
            Err(SolverError::NonConvergence { a, b, iterations }) => Err(no_solution(
                function,
                format!(
                    "bracket [{}, {}] still open after {} iterations",
                    a, b, iterations
                ),
            )),
            Err(source) => Err(FinancialError::Solver { function, source }),
        }
    }
}

/// RATE with the default solver configuration.
///
/// # Examples
///
/// ```
/// use finsolve_core::financial::rate;
///
/// // 48 monthly payments of 200 repaying a loan of 8000
/// let r = rate(48.0, -200.0, 8000.0, 0.0, false, 0.1).unwrap();
/// assert!((r - 0.0077014725).abs() < 1e-9);
/// ```
///
/// # Errors
///
/// See [`RateSolver::rate`].
pub fn rate(
    nper: f64,
    pmt: f64,
    pv: f64,
    fv: f64,
    pay_in_advance: bool,
    guess: f64,
) -> Result<f64, FinancialError> {
    RateSolver::with_defaults().rate(nper, pmt, pv, fv, pay_in_advance, guess)
}

/// IRR with the default solver configuration.
///
/// # Errors
///
/// See [`RateSolver::irr`].
pub fn irr(flows: &[f64]) -> Result<f64, FinancialError> {
    RateSolver::with_defaults().irr(flows)
}

/// XIRR with the default solver configuration.
///
/// # Errors
///
/// See [`RateSolver::xirr`].
pub fn xirr(flows: &[Cashflow]) -> Result<f64, FinancialError> {
    RateSolver::with_defaults().xirr(flows)
}

/// YIELD with the default solver configuration.
///
/// # Errors
///
/// See [`RateSolver::yield_to_maturity`].
pub fn yield_to_maturity(bond: &CouponBond, price: f64) -> Result<f64, FinancialError> {
    RateSolver::with_defaults().yield_to_maturity(bond, price)
}

/// ODDFYIELD with the default solver configuration.
///
/// # Errors
///
/// See [`RateSolver::odd_first_yield`].
pub fn odd_first_yield(bond: &OddFirstCouponBond, price: f64) -> Result<f64, FinancialError> {
    RateSolver::with_defaults().odd_first_yield(bond, price)
}

/// A sign-changing bracket with its endpoint values.
#[derive(Debug, Clone, Copy)]
struct SignChange {
    a: f64,
    b: f64,
    fa: f64,
    fb: f64,
}

/// One end of the walk.
#[derive(Debug, Clone, Copy)]
struct Edge {
    x: f64,
    fx: f64,
    frozen: bool,
}

/// Walks `[a, b]` outward in steps of `WALK_STEP` until the objective
/// changes sign.
///
/// Each round steps the side where `|f|` appears to shrink first, then the
/// other side, so a root lying against the local slope is still found. The
/// lower side freezes when its next step would reach `RATE_FLOOR`. A
/// non-finite objective value anywhere ends the search with
/// `NonFiniteEvaluation`.
fn walk<F>(function: &'static str, objective: &F, a: f64, b: f64) -> Result<SignChange, FinancialError>
where
    F: Fn(f64) -> f64,
{
    let mut lower = Edge {
        x: a,
        fx: objective(a),
        frozen: false,
    };
    let mut upper = Edge {
        x: b,
        fx: objective(b),
        frozen: false,
    };
    for edge in [&lower, &upper] {
        if !edge.fx.is_finite() {
            return Err(non_finite(function, edge.x));
        }
    }

    let mut evaluations = 0;
    while sign(lower.fx) * sign(upper.fx) > 0 {
        let slope = upper.fx - lower.fx;
        let lower_first = if slope == 0.0 {
            lower.fx > 0.0
        } else {
            (lower.fx > 0.0) == (slope > 0.0)
        };

        for step_lower in [lower_first, !lower_first] {
            if evaluations >= WALK_EVALUATIONS {
                return Err(no_solution(
                    function,
                    format!("no sign change after {} evaluations", evaluations),
                ));
            }
            let edge = if step_lower { &mut lower } else { &mut upper };
            if edge.frozen {
                continue;
            }
            let next = if step_lower {
                edge.x - WALK_STEP
            } else {
                edge.x + WALK_STEP
            };
            if step_lower && next <= RATE_FLOOR {
                debug!(function, rate = next, "walk reached the rate floor");
                edge.frozen = true;
                continue;
            }
            evaluations += 1;
            let f_next = objective(next);
            if !f_next.is_finite() {
                debug!(function, rate = next, "walk hit a non-finite value");
                return Err(non_finite(function, next));
            }
            if sign(f_next) != sign(edge.fx) {
                let found = if step_lower {
                    SignChange {
                        a: next,
                        b: edge.x,
                        fa: f_next,
                        fb: edge.fx,
                    }
                } else {
                    SignChange {
                        a: edge.x,
                        b: next,
                        fa: edge.fx,
                        fb: f_next,
                    }
                };
                debug!(function, a = found.a, b = found.b, evaluations, "sign change found");
                return Ok(found);
            }
            edge.x = next;
            edge.fx = f_next;
        }
    }

    Ok(SignChange {
        a: lower.x,
        b: upper.x,
        fa: lower.fx,
        fb: upper.fx,
    })
}

fn positive_price(function: &'static str, price: f64) -> Result<(), FinancialError> {
    non_negative(function, "price", price)?;
    if price == 0.0 {
        return Err(FinancialError::domain(function, "price must be > 0 (got 0)"));
    }
    Ok(())
}

fn non_finite(function: &'static str, x: f64) -> FinancialError {
    FinancialError::Solver {
        function,
        source: SolverError::NonFiniteEvaluation { x },
    }
}

fn no_solution(function: &'static str, reason: impl Into<String>) -> FinancialError {
    FinancialError::NoSolution {
        function,
        reason: reason.into(),
    }
}
