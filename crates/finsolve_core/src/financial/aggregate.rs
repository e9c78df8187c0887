//! Row-by-row accumulators for the cashflow functions.
//!
//! Each accumulator collects rows with `accumulate`, combines partial
//! results with `merge` and produces the final value with `terminate`.
//! Rows may arrive in any order; period-indexed rows are sorted by period
//! and dated rows by date before evaluation. Accumulator state is plain
//! data and serialises with `serde`, so a partial aggregate can be shipped
//! between workers and merged later.
//!
//! Parameters that apply to the whole aggregate (a discount rate, a
//! principal) are passed on every row and must not change between rows or
//! between merged partials.
//!
//! # Examples
//!
//! ```
//! use finsolve_core::financial::IrrAccumulator;
//!
//! let mut first = IrrAccumulator::new();
//! first.accumulate(0, -100.0).unwrap();
//!
//! let mut second = IrrAccumulator::new();
//! second.accumulate(1, 110.0).unwrap();
//!
//! first.merge(second);
//! assert!((first.terminate().unwrap() - 0.1).abs() < 1e-12);
//! ```

use super::cashflow::{fv_schedule, mirr, npv, xnpv, Cashflow};
use super::rates::RateSolver;
use crate::types::{Date, FinancialError};

/// A period-indexed value.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PeriodFlow {
    /// Position in the sequence
    pub period: u32,
    /// Amount (or rate, for FVSCHEDULE)
    pub amount: f64,
}

/// A parameter that must stay the same across every row.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
struct Constant(Option<f64>);

impl Constant {
    fn observe(
        &mut self,
        function: &'static str,
        name: &str,
        value: f64,
    ) -> Result<(), FinancialError> {
        match self.0 {
            None => {
                self.0 = Some(value);
                Ok(())
            }
            Some(current) if current == value => Ok(()),
            Some(current) => Err(FinancialError::domain(
                function,
                format!("{} must be constant (got {} and {})", name, current, value),
            )),
        }
    }

    fn merge(&mut self, other: Constant, function: &'static str, name: &str) -> Result<(), FinancialError> {
        match other.0 {
            Some(value) => self.observe(function, name, value),
            None => Ok(()),
        }
    }

    fn get(&self, function: &'static str, name: &str) -> Result<f64, FinancialError> {
        self.0
            .ok_or_else(|| FinancialError::domain(function, format!("no {} supplied", name)))
    }
}

fn finite(function: &'static str, amount: f64) -> Result<f64, FinancialError> {
    if amount.is_finite() {
        Ok(amount)
    } else {
        Err(FinancialError::domain(
            function,
            format!("cashflow must be finite (got {})", amount),
        ))
    }
}

fn by_period(rows: &[PeriodFlow]) -> Vec<f64> {
    let mut sorted = rows.to_vec();
    sorted.sort_by_key(|row| row.period);
    sorted.into_iter().map(|row| row.amount).collect()
}

fn by_date(rows: &[Cashflow]) -> Vec<Cashflow> {
    let mut sorted = rows.to_vec();
    sorted.sort_by_key(|row| row.date);
    sorted
}

/// NPV over rows of `(rate, period, amount)`.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NpvAccumulator {
    rate: Constant,
    flows: Vec<PeriodFlow>,
}

impl NpvAccumulator {
    /// An empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one row.
    ///
    /// # Errors
    ///
    /// `DomainPrecondition` if `amount` is not finite or `rate` differs from
    /// an earlier row.
    pub fn accumulate(&mut self, rate: f64, period: u32, amount: f64) -> Result<(), FinancialError> {
        let amount = finite("NPV", amount)?;
        self.rate.observe("NPV", "rate", rate)?;
        self.flows.push(PeriodFlow { period, amount });
        Ok(())
    }

    /// Absorbs another partial aggregate.
    ///
    /// # Errors
    ///
    /// `DomainPrecondition` if the two partials saw different rates.
    pub fn merge(&mut self, other: NpvAccumulator) -> Result<(), FinancialError> {
        self.rate.merge(other.rate, "NPV", "rate")?;
        self.flows.extend(other.flows);
        Ok(())
    }

    /// NPV of the collected flows in period order.
    ///
    /// # Errors
    ///
    /// `DomainPrecondition` if no row was accumulated or the rate is -100%.
    pub fn terminate(&self) -> Result<f64, FinancialError> {
        let rate = self.rate.get("NPV", "rate")?;
        npv(&by_period(&self.flows), rate)
    }
}

/// IRR over rows of `(period, amount)`.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IrrAccumulator {
    flows: Vec<PeriodFlow>,
}

impl IrrAccumulator {
    /// An empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one row.
    ///
    /// # Errors
    ///
    /// `DomainPrecondition` if `amount` is not finite.
    pub fn accumulate(&mut self, period: u32, amount: f64) -> Result<(), FinancialError> {
        let amount = finite("IRR", amount)?;
        self.flows.push(PeriodFlow { period, amount });
        Ok(())
    }

    /// Absorbs another partial aggregate.
    pub fn merge(&mut self, other: IrrAccumulator) {
        self.flows.extend(other.flows);
    }

    /// IRR of the collected flows with the default solver.
    ///
    /// # Errors
    ///
    /// See [`RateSolver::irr`].
    pub fn terminate(&self) -> Result<f64, FinancialError> {
        self.terminate_with(&RateSolver::with_defaults())
    }

    /// IRR of the collected flows with a configured solver.
    ///
    /// # Errors
    ///
    /// See [`RateSolver::irr`].
    pub fn terminate_with(&self, solver: &RateSolver) -> Result<f64, FinancialError> {
        solver.irr(&by_period(&self.flows))
    }
}

/// MIRR over rows of `(period, amount, finance_rate, reinvest_rate)`.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MirrAccumulator {
    finance_rate: Constant,
    reinvest_rate: Constant,
    flows: Vec<PeriodFlow>,
}

impl MirrAccumulator {
    /// An empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one row.
    ///
    /// # Errors
    ///
    /// `DomainPrecondition` if `amount` is not finite or either rate
    /// differs from an earlier row.
    pub fn accumulate(
        &mut self,
        period: u32,
        amount: f64,
        finance_rate: f64,
        reinvest_rate: f64,
    ) -> Result<(), FinancialError> {
        let amount = finite("MIRR", amount)?;
        self.finance_rate
            .observe("MIRR", "finance rate", finance_rate)?;
        self.reinvest_rate
            .observe("MIRR", "reinvest rate", reinvest_rate)?;
        self.flows.push(PeriodFlow { period, amount });
        Ok(())
    }

    /// Absorbs another partial aggregate.
    ///
    /// # Errors
    ///
    /// `DomainPrecondition` if the partials saw different rates.
    pub fn merge(&mut self, other: MirrAccumulator) -> Result<(), FinancialError> {
        self.finance_rate
            .merge(other.finance_rate, "MIRR", "finance rate")?;
        self.reinvest_rate
            .merge(other.reinvest_rate, "MIRR", "reinvest rate")?;
        self.flows.extend(other.flows);
        Ok(())
    }

    /// MIRR of the collected flows in period order.
    ///
    /// # Errors
    ///
    /// See [`mirr`](super::mirr); also fails when no row was accumulated.
    pub fn terminate(&self) -> Result<f64, FinancialError> {
        let finance_rate = self.finance_rate.get("MIRR", "finance rate")?;
        let reinvest_rate = self.reinvest_rate.get("MIRR", "reinvest rate")?;
        mirr(&by_period(&self.flows), finance_rate, reinvest_rate)
    }
}

/// XNPV over rows of `(rate, date, amount)`.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct XnpvAccumulator {
    rate: Constant,
    flows: Vec<Cashflow>,
}

impl XnpvAccumulator {
    /// An empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one row.
    ///
    /// # Errors
    ///
    /// `DomainPrecondition` if `amount` is not finite or `rate` differs from
    /// an earlier row.
    pub fn accumulate(&mut self, rate: f64, date: Date, amount: f64) -> Result<(), FinancialError> {
        let amount = finite("XNPV", amount)?;
        self.rate.observe("XNPV", "rate", rate)?;
        self.flows.push(Cashflow::new(date, amount));
        Ok(())
    }

    /// Absorbs another partial aggregate.
    ///
    /// # Errors
    ///
    /// `DomainPrecondition` if the two partials saw different rates.
    pub fn merge(&mut self, other: XnpvAccumulator) -> Result<(), FinancialError> {
        self.rate.merge(other.rate, "XNPV", "rate")?;
        self.flows.extend(other.flows);
        Ok(())
    }

    /// XNPV of the collected flows valued from the earliest date.
    ///
    /// # Errors
    ///
    /// See [`xnpv`](super::xnpv); also fails when no row was accumulated.
    pub fn terminate(&self) -> Result<f64, FinancialError> {
        let rate = self.rate.get("XNPV", "rate")?;
        xnpv(&by_date(&self.flows), rate)
    }
}

/// XIRR over rows of `(date, amount)`.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct XirrAccumulator {
    flows: Vec<Cashflow>,
}

impl XirrAccumulator {
    /// An empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one row.
    ///
    /// # Errors
    ///
    /// `DomainPrecondition` if `amount` is not finite.
    pub fn accumulate(&mut self, date: Date, amount: f64) -> Result<(), FinancialError> {
        let amount = finite("XIRR", amount)?;
        self.flows.push(Cashflow::new(date, amount));
        Ok(())
    }

    /// Absorbs another partial aggregate.
    pub fn merge(&mut self, other: XirrAccumulator) {
        self.flows.extend(other.flows);
    }

    /// XIRR of the collected flows with the default solver.
    ///
    /// # Errors
    ///
    /// See [`RateSolver::xirr`].
    pub fn terminate(&self) -> Result<f64, FinancialError> {
        self.terminate_with(&RateSolver::with_defaults())
    }

    /// XIRR of the collected flows with a configured solver.
    ///
    /// # Errors
    ///
    /// See [`RateSolver::xirr`].
    pub fn terminate_with(&self, solver: &RateSolver) -> Result<f64, FinancialError> {
        solver.xirr(&self.flows)
    }
}

/// FVSCHEDULE over rows of `(principal, period, rate)`.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FvScheduleAccumulator {
    principal: Constant,
    rates: Vec<PeriodFlow>,
}

impl FvScheduleAccumulator {
    /// An empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one row.
    ///
    /// # Errors
    ///
    /// `DomainPrecondition` if `rate` is not finite or `principal` differs
    /// from an earlier row.
    pub fn accumulate(&mut self, principal: f64, period: u32, rate: f64) -> Result<(), FinancialError> {
        let rate = finite("FVSCHEDULE", rate)?;
        self.principal
            .observe("FVSCHEDULE", "principal", principal)?;
        self.rates.push(PeriodFlow {
            period,
            amount: rate,
        });
        Ok(())
    }

    /// Absorbs another partial aggregate.
    ///
    /// # Errors
    ///
    /// `DomainPrecondition` if the partials saw different principals.
    pub fn merge(&mut self, other: FvScheduleAccumulator) -> Result<(), FinancialError> {
        self.principal
            .merge(other.principal, "FVSCHEDULE", "principal")?;
        self.rates.extend(other.rates);
        Ok(())
    }

    /// Principal compounded through the rates in period order.
    ///
    /// # Errors
    ///
    /// `DomainPrecondition` when no row was accumulated.
    pub fn terminate(&self) -> Result<f64, FinancialError> {
        let principal = self.principal.get("FVSCHEDULE", "principal")?;
        Ok(fv_schedule(principal, &by_period(&self.rates)))
    }
}
