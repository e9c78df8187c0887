//! Cashflow valuation: NPV, XNPV, MIRR and FVSCHEDULE.
//!
//! Period-indexed flows are plain `f64` slices in period order; dated flows
//! use [`Cashflow`].

use crate::types::{Date, FinancialError};

/// A dated cashflow.
///
/// XIRR and the dated accumulators sort by `date` before discounting.
///
/// # Examples
///
/// ```
/// use finsolve_core::financial::Cashflow;
/// use finsolve_core::types::Date;
///
/// let flow = Cashflow::new(Date::from_ymd(2008, 1, 1).unwrap(), -10_000.0);
/// assert_eq!(flow.amount, -10_000.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cashflow {
    /// Payment date
    pub date: Date,
    /// Signed amount (negative for money paid out)
    pub amount: f64,
}

impl Cashflow {
    /// Creates a cashflow.
    pub fn new(date: Date, amount: f64) -> Self {
        Self { date, amount }
    }
}

/// Net present value of flows received at the end of periods 1, 2, ...
///
/// The first flow is discounted by one full period. An empty slice is
/// worth zero.
///
/// # Errors
///
/// `DomainPrecondition` if `rate == -1`.
///
/// # Examples
///
/// ```
/// use finsolve_core::financial::npv;
///
/// let value = npv(&[-100.0, 60.0, 60.0], 0.1).unwrap();
/// assert!((value - 3.7565740).abs() < 1e-6);
/// ```
pub fn npv(flows: &[f64], rate: f64) -> Result<f64, FinancialError> {
    if rate == -1.0 {
        return Err(FinancialError::domain("NPV", "rate cannot be -100%"));
    }
    Ok(npv_at(flows, rate))
}

pub(crate) fn npv_at(flows: &[f64], rate: f64) -> f64 {
    let growth = 1.0 + rate;
    flows
        .iter()
        .enumerate()
        .map(|(i, amount)| amount / growth.powi(i as i32 + 1))
        .sum()
}

/// Net present value of dated flows, discounted on Actual/365 from the
/// first listed date.
///
/// The flows are used in the order given; the first element fixes the
/// valuation date.
///
/// # Errors
///
/// `DomainPrecondition` if `flows` is empty or `rate == -1`.
///
/// # Examples
///
/// ```
/// use finsolve_core::financial::{xnpv, Cashflow};
/// use finsolve_core::types::Date;
///
/// let flows = [
///     Cashflow::new(Date::from_ymd(2023, 1, 1).unwrap(), -100.0),
///     Cashflow::new(Date::from_ymd(2024, 1, 1).unwrap(), 110.0),
/// ];
/// assert!(xnpv(&flows, 0.1).unwrap().abs() < 1e-12);
/// ```
pub fn xnpv(flows: &[Cashflow], rate: f64) -> Result<f64, FinancialError> {
    if flows.is_empty() {
        return Err(FinancialError::domain("XNPV", "no cashflows supplied"));
    }
    if rate == -1.0 {
        return Err(FinancialError::domain("XNPV", "rate cannot be -100%"));
    }
    Ok(xnpv_at(flows, rate))
}

pub(crate) fn xnpv_at(flows: &[Cashflow], rate: f64) -> f64 {
    let Some(first) = flows.first() else {
        return 0.0;
    };
    let growth = 1.0 + rate;
    flows
        .iter()
        .map(|flow| {
            let years = (flow.date - first.date) as f64 / 365.0;
            flow.amount / growth.powf(years)
        })
        .sum()
}

/// Modified internal rate of return.
///
/// Negative flows are discounted to time zero at `finance_rate`; the rest
/// are compounded to the final period at `reinvest_rate`.
///
/// # Errors
///
/// `DomainPrecondition` if either rate is -100%, fewer than two flows are
/// supplied, or the flows do not contain both signs (zero counts as
/// positive).
///
/// # Examples
///
/// ```
/// use finsolve_core::financial::mirr;
///
/// let flows = [-120_000.0, 39_000.0, 30_000.0, 21_000.0, 37_000.0, 46_000.0];
/// let rate = mirr(&flows, 0.10, 0.12).unwrap();
/// assert!((rate - 0.126094).abs() < 1e-6);
/// ```
pub fn mirr(flows: &[f64], finance_rate: f64, reinvest_rate: f64) -> Result<f64, FinancialError> {
    if finance_rate == -1.0 {
        return Err(FinancialError::domain("MIRR", "finance rate cannot be -100%"));
    }
    if reinvest_rate == -1.0 {
        return Err(FinancialError::domain("MIRR", "reinvest rate cannot be -100%"));
    }
    if flows.len() < 2 {
        return Err(FinancialError::domain(
            "MIRR",
            format!(
                "insufficient cashflows supplied (must be > 1, got {})",
                flows.len()
            ),
        ));
    }
    check_mixed_signs("MIRR", flows.iter().copied())?;

    let n = flows.len();
    let mut present = 0.0;
    let mut future = 0.0;
    for (i, &amount) in flows.iter().enumerate() {
        if amount < 0.0 {
            present += amount / (1.0 + finance_rate).powi(i as i32);
        } else {
            future += amount * (1.0 + reinvest_rate).powi((n - i - 1) as i32);
        }
    }
    Ok((-future / present).powf(1.0 / (n - 1) as f64) - 1.0)
}

/// Future value of `principal` after applying each rate in turn.
///
/// # Examples
///
/// ```
/// use finsolve_core::financial::fv_schedule;
///
/// let value = fv_schedule(1.0, &[0.09, 0.11, 0.10]);
/// assert!((value - 1.33089).abs() < 1e-10);
/// ```
pub fn fv_schedule(principal: f64, rates: &[f64]) -> f64 {
    rates
        .iter()
        .fold(principal, |value, rate| value * (1.0 + rate))
}

/// Fails unless the amounts contain at least one negative and one
/// non-negative value.
pub(crate) fn check_mixed_signs(
    function: &'static str,
    amounts: impl IntoIterator<Item = f64>,
) -> Result<(), FinancialError> {
    let mut negative = 0usize;
    let mut positive = 0usize;
    for amount in amounts {
        if amount < 0.0 {
            negative += 1;
        } else {
            positive += 1;
        }
    }
    if negative == 0 && positive == 0 {
        return Err(FinancialError::domain(function, "no cashflows supplied"));
    }
    if negative == 0 || positive == 0 {
        return Err(FinancialError::domain(
            function,
            "list of cashflows must contain at least one positive and one negative cashflow",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    // ========================================
    // NPV
    // ========================================

    #[test]
    fn test_npv_discounts_first_flow() {
        let value = npv(&[110.0], 0.1).unwrap();
        assert_relative_eq!(value, 100.0, epsilon = 1e-12);
    }

    #[test]
    fn test_npv_empty_is_zero() {
        assert_eq!(npv(&[], 0.05).unwrap(), 0.0);
    }

    #[test]
    fn test_npv_rejects_minus_one() {
        let err = npv(&[1.0], -1.0).unwrap_err();
        assert_eq!(err.function(), "NPV");
    }

    // ========================================
    // XNPV
    // ========================================

    #[test]
    fn test_xnpv_values_from_first_listed_date() {
        let flows = [
            Cashflow::new(date(2023, 1, 1), -100.0),
            Cashflow::new(date(2024, 1, 1), 110.0),
        ];
        assert!(xnpv(&flows, 0.1).unwrap().abs() < 1e-12);

        // A leap year is still 366/365 of a year
        let flows = [
            Cashflow::new(date(2024, 1, 1), -100.0),
            Cashflow::new(date(2025, 1, 1), 100.0),
        ];
        let expected = -100.0 + 100.0 / 1.1_f64.powf(366.0 / 365.0);
        assert_relative_eq!(xnpv(&flows, 0.1).unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_xnpv_preconditions() {
        assert!(xnpv(&[], 0.1).is_err());
        let flows = [Cashflow::new(date(2024, 1, 1), 1.0)];
        assert!(xnpv(&flows, -1.0).is_err());
    }

    // ========================================
    // MIRR and FVSCHEDULE
    // ========================================

    #[test]
    fn test_mirr_two_flows_is_simple_return() {
        // With two flows MIRR reduces to fv / pv - 1 compounded once
        let rate = mirr(&[-100.0, 121.0], 0.05, 0.07).unwrap();
        assert_relative_eq!(rate, 0.21, epsilon = 1e-12);
    }

    #[test]
    fn test_mirr_preconditions() {
        assert!(mirr(&[-100.0, 50.0], -1.0, 0.1).is_err());
        assert!(mirr(&[-100.0, 50.0], 0.1, -1.0).is_err());
        assert!(mirr(&[-100.0], 0.1, 0.1).is_err());
        let err = mirr(&[100.0, 50.0], 0.1, 0.1).unwrap_err();
        assert!(
            err.to_string().contains("at least one positive"),
            "unexpected message: {}",
            err
        );
    }

    #[test]
    fn test_fv_schedule_compounds_in_order() {
        assert_relative_eq!(
            fv_schedule(1000.0, &[0.1, 0.2]),
            1320.0,
            epsilon = 1e-9
        );
        assert_eq!(fv_schedule(5.0, &[]), 5.0);
    }

    #[test]
    fn test_zero_counts_as_positive() {
        assert!(check_mixed_signs("IRR", [-1.0, 0.0]).is_ok());
        assert!(check_mixed_signs("IRR", [0.0, 0.0]).is_err());
        let err = check_mixed_signs("IRR", std::iter::empty()).unwrap_err();
        assert_eq!(err.to_string(), "IRR: no cashflows supplied");
    }
}
