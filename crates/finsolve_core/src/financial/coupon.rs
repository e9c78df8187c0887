//! Coupon schedule arithmetic.
//!
//! Coupon dates are generated backward from maturity in steps of
//! `12 / frequency` months. Each date is derived from maturity directly
//! (not from its neighbour) so a day clamped in a short month is restored
//! in the next long one; a maturity on a month end keeps every coupon on a
//! month end.
//!
//! # Examples
//!
//! ```
//! use finsolve_core::financial::{coupon_count, coupon_next_date, coupon_prev_date};
//! use finsolve_core::types::{Date, Frequency};
//!
//! let settlement = Date::from_ymd(2007, 1, 25).unwrap();
//! let maturity = Date::from_ymd(2008, 11, 15).unwrap();
//! let freq = Frequency::SemiAnnual;
//!
//! assert_eq!(coupon_prev_date(settlement, maturity, freq).unwrap(), Date::from_ymd(2006, 11, 15).unwrap());
//! assert_eq!(coupon_next_date(settlement, maturity, freq).unwrap(), Date::from_ymd(2007, 5, 15).unwrap());
//! assert_eq!(coupon_count(settlement, maturity, freq).unwrap(), 4);
//! ```

use crate::types::{Date, DateError, DayCountBasis, FinancialError, Frequency};

/// The coupon period containing a settlement date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CouponPeriod {
    /// Last coupon date on or before settlement
    pub previous: Date,
    /// First coupon date after settlement
    pub next: Date,
    /// Coupons payable between settlement and maturity, inclusive of maturity
    pub remaining: u32,
}

impl CouponPeriod {
    /// Locates the period without validating the date order.
    ///
    /// When `settlement >= maturity` the result is the final period.
    pub(crate) fn locate(
        settlement: Date,
        maturity: Date,
        frequency: Frequency,
    ) -> Result<Self, DateError> {
        let step = frequency.months();
        let end_of_month = maturity.is_end_of_month();
        let mut next = maturity;
        let mut k = 1;
        loop {
            let previous = schedule_date(maturity, -k * step, end_of_month)?;
            if previous <= settlement {
                return Ok(Self {
                    previous,
                    next,
                    remaining: k as u32,
                });
            }
            next = previous;
            k += 1;
        }
    }
}

/// Coupon period containing `settlement` for a bond maturing on `maturity`.
///
/// # Errors
///
/// `DomainPrecondition` unless `settlement < maturity`; `Date` if the roll
/// leaves the calendar.
pub fn coupon_period(
    settlement: Date,
    maturity: Date,
    frequency: Frequency,
) -> Result<CouponPeriod, FinancialError> {
    check_settlement("COUPPCD", settlement, maturity)?;
    Ok(CouponPeriod::locate(settlement, maturity, frequency)?)
}

/// Previous coupon date on or before settlement (COUPPCD).
///
/// # Errors
///
/// As [`coupon_period`].
pub fn coupon_prev_date(
    settlement: Date,
    maturity: Date,
    frequency: Frequency,
) -> Result<Date, FinancialError> {
    check_settlement("COUPPCD", settlement, maturity)?;
    Ok(CouponPeriod::locate(settlement, maturity, frequency)?.previous)
}

/// Next coupon date after settlement (COUPNCD).
///
/// # Errors
///
/// As [`coupon_period`].
pub fn coupon_next_date(
    settlement: Date,
    maturity: Date,
    frequency: Frequency,
) -> Result<Date, FinancialError> {
    check_settlement("COUPNCD", settlement, maturity)?;
    Ok(CouponPeriod::locate(settlement, maturity, frequency)?.next)
}

/// Number of coupons payable between settlement and maturity (COUPNUM).
///
/// # Errors
///
/// As [`coupon_period`].
pub fn coupon_count(
    settlement: Date,
    maturity: Date,
    frequency: Frequency,
) -> Result<u32, FinancialError> {
    check_settlement("COUPNUM", settlement, maturity)?;
    Ok(CouponPeriod::locate(settlement, maturity, frequency)?.remaining)
}

/// Days in the coupon period containing settlement (COUPDAYS).
///
/// Actual/Actual counts the real period; Actual/365 uses `365 / frequency`
/// and the 360-day bases `360 / frequency`.
///
/// # Errors
///
/// As [`coupon_period`].
pub fn coupon_days(
    settlement: Date,
    maturity: Date,
    frequency: Frequency,
    basis: DayCountBasis,
) -> Result<f64, FinancialError> {
    check_settlement("COUPDAYS", settlement, maturity)?;
    Ok(period_days(settlement, maturity, frequency, basis)?)
}

/// Days from the previous coupon to settlement (COUPDAYBS).
///
/// # Errors
///
/// As [`coupon_period`].
pub fn coupon_days_from_start(
    settlement: Date,
    maturity: Date,
    frequency: Frequency,
    basis: DayCountBasis,
) -> Result<f64, FinancialError> {
    check_settlement("COUPDAYBS", settlement, maturity)?;
    let period = CouponPeriod::locate(settlement, maturity, frequency)?;
    Ok(basis.day_count(period.previous, settlement))
}

/// Days from settlement to the next coupon (COUPDAYSNC).
///
/// 30/360 US is the period length minus the accrued days, so the two
/// halves always add up; 30/360 EU counts directly and the actual bases
/// use calendar days.
///
/// # Errors
///
/// As [`coupon_period`].
pub fn coupon_days_to_next(
    settlement: Date,
    maturity: Date,
    frequency: Frequency,
    basis: DayCountBasis,
) -> Result<f64, FinancialError> {
    check_settlement("COUPDAYSNC", settlement, maturity)?;
    let period = CouponPeriod::locate(settlement, maturity, frequency)?;
    Ok(match basis {
        DayCountBasis::UsThirty360 => {
            period_days(settlement, maturity, frequency, basis)?
                - basis.day_count(period.previous, settlement)
        }
        DayCountBasis::EuThirty360 => basis.day_count(settlement, period.next),
        DayCountBasis::ActualActual | DayCountBasis::Actual360 | DayCountBasis::Actual365 => {
            (period.next - settlement) as f64
        }
    })
}

/// Unchecked COUPDAYS.
pub(crate) fn period_days(
    settlement: Date,
    maturity: Date,
    frequency: Frequency,
    basis: DayCountBasis,
) -> Result<f64, DateError> {
    let per_year = f64::from(frequency.per_year());
    Ok(match basis {
        DayCountBasis::ActualActual => {
            let period = CouponPeriod::locate(settlement, maturity, frequency)?;
            (period.next - period.previous) as f64
        }
        DayCountBasis::Actual365 => 365.0 / per_year,
        DayCountBasis::UsThirty360 | DayCountBasis::EuThirty360 | DayCountBasis::Actual360 => {
            360.0 / per_year
        }
    })
}

/// `anchor` shifted by `months`, optionally snapped to the month end.
pub(crate) fn schedule_date(anchor: Date, months: i32, end_of_month: bool) -> Result<Date, DateError> {
    let shifted = anchor.add_months(months)?;
    Ok(if end_of_month {
        shifted.end_of_month()
    } else {
        shifted
    })
}

/// Number of quasi-coupon rolls from `settlement` that end before `end`.
///
/// Periods roll forward from settlement; a settlement date that can not
/// carry the end date's day of month rolls on month ends instead, and the
/// snap to the first month end counts as a period of its own.
pub(crate) fn whole_periods(
    settlement: Date,
    end: Date,
    frequency: Frequency,
) -> Result<u32, DateError> {
    let step = frequency.months();
    let end_on_month_end = end.is_end_of_month();
    let roll_on_month_end = if !end_on_month_end
        && end.month() != 2
        && end.day() > 28
        && end.day() < end.days_in_month()
    {
        settlement.is_end_of_month()
    } else {
        end_on_month_end
    };

    let start = if roll_on_month_end {
        settlement.end_of_month()
    } else {
        settlement
    };
    let mut count = u32::from(settlement < start);
    let mut boundary = schedule_date(start, step, roll_on_month_end)?;
    while boundary < end {
        boundary = schedule_date(boundary, step, roll_on_month_end)?;
        count += 1;
    }
    Ok(count)
}

fn check_settlement(
    function: &'static str,
    settlement: Date,
    maturity: Date,
) -> Result<(), FinancialError> {
    if settlement >= maturity {
        return Err(FinancialError::domain(
            function,
            format!(
                "settlement must be before maturity (got {} and {})",
                settlement, maturity
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    // ========================================
    // Schedule Roll
    // ========================================

    #[test]
    fn test_period_in_middle_of_schedule() {
        let period =
            coupon_period(date(2008, 2, 15), date(2017, 11, 15), Frequency::SemiAnnual).unwrap();
        assert_eq!(period.previous, date(2007, 11, 15));
        assert_eq!(period.next, date(2008, 5, 15));
        assert_eq!(period.remaining, 20);
    }

    #[test]
    fn test_settlement_on_coupon_date() {
        // A coupon paid on the settlement date is the previous coupon
        let period =
            coupon_period(date(2008, 5, 15), date(2017, 11, 15), Frequency::SemiAnnual).unwrap();
        assert_eq!(period.previous, date(2008, 5, 15));
        assert_eq!(period.next, date(2008, 11, 15));
        assert_eq!(period.remaining, 19);
    }

    #[test]
    fn test_month_end_maturity_stays_on_month_end() {
        let prev =
            coupon_prev_date(date(2023, 5, 10), date(2024, 2, 29), Frequency::Quarterly).unwrap();
        assert_eq!(prev, date(2023, 2, 28));
        let next =
            coupon_next_date(date(2023, 5, 10), date(2024, 2, 29), Frequency::Quarterly).unwrap();
        assert_eq!(next, date(2023, 5, 31));
    }

    #[test]
    fn test_clamped_day_is_restored() {
        // 30th maturity: February clamps to the 28th, March is back on the 30th
        let period =
            coupon_period(date(2023, 3, 1), date(2023, 12, 30), Frequency::Monthly).unwrap();
        assert_eq!(period.previous, date(2023, 2, 28));
        assert_eq!(period.next, date(2023, 3, 30));
        assert_eq!(period.remaining, 10);
    }

    #[test]
    fn test_settlement_must_precede_maturity() {
        let err = coupon_count(date(2020, 1, 1), date(2020, 1, 1), Frequency::Annual).unwrap_err();
        assert_eq!(err.function(), "COUPNUM");
        assert!(coupon_prev_date(date(2021, 1, 1), date(2020, 1, 1), Frequency::Annual).is_err());
    }

    // ========================================
    // Day Counts
    // ========================================

    #[test]
    fn test_coupon_days_by_basis() {
        let (s, m, f) = (date(2007, 1, 25), date(2008, 11, 15), Frequency::SemiAnnual);
        assert_eq!(coupon_days(s, m, f, DayCountBasis::UsThirty360).unwrap(), 180.0);
        assert_eq!(coupon_days(s, m, f, DayCountBasis::ActualActual).unwrap(), 181.0);
        assert_eq!(coupon_days(s, m, f, DayCountBasis::Actual365).unwrap(), 182.5);
    }

    #[test]
    fn test_days_from_start_and_to_next() {
        let (s, m, f) = (date(2007, 1, 25), date(2008, 11, 15), Frequency::SemiAnnual);
        let basis = DayCountBasis::ActualActual;
        assert_eq!(coupon_days_from_start(s, m, f, basis).unwrap(), 71.0);
        assert_eq!(coupon_days_to_next(s, m, f, basis).unwrap(), 110.0);

        let basis = DayCountBasis::UsThirty360;
        let from_start = coupon_days_from_start(s, m, f, basis).unwrap();
        let to_next = coupon_days_to_next(s, m, f, basis).unwrap();
        assert_eq!(from_start, 70.0);
        assert_eq!(from_start + to_next, 180.0, "30/360 US halves must add up");
    }

    // ========================================
    // Quasi-Coupon Periods
    // ========================================

    #[test]
    fn test_whole_periods_counts_partial_lead() {
        // The first roll (2009-05-11) already passes the end date
        let count = whole_periods(date(2008, 11, 11), date(2009, 3, 1), Frequency::SemiAnnual).unwrap();
        assert_eq!(count, 0);
        let count = whole_periods(date(2008, 1, 11), date(2009, 3, 1), Frequency::SemiAnnual).unwrap();
        assert_eq!(count, 2);
    }
}
