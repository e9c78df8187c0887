//! Coupon bond pricing per 100 face value.
//!
//! - [`CouponBond`]: regular schedule (PRICE)
//! - [`OddFirstCouponBond`]: irregular first period (ODDFPRICE)
//!
//! Schedule-dependent quantities are resolved once into a pricer, so the
//! yield solvers evaluate a plain function of the yield.

use super::coupon::{period_days, schedule_date, whole_periods, CouponPeriod};
use crate::types::{Date, DateError, DayCountBasis, FinancialError, Frequency};

/// A bond paying regular coupons up to maturity.
///
/// # Examples
///
/// ```
/// use finsolve_core::financial::CouponBond;
/// use finsolve_core::types::{Date, DayCountBasis, Frequency};
///
/// let bond = CouponBond {
///     settlement: Date::from_ymd(2008, 2, 15).unwrap(),
///     maturity: Date::from_ymd(2017, 11, 15).unwrap(),
///     rate: 0.0575,
///     redemption: 100.0,
///     frequency: Frequency::SemiAnnual,
///     basis: DayCountBasis::UsThirty360,
/// };
/// let price = bond.price(0.065).unwrap();
/// assert!((price - 94.63436).abs() < 1e-5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CouponBond {
    /// Settlement date
    pub settlement: Date,
    /// Maturity date
    pub maturity: Date,
    /// Annual coupon rate
    pub rate: f64,
    /// Redemption value per 100 face
    pub redemption: f64,
    /// Coupons per year
    pub frequency: Frequency,
    /// Day-count basis
    pub basis: DayCountBasis,
}

impl CouponBond {
    /// Clean price per 100 face at annual yield `yld`.
    ///
    /// # Errors
    ///
    /// `DomainPrecondition` if settlement is not before maturity, or the
    /// rate, yield or redemption is negative.
    pub fn price(&self, yld: f64) -> Result<f64, FinancialError> {
        self.validate("PRICE")?;
        non_negative("PRICE", "yield", yld)?;
        Ok(self.pricer()?.price(yld))
    }

    pub(crate) fn validate(&self, function: &'static str) -> Result<(), FinancialError> {
        if self.settlement >= self.maturity {
            return Err(FinancialError::domain(
                function,
                format!(
                    "settlement must be before maturity (got {} and {})",
                    self.settlement, self.maturity
                ),
            ));
        }
        non_negative(function, "rate", self.rate)?;
        non_negative(function, "redemption", self.redemption)
    }

    pub(crate) fn pricer(&self) -> Result<RegularPricer, DateError> {
        let period = CouponPeriod::locate(self.settlement, self.maturity, self.frequency)?;
        let period_length = match self.basis {
            DayCountBasis::ActualActual => self.basis.day_count(period.previous, period.next),
            _ => period_days(self.settlement, self.maturity, self.frequency, self.basis)?,
        };
        let accrued = self.basis.day_count(period.previous, self.settlement);
        let per_year = f64::from(self.frequency.per_year());

        Ok(RegularPricer {
            coupon: 100.0 * self.rate / per_year,
            redemption: self.redemption,
            per_year,
            coupons: period.remaining,
            accrued,
            period_length,
        })
    }
}

/// PRICE with the schedule already resolved.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RegularPricer {
    coupon: f64,
    redemption: f64,
    per_year: f64,
    coupons: u32,
    pub(crate) accrued: f64,
    pub(crate) period_length: f64,
}

impl RegularPricer {
    pub(crate) fn price(&self, yld: f64) -> f64 {
        let to_next = (self.period_length - self.accrued) / self.period_length;
        let dirty = if self.coupons == 1 {
            (self.redemption + self.coupon) / (1.0 + to_next * yld / self.per_year)
        } else {
            let base = 1.0 + yld / self.per_year;
            let n = f64::from(self.coupons);
            let coupons: f64 = (1..=self.coupons)
                .map(|k| self.coupon / base.powf(f64::from(k) - 1.0 + to_next))
                .sum();
            self.redemption / base.powf(n - 1.0 + to_next) + coupons
        };
        dirty - self.coupon * self.accrued / self.period_length
    }
}

/// A bond whose first coupon period is irregular.
///
/// The first period runs from `issue` to `first_coupon`; from there the
/// schedule is regular up to maturity.
///
/// # Examples
///
/// ```
/// use finsolve_core::financial::OddFirstCouponBond;
/// use finsolve_core::types::{Date, DayCountBasis, Frequency};
///
/// let bond = OddFirstCouponBond {
///     settlement: Date::from_ymd(2008, 11, 11).unwrap(),
///     maturity: Date::from_ymd(2021, 3, 1).unwrap(),
///     issue: Date::from_ymd(2008, 10, 15).unwrap(),
///     first_coupon: Date::from_ymd(2009, 3, 1).unwrap(),
///     rate: 0.0785,
///     redemption: 100.0,
///     frequency: Frequency::SemiAnnual,
///     basis: DayCountBasis::ActualActual,
/// };
/// let price = bond.price(0.0625).unwrap();
/// assert!((price - 113.597717).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OddFirstCouponBond {
    /// Settlement date
    pub settlement: Date,
    /// Maturity date
    pub maturity: Date,
    /// Issue date, start of the odd first period
    pub issue: Date,
    /// First coupon date, end of the odd first period
    pub first_coupon: Date,
    /// Annual coupon rate
    pub rate: f64,
    /// Redemption value per 100 face
    pub redemption: f64,
    /// Coupons per year
    pub frequency: Frequency,
    /// Day-count basis
    pub basis: DayCountBasis,
}

impl OddFirstCouponBond {
    /// Clean price per 100 face at annual yield `yld` (ODDFPRICE).
    ///
    /// # Errors
    ///
    /// `DomainPrecondition` if maturity and first coupon fall on different
    /// days of the year, if `issue <= settlement <= first_coupon <= maturity`
    /// does not hold, or if the rate, yield or redemption is negative.
    pub fn price(&self, yld: f64) -> Result<f64, FinancialError> {
        self.validate("ODDFPRICE")?;
        non_negative("ODDFPRICE", "yield", yld)?;
        Ok(self.pricer()?.price(yld))
    }

    pub(crate) fn validate(&self, function: &'static str) -> Result<(), FinancialError> {
        let (maturity, first) = (self.maturity, self.first_coupon);
        let same_day = maturity.day() == first.day()
            || (maturity.is_end_of_february() && first.is_end_of_february());
        if maturity.month() != first.month() || !same_day {
            return Err(FinancialError::domain(
                function,
                format!(
                    "maturity and first coupon must have the same month and day (got {} and {})",
                    maturity, first
                ),
            ));
        }
        ordered(function, "first coupon", first, "maturity", maturity)?;
        ordered(function, "settlement", self.settlement, "first coupon", first)?;
        ordered(function, "issue", self.issue, "settlement", self.settlement)?;
        non_negative(function, "rate", self.rate)?;
        non_negative(function, "redemption", self.redemption)
    }

    pub(crate) fn pricer(&self) -> Result<OddFirstPricer, DateError> {
        let basis = self.basis;
        let per_year = f64::from(self.frequency.per_year());
        let period_length = period_days(self.settlement, self.first_coupon, self.frequency, basis)?;
        let first_period = basis.day_count(self.issue, self.first_coupon);

        let shape = if first_period < period_length {
            let coupons =
                CouponPeriod::locate(self.settlement, self.maturity, self.frequency)?.remaining;
            let to_first = basis.day_count(self.settlement, self.first_coupon).max(0.0);
            OddFirstShape::Short {
                coupons,
                to_first: to_first / period_length,
                first_period: first_period / period_length,
                accrued: basis.day_count(self.issue, self.settlement) / period_length,
            }
        } else {
            self.long_shape(period_length)?
        };

        Ok(OddFirstPricer {
            coupon: 100.0 * self.rate / per_year,
            redemption: self.redemption,
            per_year,
            shape,
        })
    }

    fn long_shape(&self, period_length: f64) -> Result<OddFirstShape, DateError> {
        let basis = self.basis;
        let coupons =
            CouponPeriod::locate(self.first_coupon, self.maturity, self.frequency)?.remaining;
        let quasi_coupons =
            CouponPeriod::locate(self.issue, self.first_coupon, self.frequency)?.remaining;

        let current = CouponPeriod::locate(self.settlement, self.first_coupon, self.frequency)?;
        let to_next = match basis {
            DayCountBasis::Actual360 | DayCountBasis::Actual365 => {
                basis.day_count(self.settlement, current.next)
            }
            _ => period_length - basis.day_count(current.previous, self.settlement),
        };
        let whole = whole_periods(self.settlement, self.first_coupon, self.frequency)?;
        let offset = f64::from(whole) + to_next / period_length;

        // Walk the quasi-coupon periods of the odd period, latest first
        let step = self.frequency.months();
        let end_of_month = self.first_coupon.is_end_of_month();
        let mut next = self.first_coupon;
        let mut previous = schedule_date(self.first_coupon, -step, end_of_month)?;
        let mut k = 1;
        let mut coupon_fraction = 0.0;
        let mut accrued_fraction = 0.0;
        for i in (1..=quasi_coupons).rev() {
            let length = match basis {
                DayCountBasis::ActualActual => basis.day_count(previous, next),
                _ => period_length,
            };
            coupon_fraction += if i > 1 {
                1.0
            } else {
                basis.day_count(self.issue, next) / length
            };
            let accrual_start = self.issue.max(previous);
            let accrual_end = self.settlement.min(next);
            accrued_fraction += (basis.day_count(accrual_start, accrual_end) / length).max(0.0);

            k += 1;
            next = previous;
            previous = schedule_date(self.first_coupon, -k * step, end_of_month)?;
            if next < self.issue {
                break;
            }
        }

        Ok(OddFirstShape::Long {
            coupons,
            offset,
            coupon_fraction,
            accrued_fraction,
        })
    }
}

#[derive(Debug, Clone, Copy)]
enum OddFirstShape {
    /// Odd period shorter than a regular one. Fractions are of the regular
    /// period containing settlement.
    Short {
        coupons: u32,
        to_first: f64,
        first_period: f64,
        accrued: f64,
    },
    /// Odd period spanning several quasi-coupon periods.
    Long {
        coupons: u32,
        offset: f64,
        coupon_fraction: f64,
        accrued_fraction: f64,
    },
}

/// ODDFPRICE with the schedule already resolved.
#[derive(Debug, Clone, Copy)]
pub(crate) struct OddFirstPricer {
    coupon: f64,
    redemption: f64,
    per_year: f64,
    shape: OddFirstShape,
}

impl OddFirstPricer {
    pub(crate) fn price(&self, yld: f64) -> f64 {
        let base = 1.0 + yld / self.per_year;
        let coupon = self.coupon;
        match self.shape {
            OddFirstShape::Short {
                coupons,
                to_first,
                first_period,
                accrued,
            } => {
                let n = f64::from(coupons);
                let redemption = self.redemption / base.powf(n - 1.0 + to_first);
                let odd_coupon = coupon * first_period / base.powf(to_first);
                let regular: f64 = (2..=coupons)
                    .map(|k| coupon / base.powf(f64::from(k) - 1.0 + to_first))
                    .sum();
                redemption + odd_coupon + regular - coupon * accrued
            }
            OddFirstShape::Long {
                coupons,
                offset,
                coupon_fraction,
                accrued_fraction,
            } => {
                let n = f64::from(coupons);
                let redemption = self.redemption / base.powf(n + offset);
                let odd_coupon = coupon * coupon_fraction / base.powf(offset);
                let regular: f64 = (1..=coupons)
                    .map(|i| coupon / base.powf(f64::from(i) + offset))
                    .sum();
                redemption + odd_coupon + regular - coupon * accrued_fraction
            }
        }
    }
}

pub(crate) fn non_negative(
    function: &'static str,
    name: &str,
    value: f64,
) -> Result<(), FinancialError> {
    if value < 0.0 || value.is_nan() {
        return Err(FinancialError::domain(
            function,
            format!("{} must be >= 0 (got {})", name, value),
        ));
    }
    Ok(())
}

fn ordered(
    function: &'static str,
    earlier_name: &str,
    earlier: Date,
    later_name: &str,
    later: Date,
) -> Result<(), FinancialError> {
    if later < earlier {
        return Err(FinancialError::domain(
            function,
            format!(
                "{} must not be after {} (got {} and {})",
                earlier_name, later_name, earlier, later
            ),
        ));
    }
    Ok(())
}
