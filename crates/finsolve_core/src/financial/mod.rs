//! Spreadsheet-compatible financial functions.
//!
//! ## Closed Form
//!
//! - [`fv`], [`pv`], [`pmt`], [`nper`]: time value of money
//! - [`npv`], [`xnpv`], [`mirr`], [`fv_schedule`]: cashflow valuation
//! - [`CouponBond::price`], [`OddFirstCouponBond::price`]: bond prices
//! - [`coupon_prev_date`], [`coupon_next_date`], [`coupon_count`] and the
//!   coupon day counts
//!
//! ## Solved
//!
//! [`RateSolver`] inverts the closed forms with the root finders in
//! [`crate::math::roots`]: RATE, IRR, XIRR, YIELD and ODDFYIELD. The free
//! functions [`rate`], [`irr`], [`xirr`], [`yield_to_maturity`] and
//! [`odd_first_yield`] use the default configuration.
//!
//! ## Aggregation
//!
//! The accumulators in `aggregate` build NPV, IRR, MIRR, XNPV, XIRR and
//! FVSCHEDULE inputs row by row.
//!
//! ## Examples
//!
//! ```
//! use finsolve_core::financial::{xirr, Cashflow};
//! use finsolve_core::types::Date;
//!
//! let flows = [
//!     Cashflow::new(Date::from_ymd(2008, 1, 1).unwrap(), -10_000.0),
//!     Cashflow::new(Date::from_ymd(2008, 3, 1).unwrap(), 2_750.0),
//!     Cashflow::new(Date::from_ymd(2008, 10, 30).unwrap(), 4_250.0),
//!     Cashflow::new(Date::from_ymd(2009, 2, 15).unwrap(), 3_250.0),
//!     Cashflow::new(Date::from_ymd(2009, 4, 1).unwrap(), 2_750.0),
//! ];
//! let rate = xirr(&flows).unwrap();
//! assert!((rate - 0.373362535).abs() < 1e-9);
//! ```

mod aggregate;
mod bond;
mod cashflow;
mod coupon;
mod rates;
mod tvm;

// Re-export public items at module level
pub use aggregate::{
    FvScheduleAccumulator, IrrAccumulator, MirrAccumulator, NpvAccumulator, PeriodFlow,
    XirrAccumulator, XnpvAccumulator,
};
pub use bond::{CouponBond, OddFirstCouponBond};
pub use cashflow::{fv_schedule, mirr, npv, xnpv, Cashflow};
pub use coupon::{
    coupon_count, coupon_days, coupon_days_from_start, coupon_days_to_next, coupon_next_date,
    coupon_period, coupon_prev_date, CouponPeriod,
};
pub use rates::{irr, odd_first_yield, rate, xirr, yield_to_maturity, RateSolver};
pub use tvm::{fv, nper, pmt, pv};
