//! Bond yield commands: YIELD and ODDFYIELD.

use clap::Args;
use finsolve_core::financial::{CouponBond, OddFirstCouponBond, RateSolver};
use tracing::info;

use super::{emit, parse_basis, parse_date, parse_frequency};
use crate::Result;

/// Terms shared by both bond commands
#[derive(Args, Debug, Clone)]
pub struct BondArgs {
    /// Settlement date (YYYY-MM-DD)
    #[arg(long)]
    pub settlement: String,

    /// Maturity date (YYYY-MM-DD)
    #[arg(long)]
    pub maturity: String,

    /// Annual coupon rate (0.0575 for 5.75%)
    #[arg(long)]
    pub rate: f64,

    /// Clean price per 100 face value
    #[arg(long)]
    pub price: f64,

    /// Redemption value per 100 face value
    #[arg(long, default_value = "100")]
    pub redemption: f64,

    /// Coupons per year (1, 2, 4, 6 or 12)
    #[arg(long, default_value = "2")]
    pub frequency: u8,

    /// Day-count basis code (0-4) or name
    #[arg(long, default_value = "0")]
    pub basis: String,
}

impl BondArgs {
    /// Build the regular coupon bond these arguments describe.
    pub fn coupon_bond(&self) -> Result<CouponBond> {
        Ok(CouponBond {
            settlement: parse_date("settlement", &self.settlement)?,
            maturity: parse_date("maturity", &self.maturity)?,
            rate: self.rate,
            redemption: self.redemption,
            frequency: parse_frequency(self.frequency)?,
            basis: parse_basis(&self.basis)?,
        })
    }

    /// Build an odd-first-period bond from these arguments plus the
    /// issue and first coupon dates.
    pub fn odd_first_bond(&self, issue: &str, first_coupon: &str) -> Result<OddFirstCouponBond> {
        let regular = self.coupon_bond()?;
        Ok(OddFirstCouponBond {
            settlement: regular.settlement,
            maturity: regular.maturity,
            issue: parse_date("issue", issue)?,
            first_coupon: parse_date("first-coupon", first_coupon)?,
            rate: regular.rate,
            redemption: regular.redemption,
            frequency: regular.frequency,
            basis: regular.basis,
        })
    }
}

/// Run the yield command
pub fn run_yield(solver: &RateSolver, args: &BondArgs, format: &str) -> Result<()> {
    let bond = args.coupon_bond()?;
    info!(
        settlement = %bond.settlement,
        maturity = %bond.maturity,
        price = args.price,
        "Solving YIELD"
    );

    let value = solver.yield_to_maturity(&bond, args.price)?;
    emit("YIELD", value, format)
}

/// Run the odd-yield command
pub fn run_odd_yield(
    solver: &RateSolver,
    args: &BondArgs,
    issue: &str,
    first_coupon: &str,
    format: &str,
) -> Result<()> {
    let bond = args.odd_first_bond(issue, first_coupon)?;
    info!(
        settlement = %bond.settlement,
        first_coupon = %bond.first_coupon,
        maturity = %bond.maturity,
        price = args.price,
        "Solving ODDFYIELD"
    );

    let value = solver.odd_first_yield(&bond, args.price)?;
    emit("ODDFYIELD", value, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CliError;
    use approx::assert_relative_eq;
    use finsolve_core::types::{DayCountBasis, Frequency};

    fn args(price: f64) -> BondArgs {
        BondArgs {
            settlement: "2008-11-11".to_string(),
            maturity: "2021-03-01".to_string(),
            rate: 0.0785,
            price,
            redemption: 100.0,
            frequency: 2,
            basis: "1".to_string(),
        }
    }

    #[test]
    fn test_coupon_bond_from_args() {
        let bond = args(100.0).coupon_bond().unwrap();
        assert_eq!(bond.frequency, Frequency::SemiAnnual);
        assert_eq!(bond.basis, DayCountBasis::ActualActual);
        assert_eq!(bond.maturity.year(), 2021);
    }

    #[test]
    fn test_odd_first_yield_recovers_price() {
        let a = args(113.59771747407883);
        let bond = a.odd_first_bond("2008-10-15", "2009-03-01").unwrap();
        let value = RateSolver::with_defaults()
            .odd_first_yield(&bond, a.price)
            .unwrap();
        assert_relative_eq!(value, 0.0625, epsilon = 1e-9);
    }

    #[test]
    fn test_bad_dates_and_frequency() {
        let mut a = args(100.0);
        a.settlement = "2008-13-01".to_string();
        assert!(matches!(
            a.coupon_bond().unwrap_err(),
            CliError::InvalidArgument(_)
        ));

        let mut a = args(100.0);
        a.frequency = 5;
        assert!(matches!(a.coupon_bond().unwrap_err(), CliError::Financial(_)));
    }
}
