//! Time value of money: FV, PV, PMT and NPER.
//!
//! Sign convention follows the spreadsheet functions: money paid out is
//! negative, money received positive. `pay_in_advance` moves every payment
//! to the start of its period.

use crate::types::FinancialError;

/// Future value of a level-payment annuity plus a present sum.
///
/// # Errors
///
/// `DomainPrecondition` when `pmt` and `pv` are both zero, when a negative
/// rate is combined with a fractional `nper`, or when `rate == -1` with
/// `nper <= 0`.
///
/// # Examples
///
/// ```
/// use finsolve_core::financial::fv;
///
/// // 10 monthly deposits of 200 at 6% a year, starting from 500
/// let value = fv(0.06 / 12.0, 10.0, -200.0, -500.0, true).unwrap();
/// assert!((value - 2581.403374060).abs() < 1e-6);
/// ```
pub fn fv(
    rate: f64,
    nper: f64,
    pmt: f64,
    pv: f64,
    pay_in_advance: bool,
) -> Result<f64, FinancialError> {
    if pmt == 0.0 && pv == 0.0 {
        return Err(FinancialError::domain(
            "FV",
            "at least one of present value and payment must be non-zero",
        ));
    }
    check_integral_periods("FV", rate, nper)?;
    if rate == -1.0 && nper <= 0.0 {
        return Err(FinancialError::domain(
            "FV",
            "rate cannot be -100% when the number of periods is <= 0",
        ));
    }
    Ok(future_value(rate, nper, pmt, pv, pay_in_advance))
}

/// Unchecked future value; the RATE objective evaluates this directly.
pub(crate) fn future_value(rate: f64, nper: f64, pmt: f64, pv: f64, pay_in_advance: bool) -> f64 {
    if rate == 0.0 {
        return -(pv + pmt * nper);
    }
    let growth = (1.0 + rate).powf(nper);
    let annuity_periods = if pay_in_advance { nper + 1.0 } else { nper };
    let annuity_growth = (1.0 + rate).powf(annuity_periods);

    let mut value = pmt * (annuity_growth - 1.0) / rate + growth * pv;
    if pay_in_advance {
        value -= pmt;
    }
    -value
}

/// Present value of a level-payment annuity plus a future sum.
///
/// # Errors
///
/// `DomainPrecondition` when `pmt` and `fv` are both zero, when a negative
/// rate is combined with a fractional `nper`, or when `rate == -1`.
///
/// # Examples
///
/// ```
/// use finsolve_core::financial::pv;
///
/// // 240 monthly payments of 500 at 8% a year
/// let value = pv(0.08 / 12.0, 240.0, 500.0, 0.0, false).unwrap();
/// assert!((value + 59777.15).abs() < 0.01);
/// ```
pub fn pv(
    rate: f64,
    nper: f64,
    pmt: f64,
    fv: f64,
    pay_in_advance: bool,
) -> Result<f64, FinancialError> {
    if pmt == 0.0 && fv == 0.0 {
        return Err(FinancialError::domain(
            "PV",
            "at least one of future value and payment must be non-zero",
        ));
    }
    check_integral_periods("PV", rate, nper)?;
    if rate == -1.0 {
        return Err(FinancialError::domain("PV", "rate cannot be -100%"));
    }
    if rate == 0.0 {
        return Ok(-(fv + pmt * nper));
    }

    let periods = if pay_in_advance { nper - 1.0 } else { nper };
    let annuity = 1.0 - (1.0 + rate).powf(-periods);
    let balloon = if pay_in_advance { fv / (1.0 + rate) } else { fv };
    let first = if pay_in_advance { pmt } else { 0.0 };

    Ok(-(pmt * annuity / rate + (1.0 - annuity) * balloon + first))
}

/// Level payment that amortises `pv` down to `fv` over `nper` periods.
///
/// # Errors
///
/// `DomainPrecondition` when `nper <= 0`, when `pv` and `fv` are both zero,
/// or when a negative rate is combined with a fractional `nper`.
///
/// # Examples
///
/// ```
/// use finsolve_core::financial::pmt;
///
/// let payment = pmt(0.08 / 12.0, 10.0, 10000.0, 0.0, false).unwrap();
/// assert!((payment + 1037.03).abs() < 0.01);
/// ```
pub fn pmt(
    rate: f64,
    nper: f64,
    pv: f64,
    fv: f64,
    pay_in_advance: bool,
) -> Result<f64, FinancialError> {
    if nper <= 0.0 {
        return Err(FinancialError::domain(
            "PMT",
            format!("the number of periods must be greater than zero, got {}", nper),
        ));
    }
    if pv == 0.0 && fv == 0.0 {
        return Err(FinancialError::domain(
            "PMT",
            "at least one of present value and future value must be non-zero",
        ));
    }
    check_integral_periods("PMT", rate, nper)?;
    if rate == 0.0 {
        return Ok(-(pv + fv) / nper);
    }

    let balloon = if pay_in_advance { fv / (1.0 + rate) } else { fv };
    let periods = if pay_in_advance { nper - 1.0 } else { nper };
    let annuity = 1.0 - (1.0 + rate).powf(-periods);
    let denominator = if pay_in_advance {
        annuity + rate
    } else {
        annuity
    };

    Ok(-(rate * pv + balloon * rate * (1.0 - annuity)) / denominator)
}

/// Number of periods needed to move from `pv` to `fv` with payment `pmt`.
///
/// # Errors
///
/// `DomainPrecondition` when `rate` and `pmt` are both zero, or when the
/// payment can never reach `fv` (the result would not be finite).
///
/// # Examples
///
/// ```
/// use finsolve_core::financial::nper;
///
/// let periods = nper(0.01, -100.0, 1000.0, 0.0, false).unwrap();
/// assert!((periods - 10.588).abs() < 1e-3);
/// ```
pub fn nper(
    rate: f64,
    pmt: f64,
    pv: f64,
    fv: f64,
    pay_in_advance: bool,
) -> Result<f64, FinancialError> {
    if rate == 0.0 {
        if pmt == 0.0 {
            return Err(FinancialError::domain(
                "NPER",
                "rate and payment cannot both be zero",
            ));
        }
        return Ok(-(pv + fv) / pmt);
    }

    let (balloon, principal) = if pay_in_advance {
        (fv / (1.0 + rate), pv + pmt)
    } else {
        (fv, pv)
    };
    let principal = principal + balloon;
    let net_payment = pmt - balloon * rate;

    let mut periods = -(1.0 + rate * principal / net_payment).ln() / rate.ln_1p();
    if pay_in_advance {
        periods += 1.0;
    }
    if !periods.is_finite() {
        return Err(FinancialError::domain(
            "NPER",
            "the payment never reaches the future value at this rate",
        ));
    }
    Ok(periods)
}

fn check_integral_periods(
    function: &'static str,
    rate: f64,
    nper: f64,
) -> Result<(), FinancialError> {
    if rate < 0.0 && nper.fract() != 0.0 {
        return Err(FinancialError::domain(
            function,
            format!(
                "if the rate is negative the number of periods must be an integer, got {}",
                nper
            ),
        ));
    }
    Ok(())
}
