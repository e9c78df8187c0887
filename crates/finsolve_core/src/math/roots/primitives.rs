//! Scalar helpers shared by every root finder.
//!
//! These are the small building blocks the interpolation steps lean on:
//! a three-way [`sign`], an overflow-guarded [`safe_div`], and the IEEE
//! mantissa/exponent pair [`frexp`]/[`ldexp`].

use num_traits::Float;

/// Converts an `f64` constant into `T`.
///
/// Every `Float` type can represent the small constants used by the
/// solvers; an unrepresentable value degrades to NaN instead of panicking.
#[inline]
pub(crate) fn lit<T: Float>(value: f64) -> T {
    T::from(value).unwrap_or_else(T::nan)
}

/// Lossy conversion used for error payloads and log fields.
#[inline]
pub(crate) fn to_f64<T: Float>(x: T) -> f64 {
    x.to_f64().unwrap_or(f64::NAN)
}

/// Returns `-1`, `0` or `+1` according to the sign of `x`.
///
/// Exact zero (of either sign) is its own class, and so is NaN, which maps
/// to `0`. Zero-crossing checks compare signs for equality, so a zero
/// endpoint must never be mistaken for either side.
///
/// # Examples
///
/// ```
/// use finsolve_core::math::roots::sign;
///
/// assert_eq!(sign(-2.5_f64), -1);
/// assert_eq!(sign(0.0_f64), 0);
/// assert_eq!(sign(-0.0_f64), 0);
/// assert_eq!(sign(1e-300_f64), 1);
/// ```
#[inline]
pub fn sign<T: Float>(x: T) -> i32 {
    if x > T::zero() {
        1
    } else if x < T::zero() {
        -1
    } else {
        0
    }
}

/// Divides `num` by `denom`, returning `fallback` when the quotient would
/// overflow.
///
/// Overflow is only possible when `|denom| < 1`; in that case the division
/// is rejected if `|denom * max_value| <= |num|`.
///
/// # Examples
///
/// ```
/// use finsolve_core::math::roots::safe_div;
///
/// assert_eq!(safe_div(6.0_f64, 3.0, -1.0), 2.0);
/// assert_eq!(safe_div(1.0_f64, 0.0, -1.0), -1.0);
/// assert_eq!(safe_div(f64::MAX, 1e-10, 7.0), 7.0);
/// ```
#[inline]
pub fn safe_div<T: Float>(num: T, denom: T, fallback: T) -> T {
    if denom.abs() < T::one() && (denom * T::max_value()).abs() <= num.abs() {
        return fallback;
    }
    num / denom
}

/// Multiplies `x` by `2^exp`.
///
/// Scaling is applied in chunks of `2^60` so that intermediate powers of two
/// stay representable for both `f32` and `f64`.
///
/// # Examples
///
/// ```
/// use finsolve_core::math::roots::ldexp;
///
/// assert_eq!(ldexp(0.75_f64, 4), 12.0);
/// assert_eq!(ldexp(1.0_f64, -52), f64::EPSILON);
/// ```
pub fn ldexp<T: Float>(x: T, exp: i32) -> T {
    const CHUNK: i32 = 60;
    let two: T = lit(2.0);
    let chunk = two.powi(CHUNK);

    let mut result = x;
    let mut remaining = exp;
    while remaining > CHUNK && result.is_finite() && result != T::zero() {
        result = result * chunk;
        remaining -= CHUNK;
    }
    while remaining < -CHUNK && result.is_finite() && result != T::zero() {
        result = result / chunk;
        remaining += CHUNK;
    }
    result * two.powi(remaining)
}

/// Splits `x` into a mantissa in `[0.5, 1)` (same sign as `x`) and a
/// power-of-two exponent, so that `x == mantissa * 2^exponent`.
///
/// Zero, infinities and NaN are returned unchanged with exponent `0`.
///
/// # Examples
///
/// ```
/// use finsolve_core::math::roots::frexp;
///
/// assert_eq!(frexp(8.0_f64), (0.5, 4));
/// assert_eq!(frexp(-3.0_f64), (-0.75, 2));
/// assert_eq!(frexp(0.0_f64), (0.0, 0));
/// ```
pub fn frexp<T: Float>(x: T) -> (T, i32) {
    if x == T::zero() || !x.is_finite() {
        return (x, 0);
    }
    let (mantissa, exponent, _) = x.integer_decode();
    let significant_bits = 64 - mantissa.leading_zeros() as i32;
    let e = i32::from(exponent) + significant_bits;
    (ldexp(x, -e), e)
}
