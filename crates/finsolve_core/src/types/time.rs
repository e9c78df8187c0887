//! Dates, day-count bases and coupon frequencies.
//!
//! This module provides:
//! - `Date`: Type-safe date wrapper around chrono::NaiveDate with the
//!   month-end helpers coupon schedules rely on
//! - `DayCountBasis`: The five spreadsheet day-count bases (codes 0-4)
//! - `Frequency`: Coupon payments per year
//!
//! # Examples
//!
//! ```
//! use finsolve_core::types::time::{Date, DayCountBasis};
//!
//! let start = Date::from_ymd(2024, 1, 31).unwrap();
//! let end = Date::from_ymd(2024, 3, 31).unwrap();
//!
//! // 30/360 US treats both month ends as the 30th
//! assert_eq!(DayCountBasis::UsThirty360.day_count(start, end), 60.0);
//! assert_eq!(DayCountBasis::Actual365.day_count(start, end), 60.0);
//! ```

use chrono::{Datelike, Days, Months, NaiveDate};
use std::fmt;
use std::ops::Sub;
use std::str::FromStr;

use super::error::{DateError, FinancialError};

/// Type-safe date wrapper around chrono::NaiveDate.
///
/// Provides ISO 8601 serialisation and the calendar arithmetic used by the
/// bond functions.
///
/// # Examples
///
/// ```
/// use finsolve_core::types::time::Date;
///
/// let date = Date::from_ymd(2024, 6, 15).unwrap();
/// assert_eq!(date.year(), 2024);
///
/// let parsed: Date = "2024-06-15".parse().unwrap();
/// assert_eq!(date, parsed);
///
/// let start = Date::from_ymd(2024, 1, 1).unwrap();
/// let end = Date::from_ymd(2024, 1, 11).unwrap();
/// assert_eq!(end - start, 10);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Date(NaiveDate);

impl Date {
    /// Creates a Date from year, month, and day components.
    ///
    /// # Returns
    /// `Ok(Date)` if the date is valid, `Err(DateError::InvalidDate)` otherwise.
    ///
    /// # Examples
    ///
    /// ```
    /// use finsolve_core::types::time::Date;
    ///
    /// assert!(Date::from_ymd(2024, 2, 29).is_ok());
    /// assert!(Date::from_ymd(2023, 2, 29).is_err());
    /// ```
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, DateError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Date)
            .ok_or(DateError::InvalidDate { year, month, day })
    }

    /// Parses a date from ISO 8601 format string (YYYY-MM-DD).
    ///
    /// # Examples
    ///
    /// ```
    /// use finsolve_core::types::time::Date;
    ///
    /// let date = Date::parse("2024-06-15").unwrap();
    /// assert_eq!(date.month(), 6);
    ///
    /// assert!(Date::parse("not-a-date").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, DateError> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Date)
            .map_err(|e| DateError::ParseError(e.to_string()))
    }

    /// Returns the underlying NaiveDate.
    pub fn into_inner(self) -> NaiveDate {
        self.0
    }

    /// Returns the year component.
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Returns the month component (1-12).
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Returns the day component (1-31).
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Number of days in this date's month.
    pub fn days_in_month(&self) -> u32 {
        days_in_month(self.year(), self.month())
    }

    /// True on the last calendar day of the month.
    ///
    /// ```
    /// use finsolve_core::types::time::Date;
    ///
    /// assert!(Date::from_ymd(2024, 2, 29).unwrap().is_end_of_month());
    /// assert!(!Date::from_ymd(2024, 2, 28).unwrap().is_end_of_month());
    /// ```
    pub fn is_end_of_month(&self) -> bool {
        self.day() == self.days_in_month()
    }

    /// True on 28 February in common years and 29 February in leap years.
    pub fn is_end_of_february(&self) -> bool {
        self.month() == 2 && self.is_end_of_month()
    }

    /// The last day of this date's month.
    pub fn end_of_month(self) -> Date {
        let remaining = self.days_in_month() - self.day();
        Date(self.0 + Days::new(u64::from(remaining)))
    }

    /// Shifts by a signed number of months, clamping the day to the end of
    /// the target month (31 January + 1 month = 28/29 February).
    ///
    /// # Examples
    ///
    /// ```
    /// use finsolve_core::types::time::Date;
    ///
    /// let date = Date::from_ymd(2024, 1, 31).unwrap();
    /// assert_eq!(date.add_months(1).unwrap(), Date::from_ymd(2024, 2, 29).unwrap());
    /// assert_eq!(date.add_months(-2).unwrap(), Date::from_ymd(2023, 11, 30).unwrap());
    /// ```
    pub fn add_months(self, months: i32) -> Result<Date, DateError> {
        let shifted = if months >= 0 {
            self.0.checked_add_months(Months::new(months.unsigned_abs()))
        } else {
            self.0.checked_sub_months(Months::new(months.unsigned_abs()))
        };
        shifted.map(Date).ok_or_else(|| DateError::OutOfRange {
            date: self.to_string(),
            months,
        })
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Date(date)
    }
}

impl Sub for Date {
    type Output = i64;

    /// Returns the number of days between two dates.
    ///
    /// The result is positive if `self` is after `other`, negative otherwise.
    fn sub(self, other: Self) -> i64 {
        (self.0 - other.0).num_days()
    }
}

impl FromStr for Date {
    type Err = DateError;

    /// Parses a date from ISO 8601 format string (YYYY-MM-DD).
    fn from_str(s: &str) -> Result<Self, DateError> {
        Date::parse(s)
    }
}

impl fmt::Display for Date {
    /// Formats the date as ISO 8601 (YYYY-MM-DD).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Gregorian leap-year rule.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

fn days_in_calendar_year(year: i32) -> u32 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

/// Day-count basis (spreadsheet codes 0-4).
///
/// # Variants
/// - `UsThirty360` (0): 30/360 with the US end-of-February rules
/// - `ActualActual` (1): actual days over an actual-year denominator
/// - `Actual360` (2): actual days / 360
/// - `Actual365` (3): actual days / 365
/// - `EuThirty360` (4): European 30/360
///
/// # Usage
///
/// ```
/// use finsolve_core::types::time::{Date, DayCountBasis};
///
/// let start = Date::from_ymd(2024, 1, 1).unwrap();
/// let end = Date::from_ymd(2024, 7, 1).unwrap();
///
/// let yf = DayCountBasis::Actual360.year_fraction(start, end);
/// assert!((yf - 182.0 / 360.0).abs() < 1e-12);
/// assert_eq!(DayCountBasis::from_code(1), Some(DayCountBasis::ActualActual));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DayCountBasis {
    /// US (NASD) 30/360
    #[default]
    UsThirty360,
    /// Actual/Actual
    ActualActual,
    /// Actual/360
    Actual360,
    /// Actual/365
    Actual365,
    /// European 30/360
    EuThirty360,
}

impl DayCountBasis {
    /// Maps a spreadsheet basis code to a basis.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(DayCountBasis::UsThirty360),
            1 => Some(DayCountBasis::ActualActual),
            2 => Some(DayCountBasis::Actual360),
            3 => Some(DayCountBasis::Actual365),
            4 => Some(DayCountBasis::EuThirty360),
            _ => None,
        }
    }

    /// The spreadsheet basis code.
    pub fn code(&self) -> u8 {
        match self {
            DayCountBasis::UsThirty360 => 0,
            DayCountBasis::ActualActual => 1,
            DayCountBasis::Actual360 => 2,
            DayCountBasis::Actual365 => 3,
            DayCountBasis::EuThirty360 => 4,
        }
    }

    /// Returns the standard basis name.
    ///
    /// ```
    /// use finsolve_core::types::time::DayCountBasis;
    ///
    /// assert_eq!(DayCountBasis::UsThirty360.name(), "30/360 US");
    /// assert_eq!(DayCountBasis::ActualActual.name(), "ACT/ACT");
    /// ```
    pub fn name(&self) -> &'static str {
        match self {
            DayCountBasis::UsThirty360 => "30/360 US",
            DayCountBasis::ActualActual => "ACT/ACT",
            DayCountBasis::Actual360 => "ACT/360",
            DayCountBasis::Actual365 => "ACT/365",
            DayCountBasis::EuThirty360 => "30/360 EU",
        }
    }

    /// Interest-bearing days from `start` to `end`.
    ///
    /// The actual bases count calendar days. US 30/360 moves the 31st to the
    /// 30th (the end date only when the start is already on the 30th or
    /// 31st) and treats the end of February as the 30th; EU 30/360 only
    /// moves the 31st.
    pub fn day_count(&self, start: Date, end: Date) -> f64 {
        if start == end {
            return 0.0;
        }
        match self {
            DayCountBasis::ActualActual | DayCountBasis::Actual360 | DayCountBasis::Actual365 => {
                (end - start) as f64
            }
            DayCountBasis::UsThirty360 => {
                let mut d1 = start.day();
                let mut d2 = end.day();
                if d2 == 31 && d1 >= 30 {
                    d2 = 30;
                }
                if d1 == 31 {
                    d1 = 30;
                }
                if end.is_end_of_february() && start.is_end_of_february() {
                    d2 = 30;
                }
                if start.is_end_of_february() {
                    d1 = 30;
                }
                thirty_360(start, end, d1, d2)
            }
            DayCountBasis::EuThirty360 => {
                let d1 = start.day().min(30);
                let d2 = end.day().min(30);
                thirty_360(start, end, d1, d2)
            }
        }
    }

    /// Length of the year used to annualise `day_count(start, end)`.
    ///
    /// Actual/Actual uses 366 when a span of at most one year touches a
    /// leap day, 365 otherwise, and the average calendar-year length for
    /// longer spans.
    pub fn days_in_year(&self, start: Date, end: Date) -> f64 {
        match self {
            DayCountBasis::UsThirty360 | DayCountBasis::EuThirty360 | DayCountBasis::Actual360 => {
                360.0
            }
            DayCountBasis::Actual365 => 365.0,
            DayCountBasis::ActualActual => actual_year_length(start, end),
        }
    }

    /// `day_count / days_in_year`.
    pub fn year_fraction(&self, start: Date, end: Date) -> f64 {
        self.day_count(start, end) / self.days_in_year(start, end)
    }
}

fn thirty_360(start: Date, end: Date, d1: u32, d2: u32) -> f64 {
    let days = (i64::from(d2) - i64::from(d1))
        + 30 * (i64::from(end.month()) - i64::from(start.month()))
        + 360 * (i64::from(end.year()) - i64::from(start.year()));
    days as f64
}

fn within_one_year(start: Date, end: Date) -> bool {
    if start.year() == end.year() {
        return true;
    }
    end.year() == start.year() + 1
        && (start.month() > end.month()
            || (start.month() == end.month() && start.day() >= end.day()))
}

fn actual_year_length(start: Date, end: Date) -> f64 {
    if within_one_year(start, end) {
        let leap = (start.year() == end.year() && is_leap_year(start.year()))
            || (is_leap_year(start.year()) && start.month() <= 2)
            || (is_leap_year(end.year()) && end.month() > 2)
            || (is_leap_year(end.year()) && end.is_end_of_february());
        return if leap { 366.0 } else { 365.0 };
    }

    let years = start.year()..=end.year();
    let count = years.clone().count();
    let days: u32 = years.map(days_in_calendar_year).sum();
    f64::from(days) / count as f64
}

impl FromStr for DayCountBasis {
    type Err = String;

    /// Parses a basis code (`"0"`..`"4"`) or name (case-insensitive).
    ///
    /// Supports aliases:
    /// - 30/360 US: "0", "30/360", "30/360 US", "US30360", "NASD"
    /// - ACT/ACT: "1", "ACT/ACT", "Actual/Actual"
    /// - ACT/360: "2", "ACT/360", "Actual/360"
    /// - ACT/365: "3", "ACT/365", "Actual/365"
    /// - 30/360 EU: "4", "30/360 EU", "EU30360", "30E/360"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().replace(['/', ' ', '_'], "").as_str() {
            "0" | "30360" | "30360US" | "US30360" | "NASD" => Ok(DayCountBasis::UsThirty360),
            "1" | "ACTACT" | "ACTUALACTUAL" => Ok(DayCountBasis::ActualActual),
            "2" | "ACT360" | "ACTUAL360" => Ok(DayCountBasis::Actual360),
            "3" | "ACT365" | "ACTUAL365" => Ok(DayCountBasis::Actual365),
            "4" | "30360EU" | "EU30360" | "30E360" => Ok(DayCountBasis::EuThirty360),
            _ => Err(format!("Unknown day count basis: {}", s)),
        }
    }
}

impl fmt::Display for DayCountBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::DayCountBasis;
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;

    impl Serialize for DayCountBasis {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serializer.serialize_str(self.name())
        }
    }

    impl<'de> Deserialize<'de> for DayCountBasis {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            let s = String::deserialize(deserializer)?;
            DayCountBasis::from_str(&s).map_err(de::Error::custom)
        }
    }
}

/// Coupon payments per year.
///
/// ```
/// use finsolve_core::types::time::Frequency;
///
/// let freq = Frequency::try_from(2).unwrap();
/// assert_eq!(freq, Frequency::SemiAnnual);
/// assert_eq!(freq.months(), 6);
/// assert!(Frequency::try_from(3).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub enum Frequency {
    /// Once a year
    Annual,
    /// Twice a year
    SemiAnnual,
    /// Four times a year
    Quarterly,
    /// Every two months
    BiMonthly,
    /// Every month
    Monthly,
}

impl Frequency {
    /// Payments per year.
    pub fn per_year(&self) -> u32 {
        match self {
            Frequency::Annual => 1,
            Frequency::SemiAnnual => 2,
            Frequency::Quarterly => 4,
            Frequency::BiMonthly => 6,
            Frequency::Monthly => 12,
        }
    }

    /// Months between payments.
    pub fn months(&self) -> i32 {
        match self {
            Frequency::Annual => 12,
            Frequency::SemiAnnual => 6,
            Frequency::Quarterly => 3,
            Frequency::BiMonthly => 2,
            Frequency::Monthly => 1,
        }
    }
}

impl TryFrom<u8> for Frequency {
    type Error = FinancialError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Frequency::Annual),
            2 => Ok(Frequency::SemiAnnual),
            4 => Ok(Frequency::Quarterly),
            6 => Ok(Frequency::BiMonthly),
            12 => Ok(Frequency::Monthly),
            other => Err(FinancialError::domain(
                "FREQUENCY",
                format!(
                    "frequency must be 1 (annual), 2 (semi-annual), 4 (quarterly), \
                     6 (bi-monthly) or 12 (monthly), got {}",
                    other
                ),
            )),
        }
    }
}

impl From<Frequency> for u8 {
    fn from(freq: Frequency) -> u8 {
        // per_year is at most 12
        freq.per_year() as u8
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.per_year())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    // ========================================
    // Date Helpers
    // ========================================

    #[test]
    fn test_end_of_month_helpers() {
        assert!(date(2023, 2, 28).is_end_of_february());
        assert!(!date(2024, 2, 28).is_end_of_february());
        assert!(date(2024, 2, 29).is_end_of_february());
        assert!(date(2024, 4, 30).is_end_of_month());
        assert!(!date(2024, 4, 30).is_end_of_february());

        assert_eq!(date(2024, 2, 10).end_of_month(), date(2024, 2, 29));
        assert_eq!(date(2023, 12, 1).end_of_month(), date(2023, 12, 31));
    }

    #[test]
    fn test_add_months_clamps_day() {
        assert_eq!(date(2024, 3, 31).add_months(-1).unwrap(), date(2024, 2, 29));
        assert_eq!(date(2024, 8, 31).add_months(1).unwrap(), date(2024, 9, 30));
        assert_eq!(date(2024, 11, 15).add_months(3).unwrap(), date(2025, 2, 15));
        assert_eq!(date(2024, 5, 15).add_months(0).unwrap(), date(2024, 5, 15));
    }

    #[test]
    fn test_add_months_out_of_range() {
        let last = Date::from(NaiveDate::MAX);
        assert!(matches!(
            last.add_months(12),
            Err(DateError::OutOfRange { months: 12, .. })
        ));
    }

    #[test]
    fn test_leap_years() {
        assert!(is_leap_year(2024));
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2023));
    }

    #[test]
    fn test_parse_and_display() {
        let d = Date::parse(" 2008-03-01 ").unwrap();
        assert_eq!(d.to_string(), "2008-03-01");
        assert!(matches!(
            Date::parse("2008/03/01"),
            Err(DateError::ParseError(_))
        ));
    }

    // ========================================
    // Day Counts
    // ========================================

    #[test]
    fn test_actual_day_counts() {
        let start = date(2024, 1, 1);
        let end = date(2024, 7, 1);
        for basis in [
            DayCountBasis::ActualActual,
            DayCountBasis::Actual360,
            DayCountBasis::Actual365,
        ] {
            assert_eq!(basis.day_count(start, end), 182.0, "basis {}", basis);
        }
        assert_eq!(DayCountBasis::Actual365.day_count(end, start), -182.0);
    }

    #[test]
    fn test_us_thirty_360() {
        let basis = DayCountBasis::UsThirty360;
        assert_eq!(basis.day_count(date(2024, 1, 1), date(2024, 7, 1)), 180.0);
        assert_eq!(basis.day_count(date(2024, 1, 31), date(2024, 3, 31)), 60.0);
        // End date stays on the 31st when the start is before the 30th.
        assert_eq!(basis.day_count(date(2024, 1, 15), date(2024, 3, 31)), 76.0);
        // End of February counts as the 30th on the start side.
        assert_eq!(basis.day_count(date(2023, 2, 28), date(2023, 8, 28)), 178.0);
        // Both ends on end of February.
        assert_eq!(basis.day_count(date(2023, 2, 28), date(2024, 2, 29)), 360.0);
    }

    #[test]
    fn test_eu_thirty_360() {
        let basis = DayCountBasis::EuThirty360;
        assert_eq!(basis.day_count(date(2024, 1, 31), date(2024, 3, 31)), 60.0);
        assert_eq!(basis.day_count(date(2024, 1, 15), date(2024, 3, 31)), 75.0);
        assert_eq!(basis.day_count(date(2023, 2, 28), date(2023, 3, 31)), 32.0);
    }

    #[test]
    fn test_same_date_returns_zero() {
        let d = date(2024, 6, 15);
        for code in 0..=4 {
            let basis = DayCountBasis::from_code(code).unwrap();
            assert_eq!(basis.day_count(d, d), 0.0);
            assert_eq!(basis.year_fraction(d, d), 0.0);
        }
    }

    // ========================================
    // Days in Year
    // ========================================

    #[test]
    fn test_fixed_year_lengths() {
        let (a, b) = (date(2024, 1, 1), date(2024, 7, 1));
        assert_eq!(DayCountBasis::UsThirty360.days_in_year(a, b), 360.0);
        assert_eq!(DayCountBasis::EuThirty360.days_in_year(a, b), 360.0);
        assert_eq!(DayCountBasis::Actual360.days_in_year(a, b), 360.0);
        assert_eq!(DayCountBasis::Actual365.days_in_year(a, b), 365.0);
    }

    #[test]
    fn test_actual_actual_within_one_year() {
        let basis = DayCountBasis::ActualActual;
        assert_eq!(basis.days_in_year(date(2024, 3, 1), date(2024, 9, 1)), 366.0);
        assert_eq!(basis.days_in_year(date(2023, 3, 1), date(2023, 9, 1)), 365.0);
        // Span crosses into a leap year after February.
        assert_eq!(basis.days_in_year(date(2023, 6, 1), date(2024, 4, 1)), 366.0);
        // Span leaves a leap year before its leap day matters.
        assert_eq!(basis.days_in_year(date(2024, 6, 1), date(2025, 4, 1)), 365.0);
    }

    #[test]
    fn test_actual_actual_average_year() {
        let basis = DayCountBasis::ActualActual;
        // 2023, 2024, 2025: (365 + 366 + 365) / 3
        let expected = 1096.0 / 3.0;
        assert_relative_eq!(
            basis.days_in_year(date(2023, 1, 1), date(2025, 6, 1)),
            expected,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_year_fraction() {
        let yf = DayCountBasis::Actual365.year_fraction(date(2024, 1, 1), date(2025, 1, 1));
        assert_relative_eq!(yf, 366.0 / 365.0, epsilon = 1e-12);

        let yf = DayCountBasis::UsThirty360.year_fraction(date(2024, 1, 1), date(2024, 7, 1));
        assert_relative_eq!(yf, 0.5, epsilon = 1e-12);
    }

    // ========================================
    // Parsing and Codes
    // ========================================

    #[test]
    fn test_basis_codes_roundtrip() {
        for code in 0..=4 {
            let basis = DayCountBasis::from_code(code).unwrap();
            assert_eq!(basis.code(), code);
            assert_eq!(code.to_string().parse::<DayCountBasis>().unwrap(), basis);
        }
        assert_eq!(DayCountBasis::from_code(5), None);
    }

    #[test]
    fn test_basis_from_str_aliases() {
        assert_eq!(
            "actual/actual".parse::<DayCountBasis>().unwrap(),
            DayCountBasis::ActualActual
        );
        assert_eq!(
            "30/360 eu".parse::<DayCountBasis>().unwrap(),
            DayCountBasis::EuThirty360
        );
        assert_eq!(
            "ACT/365".parse::<DayCountBasis>().unwrap(),
            DayCountBasis::Actual365
        );
        assert!("ACT/999".parse::<DayCountBasis>().is_err());
    }

    #[test]
    fn test_frequency_conversions() {
        for (code, months) in [(1u8, 12), (2, 6), (4, 3), (6, 2), (12, 1)] {
            let freq = Frequency::try_from(code).unwrap();
            assert_eq!(freq.months(), months);
            assert_eq!(u8::from(freq), code);
        }
        let err = Frequency::try_from(3).unwrap_err();
        assert!(err.to_string().contains("got 3"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_representations() {
        let basis: DayCountBasis = serde_json::from_str("\"ACT/360\"").unwrap();
        assert_eq!(basis, DayCountBasis::Actual360);
        assert_eq!(
            serde_json::to_string(&DayCountBasis::EuThirty360).unwrap(),
            "\"30/360 EU\""
        );

        let freq: Frequency = serde_json::from_str("4").unwrap();
        assert_eq!(freq, Frequency::Quarterly);
        assert!(serde_json::from_str::<Frequency>("5").is_err());

        let d: Date = serde_json::from_str("\"2024-02-29\"").unwrap();
        assert_eq!(d, date(2024, 2, 29));
    }
}
