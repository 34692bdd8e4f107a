//! # Money Module
//!
//! Provides the `Money` type used for every buying cost, selling price and
//! profit figure in LapTrack.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Summing 1000 buying costs of ₹45,999.10 as f64 drifts by paise.        │
//! │  Group keys built from "45999.1" vs "45999.10" would not match.        │
//! │                                                                         │
//! │  OUR SOLUTION: Integer paise                                            │
//! │    ₹45,999.10 == Money::from_cents(4_599_910)                           │
//! │    Equality is exact, so the group key is exact                         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use laptrack_core::money::Money;
//!
//! let cost: Money = "45999.10".parse().unwrap();
//! assert_eq!(cost.cents(), 4_599_910);
//!
//! let three = cost.multiply_quantity(3);
//! assert_eq!(three.cents(), 13_799_730);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use std::str::FromStr;

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// Largest amount accepted from an operator: ₹1,00,00,00,000.00.
///
/// Costs and prices above this are rejected at parse and validation time,
/// so per-sale arithmetic stays far from the i64 limit.
pub const MAX_AMOUNT: Money = Money::from_cents(100_000_000_000);

/// A monetary value in the smallest currency unit (paise for INR).
///
/// ## Design Decisions
/// - **i64 (signed)**: Profit can be negative when a laptop sells at a loss
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Serde**: Serialized as the raw integer, never as a float
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Unit.buying_cost ──┬──► Group key (exact 2-decimal match)              │
/// │                     └──► SaleRecord.buying_cost_per_unit                │
/// │                                                                         │
/// │  sell price ──► SaleRecord.final_selling_price_per_unit                 │
/// │                      │                                                  │
/// │                      ▼                                                  │
/// │             total_profit = (final − buying) × quantity                  │
/// │                      │                                                  │
/// │                      ▼                                                  │
/// │             Dashboard sums, averages, margin                            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (paise).
    ///
    /// ## Example
    /// ```rust
    /// use laptrack_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// ## Example
    /// ```rust
    /// use laptrack_core::money::Money;
    ///
    /// let price = Money::from_major_minor(45_999, 10);
    /// assert_eq!(price.cents(), 4_599_910);
    ///
    /// let loss = Money::from_major_minor(-5, 50);
    /// assert_eq!(loss.cents(), -550);
    /// ```
    ///
    /// ## Note
    /// For negative amounts only the major unit carries the sign.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (rupees, dollars).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a unit count, saturating at the i64 bounds.
    ///
    /// ## Example
    /// ```rust
    /// use laptrack_core::money::Money;
    ///
    /// let margin = Money::from_cents(-2_500);
    /// assert_eq!(margin.multiply_quantity(4).cents(), -10_000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: u32) -> Self {
        Money(self.0.saturating_mul(qty as i64))
    }

    /// Multiplies by a unit count, or `None` on overflow.
    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: u32) -> Option<Self> {
        match self.0.checked_mul(qty as i64) {
            Some(v) => Some(Money(v)),
            None => None,
        }
    }

    /// Subtracts, or `None` on overflow.
    #[inline]
    pub const fn checked_sub(&self, other: Money) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(v) => Some(Money(v)),
            None => None,
        }
    }

    /// Divides by a count, rounding half away from zero.
    ///
    /// Returns zero when `count` is zero so averages over empty
    /// collections stay defined.
    ///
    /// ## Example
    /// ```rust
    /// use laptrack_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1000).average_over(3).cents(), 333);
    /// assert_eq!(Money::from_cents(1000).average_over(0).cents(), 0);
    /// ```
    pub fn average_over(&self, count: u64) -> Money {
        if count == 0 {
            return Money::zero();
        }
        // i128 keeps the doubled numerator from overflowing
        let num = self.0 as i128 * 2;
        let den = count as i128 * 2;
        let rounded = if num >= 0 {
            (num + count as i128) / den
        } else {
            (num - count as i128) / den
        };
        Money(rounded as i64)
    }

    /// Expresses `self` as a percentage of `base`, or 0.0 when `base` is zero.
    pub fn percent_of(&self, base: Money) -> f64 {
        if base.is_zero() {
            return 0.0;
        }
        self.0 as f64 / base.0 as f64 * 100.0
    }

    /// Formats the amount behind a currency symbol, e.g. `₹45999.10`.
    pub fn format_with(&self, symbol: &str) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}{}.{:02}", sign, symbol, self.major().abs(), self.minor())
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parses a decimal string such as `"45999"`, `"45999.5"` or `"45999.10"`.
///
/// More than two fractional digits is rejected rather than rounded, so an
/// operator typo never silently lands in a different group. Amounts beyond
/// [`MAX_AMOUNT`] in either direction are rejected too.
impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: reason.to_string(),
        };

        let s = s.trim();
        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let (whole, frac) = match digits.split_once('.') {
            Some((w, f)) => (w, f),
            None => (digits, ""),
        };

        if whole.is_empty() && frac.is_empty() {
            return Err(invalid("must be a number"));
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid("must be a number"));
        }
        if frac.len() > 2 {
            return Err(invalid("at most 2 decimal places"));
        }

        let too_large = || ValidationError::TooLarge {
            field: "amount".to_string(),
            max: MAX_AMOUNT,
        };

        let major: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| too_large())?
        };
        let minor: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| invalid("must be a number"))? * 10,
            _ => frac.parse().map_err(|_| invalid("must be a number"))?,
        };

        let cents = major
            .checked_mul(100)
            .and_then(|c| c.checked_add(minor))
            .filter(|c| *c <= MAX_AMOUNT.0)
            .ok_or_else(too_large)?;

        Ok(Money(if negative { -cents } else { cents }))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================
//
// The operators saturate instead of panicking. Totals over stored data
// never fail; an absurd total pins at the i64 bound.

/// Plain decimal rendering, `45999.10`. Currency symbols are added by
/// [`Money::format_with`].
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "10.99");
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::from_cents(0).to_string(), "0.00");
    }

    #[test]
    fn test_format_with_symbol() {
        assert_eq!(Money::from_cents(4_599_910).format_with("₹"), "₹45999.10");
        assert_eq!(Money::from_cents(-2_500).format_with("₹"), "-₹25.00");
    }

    #[test]
    fn test_parse() {
        assert_eq!("45999".parse::<Money>().unwrap().cents(), 4_599_900);
        assert_eq!("45999.5".parse::<Money>().unwrap().cents(), 4_599_950);
        assert_eq!("45999.10".parse::<Money>().unwrap().cents(), 4_599_910);
        assert_eq!(".75".parse::<Money>().unwrap().cents(), 75);
        assert_eq!("-12.30".parse::<Money>().unwrap().cents(), -1_230);
        assert_eq!(" 100 ".parse::<Money>().unwrap().cents(), 10_000);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<Money>().is_err());
        assert!(".".parse::<Money>().is_err());
        assert!("abc".parse::<Money>().is_err());
        assert!("1.234".parse::<Money>().is_err());
        assert!("1,000".parse::<Money>().is_err());
        assert!("99999999999999999999".parse::<Money>().is_err());
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((b - a).cents(), -500);
        assert_eq!((a * 3).cents(), 3000);
    }

    #[test]
    fn test_parse_caps_at_max_amount() {
        assert_eq!("1000000000".parse::<Money>().unwrap(), MAX_AMOUNT);
        assert_eq!("-1000000000.00".parse::<Money>().unwrap().cents(), -MAX_AMOUNT.cents());

        let err = "1000000000.01".parse::<Money>().unwrap_err();
        assert!(matches!(err, ValidationError::TooLarge { .. }));
        assert!("90000000000000000".parse::<Money>().is_err());
    }

    #[test]
    fn test_operators_saturate() {
        let big = Money::from_cents(i64::MAX - 1);
        assert_eq!((big + big).cents(), i64::MAX);
        assert_eq!((Money::from_cents(i64::MIN + 1) - big).cents(), i64::MIN);
        assert_eq!(big.multiply_quantity(3).cents(), i64::MAX);

        let mut acc = big;
        acc += big;
        assert_eq!(acc.cents(), i64::MAX);

        let total: Money = [big, big, big].iter().sum();
        assert_eq!(total.cents(), i64::MAX);
    }

    #[test]
    fn test_checked_ops() {
        let big = Money::from_cents(i64::MAX);
        assert_eq!(big.checked_multiply_quantity(2), None);
        assert_eq!(Money::from_cents(-5).checked_multiply_quantity(3), Some(Money::from_cents(-15)));
        assert_eq!(Money::from_cents(i64::MIN).checked_sub(Money::from_cents(1)), None);
        assert_eq!(Money::from_cents(10).checked_sub(Money::from_cents(25)), Some(Money::from_cents(-15)));
    }

    #[test]
    fn test_sum() {
        let values = vec![Money::from_cents(100), Money::from_cents(250)];
        let total: Money = values.iter().sum();
        assert_eq!(total.cents(), 350);

        let empty: Vec<Money> = Vec::new();
        assert_eq!(empty.into_iter().sum::<Money>(), Money::zero());
    }

    #[test]
    fn test_average_over_rounds_half_away_from_zero() {
        assert_eq!(Money::from_cents(1000).average_over(3).cents(), 333);
        assert_eq!(Money::from_cents(1001).average_over(2).cents(), 501);
        assert_eq!(Money::from_cents(-1001).average_over(2).cents(), -501);
        assert_eq!(Money::from_cents(1000).average_over(0).cents(), 0);
    }

    #[test]
    fn test_percent_of_guards_zero() {
        assert_eq!(Money::from_cents(50).percent_of(Money::zero()), 0.0);
        let pct = Money::from_cents(50).percent_of(Money::from_cents(200));
        assert!((pct - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let negative = Money::from_cents(-100);
        assert!(negative.is_negative());
        assert!(!negative.is_positive());
    }
}
