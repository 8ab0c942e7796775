//! Fixed-point monetary type with 2 decimal places precision.
//!
//! Uses `rust_decimal` internally with scale enforcement so that change
//! calculations compare exactly against zero, without floating-point errors.

use crate::error::VendingError;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;

/// A monetary value that maintains exactly 2 decimal places.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use vending_machine::Money;
///
/// let price = Money::from_str("1.5").unwrap();
/// assert_eq!(price.to_string(), "1.50");
/// assert_eq!(price, Money::from_minor_units(150));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Money(Decimal);

impl Money {
    /// The number of decimal places to maintain.
    pub const SCALE: u32 = 2;

    /// Zero value.
    pub const ZERO: Self = Money(Decimal::ZERO);

    /// Creates a `Money` from a `Decimal`, normalizing to 2 decimal places.
    pub fn new(value: Decimal) -> Self {
        let mut normalized = value;
        normalized.rescale(Self::SCALE);
        Money(normalized)
    }

    /// Creates a `Money` from an integer count of minor units (cents).
    pub fn from_minor_units(units: i64) -> Self {
        Money(Decimal::new(units, Self::SCALE))
    }

    /// Returns `true` if this value is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns `true` if this value is strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Value of `count` units worth `self` each.
    pub fn times(self, count: u32) -> Self {
        Money::new(self.0 * Decimal::from(count))
    }

    /// Number of whole `unit`s contained in `self`, rounded down.
    ///
    /// Returns 0 when `unit` is not positive or exceeds `self`, and
    /// saturates at `u64::MAX` when the quotient does not fit.
    pub fn whole_units_of(self, unit: Money) -> u64 {
        if !unit.is_positive() || unit > self {
            return 0;
        }
        self.0
            .checked_div(unit.0)
            .and_then(|quotient| quotient.floor().to_u64())
            .unwrap_or(u64::MAX)
    }
}

impl FromStr for Money {
    type Err = VendingError;

    /// Parses a decimal string, rejecting values that need more than
    /// 2 decimal places.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        let decimal =
            Decimal::from_str(trimmed).map_err(|_| VendingError::InvalidAmount(s.to_string()))?;
        if decimal.normalize().scale() > Self::SCALE {
            return Err(VendingError::InvalidAmount(s.to_string()));
        }
        Ok(Money::new(decimal))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Money::new(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
        self.0.rescale(Self::SCALE);
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Money::new(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
        self.0.rescale(Self::SCALE);
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::ZERO, |mut acc, m| {
            acc += m;
            acc
        })
    }
}
