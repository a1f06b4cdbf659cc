//! # Money
//!
//! Euro amounts as whole cents.
//!
//! ## Cents, Not Floats
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  MwSt on a €49.99 bottle                                                │
//! │                                                                         │
//! │  f64:    49.99 * 0.19 = 9.498100000000001   (rounding left to chance)   │
//! │                                                                         │
//! │  Money:  4999 cents × 1900 bps = 9_498_100                              │
//! │          (9_498_100 + 5000) / 10000 = 950 cents = €9.50                 │
//! │                                                                         │
//! │  Each tax or discount is rounded half-up exactly once.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use liyana_core::money::Money;
//!
//! let price = Money::from_cents(4999); // €49.99
//! let doubled = price * 2;             // €99.98
//! assert_eq!(doubled.cents(), 9998);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::types::Rate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (euro cents).
///
/// ## Where Money is Used
/// ```text
/// ProductVolume.price ──► LineItem.unit_price ──► LineItem.line_total
///                                                        │
///                                   Totals.subtotal ◄────┘
///                                        │
///             discount ──► discounted subtotal ──► tax ──► Totals.total
/// ```
///
/// Serializes as a plain integer number of cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ```rust
    /// use liyana_core::money::Money;
    ///
    /// let price = Money::from_cents(4999); // €49.99
    /// assert_eq!(price.cents(), 4999);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units (euros and cents).
    ///
    /// ```rust
    /// use liyana_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(4, 99).cents(), 499);
    /// assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    /// ```
    ///
    /// For negative amounts only the major unit carries the sign.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (euros) portion.
    #[inline]
    pub const fn euros(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Subtracts `other`, flooring the result at zero.
    ///
    /// ```rust
    /// use liyana_core::money::Money;
    ///
    /// let subtotal = Money::from_cents(1000);
    /// assert_eq!(subtotal.saturating_sub(Money::from_cents(2000)), Money::zero());
    /// ```
    #[inline]
    pub fn saturating_sub(self, other: Money) -> Money {
        Money((self.0 - other.0).max(0))
    }

    /// Returns `rate` of this amount, rounded half-up to the cent.
    ///
    /// Used for both tax (19% MwSt) and percentage discounts.
    ///
    /// ## Implementation
    /// Integer math on basis points: `(amount * bps + 5000) / 10000`.
    /// The +5000 provides rounding (5000/10000 = 0.5).
    ///
    /// ```rust
    /// use liyana_core::money::Money;
    /// use liyana_core::types::Rate;
    ///
    /// let subtotal = Money::from_cents(4999);
    /// // €49.99 × 19% = €9.4981 → €9.50
    /// assert_eq!(subtotal.apply_rate(Rate::from_bps(1900)).cents(), 950);
    /// ```
    pub fn apply_rate(&self, rate: Rate) -> Money {
        // i128 keeps large carts from overflowing the intermediate product
        let cents = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_cents(cents as i64)
    }

    /// Plain decimal amount without currency symbol ("49.99").
    ///
    /// ```rust
    /// use liyana_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(3712).to_decimal_string(), "37.12");
    /// assert_eq!(Money::from_cents(-5).to_decimal_string(), "-0.05");
    /// ```
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.euros().abs(), self.cents_part())
    }

    /// Multiplies money by a quantity.
    ///
    /// ```rust
    /// use liyana_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(2999);
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 8997);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// `multiply_quantity`, or `None` on overflow.
    #[inline]
    pub fn checked_multiply_quantity(&self, qty: i64) -> Option<Money> {
        self.0.checked_mul(qty).map(Money)
    }

    /// Addition, or `None` on overflow.
    #[inline]
    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug/console formatting. Frontends do their own localized formatting.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}€{}.{:02}", sign, self.euros().abs(), self.cents_part())
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
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
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
        let money = Money::from_cents(4999);
        assert_eq!(money.cents(), 4999);
        assert_eq!(money.euros(), 49);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(6448).to_string(), "€64.48");
        assert_eq!(Money::from_cents(499).to_string(), "€4.99");
        assert_eq!(Money::from_cents(-550).to_string(), "-€5.50");
        assert_eq!(Money::zero().to_string(), "€0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(499);

        assert_eq!((a + b).cents(), 1499);
        assert_eq!((a - b).cents(), 501);
        assert_eq!((a * 3).cents(), 3000);
    }

    #[test]
    fn test_saturating_sub_floors_at_zero() {
        let subtotal = Money::from_cents(1000);
        assert_eq!(subtotal.saturating_sub(Money::from_cents(300)).cents(), 700);
        assert_eq!(subtotal.saturating_sub(Money::from_cents(2000)), Money::zero());
    }

    #[test]
    fn test_apply_rate_rounds_half_up() {
        // €60.00 at 19% = €11.40 exactly
        assert_eq!(Money::from_cents(6000).apply_rate(Rate::from_bps(1900)).cents(), 1140);
        // €76.00 at 19% = €14.44
        assert_eq!(Money::from_cents(7600).apply_rate(Rate::from_bps(1900)).cents(), 1444);
        // €0.05 at 10% = 0.5 cent → 1 cent
        assert_eq!(Money::from_cents(5).apply_rate(Rate::from_bps(1000)).cents(), 1);
        // €0.04 at 10% = 0.4 cent → 0 cents
        assert_eq!(Money::from_cents(4).apply_rate(Rate::from_bps(1000)).cents(), 0);
    }

    #[test]
    fn test_checked_arithmetic() {
        let price = Money::from_cents(4999);
        assert_eq!(price.checked_multiply_quantity(3), Some(Money::from_cents(14997)));
        assert_eq!(Money::from_cents(i64::MAX / 100).checked_multiply_quantity(999), None);

        assert_eq!(price.checked_add(price), Some(Money::from_cents(9998)));
        assert_eq!(Money::from_cents(i64::MAX).checked_add(Money::from_cents(1)), None);
    }
}
