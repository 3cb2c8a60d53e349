//! # Money Module
//!
//! Provides the `Money` and `Rate` types for handling prices safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  The estimator page, the cart, the staff tool and the quote email all   │
//! │  show the same number. If any of them adds 0.1 + 0.2 in floating point │
//! │  the totals drift apart by a cent and the customer notices.            │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Money  = i64 cents                 ($232.00 = 23200)                 │
//! │    Rate   = i64 ten-thousandths of $  ($0.0833/card = 833)              │
//! │    Pcts   = u32 basis points          (8% = 800)                        │
//! │                                                                         │
//! │  Geometry (square feet) is the only floating-point input; it is        │
//! │  converted to cents exactly once per line.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use inkquote_core::money::Money;
//!
//! let fixed = Money::from_cents(23200); // $232.00
//! let five: Money = fixed * 5;
//! assert_eq!(five.cents(), 116000);
//!
//! let parsed: Money = "232.00".parse().unwrap();
//! assert_eq!(parsed, fixed);
//! ```
//!
//! ## Wire Format
//! On the JSON wire, `Money` is a plain number of dollars (`232.0`), because
//! that is what the estimator and quote templates render.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use std::str::FromStr;

use crate::error::ValidationError;
use crate::types::TaxRate;

/// Basis points in 100%.
pub const BPS_SCALE: i128 = 10_000;

/// `Rate` units per cent (a rate is stored in 1/10000 of a dollar).
const RATE_UNITS_PER_CENT: i128 = 100;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in cents.
///
/// ## Design Decisions
/// - **i64 (signed)**: subtraction stays total; discounts are computed as
///   negative deltas before being folded back in
/// - **Single field tuple struct**: Zero-cost abstraction over i64
///
/// ## Where Money is Used
/// ```text
/// PricingRule.fixed_price ──┐
/// Rate × area / qty ────────┼──► product line ──┐
/// AddonRule.unit_price ─────┼──► add-on lines ──┼──► sell_price ──► tax
/// FeeSchedule ──────────────┘──► fee lines ─────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use inkquote_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole dollars.
    #[inline]
    pub const fn from_dollars(dollars: i64) -> Self {
        Money(dollars * 100)
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
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

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the value as a floating-point dollar amount.
    ///
    /// For display and JSON only. Never feed the result back into pricing.
    #[inline]
    pub fn to_dollars(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Calculates tax, rounding half up to the cent.
    ///
    /// ## Implementation
    /// We use integer math: `(amount * rate + 5000) / 10000`
    /// The +5000 provides rounding (5000/10000 = 0.5)
    ///
    /// ## Example
    /// ```rust
    /// use inkquote_core::money::Money;
    /// use inkquote_core::types::TaxRate;
    ///
    /// let subtotal = Money::from_cents(2400); // $24.00
    /// let tax = subtotal.calculate_tax(TaxRate::from_bps(500)); // 5%
    /// assert_eq!(tax.cents(), 120);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        let tax_cents = div_round_half_up(self.0 as i128 * rate.bps() as i128, BPS_SCALE);
        Money::from_cents(tax_cents as i64)
    }

    /// Applies a percentage discount and returns the discounted amount.
    ///
    /// ## Arguments
    /// * `discount_bps` - Discount in basis points (800 = 8%)
    ///
    /// The discount amount itself is rounded half up, then subtracted, so
    /// `discounted + discount == original` always holds to the cent.
    ///
    /// ## Example
    /// ```rust
    /// use inkquote_core::money::Money;
    ///
    /// let subtotal = Money::from_cents(12000); // $120.00
    /// let discounted = subtotal.apply_percentage_discount(800); // 8% off
    /// assert_eq!(discounted.cents(), 11040); // $110.40
    /// ```
    pub fn apply_percentage_discount(&self, discount_bps: u32) -> Money {
        let discount_amount = div_round_half_up(self.0 as i128 * discount_bps as i128, BPS_SCALE);
        Money::from_cents(self.0 - discount_amount as i64)
    }

    /// Splits a line total into a per-unit price, rounding half up.
    ///
    /// `qty` must be positive; a zero quantity yields zero.
    ///
    /// ## Example
    /// ```rust
    /// use inkquote_core::money::Money;
    ///
    /// let line = Money::from_cents(11040);
    /// assert_eq!(line.per_unit(5).cents(), 2208);
    /// assert_eq!(Money::from_cents(1000).per_unit(3).cents(), 333);
    /// ```
    pub fn per_unit(&self, qty: i64) -> Money {
        if qty <= 0 {
            return Money::zero();
        }
        Money::from_cents(div_round_half_up(self.0 as i128, qty as i128) as i64)
    }
}

// =============================================================================
// Rate Type
// =============================================================================

/// A per-sqft or per-unit price with sub-cent precision.
///
/// Stored in ten-thousandths of a dollar, so `0.0833` is `833` and `8.00`
/// is `80000`. Rates never appear on a line item directly; they are turned
/// into [`Money`] by [`Rate::price_area`] or [`Rate::price_units`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rate(i64);

impl Rate {
    /// Creates a rate from ten-thousandths of a dollar.
    #[inline]
    pub const fn from_ten_thousandths(units: i64) -> Self {
        Rate(units)
    }

    /// Returns the raw ten-thousandths value.
    #[inline]
    pub const fn ten_thousandths(&self) -> i64 {
        self.0
    }

    /// Checks if the rate is negative.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Price of one piece of `area_sqft` square feet at this per-sqft rate,
    /// scaled by `multiplier_bps` (10000 = 1×), rounded to the cent.
    ///
    /// ## Example
    /// ```rust
    /// use inkquote_core::money::Rate;
    ///
    /// let rate: Rate = "8.00".parse().unwrap();
    /// assert_eq!(rate.price_area(3.0, 10_000).cents(), 2400);
    /// assert_eq!(rate.price_area(3.0, 15_000).cents(), 3600);
    /// ```
    pub fn price_area(&self, area_sqft: f64, multiplier_bps: u32) -> Money {
        let scaled = self.0 as f64 * multiplier_bps as f64 * area_sqft;
        let cents = scaled / (BPS_SCALE * RATE_UNITS_PER_CENT) as f64;
        Money::from_cents(cents.round() as i64)
    }

    /// Price of `qty` units at this per-unit rate, scaled by
    /// `multiplier_bps`, rounded to the cent once for the whole quantity.
    ///
    /// ## Example
    /// ```rust
    /// use inkquote_core::money::Rate;
    ///
    /// let rate: Rate = "0.0833".parse().unwrap();
    /// // 500 × $0.0833 = $41.65 (not 500 × $0.08)
    /// assert_eq!(rate.price_units(500, 10_000).cents(), 4165);
    /// ```
    pub fn price_units(&self, qty: i64, multiplier_bps: u32) -> Money {
        let numerator = self.0 as i128 * multiplier_bps as i128 * qty as i128;
        let cents = div_round_half_up(numerator, BPS_SCALE * RATE_UNITS_PER_CENT);
        Money::from_cents(cents as i64)
    }
}

// =============================================================================
// Decimal Parsing
// =============================================================================

/// Parses a plain decimal string into an integer scaled by `10^scale`.
///
/// Accepts an optional leading `-` or `$`, surrounding whitespace, and at
/// most `scale` fractional digits. Anything else is rejected rather than
/// rounded, so rule tables cannot silently lose precision.
pub fn parse_scaled_decimal(input: &str, scale: u32) -> Option<i64> {
    let s = input.trim();
    let (negative, s) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let s = s.strip_prefix('$').unwrap_or(s);

    let (whole, frac) = match s.split_once('.') {
        Some((w, f)) => (w, f),
        None => (s, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return None;
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    if frac.len() > scale as usize {
        return None;
    }

    let factor = 10_i64.checked_pow(scale)?;
    let whole_value: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let frac_value: i64 = if frac.is_empty() {
        0
    } else {
        let digits: i64 = frac.parse().ok()?;
        digits * 10_i64.pow(scale - frac.len() as u32)
    };

    let value = whole_value.checked_mul(factor)?.checked_add(frac_value)?;
    Some(if negative { -value } else { value })
}

impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_scaled_decimal(s, 2)
            .map(Money::from_cents)
            .ok_or_else(|| ValidationError::InvalidFormat {
                field: "amount".to_string(),
                reason: format!("'{}' is not a dollar amount with at most 2 decimals", s.trim()),
            })
    }
}

impl FromStr for Rate {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_scaled_decimal(s, 4)
            .map(Rate::from_ten_thousandths)
            .ok_or_else(|| ValidationError::InvalidFormat {
                field: "rate".to_string(),
                reason: format!("'{}' is not a rate with at most 4 decimals", s.trim()),
            })
    }
}

/// Integer division rounding half away from zero.
pub(crate) fn div_round_half_up(numerator: i128, denominator: i128) -> i128 {
    if numerator >= 0 {
        (numerator + denominator / 2) / denominator
    } else {
        -((-numerator + denominator / 2) / denominator)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows money the way line-item descriptions print it:
/// `$232.00`, `-$5.50`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, self.dollars().abs(), self.cents_part())
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        write!(f, "{}${}.{:04}", sign, abs / 10_000, abs % 10_000)
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

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

/// Money goes over the wire as a number of dollars.
impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_dollars())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let dollars = f64::deserialize(deserializer)?;
        if !dollars.is_finite() {
            return Err(serde::de::Error::custom("money amount must be finite"));
        }
        Ok(Money::from_cents((dollars * 100.0).round() as i64))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
