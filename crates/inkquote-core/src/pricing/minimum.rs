//! Minimum-charge enforcer.
//!
//! Only the product line is floored. Add-ons and fees are billed on top at
//! their own prices.

use crate::money::Money;

/// Outcome of comparing the product line to the product's minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinimumCharge {
    /// The product line total after the floor.
    pub line_total: Money,
    /// `true` iff the unfloored line was below the minimum.
    pub applied: bool,
    /// The configured floor.
    pub value: Money,
}

/// Floors the product-only subtotal at `min_charge`.
///
/// ## Example
/// ```rust
/// use inkquote_core::money::Money;
/// use inkquote_core::pricing::minimum::enforce;
///
/// let floored = enforce(Money::from_cents(1200), Money::from_dollars(20));
/// assert!(floored.applied);
/// assert_eq!(floored.line_total.cents(), 2000);
///
/// let untouched = enforce(Money::from_dollars(20), Money::from_dollars(20));
/// assert!(!untouched.applied);
/// ```
pub fn enforce(product_subtotal: Money, min_charge: Money) -> MinimumCharge {
    let applied = product_subtotal < min_charge;
    MinimumCharge {
        line_total: if applied { min_charge } else { product_subtotal },
        applied,
        value: min_charge,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_below_minimum_is_raised() {
        let result = enforce(Money::from_cents(999), Money::from_dollars(35));
        assert!(result.applied);
        assert_eq!(result.line_total, Money::from_dollars(35));
        assert_eq!(result.value, Money::from_dollars(35));
    }

    #[test]
    fn test_at_or_above_minimum_is_untouched() {
        let exact = enforce(Money::from_dollars(35), Money::from_dollars(35));
        assert!(!exact.applied);
        assert_eq!(exact.line_total, Money::from_dollars(35));

        let above = enforce(Money::from_cents(23200), Money::from_dollars(20));
        assert!(!above.applied);
        assert_eq!(above.line_total.cents(), 23200);
    }
}
