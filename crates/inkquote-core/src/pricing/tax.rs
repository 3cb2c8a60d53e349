//! Tax calculator.
//!
//! Tax is never folded into `sell_price`. Presenters (the estimator page,
//! quote emails, order totals) derive it from the pre-tax figure here so
//! every surface rounds the same way.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::TaxRate;

/// Pre-tax subtotal, tax and tax-inclusive total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxBreakdown {
    #[ts(type = "number")]
    pub subtotal: Money,
    #[ts(type = "number")]
    pub tax: Money,
    #[ts(type = "number")]
    pub total: Money,
    /// Rate as a percentage number (5.0 = 5%).
    pub tax_rate_pct: f64,
}

impl TaxBreakdown {
    /// Applies `rate` to a pre-tax subtotal, rounding half up once.
    ///
    /// ## Example
    /// ```rust
    /// use inkquote_core::money::Money;
    /// use inkquote_core::pricing::tax::TaxBreakdown;
    /// use inkquote_core::TaxRate;
    ///
    /// let taxed = TaxBreakdown::compute(Money::from_dollars(232), TaxRate::from_bps(500));
    /// assert_eq!(taxed.tax.cents(), 1160);
    /// assert_eq!(taxed.total.cents(), 24360);
    /// ```
    pub fn compute(subtotal: Money, rate: TaxRate) -> Self {
        let tax = subtotal.calculate_tax(rate);
        TaxBreakdown {
            subtotal,
            tax,
            total: subtotal + tax,
            tax_rate_pct: rate.percentage(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_is_subtotal_plus_tax() {
        let taxed = TaxBreakdown::compute(Money::from_cents(8550), TaxRate::from_bps(500));
        // $85.50 × 5% = $4.275 → $4.28
        assert_eq!(taxed.tax.cents(), 428);
        assert_eq!(taxed.total.cents(), 8978);
        assert_eq!(taxed.subtotal.cents(), 8550);
    }

    #[test]
    fn test_zero_rate() {
        let taxed = TaxBreakdown::compute(Money::from_dollars(24), TaxRate::from_bps(0));
        assert!(taxed.tax.is_zero());
        assert_eq!(taxed.total, Money::from_dollars(24));
    }
}
