//! # Order Totals
//!
//! Prices a cart: every line through the engine, then one tax computation
//! over the combined pre-tax subtotal.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  items[0] ──► estimate ──► QUOTED ──┐                                   │
//! │  items[1] ──► estimate ──► QUOTED ──┼──► Σ sell_price ──► tax ──► total │
//! │  items[2] ──► estimate ──► BLOCKED ─┼──► "Item 3: <note>"               │
//! │                                     │                                   │
//! │  any BLOCKED line ──► whole order BLOCKED (every line's notes)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::catalog::RuleCatalog;
use crate::error::EstimateError;
use crate::money::Money;
use crate::pricing::{self, TaxBreakdown};
use crate::types::{EstimateRequest, Quote, TaxRate};
use crate::MAX_ORDER_ITEMS;

/// A cart to price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderRequest {
    pub items: Vec<EstimateRequest>,
}

/// A fully priced cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderTotals {
    /// One quote per request item, in request order.
    pub lines: Vec<Quote>,
    pub item_count: usize,
    #[ts(type = "number")]
    pub subtotal: Money,
    #[ts(type = "number")]
    pub tax: Money,
    #[ts(type = "number")]
    pub total: Money,
    pub tax_rate_pct: f64,
}

/// The outcome of pricing a cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderResponse {
    Quoted(OrderTotals),
    Blocked { clarification_notes: Vec<String> },
}

impl OrderResponse {
    /// The totals, if every line priced.
    pub fn totals(&self) -> Option<&OrderTotals> {
        match self {
            OrderResponse::Quoted(totals) => Some(totals),
            OrderResponse::Blocked { .. } => None,
        }
    }
}

/// Prices every item and totals the order with tax at `rate`.
///
/// Notes from blocked lines are prefixed with the 1-based item number.
pub fn order_totals(catalog: &RuleCatalog, items: &[EstimateRequest], rate: TaxRate) -> OrderResponse {
    if items.is_empty() {
        return blocked(vec![EstimateError::EmptyOrder.to_string()]);
    }
    if items.len() > MAX_ORDER_ITEMS {
        return blocked(vec![EstimateError::TooManyItems {
            count: items.len(),
            max: MAX_ORDER_ITEMS,
        }
        .to_string()]);
    }

    let mut lines = Vec::with_capacity(items.len());
    let mut notes = Vec::new();

    for (index, item) in items.iter().enumerate() {
        match pricing::price(catalog, item) {
            Ok(quote) => lines.push(quote),
            Err(refusal) => notes.extend(
                refusal
                    .notes()
                    .into_iter()
                    .map(|note| format!("Item {}: {}", index + 1, note)),
            ),
        }
    }

    if !notes.is_empty() {
        return blocked(notes);
    }

    let subtotal: Money = lines.iter().map(|quote| quote.sell_price).sum();
    let taxed = TaxBreakdown::compute(subtotal, rate);

    OrderResponse::Quoted(OrderTotals {
        item_count: lines.len(),
        lines,
        subtotal: taxed.subtotal,
        tax: taxed.tax,
        total: taxed.total,
        tax_rate_pct: taxed.tax_rate_pct,
    })
}

fn blocked(notes: Vec<String>) -> OrderResponse {
    OrderResponse::Blocked {
        clarification_notes: notes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogTables;
    use crate::types::{PricingRule, Product, TierType};

    fn catalog() -> RuleCatalog {
        RuleCatalog::build(CatalogTables {
            products: vec![Product {
                category: "MAGNET".to_string(),
                slug: "car-magnets".to_string(),
                name: "Car Magnets".to_string(),
                min_charge: Money::from_dollars(30),
                material_codes: vec!["MAG302437550M".to_string()],
            }],
            pricing_rules: vec![PricingRule {
                rule_id: "MAGNET-SQFT".to_string(),
                category: "MAGNET".to_string(),
                material_code: None,
                tier_type: TierType::PerArea,
                rate: Some("12.00".parse().unwrap()),
                fixed_width_in: None,
                fixed_height_in: None,
                fixed_price: None,
            }],
            ..Default::default()
        })
        .unwrap()
    }

    fn magnet(qty: i64) -> EstimateRequest {
        EstimateRequest::new("MAGNET", Some("MAG302437550M"), 12.0, 18.0).with_qty(qty)
    }

    #[test]
    fn test_order_is_taxed_once() {
        let response = order_totals(&catalog(), &[magnet(2), magnet(3)], TaxRate::from_bps(500));
        let totals = response.totals().unwrap();

        // 2 × $18 = $36, 3 × $18 = $54
        assert_eq!(totals.item_count, 2);
        assert_eq!(totals.subtotal.cents(), 9000);
        assert_eq!(totals.tax.cents(), 450);
        assert_eq!(totals.total.cents(), 9450);
        assert_eq!(totals.lines[1].sell_price.cents(), 5400);
    }

    #[test]
    fn test_blocked_line_blocks_order() {
        let mut broken = magnet(1);
        broken.width_in = 0.0;
        let response = order_totals(&catalog(), &[magnet(1), broken], TaxRate::from_bps(500));

        assert!(response.totals().is_none());
        assert_eq!(
            response,
            OrderResponse::Blocked {
                clarification_notes: vec!["Item 2: Width must be greater than zero".to_string()]
            }
        );
    }

    #[test]
    fn test_empty_order() {
        let response = order_totals(&catalog(), &[], TaxRate::from_bps(500));
        assert_eq!(
            response,
            OrderResponse::Blocked {
                clarification_notes: vec!["Order must contain at least one item".to_string()]
            }
        );
    }
}
