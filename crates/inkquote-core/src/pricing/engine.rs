//! # Estimate Engine
//!
//! Runs the per-request pipeline against one catalog snapshot and assembles
//! the response.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  EstimateRequest                                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  category known? ──────────────────────────── no ──► BLOCKED            │
//! │       ▼                                                                 │
//! │  dimensions::normalize  (sides, qty, width/height, area) ─ ✗ ─► BLOCKED │
//! │       ▼                                                                 │
//! │  tier::resolve_material / product lookup ────────────── ✗ ─► BLOCKED    │
//! │       ▼                                                                 │
//! │  tier::resolve  (FIXED_SIZE │ PER_SQFT │ PER_UNIT) ──────── ✗ ─► BLOCKED │
//! │       ▼                                                                 │
//! │  discount::select_tier + apply                                          │
//! │       ▼                                                                 │
//! │  addons::price_addons ──────────────────────────────── ✗ ─► BLOCKED     │
//! │       ▼                                                                 │
//! │  fees::fee_lines  (design, rush)                                        │
//! │       ▼                                                                 │
//! │  minimum::enforce  (product line only)                                  │
//! │       ▼                                                                 │
//! │  assemble: product, add-ons, design, rush ──► QUOTED                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every exit is terminal for the call. A BLOCKED response never carries a
//! price.

use crate::catalog::RuleCatalog;
use crate::error::{Blocked, EstimateError};
use crate::pricing::dimensions::{self, JobDimensions};
use crate::pricing::minimum::{self, MinimumCharge};
use crate::pricing::tier::{self, ResolvedTier};
use crate::pricing::{addons, discount, fees};
use crate::types::{
    DiscountTier, EstimateRequest, EstimateResponse, LineItem, Product, Quote, TierApplied,
};
use crate::validation::normalize_code;

/// Prices one job.
///
/// Pure: the same catalog and request always produce the same response.
///
/// ## Example
/// ```rust,ignore
/// let response = estimate(&catalog, &EstimateRequest::new("SIGN", Some("MPHCC020"), 48.0, 96.0));
/// assert_eq!(response.quote().unwrap().sell_price.cents(), 23200);
/// ```
pub fn estimate(catalog: &RuleCatalog, request: &EstimateRequest) -> EstimateResponse {
    match price(catalog, request) {
        Ok(quote) => EstimateResponse::Quoted(quote),
        Err(blocked) => EstimateResponse::blocked(blocked.notes()),
    }
}

/// Prices one job, keeping the typed refusal.
pub fn price(catalog: &RuleCatalog, request: &EstimateRequest) -> Result<Quote, Blocked> {
    let category = normalize_code(&request.category);
    if category.is_empty() {
        return Err(EstimateError::CategoryRequired.into());
    }
    let basis = catalog
        .basis(&category)
        .ok_or_else(|| EstimateError::UnknownCategory(category.clone()))?;

    let job = dimensions::normalize(basis, request)?;

    let material = tier::resolve_material(catalog, &category, request.material_code.as_deref())?;
    let product = catalog
        .product_for(&category, request.product_slug.as_deref(), material.as_deref())
        .ok_or_else(|| EstimateError::UnknownProduct {
            category: category.clone(),
            slug: request.product_slug.clone().unwrap_or_default(),
        })?;

    let resolved = tier::resolve(catalog, &category, basis, material.as_deref(), &job)?;

    let volume_tier = discount::select_tier(catalog.discount_tiers(&category), &job);
    let discounted = match volume_tier {
        Some(tier) => discount::apply(resolved.subtotal, tier),
        None => resolved.subtotal,
    };

    let addon_lines = addons::price_addons(catalog, &category, &request.addons)?;
    let fee_lines = fees::fee_lines(catalog.fees(), request.design_status, request.is_rush);

    let floor = minimum::enforce(discounted, product.min_charge);

    let product_line = ProductLine {
        product,
        material: material.as_deref(),
        job: &job,
        tier: &resolved,
        discount: volume_tier,
        floor,
    };

    Ok(assemble(product_line, addon_lines, fee_lines))
}

struct ProductLine<'a> {
    product: &'a Product,
    material: Option<&'a str>,
    job: &'a JobDimensions,
    tier: &'a ResolvedTier,
    discount: Option<&'a DiscountTier>,
    floor: MinimumCharge,
}

impl ProductLine<'_> {
    fn description(&self) -> String {
        let mut text = self.product.name.clone();
        if let Some(material) = self.material {
            text.push_str(&format!(" ({material})"));
        }
        if self.job.area_sqft.is_some() {
            text.push_str(&format!(" {} x {} in", self.job.width_in, self.job.height_in));
        }
        text.push_str(&format!(", {}", self.job.sides.label()));
        if self.tier.tier_applied == TierApplied::FixedSize {
            text.push_str(", fixed size");
        }
        if let Some(tier) = self.discount {
            text.push_str(&format!(", {}% volume discount", tier.discount_pct()));
        }
        if self.floor.applied {
            text.push_str(&format!(", minimum charge {} applied", self.floor.value));
        }
        text
    }

    fn line_item(&self) -> LineItem {
        LineItem {
            description: self.description(),
            qty: self.job.qty,
            unit_price: self.floor.line_total.per_unit(self.job.qty),
            line_total: self.floor.line_total,
            rule_id: self.tier.rule_id.clone(),
        }
    }
}

/// Orders the lines (product, add-ons, design, rush) and derives the totals
/// from them.
fn assemble(product: ProductLine<'_>, addon_lines: Vec<LineItem>, fee_lines: Vec<LineItem>) -> Quote {
    let mut line_items = Vec::with_capacity(1 + addon_lines.len() + fee_lines.len());
    line_items.push(product.line_item());
    line_items.extend(addon_lines);
    line_items.extend(fee_lines);

    let sell_price = line_items.iter().map(|line| line.line_total).sum();

    Quote {
        sell_price,
        tier_applied: product.tier.tier_applied,
        qty_discount_applied: product.discount.is_some(),
        qty_discount_pct: product.discount.map(DiscountTier::discount_pct),
        price_per_unit: line_items[0].unit_price,
        min_charge_applied: product.floor.applied,
        min_charge_value: product.floor.value,
        area_sqft: product.job.area_sqft,
        qty: product.job.qty,
        line_items,
    }
}
