//! # Domain Types
//!
//! Rule-table rows and the request/response contract of the estimator.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  RULE TABLES (loaded once, immutable)                                  │
//! │  ┌──────────────┐ ┌──────────────┐ ┌──────────────┐ ┌──────────────┐   │
//! │  │ PricingRule  │ │   Product    │ │ DiscountTier │ │  AddonRule   │   │
//! │  │ rule_id      │ │ category     │ │ category     │ │ code         │   │
//! │  │ category     │ │ slug         │ │ threshold_   │ │ unit_price   │   │
//! │  │ material?    │ │ min_charge   │ │   type/value │ │ applicable_  │   │
//! │  │ tier_type    │ │ materials[]  │ │ discount_bps │ │   categories │   │
//! │  └──────────────┘ └──────────────┘ └──────────────┘ └──────────────┘   │
//! │                                                                         │
//! │  PER CALL (created and discarded)                                      │
//! │  ┌──────────────────┐         ┌────────────────────────────────────┐   │
//! │  │ EstimateRequest  │ ──────► │ EstimateResponse                   │   │
//! │  │ category/material│         │  QUOTED { sell_price, line_items } │   │
//! │  │ width/height/qty │         │  BLOCKED { clarification_notes }   │   │
//! │  └──────────────────┘         └────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::{Money, Rate};

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 500 bps = 5% (the flat sales tax)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        crate::SALES_TAX_RATE
    }
}

// =============================================================================
// Rule Enums
// =============================================================================

/// How a pricing rule prices a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TierType {
    /// `rate` is dollars per square foot of one piece.
    PerArea,
    /// `rate` is dollars per piece.
    PerUnit,
    /// `fixed_price` is the verbatim price of one piece at exactly
    /// `fixed_width_in` × `fixed_height_in`.
    FixedSize,
}

impl FromStr for TierType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PER_AREA" | "PER_SQFT" => Ok(TierType::PerArea),
            "PER_UNIT" => Ok(TierType::PerUnit),
            "FIXED_SIZE" => Ok(TierType::FixedSize),
            _ => Err(ValidationError::NotAllowed {
                field: "tier_type".to_string(),
                allowed: vec![
                    "PER_AREA".to_string(),
                    "PER_UNIT".to_string(),
                    "FIXED_SIZE".to_string(),
                ],
            }),
        }
    }
}

/// Which metric a discount tier's threshold is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThresholdType {
    /// Area of one piece in square feet.
    Area,
    /// Job quantity.
    Qty,
}

impl FromStr for ThresholdType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AREA" | "SQFT" => Ok(ThresholdType::Area),
            "QTY" | "QUANTITY" => Ok(ThresholdType::Qty),
            _ => Err(ValidationError::NotAllowed {
                field: "threshold_type".to_string(),
                allowed: vec!["AREA".to_string(), "QTY".to_string()],
            }),
        }
    }
}

/// Whether a category is priced by area or by piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PricingBasis {
    Area,
    Unit,
}

/// Printed sides of a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sides {
    Single,
    Double,
}

impl Sides {
    /// Rate multiplier in basis points (10000 = 1×).
    pub const fn multiplier_bps(&self) -> u32 {
        match self {
            Sides::Single => crate::SINGLE_SIDED_MULTIPLIER_BPS,
            Sides::Double => crate::DOUBLE_SIDED_MULTIPLIER_BPS,
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Sides::Single => "single-sided",
            Sides::Double => "double-sided",
        }
    }
}

// =============================================================================
// Rule Table Rows
// =============================================================================

/// One row of the pricing rule table.
///
/// Exactly one of `rate` / `fixed_*` is meaningful, selected by
/// `tier_type`; the catalog rejects rows where that doesn't hold.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingRule {
    pub rule_id: String,
    pub category: String,
    /// `None` is the category-wide wildcard.
    pub material_code: Option<String>,
    pub tier_type: TierType,
    pub rate: Option<Rate>,
    pub fixed_width_in: Option<f64>,
    pub fixed_height_in: Option<f64>,
    pub fixed_price: Option<Money>,
}

/// A sellable product: the minimum charge and the materials it comes in.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub category: String,
    pub slug: String,
    pub name: String,
    /// Pre-tax floor for the product-only line.
    pub min_charge: Money,
    pub material_codes: Vec<String>,
}

impl Product {
    /// Checks whether this product is sold in `material`.
    pub fn offers(&self, material: &str) -> bool {
        self.material_codes.iter().any(|m| m == material)
    }
}

/// A bulk-discount step for a category.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscountTier {
    pub category: String,
    pub threshold_type: ThresholdType,
    pub threshold_value: f64,
    /// Discount in basis points (800 = 8%).
    pub discount_bps: u32,
}

impl DiscountTier {
    /// Discount as a percentage number (for the response).
    pub fn discount_pct(&self) -> f64 {
        self.discount_bps as f64 / 100.0
    }
}

/// An optional priced extra billed as its own line item.
#[derive(Debug, Clone, PartialEq)]
pub struct AddonRule {
    pub code: String,
    pub name: String,
    pub unit_price: Money,
    pub applicable_categories: BTreeSet<String>,
}

impl AddonRule {
    /// Checks whether the add-on may be ordered with `category`.
    pub fn applies_to(&self, category: &str) -> bool {
        self.applicable_categories.contains(category)
    }
}

// =============================================================================
// Request
// =============================================================================

/// Design service requested with the job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DesignStatus {
    /// Customer artwork is ready to print; no fee.
    PrintReady,
    MinorEdit,
    FullDesign,
    LogoRecreation,
}

impl DesignStatus {
    /// Wire name, also used in line-item rule ids.
    pub fn code(&self) -> &'static str {
        match self {
            DesignStatus::PrintReady => "PRINT_READY",
            DesignStatus::MinorEdit => "MINOR_EDIT",
            DesignStatus::FullDesign => "FULL_DESIGN",
            DesignStatus::LogoRecreation => "LOGO_RECREATION",
        }
    }

    /// Human label for the fee line.
    pub fn label(&self) -> &'static str {
        match self {
            DesignStatus::PrintReady => "Print-ready artwork",
            DesignStatus::MinorEdit => "Design: minor edit",
            DesignStatus::FullDesign => "Design: full design",
            DesignStatus::LogoRecreation => "Design: logo recreation",
        }
    }
}

impl FromStr for DesignStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PRINT_READY" => Ok(DesignStatus::PrintReady),
            "MINOR_EDIT" => Ok(DesignStatus::MinorEdit),
            "FULL_DESIGN" => Ok(DesignStatus::FullDesign),
            "LOGO_RECREATION" => Ok(DesignStatus::LogoRecreation),
            _ => Err(ValidationError::NotAllowed {
                field: "design_status".to_string(),
                allowed: vec![
                    "PRINT_READY".to_string(),
                    "MINOR_EDIT".to_string(),
                    "FULL_DESIGN".to_string(),
                    "LOGO_RECREATION".to_string(),
                ],
            }),
        }
    }
}

/// One requested add-on occurrence.
///
/// `qty` is the number of this add-on, independent of the product quantity:
/// one H-stake per sign for 10 signs is `{ code: "H_STAKE", qty: 10 }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AddonRequest {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub qty: Option<i64>,
}

impl AddonRequest {
    /// Requested count; an omitted quantity counts one.
    pub fn quantity(&self) -> i64 {
        self.qty.unwrap_or(1)
    }
}

/// One print job as submitted for pricing.
///
/// Numeric fields are deliberately wide (`i64`, `f64`) so out-of-range
/// values reach the engine and come back as clarification notes instead of
/// failing JSON decoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EstimateRequest {
    pub category: String,
    #[serde(default)]
    pub material_code: Option<String>,
    /// Picks the product (and its minimum charge) when a category has several.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub product_slug: Option<String>,
    #[serde(default)]
    pub width_in: f64,
    #[serde(default)]
    pub height_in: f64,
    #[serde(default = "default_sides")]
    pub sides: i64,
    #[serde(default = "default_qty")]
    pub qty: i64,
    #[serde(default)]
    pub addons: Vec<AddonRequest>,
    #[serde(default)]
    pub design_status: Option<DesignStatus>,
    #[serde(default)]
    pub is_rush: bool,
}

fn default_sides() -> i64 {
    1
}

fn default_qty() -> i64 {
    1
}

impl EstimateRequest {
    /// A single-sided, quantity-1 request with no extras.
    pub fn new(category: impl Into<String>, material_code: Option<&str>, width_in: f64, height_in: f64) -> Self {
        EstimateRequest {
            category: category.into(),
            material_code: material_code.map(str::to_string),
            product_slug: None,
            width_in,
            height_in,
            sides: default_sides(),
            qty: default_qty(),
            addons: Vec::new(),
            design_status: None,
            is_rush: false,
        }
    }

    /// Sets the quantity.
    pub fn with_qty(mut self, qty: i64) -> Self {
        self.qty = qty;
        self
    }

    /// Sets the number of printed sides.
    pub fn with_sides(mut self, sides: i64) -> Self {
        self.sides = sides;
        self
    }

    /// Adds one add-on entry.
    pub fn with_addon(mut self, code: &str, qty: i64) -> Self {
        self.addons.push(AddonRequest {
            code: code.to_string(),
            qty: Some(qty),
        });
        self
    }

    /// Sets the design service.
    pub fn with_design(mut self, status: DesignStatus) -> Self {
        self.design_status = Some(status);
        self
    }

    /// Marks the job as rush.
    pub fn rush(mut self) -> Self {
        self.is_rush = true;
        self
    }
}

// =============================================================================
// Response
// =============================================================================

/// Which pricing tier produced the product line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum TierApplied {
    #[serde(rename = "FIXED_SIZE")]
    FixedSize,
    #[serde(rename = "PER_SQFT")]
    PerSqft,
    #[serde(rename = "PER_UNIT")]
    PerUnit,
}

impl fmt::Display for TierApplied {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TierApplied::FixedSize => write!(f, "FIXED_SIZE"),
            TierApplied::PerSqft => write!(f, "PER_SQFT"),
            TierApplied::PerUnit => write!(f, "PER_UNIT"),
        }
    }
}

/// One priced line of a quote.
///
/// `line_total` is authoritative. On a discounted or floored product line
/// `unit_price` is `line_total / qty` rounded half up, so `unit_price × qty`
/// can be off by up to `qty / 2` cents (a $20.00 floor at qty 3 shows
/// $6.67 each). Presenters should print `line_total`, never recompute it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    pub description: String,
    pub qty: i64,
    /// Display price per piece; see the type docs for rounding.
    #[ts(type = "number")]
    pub unit_price: Money,
    #[ts(type = "number")]
    pub line_total: Money,
    pub rule_id: String,
}

/// A successful estimate.
///
/// ## Invariants
/// - `sell_price` is the sum of `line_items[].line_total`, pre-tax
/// - `qty_discount_pct` is present iff `qty_discount_applied`
/// - `min_charge_applied` iff the unfloored product line was below
///   `min_charge_value`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Quote {
    #[ts(type = "number")]
    pub sell_price: Money,
    pub tier_applied: TierApplied,
    pub qty_discount_applied: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub qty_discount_pct: Option<f64>,
    #[ts(type = "number")]
    pub price_per_unit: Money,
    pub min_charge_applied: bool,
    #[ts(type = "number")]
    pub min_charge_value: Money,
    /// Area of one piece; absent for unit-priced categories.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub area_sqft: Option<f64>,
    pub qty: i64,
    pub line_items: Vec<LineItem>,
}

impl Quote {
    /// Tax on the quote at `rate`; `sell_price` itself stays pre-tax.
    pub fn tax(&self, rate: TaxRate) -> Money {
        self.sell_price.calculate_tax(rate)
    }

    /// Tax-inclusive total shown to the customer.
    pub fn total_with_tax(&self, rate: TaxRate) -> Money {
        self.sell_price + self.tax(rate)
    }
}

/// The outcome of one pricing call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EstimateResponse {
    Quoted(Quote),
    Blocked { clarification_notes: Vec<String> },
}

impl EstimateResponse {
    /// A refusal carrying `notes`.
    pub fn blocked(notes: Vec<String>) -> Self {
        EstimateResponse::Blocked {
            clarification_notes: notes,
        }
    }

    /// Checks whether the call produced a price.
    pub fn is_quoted(&self) -> bool {
        matches!(self, EstimateResponse::Quoted(_))
    }

    /// The quote, if priced.
    pub fn quote(&self) -> Option<&Quote> {
        match self {
            EstimateResponse::Quoted(quote) => Some(quote),
            EstimateResponse::Blocked { .. } => None,
        }
    }

    /// The clarification notes; empty when quoted.
    pub fn notes(&self) -> &[String] {
        match self {
            EstimateResponse::Quoted(_) => &[],
            EstimateResponse::Blocked {
                clarification_notes,
            } => clarification_notes,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
