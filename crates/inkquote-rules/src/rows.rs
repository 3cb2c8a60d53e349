//! Raw CSV rows and their conversion into core rule types.
//!
//! Money, rate and percentage cells are read as text and parsed exactly;
//! they never pass through a float.

use std::collections::BTreeSet;

use inkquote_core::money::parse_scaled_decimal;
use inkquote_core::{
    AddonRule, DesignStatus, DiscountTier, FeeSchedule, Money, PricingRule, Product, Rate,
    ThresholdType, TierType, ValidationError,
};
use serde::Deserialize;

/// Separator for list-valued cells (`MPHCC020;MPHCC040`).
pub const LIST_SEPARATOR: char = ';';

// =============================================================================
// Row Types
// =============================================================================

/// `products.csv`
#[derive(Debug, Deserialize)]
pub struct ProductRow {
    pub category: String,
    pub slug: String,
    pub name: String,
    pub min_charge: String,
    #[serde(default)]
    pub material_codes: Option<String>,
}

/// `pricing_rules.csv`
#[derive(Debug, Deserialize)]
pub struct PricingRuleRow {
    pub rule_id: String,
    pub category: String,
    #[serde(default)]
    pub material_code: Option<String>,
    pub tier_type: String,
    #[serde(default)]
    pub rate: Option<String>,
    #[serde(default)]
    pub fixed_width_in: Option<f64>,
    #[serde(default)]
    pub fixed_height_in: Option<f64>,
    #[serde(default)]
    pub fixed_price: Option<String>,
}

/// `discount_tiers.csv`
#[derive(Debug, Deserialize)]
pub struct DiscountTierRow {
    pub category: String,
    pub threshold_type: String,
    pub threshold_value: f64,
    pub discount_pct: String,
}

/// `addons.csv`
#[derive(Debug, Deserialize)]
pub struct AddonRow {
    pub code: String,
    pub name: String,
    pub unit_price: String,
    pub applicable_categories: String,
}

/// `fees.csv`
#[derive(Debug, Deserialize)]
pub struct FeeRow {
    pub kind: String,
    #[serde(default)]
    pub code: Option<String>,
    pub amount: String,
}

// =============================================================================
// Conversions
// =============================================================================

impl TryFrom<ProductRow> for Product {
    type Error = ValidationError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        Ok(Product {
            category: required("category", row.category)?,
            slug: required("slug", row.slug)?,
            name: row.name.trim().to_string(),
            min_charge: money("min_charge", &row.min_charge)?,
            material_codes: split_list(row.material_codes.as_deref().unwrap_or_default()),
        })
    }
}

impl TryFrom<PricingRuleRow> for PricingRule {
    type Error = ValidationError;

    fn try_from(row: PricingRuleRow) -> Result<Self, Self::Error> {
        Ok(PricingRule {
            rule_id: required("rule_id", row.rule_id)?,
            category: required("category", row.category)?,
            material_code: row.material_code.filter(|m| !m.trim().is_empty()),
            tier_type: row.tier_type.parse::<TierType>()?,
            rate: row.rate.as_deref().map(|r| rate("rate", r)).transpose()?,
            fixed_width_in: row.fixed_width_in,
            fixed_height_in: row.fixed_height_in,
            fixed_price: row
                .fixed_price
                .as_deref()
                .map(|p| money("fixed_price", p))
                .transpose()?,
        })
    }
}

impl TryFrom<DiscountTierRow> for DiscountTier {
    type Error = ValidationError;

    fn try_from(row: DiscountTierRow) -> Result<Self, Self::Error> {
        Ok(DiscountTier {
            category: required("category", row.category)?,
            threshold_type: row.threshold_type.parse::<ThresholdType>()?,
            threshold_value: row.threshold_value,
            discount_bps: percent_bps("discount_pct", &row.discount_pct)?,
        })
    }
}

impl TryFrom<AddonRow> for AddonRule {
    type Error = ValidationError;

    fn try_from(row: AddonRow) -> Result<Self, Self::Error> {
        Ok(AddonRule {
            code: required("code", row.code)?,
            name: row.name.trim().to_string(),
            unit_price: money("unit_price", &row.unit_price)?,
            applicable_categories: split_list(&row.applicable_categories)
                .into_iter()
                .collect::<BTreeSet<_>>(),
        })
    }
}

/// Applies one `fees.csv` row to the schedule.
///
/// `DESIGN` rows name a billable design status in `code`; a `RUSH` row sets
/// the rush fee and leaves `code` empty.
pub fn apply_fee_row(schedule: &mut FeeSchedule, row: FeeRow) -> Result<(), ValidationError> {
    let amount = money("amount", &row.amount)?;

    match row.kind.trim().to_ascii_uppercase().as_str() {
        "RUSH" => {
            schedule.rush = amount;
            Ok(())
        }
        "DESIGN" => {
            let code = row.code.unwrap_or_default();
            let status: DesignStatus = code.parse()?;
            if schedule.set_design_fee(status, amount) {
                Ok(())
            } else {
                Err(ValidationError::InvalidFormat {
                    field: "code".to_string(),
                    reason: format!("{} is not a billable design service", status.code()),
                })
            }
        }
        _ => Err(ValidationError::NotAllowed {
            field: "kind".to_string(),
            allowed: vec!["DESIGN".to_string(), "RUSH".to_string()],
        }),
    }
}

// =============================================================================
// Cell Parsers
// =============================================================================

fn required(field: &str, value: String) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(trimmed.to_string())
}

fn money(field: &str, value: &str) -> Result<Money, ValidationError> {
    value.parse::<Money>().map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: format!("'{}' is not a dollar amount with at most 2 decimals", value.trim()),
    })
}

fn rate(field: &str, value: &str) -> Result<Rate, ValidationError> {
    value.parse::<Rate>().map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: format!("'{}' is not a rate with at most 4 decimals", value.trim()),
    })
}

/// `"8"` → 800 bps, `"7.5"` → 750 bps.
fn percent_bps(field: &str, value: &str) -> Result<u32, ValidationError> {
    parse_scaled_decimal(value, 2)
        .and_then(|bps| u32::try_from(bps).ok())
        .ok_or_else(|| ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: format!("'{}' is not a percentage with at most 2 decimals", value.trim()),
        })
}

fn split_list(cell: &str) -> Vec<String> {
    cell.split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
