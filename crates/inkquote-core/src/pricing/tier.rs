//! # Tier Resolver
//!
//! Picks the pricing method for a job and computes its pre-discount product
//! subtotal.
//!
//! ## Resolution Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  material ──► known for category?  no ──► BLOCKED "Unknown material"   │
//! │                    │ yes                                                │
//! │                    ▼                                                    │
//! │  exact FIXED_SIZE match?  (specific material first, then wildcard)     │
//! │        │ yes                          │ no                              │
//! │        ▼                              ▼                                 │
//! │  fixed_price × qty            rate rule (specific, else wildcard)      │
//! │  (verbatim, no sides)          │ none ──► BLOCKED "size not available"  │
//! │                                ▼                                        │
//! │                   area:  round(rate × sides × sqft) × qty              │
//! │                   unit:  round(rate × sides × qty)                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::catalog::RuleCatalog;
use crate::error::{Blocked, EstimateError};
use crate::money::Money;
use crate::pricing::dimensions::{match_fixed_size, JobDimensions};
use crate::types::{PricingBasis, TierApplied};
use crate::validation::normalize_optional_code;

/// The product line before discounts and the minimum charge.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTier {
    pub tier_applied: TierApplied,
    pub rule_id: String,
    /// Price of one piece (area and fixed tiers) or the rounded average
    /// (unit tier).
    pub unit_price: Money,
    /// Price of all pieces.
    pub subtotal: Money,
}

/// Resolves the request's material code against the category.
///
/// Returns the normalized code, or `None` when no material was given and
/// the category has a wildcard rule to fall back on.
pub fn resolve_material(
    catalog: &RuleCatalog,
    category: &str,
    requested: Option<&str>,
) -> Result<Option<String>, Blocked> {
    match normalize_optional_code(requested) {
        Some(material) if catalog.is_known_material(category, &material) => Ok(Some(material)),
        Some(material) => Err(EstimateError::UnknownMaterial {
            category: category.to_string(),
            material,
        }
        .into()),
        None if catalog.has_wildcard(category) => Ok(None),
        None => Err(EstimateError::MaterialRequired {
            category: category.to_string(),
        }
        .into()),
    }
}

/// Selects the tier and prices the product line.
pub fn resolve(
    catalog: &RuleCatalog,
    category: &str,
    basis: PricingBasis,
    material: Option<&str>,
    job: &JobDimensions,
) -> Result<ResolvedTier, Blocked> {
    if let Some(fixed) = match_fixed_size(catalog.fixed_sizes(category, material), job) {
        return Ok(ResolvedTier {
            tier_applied: TierApplied::FixedSize,
            rule_id: fixed.rule_id.clone(),
            unit_price: fixed.price,
            subtotal: fixed.price * job.qty,
        });
    }

    let Some(rule) = catalog.rate_rule(category, material) else {
        return Err(size_not_available(catalog, category, material, job).into());
    };

    let multiplier = job.sides.multiplier_bps();
    let resolved = match (basis, job.area_sqft) {
        (PricingBasis::Area, Some(area_sqft)) => {
            let unit_price = rule.rate.price_area(area_sqft, multiplier);
            ResolvedTier {
                tier_applied: TierApplied::PerSqft,
                rule_id: rule.rule_id.clone(),
                unit_price,
                subtotal: unit_price * job.qty,
            }
        }
        _ => {
            let subtotal = rule.rate.price_units(job.qty, multiplier);
            ResolvedTier {
                tier_applied: TierApplied::PerUnit,
                rule_id: rule.rule_id.clone(),
                unit_price: subtotal.per_unit(job.qty),
                subtotal,
            }
        }
    };

    Ok(resolved)
}

fn size_not_available(
    catalog: &RuleCatalog,
    category: &str,
    material: Option<&str>,
    job: &JobDimensions,
) -> EstimateError {
    let available = catalog
        .fixed_sizes(category, material)
        .map(|f| format!("{} x {} in", f.width_in, f.height_in))
        .collect::<Vec<_>>()
        .join(", ");

    EstimateError::SizeNotAvailable {
        material: material.unwrap_or(category).to_string(),
        width: job.width_in,
        height: job.height_in,
        available,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogTables;
    use crate::types::{PricingRule, Product, Sides, TierType};

    fn rule(rule_id: &str, category: &str, material: Option<&str>, tier_type: TierType, rate: Option<&str>) -> PricingRule {
        PricingRule {
            rule_id: rule_id.to_string(),
            category: category.to_string(),
            material_code: material.map(str::to_string),
            tier_type,
            rate: rate.map(|r| r.parse().unwrap()),
            fixed_width_in: None,
            fixed_height_in: None,
            fixed_price: None,
        }
    }

    fn catalog() -> RuleCatalog {
        let mut fixed = rule("SIGN-4X8", "SIGN", Some("MPHCC020"), TierType::FixedSize, None);
        fixed.fixed_width_in = Some(48.0);
        fixed.fixed_height_in = Some(96.0);
        fixed.fixed_price = Some("232.00".parse().unwrap());

        let mut only_fixed = rule("SIGN-DIBOND-2X3", "SIGN", Some("DIBOND"), TierType::FixedSize, None);
        only_fixed.fixed_width_in = Some(24.0);
        only_fixed.fixed_height_in = Some(36.0);
        only_fixed.fixed_price = Some("65.00".parse().unwrap());

        RuleCatalog::build(CatalogTables {
            products: vec![
                Product {
                    category: "SIGN".to_string(),
                    slug: "coroplast-signs".to_string(),
                    name: "Coroplast Signs".to_string(),
                    min_charge: Money::from_dollars(20),
                    material_codes: vec!["MPHCC020".to_string(), "DIBOND".to_string()],
                },
                Product {
                    category: "BUSINESS_CARD".to_string(),
                    slug: "business-cards".to_string(),
                    name: "Business Cards".to_string(),
                    min_charge: Money::from_dollars(20),
                    material_codes: vec!["PLC14PT".to_string()],
                },
            ],
            pricing_rules: vec![
                rule("SIGN-AREA", "SIGN", Some("MPHCC020"), TierType::PerArea, Some("8.00")),
                fixed,
                only_fixed,
                rule("BC-14PT", "BUSINESS_CARD", Some("PLC14PT"), TierType::PerUnit, Some("0.0833")),
            ],
            ..Default::default()
        })
        .unwrap()
    }

    fn job(width_in: f64, height_in: f64, sides: Sides, qty: i64) -> JobDimensions {
        JobDimensions {
            width_in,
            height_in,
            sides,
            qty,
            area_sqft: Some(width_in * height_in / 144.0),
        }
    }

    #[test]
    fn test_unknown_material_names_category() {
        let blocked = resolve_material(&catalog(), "SIGN", Some("nope")).unwrap_err();
        assert_eq!(blocked.notes(), vec!["Unknown material code NOPE for category SIGN".to_string()]);
    }

    #[test]
    fn test_material_required_without_wildcard() {
        let blocked = resolve_material(&catalog(), "SIGN", None).unwrap_err();
        assert_eq!(blocked.notes(), vec!["Material code is required for category SIGN".to_string()]);
    }

    #[test]
    fn test_fixed_size_is_verbatim() {
        let catalog = catalog();
        let tier = resolve(&catalog, "SIGN", PricingBasis::Area, Some("MPHCC020"), &job(48.0, 96.0, Sides::Double, 1)).unwrap();
        assert_eq!(tier.tier_applied, TierApplied::FixedSize);
        assert_eq!(tier.subtotal.cents(), 23200);
    }

    #[test]
    fn test_near_fixed_size_falls_through() {
        let catalog = catalog();
        let tier = resolve(&catalog, "SIGN", PricingBasis::Area, Some("MPHCC020"), &job(47.0, 96.0, Sides::Single, 1)).unwrap();
        assert_eq!(tier.tier_applied, TierApplied::PerSqft);
        assert_eq!(tier.subtotal.cents(), 25067);
    }

    #[test]
    fn test_double_sided_is_one_and_a_half() {
        let catalog = catalog();
        let single = resolve(&catalog, "SIGN", PricingBasis::Area, Some("MPHCC020"), &job(18.0, 24.0, Sides::Single, 2)).unwrap();
        let double = resolve(&catalog, "SIGN", PricingBasis::Area, Some("MPHCC020"), &job(18.0, 24.0, Sides::Double, 2)).unwrap();
        assert_eq!(single.unit_price.cents(), 2400);
        assert_eq!(double.unit_price.cents(), 3600);
        assert_eq!(double.subtotal.cents(), 7200);
    }

    #[test]
    fn test_unit_pricing_rounds_once() {
        let catalog = catalog();
        let cards = JobDimensions {
            width_in: 0.0,
            height_in: 0.0,
            sides: Sides::Single,
            qty: 500,
            area_sqft: None,
        };
        let tier = resolve(&catalog, "BUSINESS_CARD", PricingBasis::Unit, Some("PLC14PT"), &cards).unwrap();
        assert_eq!(tier.tier_applied, TierApplied::PerUnit);
        assert_eq!(tier.subtotal.cents(), 4165);
        assert_eq!(tier.unit_price.cents(), 8);
    }

    #[test]
    fn test_fixed_only_material_lists_sizes() {
        let catalog = catalog();
        let blocked = resolve(&catalog, "SIGN", PricingBasis::Area, Some("DIBOND"), &job(20.0, 30.0, Sides::Single, 1)).unwrap_err();
        assert_eq!(
            blocked.notes(),
            vec!["20 x 30 in is not available for DIBOND; available sizes: 24 x 36 in".to_string()]
        );
    }
}
