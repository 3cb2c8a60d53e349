//! A synthetic catalog with the same rules as the shipped `rules/` tables.

#![allow(dead_code)]

use inkquote_core::{
    AddonRule, CatalogTables, DiscountTier, Money, PricingRule, Product, RuleCatalog, ThresholdType,
    TierType,
};

fn product(category: &str, slug: &str, name: &str, min_charge: &str, materials: &[&str]) -> Product {
    Product {
        category: category.to_string(),
        slug: slug.to_string(),
        name: name.to_string(),
        min_charge: min_charge.parse().unwrap(),
        material_codes: materials.iter().map(|m| m.to_string()).collect(),
    }
}

fn rate_rule(rule_id: &str, category: &str, material: Option<&str>, tier_type: TierType, rate: &str) -> PricingRule {
    PricingRule {
        rule_id: rule_id.to_string(),
        category: category.to_string(),
        material_code: material.map(str::to_string),
        tier_type,
        rate: Some(rate.parse().unwrap()),
        fixed_width_in: None,
        fixed_height_in: None,
        fixed_price: None,
    }
}

fn fixed_rule(rule_id: &str, category: &str, material: &str, width: f64, height: f64, price: &str) -> PricingRule {
    PricingRule {
        rule_id: rule_id.to_string(),
        category: category.to_string(),
        material_code: Some(material.to_string()),
        tier_type: TierType::FixedSize,
        rate: None,
        fixed_width_in: Some(width),
        fixed_height_in: Some(height),
        fixed_price: Some(price.parse().unwrap()),
    }
}

fn tier(category: &str, threshold_type: ThresholdType, threshold: f64, discount_bps: u32) -> DiscountTier {
    DiscountTier {
        category: category.to_string(),
        threshold_type,
        threshold_value: threshold,
        discount_bps,
    }
}

fn addon(code: &str, name: &str, price: &str, categories: &[&str]) -> AddonRule {
    AddonRule {
        code: code.to_string(),
        name: name.to_string(),
        unit_price: price.parse().unwrap(),
        applicable_categories: categories.iter().map(|c| c.to_string()).collect(),
    }
}

pub fn tables() -> CatalogTables {
    CatalogTables {
        products: vec![
            product("SIGN", "coroplast-signs", "Coroplast Signs", "20.00", &["MPHCC020", "MPHCC040"]),
            product("BANNER", "vinyl-banners", "Vinyl Banners", "35.00", &["RMBF004", "RMBF010"]),
            product("MAGNET", "car-magnets", "Car Magnets", "30.00", &["MAG302437550M"]),
            product("BUSINESS_CARD", "business-cards", "Business Cards", "20.00", &["PLC14PT", "PLC16PT"]),
        ],
        pricing_rules: vec![
            rate_rule("SIGN-MPHCC020-SQFT", "SIGN", Some("MPHCC020"), TierType::PerArea, "8.00"),
            fixed_rule("SIGN-MPHCC020-4X8", "SIGN", "MPHCC020", 48.0, 96.0, "232.00"),
            rate_rule("SIGN-MPHCC040-SQFT", "SIGN", Some("MPHCC040"), TierType::PerArea, "10.50"),
            rate_rule("BANNER-SQFT", "BANNER", None, TierType::PerArea, "6.25"),
            rate_rule("BANNER-RMBF010-SQFT", "BANNER", Some("RMBF010"), TierType::PerArea, "7.50"),
            rate_rule("MAGNET-MAG302437550M-SQFT", "MAGNET", Some("MAG302437550M"), TierType::PerArea, "12.00"),
            rate_rule("BC-PLC14PT-UNIT", "BUSINESS_CARD", Some("PLC14PT"), TierType::PerUnit, "0.08"),
            rate_rule("BC-PLC16PT-UNIT", "BUSINESS_CARD", Some("PLC16PT"), TierType::PerUnit, "0.10"),
        ],
        discount_tiers: vec![
            tier("SIGN", ThresholdType::Qty, 5.0, 800),
            tier("SIGN", ThresholdType::Qty, 10.0, 1700),
            tier("MAGNET", ThresholdType::Qty, 5.0, 500),
            tier("MAGNET", ThresholdType::Qty, 10.0, 1000),
            tier("BANNER", ThresholdType::Area, 8.0, 500),
            tier("BANNER", ThresholdType::Area, 32.0, 1000),
            tier("BUSINESS_CARD", ThresholdType::Qty, 500.0, 500),
            tier("BUSINESS_CARD", ThresholdType::Qty, 1000.0, 1000),
        ],
        addons: vec![
            addon("H_STAKE", "H-stake", "2.50", &["SIGN"]),
            addon("GROMMETS", "Grommets (set of 4)", "3.00", &["BANNER", "SIGN"]),
            addon("POLE_POCKET", "Pole pocket", "12.00", &["BANNER"]),
            addon("ROUNDED_CORNERS", "Rounded corners", "5.00", &["BUSINESS_CARD", "MAGNET"]),
        ],
        ..Default::default()
    }
}

pub fn catalog() -> RuleCatalog {
    RuleCatalog::build(tables()).unwrap()
}

/// Minimum charge of the only product in `category`.
pub fn min_charge(category: &str) -> Money {
    catalog().products_in(category).next().unwrap().min_charge
}
