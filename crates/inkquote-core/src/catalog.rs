//! # Rule Catalog
//!
//! The immutable, indexed form of the rule tables. Built once (or once per
//! reload) and shared read-only by every pricing call.
//!
//! ## Indices
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         RuleCatalog                                     │
//! │                                                                         │
//! │  rules      (category, material?) ──► RuleSet { rate?, fixed sizes }  │
//! │             material = None is the category wildcard                   │
//! │                                                                         │
//! │  products   (category, slug) ──► Product { min_charge, materials }     │
//! │                                                                         │
//! │  tiers      category ──► [DiscountTier] sorted by threshold ascending  │
//! │                                                                         │
//! │  addons     code ──► AddonRule                                         │
//! │                                                                         │
//! │  categories category ──► { basis: Area | Unit, known materials }       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Integrity
//! [`RuleCatalog::build`] refuses inconsistent tables with a [`CatalogError`].
//! A catalog that exists is internally consistent: every product's category
//! is priced, every listed material has a rule, tiers are strictly
//! increasing. The pricing pipeline relies on this and never re-checks.

use std::collections::{btree_map, BTreeMap, BTreeSet, HashMap, HashSet};

use serde::Serialize;

use crate::error::{CatalogError, CatalogResult};
use crate::money::{Money, Rate};
use crate::pricing::fees::FeeSchedule;
use crate::types::{
    AddonRule, DiscountTier, PricingBasis, PricingRule, Product, ThresholdType, TierType,
};
use crate::validation::{normalize_code, normalize_optional_code};

// =============================================================================
// Input Tables
// =============================================================================

/// The raw rule tables, as read from the rule source.
#[derive(Debug, Clone, Default)]
pub struct CatalogTables {
    pub products: Vec<Product>,
    pub pricing_rules: Vec<PricingRule>,
    pub discount_tiers: Vec<DiscountTier>,
    pub addons: Vec<AddonRule>,
    pub fees: FeeSchedule,
}

// =============================================================================
// Indexed Rules
// =============================================================================

/// A validated PER_AREA / PER_UNIT rule.
#[derive(Debug, Clone, PartialEq)]
pub struct RateRule {
    pub rule_id: String,
    pub material_code: Option<String>,
    pub rate: Rate,
}

/// A validated FIXED_SIZE rule.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedSizeRule {
    pub rule_id: String,
    pub material_code: Option<String>,
    pub width_in: f64,
    pub height_in: f64,
    pub price: Money,
}

impl FixedSizeRule {
    /// Exact, positional match: 48×96 does not match 96×48.
    #[allow(clippy::float_cmp)]
    pub fn matches(&self, width_in: f64, height_in: f64) -> bool {
        self.width_in == width_in && self.height_in == height_in
    }
}

/// All rules for one `(category, material)` key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    pub rate: Option<RateRule>,
    pub fixed_sizes: Vec<FixedSizeRule>,
}

#[derive(Debug, Clone)]
struct CategoryInfo {
    basis: PricingBasis,
    materials: BTreeSet<String>,
}

type RuleKey = (String, Option<String>);

/// Counts reported after a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogSummary {
    pub categories: usize,
    pub products: usize,
    pub pricing_rules: usize,
    pub discount_tiers: usize,
    pub addons: usize,
}

// =============================================================================
// Rule Catalog
// =============================================================================

/// Immutable, indexed rule tables.
#[derive(Debug, Clone)]
pub struct RuleCatalog {
    rules: HashMap<RuleKey, RuleSet>,
    products: BTreeMap<(String, String), Product>,
    discount_tiers: HashMap<String, Vec<DiscountTier>>,
    addons: HashMap<String, AddonRule>,
    categories: BTreeMap<String, CategoryInfo>,
    fees: FeeSchedule,
    rule_count: usize,
}

impl RuleCatalog {
    /// Validates the tables and builds the indices.
    ///
    /// ## Example
    /// ```rust
    /// use inkquote_core::catalog::{CatalogTables, RuleCatalog};
    /// use inkquote_core::{PricingRule, Product, TierType};
    ///
    /// let tables = CatalogTables {
    ///     products: vec![Product {
    ///         category: "SIGN".into(),
    ///         slug: "coroplast-signs".into(),
    ///         name: "Coroplast Signs".into(),
    ///         min_charge: "20".parse().unwrap(),
    ///         material_codes: vec!["MPHCC020".into()],
    ///     }],
    ///     pricing_rules: vec![PricingRule {
    ///         rule_id: "SIGN-MPHCC020-AREA".into(),
    ///         category: "SIGN".into(),
    ///         material_code: Some("MPHCC020".into()),
    ///         tier_type: TierType::PerArea,
    ///         rate: Some("8.00".parse().unwrap()),
    ///         fixed_width_in: None,
    ///         fixed_height_in: None,
    ///         fixed_price: None,
    ///     }],
    ///     ..Default::default()
    /// };
    ///
    /// let catalog = RuleCatalog::build(tables).unwrap();
    /// assert!(catalog.is_known_material("SIGN", "MPHCC020"));
    /// ```
    pub fn build(tables: CatalogTables) -> CatalogResult<Self> {
        let CatalogTables {
            products,
            pricing_rules,
            discount_tiers,
            addons,
            fees,
        } = tables;

        let rule_count = pricing_rules.len();
        let (rules, mut categories) = index_pricing_rules(pricing_rules)?;
        let products = index_products(products, &rules, &mut categories)?;

        for category in categories.keys() {
            let has_product = products.keys().any(|(c, _)| c == category);
            if !has_product {
                return Err(CatalogError::MissingProduct {
                    category: category.clone(),
                });
            }
        }

        let discount_tiers = index_discount_tiers(discount_tiers, &categories)?;
        let addons = index_addons(addons, &categories)?;
        validate_fees(&fees)?;

        Ok(RuleCatalog {
            rules,
            products,
            discount_tiers,
            addons,
            categories,
            fees,
            rule_count,
        })
    }

    // ===== Categories =====

    /// Pricing basis of a category; `None` if the category is unknown.
    pub fn basis(&self, category: &str) -> Option<PricingBasis> {
        self.categories.get(category).map(|info| info.basis)
    }

    /// Category codes in sorted order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    /// Checks whether `material` is sold in `category`.
    ///
    /// A material is known when a product lists it or a material-specific
    /// rule exists for it.
    pub fn is_known_material(&self, category: &str, material: &str) -> bool {
        self.categories
            .get(category)
            .is_some_and(|info| info.materials.contains(material))
    }

    // ===== Pricing Rules =====

    /// Rules stored under exactly this key (no wildcard fallback).
    pub fn rule_set(&self, category: &str, material: Option<&str>) -> Option<&RuleSet> {
        self.rules
            .get(&(category.to_string(), material.map(str::to_string)))
    }

    /// Checks whether the category has a wildcard (material-less) rule.
    pub fn has_wildcard(&self, category: &str) -> bool {
        self.rule_set(category, None).is_some()
    }

    /// The rate rule for a material: the specific rule, else the wildcard.
    pub fn rate_rule(&self, category: &str, material: Option<&str>) -> Option<&RateRule> {
        let specific = material
            .and_then(|m| self.rule_set(category, Some(m)))
            .and_then(|set| set.rate.as_ref());
        specific.or_else(|| self.rule_set(category, None).and_then(|set| set.rate.as_ref()))
    }

    /// Fixed sizes for a material: material-specific ones first, then the
    /// category wildcard's.
    pub fn fixed_sizes<'a>(
        &'a self,
        category: &str,
        material: Option<&str>,
    ) -> impl Iterator<Item = &'a FixedSizeRule> + 'a {
        let specific = material.and_then(|m| self.rule_set(category, Some(m)));
        let wildcard = self.rule_set(category, None);
        specific
            .into_iter()
            .chain(wildcard)
            .flat_map(|set| set.fixed_sizes.iter())
    }

    // ===== Products =====

    /// Products of a category in slug order.
    pub fn products_in<'a>(&'a self, category: &str) -> impl Iterator<Item = &'a Product> + 'a {
        let category = category.to_string();
        self.products
            .iter()
            .filter(move |((c, _), _)| *c == category)
            .map(|(_, product)| product)
    }

    /// Product by `(category, slug)`.
    pub fn product(&self, category: &str, slug: &str) -> Option<&Product> {
        self.products
            .get(&(category.to_string(), slug.trim().to_ascii_lowercase()))
    }

    /// The product whose minimum charge applies to a job.
    ///
    /// ## Lookup Order
    /// 1. `slug`, when given (unknown slug → `None`)
    /// 2. First product (slug order) that lists `material`
    /// 3. First product of the category
    pub fn product_for(&self, category: &str, slug: Option<&str>, material: Option<&str>) -> Option<&Product> {
        if let Some(slug) = slug.filter(|s| !s.trim().is_empty()) {
            return self.product(category, slug);
        }

        material
            .and_then(|m| self.products_in(category).find(|p| p.offers(m)))
            .or_else(|| self.products_in(category).next())
    }

    // ===== Discounts, Add-ons, Fees =====

    /// Discount tiers for a category, ascending by threshold.
    pub fn discount_tiers(&self, category: &str) -> &[DiscountTier] {
        self.discount_tiers
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Add-on by normalized code.
    pub fn addon(&self, code: &str) -> Option<&AddonRule> {
        self.addons.get(code)
    }

    pub fn fees(&self) -> &FeeSchedule {
        &self.fees
    }

    /// Table sizes, for load logging.
    pub fn summary(&self) -> CatalogSummary {
        CatalogSummary {
            categories: self.categories.len(),
            products: self.products.len(),
            pricing_rules: self.rule_count,
            discount_tiers: self.discount_tiers.values().map(Vec::len).sum(),
            addons: self.addons.len(),
        }
    }
}

// =============================================================================
// Index Builders
// =============================================================================

fn index_pricing_rules(
    pricing_rules: Vec<PricingRule>,
) -> CatalogResult<(HashMap<RuleKey, RuleSet>, BTreeMap<String, CategoryInfo>)> {
    let mut seen_ids = HashSet::new();
    let mut rules: HashMap<RuleKey, RuleSet> = HashMap::new();
    let mut bases: BTreeMap<String, (Option<PricingBasis>, bool)> = BTreeMap::new();

    for rule in pricing_rules {
        let rule_id = rule.rule_id.trim().to_string();
        if rule_id.is_empty() {
            return Err(CatalogError::InvalidRule {
                rule_id,
                reason: "rule_id is required".to_string(),
            });
        }
        if !seen_ids.insert(rule_id.clone()) {
            return Err(CatalogError::Duplicate {
                field: "rule_id".to_string(),
                value: rule_id,
            });
        }

        let category = normalize_code(&rule.category);
        if category.is_empty() {
            return Err(CatalogError::InvalidRule {
                rule_id,
                reason: "category is required".to_string(),
            });
        }
        let material = normalize_optional_code(rule.material_code.as_deref());
        let key = (category.clone(), material.clone());
        let entry = bases.entry(category.clone()).or_insert((None, false));

        match rule.tier_type {
            TierType::FixedSize => {
                let fixed = fixed_size_rule(&rule, rule_id, material)?;
                entry.1 = true;
                let set = rules.entry(key).or_default();
                if set
                    .fixed_sizes
                    .iter()
                    .any(|f| f.matches(fixed.width_in, fixed.height_in))
                {
                    return Err(CatalogError::InvalidRule {
                        rule_id: fixed.rule_id,
                        reason: format!(
                            "duplicate fixed size {} x {} in",
                            fixed.width_in, fixed.height_in
                        ),
                    });
                }
                set.fixed_sizes.push(fixed);
            }
            TierType::PerArea | TierType::PerUnit => {
                let basis = if rule.tier_type == TierType::PerArea {
                    PricingBasis::Area
                } else {
                    PricingBasis::Unit
                };
                match entry.0 {
                    Some(existing) if existing != basis => {
                        return Err(CatalogError::MixedPricingBasis { category });
                    }
                    _ => entry.0 = Some(basis),
                }

                let rate = rate_rule(&rule, rule_id, material.clone())?;
                let set = rules.entry(key).or_default();
                if let Some(existing) = &set.rate {
                    return Err(CatalogError::DuplicateRate {
                        category,
                        material: material.unwrap_or_else(|| "*".to_string()),
                        first: existing.rule_id.clone(),
                        second: rate.rule_id,
                    });
                }
                set.rate = Some(rate);
            }
        }
    }

    let mut categories = BTreeMap::new();
    for (category, (basis, has_fixed)) in bases {
        // Fixed sizes imply a piece with dimensions.
        let basis = basis.unwrap_or(PricingBasis::Area);
        if basis == PricingBasis::Unit && has_fixed {
            return Err(CatalogError::MixedPricingBasis { category });
        }
        let materials = rules
            .keys()
            .filter(|(c, _)| *c == category)
            .filter_map(|(_, m)| m.clone())
            .collect();
        categories.insert(category, CategoryInfo { basis, materials });
    }

    Ok((rules, categories))
}

fn rate_rule(rule: &PricingRule, rule_id: String, material_code: Option<String>) -> CatalogResult<RateRule> {
    let rate = match rule.rate {
        Some(rate) if !rate.is_negative() => rate,
        Some(_) => {
            return Err(CatalogError::InvalidRule {
                rule_id,
                reason: "rate cannot be negative".to_string(),
            })
        }
        None => {
            return Err(CatalogError::InvalidRule {
                rule_id,
                reason: "rate is required for PER_AREA / PER_UNIT rules".to_string(),
            })
        }
    };

    if rule.fixed_price.is_some() || rule.fixed_width_in.is_some() || rule.fixed_height_in.is_some() {
        return Err(CatalogError::InvalidRule {
            rule_id,
            reason: "fixed size columns are only allowed on FIXED_SIZE rules".to_string(),
        });
    }

    Ok(RateRule {
        rule_id,
        material_code,
        rate,
    })
}

fn fixed_size_rule(
    rule: &PricingRule,
    rule_id: String,
    material_code: Option<String>,
) -> CatalogResult<FixedSizeRule> {
    let positive = |value: Option<f64>| value.filter(|v| v.is_finite() && *v > 0.0);

    let (Some(width_in), Some(height_in)) = (positive(rule.fixed_width_in), positive(rule.fixed_height_in)) else {
        return Err(CatalogError::InvalidRule {
            rule_id,
            reason: "FIXED_SIZE rules need a positive width and height".to_string(),
        });
    };

    let Some(price) = rule.fixed_price.filter(|p| p.cents() > 0) else {
        return Err(CatalogError::InvalidRule {
            rule_id,
            reason: "FIXED_SIZE rules need a positive fixed_price".to_string(),
        });
    };

    if rule.rate.is_some() {
        return Err(CatalogError::InvalidRule {
            rule_id,
            reason: "FIXED_SIZE rules cannot also set a rate".to_string(),
        });
    }

    Ok(FixedSizeRule {
        rule_id,
        material_code,
        width_in,
        height_in,
        price,
    })
}

fn index_products(
    products: Vec<Product>,
    rules: &HashMap<RuleKey, RuleSet>,
    categories: &mut BTreeMap<String, CategoryInfo>,
) -> CatalogResult<BTreeMap<(String, String), Product>> {
    let mut indexed = BTreeMap::new();

    for product in products {
        let category = normalize_code(&product.category);
        let slug = product.slug.trim().to_ascii_lowercase();
        if slug.is_empty() {
            return Err(CatalogError::InvalidProduct {
                slug,
                reason: "slug is required".to_string(),
            });
        }
        if product.min_charge.is_negative() {
            return Err(CatalogError::InvalidProduct {
                slug,
                reason: "min_charge cannot be negative".to_string(),
            });
        }

        let Some(info) = categories.get_mut(&category) else {
            return Err(CatalogError::MissingPricingRule {
                category,
                referenced_by: format!("product {slug}"),
            });
        };

        let wildcard = rules.contains_key(&(category.clone(), None));
        let mut material_codes = Vec::with_capacity(product.material_codes.len());
        for material in product.material_codes.iter().filter_map(|m| normalize_optional_code(Some(m.as_str()))) {
            let specific = rules.contains_key(&(category.clone(), Some(material.clone())));
            if !specific && !wildcard {
                return Err(CatalogError::UnpricedMaterial {
                    category,
                    slug,
                    material,
                });
            }
            info.materials.insert(material.clone());
            material_codes.push(material);
        }

        let key = (category.clone(), slug.clone());
        match indexed.entry(key) {
            btree_map::Entry::Occupied(_) => {
                return Err(CatalogError::Duplicate {
                    field: "product".to_string(),
                    value: format!("{category}/{slug}"),
                });
            }
            btree_map::Entry::Vacant(slot) => {
                slot.insert(Product {
                    category,
                    slug,
                    name: product.name.trim().to_string(),
                    min_charge: product.min_charge,
                    material_codes,
                });
            }
        }
    }

    Ok(indexed)
}

fn index_discount_tiers(
    tiers: Vec<DiscountTier>,
    categories: &BTreeMap<String, CategoryInfo>,
) -> CatalogResult<HashMap<String, Vec<DiscountTier>>> {
    let mut grouped: HashMap<String, Vec<DiscountTier>> = HashMap::new();

    for mut tier in tiers {
        tier.category = normalize_code(&tier.category);
        if !categories.contains_key(&tier.category) {
            return Err(CatalogError::MissingPricingRule {
                category: tier.category,
                referenced_by: "discount tiers".to_string(),
            });
        }
        grouped.entry(tier.category.clone()).or_default().push(tier);
    }

    for (category, tiers) in grouped.iter_mut() {
        tiers.sort_by(|a, b| a.threshold_value.total_cmp(&b.threshold_value));
        validate_tier_ladder(category, tiers)?;
    }

    Ok(grouped)
}

fn validate_tier_ladder(category: &str, tiers: &[DiscountTier]) -> CatalogResult<()> {
    let invalid = |reason: String| CatalogError::InvalidDiscountTiers {
        category: category.to_string(),
        reason,
    };

    let threshold_type: Option<ThresholdType> = tiers.first().map(|t| t.threshold_type);
    for tier in tiers {
        if Some(tier.threshold_type) != threshold_type {
            return Err(invalid("tiers mix AREA and QTY thresholds".to_string()));
        }
        if !tier.threshold_value.is_finite() || tier.threshold_value <= 0.0 {
            return Err(invalid(format!(
                "threshold {} must be a positive number",
                tier.threshold_value
            )));
        }
        if tier.discount_bps == 0 || tier.discount_bps >= 10_000 {
            return Err(invalid(format!(
                "discount {}% must be between 0 and 100",
                tier.discount_pct()
            )));
        }
    }

    for pair in tiers.windows(2) {
        let (lower, upper) = (&pair[0], &pair[1]);
        if upper.threshold_value <= lower.threshold_value {
            return Err(invalid(format!(
                "threshold {} appears more than once",
                upper.threshold_value
            )));
        }
        if upper.discount_bps <= lower.discount_bps {
            return Err(invalid(format!(
                "discount at threshold {} is not larger than at {}",
                upper.threshold_value, lower.threshold_value
            )));
        }
    }

    Ok(())
}

fn index_addons(
    addons: Vec<AddonRule>,
    categories: &BTreeMap<String, CategoryInfo>,
) -> CatalogResult<HashMap<String, AddonRule>> {
    let mut indexed = HashMap::new();

    for addon in addons {
        let code = normalize_code(&addon.code);
        if code.is_empty() {
            return Err(CatalogError::InvalidAddon {
                code,
                reason: "code is required".to_string(),
            });
        }
        if addon.unit_price.is_negative() {
            return Err(CatalogError::InvalidAddon {
                code,
                reason: "unit_price cannot be negative".to_string(),
            });
        }

        let applicable_categories: BTreeSet<String> = addon
            .applicable_categories
            .iter()
            .filter_map(|c| normalize_optional_code(Some(c.as_str())))
            .collect();
        if applicable_categories.is_empty() {
            return Err(CatalogError::InvalidAddon {
                code,
                reason: "no applicable categories".to_string(),
            });
        }
        if let Some(missing) = applicable_categories.iter().find(|c| !categories.contains_key(*c)) {
            return Err(CatalogError::MissingPricingRule {
                category: missing.clone(),
                referenced_by: format!("add-on {code}"),
            });
        }

        let rule = AddonRule {
            code: code.clone(),
            name: addon.name.trim().to_string(),
            unit_price: addon.unit_price,
            applicable_categories,
        };
        if indexed.insert(code.clone(), rule).is_some() {
            return Err(CatalogError::Duplicate {
                field: "add-on code".to_string(),
                value: code,
            });
        }
    }

    Ok(indexed)
}

fn validate_fees(fees: &FeeSchedule) -> CatalogResult<()> {
    match fees.entries().into_iter().find(|(_, amount)| amount.is_negative()) {
        Some((code, _)) => Err(CatalogError::InvalidFee {
            code: code.to_string(),
            reason: "amount cannot be negative".to_string(),
        }),
        None => Ok(()),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn rate(rule_id: &str, category: &str, material: Option<&str>, tier_type: TierType, rate: &str) -> PricingRule {
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

    fn fixed(rule_id: &str, category: &str, material: Option<&str>, w: f64, h: f64, price: &str) -> PricingRule {
        PricingRule {
            rule_id: rule_id.to_string(),
            category: category.to_string(),
            material_code: material.map(str::to_string),
            tier_type: TierType::FixedSize,
            rate: None,
            fixed_width_in: Some(w),
            fixed_height_in: Some(h),
            fixed_price: Some(price.parse().unwrap()),
        }
    }

    fn product(category: &str, slug: &str, min: &str, materials: &[&str]) -> Product {
        Product {
            category: category.to_string(),
            slug: slug.to_string(),
            name: slug.replace('-', " "),
            min_charge: min.parse().unwrap(),
            material_codes: materials.iter().map(|m| m.to_string()).collect(),
        }
    }

    fn tier(category: &str, threshold_type: ThresholdType, value: f64, bps: u32) -> DiscountTier {
        DiscountTier {
            category: category.to_string(),
            threshold_type,
            threshold_value: value,
            discount_bps: bps,
        }
    }

    fn sign_tables() -> CatalogTables {
        CatalogTables {
            products: vec![product("sign", "coroplast-signs", "20", &["mphcc020", "MPHCC040"])],
            pricing_rules: vec![
                rate("S1", "SIGN", Some("MPHCC020"), TierType::PerArea, "8.00"),
                fixed("S2", "SIGN", Some("MPHCC020"), 48.0, 96.0, "232.00"),
                rate("S3", "SIGN", Some("MPHCC040"), TierType::PerArea, "10.50"),
            ],
            discount_tiers: vec![
                tier("SIGN", ThresholdType::Qty, 10.0, 1700),
                tier("SIGN", ThresholdType::Qty, 5.0, 800),
            ],
            addons: vec![AddonRule {
                code: "h_stake".to_string(),
                name: "H-stake".to_string(),
                unit_price: "2.50".parse().unwrap(),
                applicable_categories: ["sign".to_string()].into_iter().collect(),
            }],
            fees: FeeSchedule::default(),
        }
    }

    #[test]
    fn test_build_normalizes_and_indexes() {
        let catalog = RuleCatalog::build(sign_tables()).unwrap();

        assert_eq!(catalog.basis("SIGN"), Some(PricingBasis::Area));
        assert!(catalog.is_known_material("SIGN", "MPHCC020"));
        assert!(!catalog.is_known_material("SIGN", "NOPE"));
        assert!(catalog.addon("H_STAKE").is_some());
        assert_eq!(catalog.rate_rule("SIGN", Some("MPHCC040")).unwrap().rule_id, "S3");
        assert_eq!(catalog.fixed_sizes("SIGN", Some("MPHCC020")).count(), 1);

        let tiers = catalog.discount_tiers("SIGN");
        assert_eq!(tiers[0].discount_bps, 800);
        assert_eq!(tiers[1].discount_bps, 1700);
        assert!(catalog.discount_tiers("BANNER").is_empty());

        let summary = catalog.summary();
        assert_eq!(summary.categories, 1);
        assert_eq!(summary.pricing_rules, 3);
        assert_eq!(summary.discount_tiers, 2);
    }

    #[test]
    fn test_wildcard_fallback() {
        let mut tables = sign_tables();
        tables.pricing_rules.push(rate("B1", "BANNER", None, TierType::PerArea, "6.25"));
        tables.pricing_rules.push(rate("B2", "BANNER", Some("RMBF010"), TierType::PerArea, "7.50"));
        tables.products.push(product("BANNER", "vinyl-banners", "35", &["RMBF004", "RMBF010"]));
        let catalog = RuleCatalog::build(tables).unwrap();

        assert_eq!(catalog.rate_rule("BANNER", Some("RMBF004")).unwrap().rule_id, "B1");
        assert_eq!(catalog.rate_rule("BANNER", Some("RMBF010")).unwrap().rule_id, "B2");
        assert_eq!(catalog.rate_rule("BANNER", None).unwrap().rule_id, "B1");
        assert!(catalog.has_wildcard("BANNER"));
        assert!(!catalog.has_wildcard("SIGN"));
    }

    #[test]
    fn test_product_lookup_order() {
        let mut tables = sign_tables();
        tables.products.push(product("SIGN", "a-frame-inserts", "15", &["MPHCC040"]));
        let catalog = RuleCatalog::build(tables).unwrap();

        assert_eq!(catalog.product_for("SIGN", None, Some("MPHCC020")).unwrap().slug, "coroplast-signs");
        assert_eq!(catalog.product_for("SIGN", None, Some("MPHCC040")).unwrap().slug, "a-frame-inserts");
        assert_eq!(catalog.product_for("SIGN", Some("Coroplast-Signs"), None).unwrap().slug, "coroplast-signs");
        assert!(catalog.product_for("SIGN", Some("nope"), None).is_none());
        assert_eq!(catalog.product_for("SIGN", None, None).unwrap().slug, "a-frame-inserts");
    }

    #[test]
    fn test_products_in_outlives_category_argument() {
        let mut tables = sign_tables();
        tables.products.push(product("SIGN", "a-frame-inserts", "15", &["MPHCC040"]));
        let catalog = RuleCatalog::build(tables).unwrap();

        let products = {
            let category = format!("{}{}", "SI", "GN");
            catalog.products_in(&category)
        };
        let slugs: Vec<&str> = products.map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["a-frame-inserts", "coroplast-signs"]);
    }

    #[test]
    fn test_product_without_rule_is_fatal() {
        let mut tables = sign_tables();
        tables.products.push(product("MAGNET", "car-magnets", "30", &["MAG1"]));
        let err = RuleCatalog::build(tables).unwrap_err();
        assert!(matches!(err, CatalogError::MissingPricingRule { ref category, .. } if category == "MAGNET"));
    }

    #[test]
    fn test_rule_without_product_is_fatal() {
        let mut tables = sign_tables();
        tables.pricing_rules.push(rate("M1", "MAGNET", None, TierType::PerArea, "12"));
        assert_eq!(
            RuleCatalog::build(tables).unwrap_err(),
            CatalogError::MissingProduct {
                category: "MAGNET".to_string()
            }
        );
    }

    #[test]
    fn test_unpriced_material_is_fatal() {
        let mut tables = sign_tables();
        tables.products[0].material_codes.push("MPHCC999".to_string());
        assert!(matches!(
            RuleCatalog::build(tables).unwrap_err(),
            CatalogError::UnpricedMaterial { .. }
        ));
    }

    #[test]
    fn test_duplicate_rate_is_fatal() {
        let mut tables = sign_tables();
        tables.pricing_rules.push(rate("S9", "SIGN", Some("MPHCC020"), TierType::PerArea, "9"));
        assert!(matches!(
            RuleCatalog::build(tables).unwrap_err(),
            CatalogError::DuplicateRate { .. }
        ));
    }

    #[test]
    fn test_duplicate_rule_id_is_fatal() {
        let mut tables = sign_tables();
        tables.pricing_rules.push(fixed("S1", "SIGN", Some("MPHCC040"), 24.0, 36.0, "40"));
        assert!(matches!(
            RuleCatalog::build(tables).unwrap_err(),
            CatalogError::Duplicate { .. }
        ));
    }

    #[test]
    fn test_mixed_basis_is_fatal() {
        let mut tables = sign_tables();
        tables.pricing_rules.push(rate("S9", "SIGN", None, TierType::PerUnit, "1"));
        assert!(matches!(
            RuleCatalog::build(tables).unwrap_err(),
            CatalogError::MixedPricingBasis { .. }
        ));
    }

    #[test]
    fn test_fixed_rule_needs_price() {
        let mut tables = sign_tables();
        let mut broken = fixed("S9", "SIGN", Some("MPHCC040"), 24.0, 36.0, "40");
        broken.fixed_price = None;
        tables.pricing_rules.push(broken);
        assert!(matches!(
            RuleCatalog::build(tables).unwrap_err(),
            CatalogError::InvalidRule { ref rule_id, .. } if rule_id == "S9"
        ));
    }

    #[test]
    fn test_tier_ladder_must_increase() {
        let mut tables = sign_tables();
        tables.discount_tiers = vec![
            tier("SIGN", ThresholdType::Qty, 5.0, 800),
            tier("SIGN", ThresholdType::Qty, 10.0, 500),
        ];
        assert!(matches!(
            RuleCatalog::build(tables).unwrap_err(),
            CatalogError::InvalidDiscountTiers { .. }
        ));

        let mut tables = sign_tables();
        tables.discount_tiers = vec![
            tier("SIGN", ThresholdType::Qty, 5.0, 800),
            tier("SIGN", ThresholdType::Area, 10.0, 1700),
        ];
        assert!(RuleCatalog::build(tables).is_err());
    }

    #[test]
    fn test_addon_for_unknown_category_is_fatal() {
        let mut tables = sign_tables();
        tables.addons[0].applicable_categories.insert("BOAT".to_string());
        assert!(matches!(
            RuleCatalog::build(tables).unwrap_err(),
            CatalogError::MissingPricingRule { ref category, .. } if category == "BOAT"
        ));
    }

    #[test]
    fn test_negative_fee_is_fatal() {
        let mut tables = sign_tables();
        tables.fees.rush = Money::from_cents(-1);
        assert!(matches!(
            RuleCatalog::build(tables).unwrap_err(),
            CatalogError::InvalidFee { ref code, .. } if code == "RUSH"
        ));
    }
}
