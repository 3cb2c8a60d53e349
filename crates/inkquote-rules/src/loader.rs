//! # Rule Directory Loader
//!
//! Reads the CSV tables from a directory and builds a [`RuleCatalog`].
//!
//! ## Directory Layout
//! ```text
//! rules/
//! ├── products.csv         category,slug,name,min_charge,material_codes
//! ├── pricing_rules.csv    rule_id,category,material_code,tier_type,rate,
//! │                        fixed_width_in,fixed_height_in,fixed_price
//! ├── discount_tiers.csv   category,threshold_type,threshold_value,discount_pct
//! ├── addons.csv           code,name,unit_price,applicable_categories
//! └── fees.csv (optional)  kind,code,amount
//! ```
//!
//! ## Usage
//! ```rust,no_run
//! use inkquote_rules::RuleDirectory;
//!
//! let catalog = RuleDirectory::new("rules").load_catalog().unwrap();
//! println!("{:?}", catalog.summary());
//! ```

use std::fs::File;
use std::path::{Path, PathBuf};

use inkquote_core::{
    AddonRule, CatalogTables, DiscountTier, FeeSchedule, PricingRule, Product, RuleCatalog,
    ValidationError,
};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::error::{RulesError, RulesResult};
use crate::rows::{apply_fee_row, AddonRow, DiscountTierRow, FeeRow, PricingRuleRow, ProductRow};

pub const PRODUCTS_FILE: &str = "products.csv";
pub const PRICING_RULES_FILE: &str = "pricing_rules.csv";
pub const DISCOUNT_TIERS_FILE: &str = "discount_tiers.csv";
pub const ADDONS_FILE: &str = "addons.csv";
pub const FEES_FILE: &str = "fees.csv";

/// A directory holding the rule tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleDirectory {
    path: PathBuf,
}

impl RuleDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        RuleDirectory { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every table without cross-checking them.
    pub fn load_tables(&self) -> RulesResult<CatalogTables> {
        info!(dir = %self.path.display(), "Loading rule tables");

        let products: Vec<Product> = self.read_required::<ProductRow, _>(PRODUCTS_FILE)?;
        let pricing_rules: Vec<PricingRule> = self.read_required::<PricingRuleRow, _>(PRICING_RULES_FILE)?;
        let discount_tiers: Vec<DiscountTier> = self.read_required::<DiscountTierRow, _>(DISCOUNT_TIERS_FILE)?;
        let addons: Vec<AddonRule> = self.read_required::<AddonRow, _>(ADDONS_FILE)?;
        let fees = self.read_fees()?;

        Ok(CatalogTables {
            products,
            pricing_rules,
            discount_tiers,
            addons,
            fees,
        })
    }

    /// Reads the tables and builds the catalog.
    ///
    /// ## Returns
    /// * `Ok(RuleCatalog)` - consistent catalog, ready to price
    /// * `Err(RulesError)` - unreadable file, bad row, or inconsistent tables
    pub fn load_catalog(&self) -> RulesResult<RuleCatalog> {
        let tables = self.load_tables()?;
        let catalog = RuleCatalog::build(tables)?;

        let summary = catalog.summary();
        info!(
            categories = summary.categories,
            products = summary.products,
            pricing_rules = summary.pricing_rules,
            discount_tiers = summary.discount_tiers,
            addons = summary.addons,
            "Rule catalog built"
        );

        Ok(catalog)
    }

    fn read_required<R, T>(&self, file_name: &str) -> RulesResult<Vec<T>>
    where
        R: DeserializeOwned,
        T: TryFrom<R, Error = ValidationError>,
    {
        let path = self.path.join(file_name);
        if !path.is_file() {
            return Err(RulesError::MissingFile(path));
        }

        read_records::<R>(&path, file_name)?
            .into_iter()
            .map(|(line, raw)| {
                T::try_from(raw).map_err(|e| RulesError::invalid_row(file_name, line, e.to_string()))
            })
            .collect()
    }

    fn read_fees(&self) -> RulesResult<FeeSchedule> {
        let mut schedule = FeeSchedule::default();
        let path = self.path.join(FEES_FILE);
        if !path.is_file() {
            debug!("No fee table, using default fees");
            return Ok(schedule);
        }

        for (line, row) in read_records::<FeeRow>(&path, FEES_FILE)? {
            apply_fee_row(&mut schedule, row)
                .map_err(|e| RulesError::invalid_row(FEES_FILE, line, e.to_string()))?;
        }
        Ok(schedule)
    }
}

/// Reads a headed CSV file into rows tagged with their 1-based line.
///
/// Cells are trimmed and `#` lines are skipped.
fn read_records<R: DeserializeOwned>(path: &Path, file_name: &str) -> RulesResult<Vec<(u64, R)>> {
    let file = File::open(path).map_err(|source| RulesError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| csv_error(file_name, &e))?
        .clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| csv_error(file_name, &e))?;
        let line = record.position().map_or(0, |p| p.line());

        let raw: R = record
            .deserialize(Some(&headers))
            .map_err(|e| RulesError::invalid_row(file_name, line, deserialize_reason(&e)))?;
        rows.push((line, raw));
    }

    debug!(file = file_name, rows = rows.len(), "Read rule table");
    Ok(rows)
}

fn csv_error(file_name: &str, err: &csv::Error) -> RulesError {
    RulesError::Csv {
        file: file_name.to_string(),
        line: err.position().map_or(0, |p| p.line()),
        message: err.to_string(),
    }
}

fn deserialize_reason(err: &csv::Error) -> String {
    match err.kind() {
        csv::ErrorKind::Deserialize { err, .. } => err.to_string(),
        _ => err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_required_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = RuleDirectory::new(dir.path()).load_tables().unwrap_err();
        assert!(matches!(err, RulesError::MissingFile(ref p) if p.ends_with(PRODUCTS_FILE)));
    }
}
