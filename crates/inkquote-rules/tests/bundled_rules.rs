//! Prices the reference jobs against the rule tables shipped in `rules/`,
//! and checks that broken tables are reported with their location.

use std::fs;
use std::path::{Path, PathBuf};

use inkquote_core::{estimate, EstimateRequest, EstimateResponse, RuleCatalog, TierApplied};
use inkquote_rules::{RuleDirectory, RulesError};

fn bundled_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../rules")
}

fn bundled() -> RuleCatalog {
    RuleDirectory::new(bundled_dir()).load_catalog().unwrap()
}

fn quoted(response: EstimateResponse) -> inkquote_core::Quote {
    match response {
        EstimateResponse::Quoted(quote) => quote,
        EstimateResponse::Blocked { clarification_notes } => {
            panic!("expected a quote, got {clarification_notes:?}")
        }
    }
}

#[test]
fn test_bundled_rules_load() {
    let summary = bundled().summary();
    assert_eq!(summary.categories, 4);
    assert_eq!(summary.products, 4);
    assert_eq!(summary.pricing_rules, 8);
    assert_eq!(summary.discount_tiers, 8);
    assert_eq!(summary.addons, 4);
}

#[test]
fn test_single_sign() {
    let quote = quoted(estimate(&bundled(), &EstimateRequest::new("SIGN", Some("MPHCC020"), 18.0, 24.0)));
    assert_eq!(quote.sell_price.cents(), 2400);
    assert_eq!(quote.tier_applied, TierApplied::PerSqft);
    assert!(!quote.qty_discount_applied);
}

#[test]
fn test_five_signs_get_volume_discount() {
    let request = EstimateRequest::new("SIGN", Some("MPHCC020"), 18.0, 24.0).with_qty(5);
    let quote = quoted(estimate(&bundled(), &request));
    assert!(quote.qty_discount_applied);
    assert_eq!(quote.qty_discount_pct, Some(8.0));
    assert_eq!(quote.sell_price.cents(), 11040);
}

#[test]
fn test_stake_adds_to_price() {
    let catalog = bundled();
    let plain = quoted(estimate(&catalog, &EstimateRequest::new("SIGN", Some("MPHCC020"), 18.0, 24.0)));
    let staked = quoted(estimate(
        &catalog,
        &EstimateRequest::new("SIGN", Some("MPHCC020"), 18.0, 24.0).with_addon("h_stake", 1),
    ));

    assert!(staked.sell_price > plain.sell_price);
    assert_eq!(staked.line_items.len(), 2);
    assert_eq!(staked.line_items[1].rule_id, "H_STAKE");
}

#[test]
fn test_magnet_discount_steps() {
    let catalog = bundled();
    let five = quoted(estimate(
        &catalog,
        &EstimateRequest::new("MAGNET", Some("MAG302437550M"), 12.0, 18.0).with_qty(5),
    ));
    assert_eq!(five.qty_discount_pct, Some(5.0));
    assert_eq!(five.sell_price.cents(), 8550);

    let ten = quoted(estimate(
        &catalog,
        &EstimateRequest::new("MAGNET", Some("MAG302437550M"), 12.0, 18.0).with_qty(10),
    ));
    assert_eq!(ten.qty_discount_pct, Some(10.0));
    assert_eq!(ten.sell_price.cents(), 16200);
}

#[test]
fn test_full_sheet_uses_fixed_price() {
    let catalog = bundled();
    let sheet = quoted(estimate(&catalog, &EstimateRequest::new("SIGN", Some("MPHCC020"), 48.0, 96.0)));
    assert_eq!(sheet.tier_applied, TierApplied::FixedSize);
    assert_eq!(sheet.sell_price.cents(), 23200);
    assert_eq!(sheet.line_items[0].rule_id, "SIGN-MPHCC020-4X8");

    // One inch short of the sheet is priced by area.
    let short = quoted(estimate(&catalog, &EstimateRequest::new("SIGN", Some("MPHCC020"), 47.0, 96.0)));
    assert_eq!(short.tier_applied, TierApplied::PerSqft);
    assert_eq!(short.sell_price.cents(), 25067);
}

#[test]
fn test_unknown_material_is_blocked() {
    let response = estimate(&bundled(), &EstimateRequest::new("SIGN", Some("NOPE123"), 18.0, 24.0));
    assert!(!response.is_quoted());
    assert!(response.notes().iter().any(|note| note.contains("SIGN")));
    assert!(response.notes().iter().any(|note| note.contains("NOPE123")));
}

#[test]
fn test_banner_wildcard_rate() {
    // 24 x 36 in = 6 sqft at the wildcard $6.25; below the 8 sqft tier at any qty.
    let request = EstimateRequest::new("BANNER", None, 24.0, 36.0).with_qty(2);
    let quote = quoted(estimate(&bundled(), &request));
    assert_eq!(quote.line_items[0].rule_id, "BANNER-SQFT");
    assert_eq!(quote.qty_discount_pct, None);
    assert_eq!(quote.sell_price.cents(), 7500);
}

#[test]
fn test_banner_area_tier_uses_piece_area() {
    let catalog = bundled();

    // 24 x 48 in = 8 sqft per piece: the 8 sqft tier, not 32 sqft of total area.
    let request = EstimateRequest::new("BANNER", Some("RMBF010"), 24.0, 48.0).with_qty(4);
    let quote = quoted(estimate(&catalog, &request));
    assert_eq!(quote.qty_discount_pct, Some(5.0));
    // 4 × $60.00 = $240.00, less 5% = $228.00
    assert_eq!(quote.sell_price.cents(), 22800);

    // 1 sqft pieces never reach a tier, however many are ordered.
    let request = EstimateRequest::new("BANNER", None, 12.0, 12.0).with_qty(8);
    let quote = quoted(estimate(&catalog, &request));
    assert!(!quote.qty_discount_applied);
    assert_eq!(quote.sell_price.cents(), 5000);
}

#[test]
fn test_business_cards_priced_per_unit() {
    let request = EstimateRequest::new("BUSINESS_CARD", Some("PLC14PT"), 3.5, 2.0)
        .with_qty(500)
        .with_sides(2);
    let quote = quoted(estimate(&bundled(), &request));
    // 500 × $0.08 × 1.5 = $60.00, less 5% = $57.00
    assert_eq!(quote.tier_applied, TierApplied::PerUnit);
    assert_eq!(quote.area_sqft, None);
    assert_eq!(quote.sell_price.cents(), 5700);
}

// =============================================================================
// Broken Tables
// =============================================================================

/// Copies the bundled tables into a scratch directory.
fn scratch_copy() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for entry in fs::read_dir(bundled_dir()).unwrap() {
        let entry = entry.unwrap();
        fs::copy(entry.path(), dir.path().join(entry.file_name())).unwrap();
    }
    dir
}

#[test]
fn test_bad_cell_reports_file_and_line() {
    let dir = scratch_copy();
    let path = dir.path().join("pricing_rules.csv");
    let contents = fs::read_to_string(&path).unwrap().replace("10.50", "ten fifty");
    fs::write(&path, contents).unwrap();

    let err = RuleDirectory::new(dir.path()).load_catalog().unwrap_err();
    match err {
        RulesError::InvalidRow { file, line, .. } => {
            assert_eq!(file, "pricing_rules.csv");
            assert_eq!(line, 4);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_inconsistent_tables_rejected() {
    let dir = scratch_copy();
    let path = dir.path().join("products.csv");
    let mut contents = fs::read_to_string(&path).unwrap();
    contents.push_str("POSTER,posters,Posters,15.00,GLOSS100\n");
    fs::write(&path, contents).unwrap();

    let err = RuleDirectory::new(dir.path()).load_catalog().unwrap_err();
    assert!(matches!(err, RulesError::Catalog(_)), "unexpected error: {err}");
}

#[test]
fn test_missing_fee_table_uses_defaults() {
    let dir = scratch_copy();
    fs::remove_file(dir.path().join("fees.csv")).unwrap();

    let catalog = RuleDirectory::new(dir.path()).load_catalog().unwrap();
    assert_eq!(catalog.fees().rush.cents(), 4000);
    assert_eq!(catalog.fees().logo_recreation.cents(), 7500);
}
