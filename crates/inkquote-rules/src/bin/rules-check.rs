//! # Rule Directory Check
//!
//! Validates a rule directory the same way the estimate service does at
//! startup, so broken tables are caught before they are deployed.
//!
//! ## Usage
//! ```bash
//! # Check the bundled rules
//! cargo run -p inkquote-rules --bin rules-check
//!
//! # Check another directory
//! cargo run -p inkquote-rules --bin rules-check -- --dir ./staging-rules
//! ```
//!
//! Exits non-zero (with the file and line of the problem) when the tables
//! cannot be loaded.

use std::env;

use anyhow::{bail, Context, Result};
use inkquote_rules::RuleDirectory;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let args: Vec<String> = env::args().collect();
    let mut dir = String::from("./rules");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--dir" | "-d" => {
                let Some(value) = args.get(i + 1) else {
                    bail!("--dir needs a path");
                };
                dir = value.clone();
                i += 1;
            }
            "--help" | "-h" => {
                println!("Usage: rules-check [--dir <rules directory>]");
                return Ok(());
            }
            other => bail!("Unknown argument: {other}"),
        }
        i += 1;
    }

    let directory = RuleDirectory::new(&dir);
    let catalog = directory
        .load_catalog()
        .with_context(|| format!("Rule directory {dir} is not deployable"))?;

    let summary = catalog.summary();
    for category in catalog.categories() {
        info!(
            category,
            tiers = catalog.discount_tiers(category).len(),
            products = catalog.products_in(category).count(),
            "Category OK"
        );
    }

    println!(
        "{}: {} categories, {} products, {} pricing rules, {} discount tiers, {} add-ons",
        directory.path().display(),
        summary.categories,
        summary.products,
        summary.pricing_rules,
        summary.discount_tiers,
        summary.addons
    );
    Ok(())
}
