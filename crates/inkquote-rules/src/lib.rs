//! # inkquote-rules: Rule Data Source for InkQuote
//!
//! Reads the production rule tables (CSV) and turns them into an
//! [`inkquote_core::RuleCatalog`].
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   rules/*.csv ──► inkquote-rules (THIS CRATE) ──► RuleCatalog           │
//! │                    │                                  │                 │
//! │                    │ rows.rs    exact decimal cells   │                 │
//! │                    │ loader.rs  file + line errors    ▼                 │
//! │                    │                          estimate-api snapshot     │
//! │                    └── bin/rules-check.rs (pre-deploy validation)       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`loader`] - Directory reader and catalog construction
//! - [`rows`] - CSV row types and conversions
//! - [`error`] - Rule source error types

pub mod error;
pub mod loader;
pub mod rows;

pub use error::{RulesError, RulesResult};
pub use loader::RuleDirectory;

/// Loads and validates the catalog in `dir`.
pub fn load_catalog(dir: impl Into<std::path::PathBuf>) -> RulesResult<inkquote_core::RuleCatalog> {
    RuleDirectory::new(dir).load_catalog()
}
