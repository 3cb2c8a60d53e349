//! # inkquote-core: Pure Pricing Logic for InkQuote
//!
//! This crate is the **heart** of InkQuote. It turns a print-job
//! configuration into an exact price, or into a refusal explaining what is
//! missing, as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        InkQuote Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │   Estimator page   Cart/checkout   Staff tool   Quote emails    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ POST /estimate                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                apps/estimate-api (Axum)                         │   │
//! │  │    config, catalog snapshot, routes, BLOCKED envelope           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ inkquote-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  catalog  │  │  pricing  │  │   │
//! │  │   │  Request  │  │   Money   │  │ RuleSet   │  │  tiers    │  │   │
//! │  │   │  Quote    │  │   Rate    │  │ indices   │  │  pipeline │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO CLOCK • NO GLOBALS • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                ▲                                        │
//! │  ┌─────────────────────────────┴───────────────────────────────────┐   │
//! │  │                inkquote-rules (CSV rule tables)                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Rule rows, `EstimateRequest`, `EstimateResponse`
//! - [`money`] - Money and Rate with integer arithmetic (no floating point!)
//! - [`error`] - Catalog, estimate and validation errors
//! - [`validation`] - Field checks and code normalization
//! - [`catalog`] - The immutable, indexed rule catalog
//! - [`pricing`] - The per-request pipeline
//! - [`totals`] - Cart/checkout order totals
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same catalog + same request = same response
//! 2. **Explicit Catalog**: the catalog is a parameter, never global state
//! 3. **Integer Money**: cents, ten-thousandths and basis points
//! 4. **One Refusal Channel**: bad input is BLOCKED, never a panic
//!
//! ## Example Usage
//!
//! ```rust
//! use inkquote_core::money::Money;
//! use inkquote_core::types::TaxRate;
//!
//! let sell_price = Money::from_cents(23200); // $232.00
//! let tax = sell_price.calculate_tax(inkquote_core::SALES_TAX_RATE);
//!
//! assert_eq!(tax.cents(), 1160);
//! assert_eq!(TaxRate::default().bps(), 500);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod money;
pub mod pricing;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use catalog::{CatalogTables, RuleCatalog};
pub use error::{Blocked, CatalogError, EstimateError, ValidationError};
pub use money::{Money, Rate};
pub use pricing::{estimate, FeeSchedule, TaxBreakdown};
pub use totals::{order_totals, OrderRequest, OrderResponse, OrderTotals};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Flat sales tax applied to every quote (5%).
pub const SALES_TAX_RATE: TaxRate = TaxRate::from_bps(500);

/// Largest quantity a single estimate accepts.
///
/// ## Business Reason
/// Catches typos (100000 instead of 1000) before they become a quote.
pub const MAX_JOB_QUANTITY: i64 = 100_000;

/// Longest side, in inches, of an area-priced piece (100 ft).
pub const MAX_DIMENSION_IN: f64 = 1_200.0;

/// Largest number of lines priced in one order.
pub const MAX_ORDER_ITEMS: usize = 100;

/// Rate multiplier for a single-sided piece (1×).
pub const SINGLE_SIDED_MULTIPLIER_BPS: u32 = 10_000;

/// Rate multiplier for a double-sided piece (1.5×, not a flat doubling).
pub const DOUBLE_SIDED_MULTIPLIER_BPS: u32 = 15_000;

/// Square inches in a square foot.
pub const SQ_IN_PER_SQFT: f64 = 144.0;
