//! # Error Types
//!
//! Domain-specific error types for inkquote-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  inkquote-core errors (this file)                                      │
//! │  ├── CatalogError     - Corrupt rule tables (FATAL, startup only)      │
//! │  ├── EstimateError    - Unpriceable request (→ BLOCKED note)           │
//! │  └── ValidationError  - Malformed field values (parsing)               │
//! │                                                                         │
//! │  inkquote-rules errors (separate crate)                                │
//! │  └── RulesError       - File / CSV / row failures                      │
//! │                                                                         │
//! │  estimate-api errors (in app)                                          │
//! │  └── ApiError         - Boundary failures (→ BLOCKED envelope)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Two Channels, Never Mixed
//! A bad request is an expected outcome: every [`EstimateError`] renders as a
//! human-readable clarification note and the caller gets `BLOCKED`. A bad
//! catalog is a data-integrity defect: [`CatalogError`] stops the process
//! from serving at all.

use thiserror::Error;

// =============================================================================
// Catalog Error
// =============================================================================

/// Rule-table integrity failures detected while building the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// A category is referenced by a product, tier or add-on but has no
    /// pricing rule.
    #[error("Category {category} is referenced by {referenced_by} but has no pricing rule")]
    MissingPricingRule {
        category: String,
        referenced_by: String,
    },

    /// A category has pricing rules but no product (no minimum charge).
    #[error("Category {category} has pricing rules but no product entry")]
    MissingProduct { category: String },

    /// A product lists a material with neither a specific nor wildcard rule.
    #[error("Product {slug} lists material {material} with no pricing rule in {category}")]
    UnpricedMaterial {
        category: String,
        slug: String,
        material: String,
    },

    /// A rule's fields don't match its tier type.
    #[error("Pricing rule {rule_id} is invalid: {reason}")]
    InvalidRule { rule_id: String, reason: String },

    /// More than one PER_AREA / PER_UNIT rule for the same key.
    #[error("Pricing rules {first} and {second} both set the rate for {category}/{material}")]
    DuplicateRate {
        category: String,
        material: String,
        first: String,
        second: String,
    },

    /// A category mixes area-priced and unit-priced rules.
    #[error("Category {category} mixes per-area and per-unit pricing")]
    MixedPricingBasis { category: String },

    /// Discount tiers are not strictly increasing, mix types, or are out of range.
    #[error("Discount tiers for {category} are invalid: {reason}")]
    InvalidDiscountTiers { category: String, reason: String },

    /// Product definition is invalid.
    #[error("Product {slug} is invalid: {reason}")]
    InvalidProduct { slug: String, reason: String },

    /// Add-on definition is invalid.
    #[error("Add-on {code} is invalid: {reason}")]
    InvalidAddon { code: String, reason: String },

    /// Fee schedule entry is invalid.
    #[error("Fee {code} is invalid: {reason}")]
    InvalidFee { code: String, reason: String },

    /// Duplicate identifier in one of the tables.
    #[error("Duplicate {field} '{value}'")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Estimate Error
// =============================================================================

/// Reasons a well-formed request cannot be priced.
///
/// The `Display` text of each variant is exactly the clarification note the
/// customer or staff member sees.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EstimateError {
    #[error("Product category is required")]
    CategoryRequired,

    #[error("Unknown product category {0}")]
    UnknownCategory(String),

    #[error("Material code is required for category {category}")]
    MaterialRequired { category: String },

    #[error("Unknown material code {material} for category {category}")]
    UnknownMaterial { category: String, material: String },

    #[error("Unknown product {slug} for category {category}")]
    UnknownProduct { category: String, slug: String },

    /// A dimension is zero, negative or not a number.
    #[error("{field} must be greater than zero")]
    InvalidDimension { field: &'static str },

    #[error("{field} cannot exceed {max} in")]
    DimensionTooLarge { field: &'static str, max: f64 },

    #[error("Sides must be 1 or 2")]
    InvalidSides(i64),

    #[error("Quantity must be at least 1")]
    QuantityTooSmall(i64),

    #[error("Quantity cannot exceed {max}")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Only fixed sizes are sold for this material and none matched.
    #[error("{width} x {height} in is not available for {material}; available sizes: {available}")]
    SizeNotAvailable {
        material: String,
        width: f64,
        height: f64,
        available: String,
    },

    #[error("Unknown add-on code {0}")]
    UnknownAddon(String),

    #[error("Add-on {code} is not available for category {category}")]
    AddonNotApplicable { code: String, category: String },

    #[error("Add-on {code} quantity must be at least 1")]
    InvalidAddonQuantity { code: String, qty: i64 },

    #[error("Add-on {code} quantity cannot exceed {max}")]
    AddonQuantityTooLarge { code: String, qty: i64, max: i64 },

    #[error("Order must contain at least one item")]
    EmptyOrder,

    #[error("Order cannot contain more than {max} items")]
    TooManyItems { count: usize, max: usize },
}

/// A refusal: one or more reasons the request cannot be priced.
///
/// Pipeline stages return `Result<_, Blocked>` and the first failing stage
/// ends the call.
#[derive(Debug, Clone, PartialEq)]
pub struct Blocked(Vec<EstimateError>);

impl Blocked {
    /// Wraps a non-empty list of reasons.
    pub fn new(reasons: Vec<EstimateError>) -> Self {
        debug_assert!(!reasons.is_empty(), "a refusal needs at least one reason");
        Blocked(reasons)
    }

    /// The underlying reasons.
    pub fn reasons(&self) -> &[EstimateError] {
        &self.0
    }

    /// Clarification notes in the order the reasons were found.
    pub fn notes(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }

    /// Turns a list of collected problems into a result.
    pub fn check(reasons: Vec<EstimateError>) -> Result<(), Blocked> {
        if reasons.is_empty() {
            Ok(())
        } else {
            Err(Blocked(reasons))
        }
    }
}

impl From<EstimateError> for Blocked {
    fn from(reason: EstimateError) -> Self {
        Blocked(vec![reason])
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Field-level format errors (used when parsing rule values).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Invalid format (e.g., a price with three decimals).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for catalog construction.
pub type CatalogResult<T> = Result<T, CatalogError>;

// =============================================================================
// Unit Tests
// =============================================================================
