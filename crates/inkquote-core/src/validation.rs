//! # Validation Module
//!
//! Field-level checks shared by the pricing pipeline, the rule loader and the
//! service configuration.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP boundary (estimate-api)                                 │
//! │  ├── JSON shape (deserialization)                                      │
//! │  └── Malformed body → BLOCKED "Server error — check input format"      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Pricing pipeline                                             │
//! │  ├── THIS MODULE: sides, quantity, dimensions, codes                   │
//! │  └── Failures → EstimateError → BLOCKED clarification note             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Rule catalog                                                 │
//! │  └── Known category / material / add-on lookups                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use inkquote_core::validation::{normalize_code, validate_quantity, validate_sides};
//! use inkquote_core::Sides;
//!
//! assert_eq!(normalize_code(" mphcc020 "), "MPHCC020");
//! assert!(validate_quantity(5).is_ok());
//! assert_eq!(validate_sides(2).unwrap(), Sides::Double);
//! ```

use crate::error::{EstimateError, ValidationError};
use crate::types::Sides;
use crate::{MAX_DIMENSION_IN, MAX_JOB_QUANTITY};

/// Result type for rule-value and configuration checks.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Codes
// =============================================================================

/// Normalizes a category, material or add-on code for lookup.
///
/// Codes are compared case-insensitively, so the catalog and every request
/// go through this before touching an index.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

/// Normalizes an optional code, treating blank as absent.
pub fn normalize_optional_code(code: Option<&str>) -> Option<String> {
    code.map(normalize_code).filter(|c| !c.is_empty())
}

// =============================================================================
// Job Validators
// =============================================================================

/// Validates the number of printed sides.
///
/// ## Rules
/// - 1 → single-sided
/// - 2 → double-sided
/// - Anything else → "Sides must be 1 or 2"
pub fn validate_sides(sides: i64) -> Result<Sides, EstimateError> {
    match sides {
        1 => Ok(Sides::Single),
        2 => Ok(Sides::Double),
        other => Err(EstimateError::InvalidSides(other)),
    }
}

/// Validates a job quantity.
///
/// ## Rules
/// - Must be at least 1
/// - Must not exceed MAX_JOB_QUANTITY (100000)
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Customer types a quantity into the estimator                          │
/// │       │                                                                 │
/// │       ├── qty <= 0? → BLOCKED: "Quantity must be at least 1"           │
/// │       │                                                                 │
/// │       ├── qty > 100000? → BLOCKED: "Quantity cannot exceed 100000"     │
/// │       │                                                                 │
/// │       └── OK → Continue pricing                                         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(qty: i64) -> Result<i64, EstimateError> {
    if qty < 1 {
        return Err(EstimateError::QuantityTooSmall(qty));
    }

    if qty > MAX_JOB_QUANTITY {
        return Err(EstimateError::QuantityTooLarge {
            requested: qty,
            max: MAX_JOB_QUANTITY,
        });
    }

    Ok(qty)
}

/// Validates one dimension of an area-priced piece.
///
/// `field` is the capitalized name used in the note ("Width", "Height").
/// NaN and infinities are rejected along with zero and negatives.
///
/// ## Rules
/// - Must be greater than zero
/// - Must not exceed MAX_DIMENSION_IN (1200)
pub fn validate_dimension(value: f64, field: &'static str) -> Result<f64, EstimateError> {
    if !(value.is_finite() && value > 0.0) {
        return Err(EstimateError::InvalidDimension { field });
    }

    if value > MAX_DIMENSION_IN {
        return Err(EstimateError::DimensionTooLarge {
            field,
            max: MAX_DIMENSION_IN,
        });
    }

    Ok(value)
}

/// Validates an add-on quantity.
///
/// Same ceiling as a job quantity; the count is the add-on's own, never
/// multiplied by the product quantity.
pub fn validate_addon_quantity(code: &str, qty: i64) -> Result<i64, EstimateError> {
    if qty < 1 {
        return Err(EstimateError::InvalidAddonQuantity {
            code: code.to_string(),
            qty,
        });
    }

    if qty > MAX_JOB_QUANTITY {
        return Err(EstimateError::AddonQuantityTooLarge {
            code: code.to_string(),
            qty,
            max: MAX_JOB_QUANTITY,
        });
    }

    Ok(qty)
}

// =============================================================================
// Configuration Validators
// =============================================================================

/// Validates a tax rate in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10_000 {
        return Err(ValidationError::OutOfRange {
            field: "tax_rate_bps".to_string(),
            min: 0,
            max: 10_000,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
