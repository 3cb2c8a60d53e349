//! Dimension normalizer: the first per-request stage.
//!
//! Validates sides, quantity and (for area-priced categories) width and
//! height, and computes the per-piece area. Every problem found here is
//! reported together.

use crate::catalog::FixedSizeRule;
use crate::error::{Blocked, EstimateError};
use crate::types::{EstimateRequest, PricingBasis, Sides};
use crate::validation::{validate_dimension, validate_quantity, validate_sides};
use crate::SQ_IN_PER_SQFT;

/// A validated job shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JobDimensions {
    /// Raw request width, kept as given for fixed-size matching.
    pub width_in: f64,
    pub height_in: f64,
    pub sides: Sides,
    pub qty: i64,
    /// Area of one piece; `None` for unit-priced categories.
    pub area_sqft: Option<f64>,
}

/// Validates the request's shape for a category with the given basis.
///
/// Unit-priced categories pass width and height through unchanged, zero
/// included.
pub fn normalize(basis: PricingBasis, request: &EstimateRequest) -> Result<JobDimensions, Blocked> {
    let sides = validate_sides(request.sides);
    let qty = validate_quantity(request.qty);

    let area = match basis {
        PricingBasis::Unit => Ok(None),
        PricingBasis::Area => match (
            validate_dimension(request.width_in, "Width"),
            validate_dimension(request.height_in, "Height"),
        ) {
            (Ok(width), Ok(height)) => Ok(Some(width * height / SQ_IN_PER_SQFT)),
            (width, height) => Err(width.err().into_iter().chain(height.err()).collect::<Vec<_>>()),
        },
    };

    match (sides, qty, area) {
        (Ok(sides), Ok(qty), Ok(area_sqft)) => Ok(JobDimensions {
            width_in: request.width_in,
            height_in: request.height_in,
            sides,
            qty,
            area_sqft,
        }),
        (sides, qty, area) => {
            let mut problems: Vec<EstimateError> = sides.err().into_iter().chain(qty.err()).collect();
            problems.extend(area.err().unwrap_or_default());
            Err(Blocked::new(problems))
        }
    }
}

/// Finds the first fixed size matching the job exactly (positionally).
pub fn match_fixed_size<'a>(
    candidates: impl IntoIterator<Item = &'a FixedSizeRule>,
    job: &JobDimensions,
) -> Option<&'a FixedSizeRule> {
    if job.area_sqft.is_none() {
        return None;
    }
    candidates
        .into_iter()
        .find(|rule| rule.matches(job.width_in, job.height_in))
}
