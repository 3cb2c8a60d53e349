//! Quantity discount resolver.
//!
//! Tiers are sorted ascending by threshold, so the highest tier whose
//! threshold the job reaches is the last match scanning upwards. Boundaries
//! are inclusive: exactly 8 sqft earns the 8 sqft tier.

use crate::money::Money;
use crate::pricing::dimensions::JobDimensions;
use crate::types::{DiscountTier, ThresholdType};

/// Slack for area thresholds; areas come from `w × h / 144`.
const AREA_EPSILON: f64 = 1e-9;

/// The metric a tier's threshold is compared against.
///
/// `QTY` tiers use the quantity; `AREA` tiers use the area of one piece,
/// whatever the quantity. An area tier never applies to a unit-priced job.
pub fn metric(threshold_type: ThresholdType, job: &JobDimensions) -> Option<f64> {
    match threshold_type {
        ThresholdType::Qty => Some(job.qty as f64),
        ThresholdType::Area => job.area_sqft.map(|area| area + AREA_EPSILON),
    }
}

/// Selects the highest tier whose threshold is at or below the job's metric.
pub fn select_tier<'a>(tiers: &'a [DiscountTier], job: &JobDimensions) -> Option<&'a DiscountTier> {
    tiers
        .iter()
        .rev()
        .find(|tier| metric(tier.threshold_type, job).is_some_and(|value| value >= tier.threshold_value))
}

/// Applies a tier to the product subtotal.
pub fn apply(subtotal: Money, tier: &DiscountTier) -> Money {
    subtotal.apply_percentage_discount(tier.discount_bps)
}
