//! Add-on calculator.
//!
//! One line item per requested entry. An add-on's `qty` is its own count and
//! is never multiplied by the product quantity.

use crate::catalog::RuleCatalog;
use crate::error::{Blocked, EstimateError};
use crate::types::{AddonRequest, LineItem};
use crate::validation::{normalize_code, validate_addon_quantity};

/// Prices the requested add-ons for a job in `category`.
///
/// Every unknown, inapplicable or out-of-range entry is reported; a single
/// bad entry blocks the whole request.
pub fn price_addons(catalog: &RuleCatalog, category: &str, requests: &[AddonRequest]) -> Result<Vec<LineItem>, Blocked> {
    let mut lines = Vec::with_capacity(requests.len());
    let mut problems = Vec::new();

    for request in requests {
        let code = normalize_code(&request.code);
        let qty = request.quantity();

        let Some(addon) = catalog.addon(&code) else {
            problems.push(EstimateError::UnknownAddon(request.code.trim().to_string()));
            continue;
        };
        if !addon.applies_to(category) {
            problems.push(EstimateError::AddonNotApplicable {
                code,
                category: category.to_string(),
            });
            continue;
        }
        let qty = match validate_addon_quantity(&code, qty) {
            Ok(qty) => qty,
            Err(problem) => {
                problems.push(problem);
                continue;
            }
        };

        lines.push(LineItem {
            description: addon.name.clone(),
            qty,
            unit_price: addon.unit_price,
            line_total: addon.unit_price * qty,
            rule_id: addon.code.clone(),
        });
    }

    Blocked::check(problems)?;
    Ok(lines)
}
