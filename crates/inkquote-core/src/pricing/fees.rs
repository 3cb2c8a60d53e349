//! Design-fee and rush surcharges.
//!
//! Both are flat, order-level amounts: they never scale with quantity or
//! area, and the minimum charge never touches them.

use crate::money::Money;
use crate::types::{DesignStatus, LineItem};

/// Rule id reported on the rush line.
pub const RUSH_RULE_ID: &str = "RUSH";

/// Flat fees charged on top of the product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeSchedule {
    pub minor_edit: Money,
    pub full_design: Money,
    pub logo_recreation: Money,
    pub rush: Money,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        FeeSchedule {
            minor_edit: Money::from_dollars(35),
            full_design: Money::from_dollars(50),
            logo_recreation: Money::from_dollars(75),
            rush: Money::from_dollars(40),
        }
    }
}

impl FeeSchedule {
    /// Fee for a design service; `None` for print-ready artwork.
    pub fn design_fee(&self, status: DesignStatus) -> Option<Money> {
        match status {
            DesignStatus::PrintReady => None,
            DesignStatus::MinorEdit => Some(self.minor_edit),
            DesignStatus::FullDesign => Some(self.full_design),
            DesignStatus::LogoRecreation => Some(self.logo_recreation),
        }
    }

    /// Overrides the fee for a billable design service.
    ///
    /// Returns `false` (and changes nothing) for `PrintReady`, which is
    /// never billed.
    pub fn set_design_fee(&mut self, status: DesignStatus, amount: Money) -> bool {
        let slot = match status {
            DesignStatus::PrintReady => return false,
            DesignStatus::MinorEdit => &mut self.minor_edit,
            DesignStatus::FullDesign => &mut self.full_design,
            DesignStatus::LogoRecreation => &mut self.logo_recreation,
        };
        *slot = amount;
        true
    }

    /// All amounts with the code they are reported under.
    pub fn entries(&self) -> [(&'static str, Money); 4] {
        [
            (DesignStatus::MinorEdit.code(), self.minor_edit),
            (DesignStatus::FullDesign.code(), self.full_design),
            (DesignStatus::LogoRecreation.code(), self.logo_recreation),
            (RUSH_RULE_ID, self.rush),
        ]
    }
}

/// Builds the design-fee line (if billable) followed by the rush line (if
/// requested).
pub fn fee_lines(schedule: &FeeSchedule, design: Option<DesignStatus>, is_rush: bool) -> Vec<LineItem> {
    let mut lines = Vec::with_capacity(2);

    if let Some(status) = design {
        if let Some(fee) = schedule.design_fee(status) {
            lines.push(LineItem {
                description: status.label().to_string(),
                qty: 1,
                unit_price: fee,
                line_total: fee,
                rule_id: format!("DESIGN:{}", status.code()),
            });
        }
    }

    if is_rush {
        lines.push(LineItem {
            description: "Rush turnaround".to_string(),
            qty: 1,
            unit_price: schedule.rush,
            line_total: schedule.rush,
            rule_id: RUSH_RULE_ID.to_string(),
        });
    }

    lines
}
