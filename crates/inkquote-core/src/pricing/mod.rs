//! # Pricing Pipeline
//!
//! One module per stage, run in order by [`engine::price`]:
//!
//! | Stage | Module | Can block? |
//! |-------|--------|------------|
//! | Dimension normalizer | [`dimensions`] | yes |
//! | Tier resolver | [`tier`] | yes |
//! | Quantity discount resolver | [`discount`] | no |
//! | Add-on calculator | [`addons`] | yes |
//! | Design-fee & rush resolver | [`fees`] | no |
//! | Minimum-charge enforcer | [`minimum`] | no |
//! | Tax calculator | [`tax`] | no |
//! | Response assembler | [`engine`] | no |

pub mod addons;
pub mod dimensions;
pub mod discount;
pub mod engine;
pub mod fees;
pub mod minimum;
pub mod tax;
pub mod tier;

pub use engine::{estimate, price};
pub use fees::FeeSchedule;
pub use tax::TaxBreakdown;
