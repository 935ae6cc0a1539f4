//! Quote pricing.
//!
//! The estimate is an indicative range, not a binding price: the worksheet
//! in [`pricing`] produces a line-by-line breakdown ending in a rounded
//! min/max bracket around the computed total.

pub mod common;
pub mod pricing;

pub use pricing::{
    EstimateRange, PricingBreakdown, PricingConfig, PricingError, PricingWorksheet,
};
