//! Indicative pricing for quote requests.
//!
//! The price is built line by line from a validated [`QuoteSpec`]:
//!
//! | Line | Description |
//! |------|-------------|
//! | 1    | Material rate (€/m²) for the selected material |
//! | 2    | Thickness multiplier: thickness in mm ÷ 2 |
//! | 3    | Sheet surface in m²: (length ÷ 1000) × (width ÷ 1000) |
//! | 4    | Base price: rate × surface × multiplier × quantity |
//! | 5    | Services cost: selected services × flat unit cost × quantity |
//! | 6    | Finishing cost: finish surcharge (€/m²) × surface × quantity |
//! | 7    | Subtotal: base + services + finishing |
//! | 8    | Total: subtotal × urgency multiplier |
//! | 9    | Estimate range: ±20 % around the total, floored at 50 € |
//!
//! The calculation is deterministic and side-effect free; the same spec
//! always yields the same breakdown.
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeSet;
//! use rust_decimal_macros::dec;
//! use devis_core::calculations::{PricingConfig, PricingWorksheet};
//! use devis_core::models::{
//!     Material, ProjectType, QuoteSpec, Thickness, Urgency,
//! };
//!
//! let spec = QuoteSpec {
//!     project_type: ProjectType::Couvertine,
//!     material: Material::Acier,
//!     thickness: Thickness::parse("3mm").unwrap(),
//!     length_mm: dec!(2000),
//!     width_mm: dec!(500),
//!     quantity: 1,
//!     services: BTreeSet::new(),
//!     finish: None,
//!     urgency: Urgency::Standard,
//! };
//!
//! let worksheet = PricingWorksheet::new(PricingConfig::default());
//! let breakdown = worksheet.calculate(&spec).unwrap();
//!
//! // 45 €/m² × 1 m² × 1.5 = 67.50 €
//! assert_eq!(breakdown.total, dec!(67.50));
//! assert_eq!(breakdown.estimate.min, dec!(54));
//! assert_eq!(breakdown.estimate.max, dec!(81));
//! ```

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::calculations::common::{max, round_to_euro};
use crate::models::{Material, QuoteSpec};

/// Errors raised by an invalid pricing configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// A material rate must be strictly positive.
    #[error("material rate for '{material}' must be positive, got {rate}")]
    NonPositiveMaterialRate { material: String, rate: Decimal },

    /// The fallback rate must be strictly positive.
    #[error("fallback rate must be positive, got {0}")]
    NonPositiveFallbackRate(Decimal),

    /// The flat per-service cost must be strictly positive.
    #[error("service unit cost must be positive, got {0}")]
    NonPositiveServiceCost(Decimal),

    /// The estimate floor must be non-negative.
    #[error("estimate floor must be non-negative, got {0}")]
    NegativeFloor(Decimal),

    /// The range factors must satisfy 0 < low <= high.
    #[error("range factors must satisfy 0 < low <= high, got {low}..{high}")]
    InvalidRangeFactors { low: Decimal, high: Decimal },
}

fn default_material_rates() -> BTreeMap<String, Decimal> {
    BTreeMap::from([
        ("acier".to_string(), Decimal::from(45u32)),
        ("inox".to_string(), Decimal::from(85u32)),
        ("aluminium".to_string(), Decimal::from(65u32)),
        ("galvanise".to_string(), Decimal::from(55u32)),
    ])
}

fn default_fallback_rate() -> Decimal {
    Decimal::from(50u32)
}

fn default_service_unit_cost() -> Decimal {
    Decimal::from(25u32)
}

fn default_floor() -> Decimal {
    Decimal::from(50u32)
}

fn default_range_low() -> Decimal {
    // 0.8
    Decimal::new(8, 1)
}

fn default_range_high() -> Decimal {
    // 1.2
    Decimal::new(12, 1)
}

/// Pricing parameters for the estimate formula.
///
/// Defaults reproduce the published indicative rates. The CLI can override
/// any subset from a TOML file; omitted fields keep their defaults, and a
/// material missing from `material_rates` falls back to `fallback_rate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PricingConfig {
    /// Base rates in €/m², keyed by material identifier.
    pub material_rates: BTreeMap<String, Decimal>,

    /// Rate used when a material has no entry in `material_rates`.
    pub fallback_rate: Decimal,

    /// Flat cost per selected service, per piece.
    pub service_unit_cost: Decimal,

    /// Lower bound for the displayed estimate minimum, in euros.
    pub floor: Decimal,

    /// Factor applied to the total for the low end of the range.
    pub range_low: Decimal,

    /// Factor applied to the total for the high end of the range.
    pub range_high: Decimal,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            material_rates: default_material_rates(),
            fallback_rate: default_fallback_rate(),
            service_unit_cost: default_service_unit_cost(),
            floor: default_floor(),
            range_low: default_range_low(),
            range_high: default_range_high(),
        }
    }
}

impl PricingConfig {
    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError`] if any rate or cost is non-positive, the
    /// floor is negative, or the range factors are not ordered.
    pub fn validate(&self) -> Result<(), PricingError> {
        for (material, rate) in &self.material_rates {
            if *rate <= Decimal::ZERO {
                return Err(PricingError::NonPositiveMaterialRate {
                    material: material.clone(),
                    rate: *rate,
                });
            }
        }
        if self.fallback_rate <= Decimal::ZERO {
            return Err(PricingError::NonPositiveFallbackRate(self.fallback_rate));
        }
        if self.service_unit_cost <= Decimal::ZERO {
            return Err(PricingError::NonPositiveServiceCost(self.service_unit_cost));
        }
        if self.floor < Decimal::ZERO {
            return Err(PricingError::NegativeFloor(self.floor));
        }
        if self.range_low <= Decimal::ZERO || self.range_low > self.range_high {
            return Err(PricingError::InvalidRangeFactors {
                low: self.range_low,
                high: self.range_high,
            });
        }
        Ok(())
    }

    /// Base rate for a material, falling back when unconfigured.
    pub fn material_rate(&self, material: Material) -> Decimal {
        match self.material_rates.get(material.as_str()) {
            Some(rate) => *rate,
            None => {
                warn!(
                    material = material.as_str(),
                    fallback = %self.fallback_rate,
                    "no configured rate for material, using fallback"
                );
                self.fallback_rate
            }
        }
    }
}

/// The displayed price range in whole euros.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimateRange {
    pub min: Decimal,
    pub max: Decimal,
}

/// Result of the pricing worksheet, with every intermediate line retained
/// so the quote summary can show how the range was reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingBreakdown {
    /// Line 1: material rate in €/m².
    pub material_rate: Decimal,

    /// Line 2: thickness multiplier (mm ÷ 2).
    pub thickness_multiplier: Decimal,

    /// Line 3: surface of one piece in m².
    pub surface_m2: Decimal,

    /// Number of pieces.
    pub quantity: u32,

    /// Line 4: rate × surface × multiplier × quantity.
    pub base_price: Decimal,

    /// Line 5: services × unit cost × quantity.
    pub services_cost: Decimal,

    /// Line 6: finish surcharge × surface × quantity.
    pub finishing_cost: Decimal,

    /// Line 7: base + services + finishing.
    pub subtotal: Decimal,

    /// Urgency multiplier applied to the subtotal.
    pub urgency_multiplier: Decimal,

    /// Line 8: subtotal × urgency multiplier.
    pub total: Decimal,

    /// Line 9: the rounded, floored indicative range.
    pub estimate: EstimateRange,
}

/// Calculator producing an indicative price range from a validated spec.
#[derive(Debug, Clone, Default)]
pub struct PricingWorksheet {
    config: PricingConfig,
}

impl PricingWorksheet {
    pub fn new(config: PricingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// Runs the full worksheet.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError`] if the configuration is invalid. A valid
    /// spec never fails: every numeric input was checked at the validation
    /// boundary.
    pub fn calculate(&self, spec: &QuoteSpec) -> Result<PricingBreakdown, PricingError> {
        self.config.validate()?;

        let thousand = Decimal::ONE_THOUSAND;
        let quantity = Decimal::from(spec.quantity);

        // Lines 1-3
        let material_rate = self.config.material_rate(spec.material);
        let thickness_multiplier = spec.thickness.multiplier();
        let surface_m2 = (spec.length_mm / thousand) * (spec.width_mm / thousand);

        // Line 4
        let base_price = material_rate * surface_m2 * thickness_multiplier * quantity;

        // Line 5: flat per service and per piece, not scaled by area
        let services_cost =
            Decimal::from(spec.services.len() as u64) * self.config.service_unit_cost * quantity;

        // Line 6
        let finish_surcharge = spec
            .finish
            .map_or(Decimal::ZERO, |f| f.surcharge_per_m2());
        let finishing_cost = finish_surcharge * surface_m2 * quantity;

        // Lines 7-8
        let subtotal = base_price + services_cost + finishing_cost;
        let urgency_multiplier = spec.urgency.multiplier();
        let total = subtotal * urgency_multiplier;

        // Line 9: floor the low end, and keep the range ordered even when
        // the floor exceeds the raw high end (tiny pieces).
        let min = max(self.config.floor, round_to_euro(total * self.config.range_low));
        let high = round_to_euro(total * self.config.range_high);
        let estimate = EstimateRange {
            min,
            max: max(min, high),
        };

        Ok(PricingBreakdown {
            material_rate,
            thickness_multiplier,
            surface_m2,
            quantity: spec.quantity,
            base_price,
            services_cost,
            finishing_cost,
            subtotal,
            urgency_multiplier,
            total,
            estimate,
        })
    }
}
