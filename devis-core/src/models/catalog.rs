//! Catalog of selectable quote options.
//!
//! Every choice offered by the quote wizard (project type, material,
//! thickness, services, finish, urgency) is a closed enum here, with the
//! stable string identifiers used in submission payloads and the French
//! labels shown to customers.

use std::fmt;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kind of fabrication project being quoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectType {
    Couvertine,
    Precadre,
    Habillage,
    Decoupe,
    GardeCorps,
    Tolerie,
}

impl ProjectType {
    pub const ALL: [ProjectType; 6] = [
        Self::Couvertine,
        Self::Precadre,
        Self::Habillage,
        Self::Decoupe,
        Self::GardeCorps,
        Self::Tolerie,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Couvertine => "couvertine",
            Self::Precadre => "precadre",
            Self::Habillage => "habillage",
            Self::Decoupe => "decoupe",
            Self::GardeCorps => "garde-corps",
            Self::Tolerie => "tolerie",
        }
    }

    /// Customer-facing label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Couvertine => "Couvertines",
            Self::Precadre => "Précadres",
            Self::Habillage => "Habillage Façade",
            Self::Decoupe => "Découpe Décorative",
            Self::GardeCorps => "Garde-corps",
            Self::Tolerie => "Tôlerie Sur Mesure",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "couvertine" => Some(Self::Couvertine),
            "precadre" => Some(Self::Precadre),
            "habillage" => Some(Self::Habillage),
            "decoupe" => Some(Self::Decoupe),
            "garde-corps" => Some(Self::GardeCorps),
            "tolerie" => Some(Self::Tolerie),
            _ => None,
        }
    }
}

/// Sheet-metal material.
///
/// Each material carries its own ordered list of stocked thicknesses;
/// a thickness is only meaningful relative to the material it was chosen for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Material {
    Acier,
    Inox,
    Aluminium,
    Galvanise,
}

/// Stocked thicknesses per material, in tenths of a millimetre so that
/// `Thickness` stays integral and can derive `Eq`/`Hash`. 10 = 1mm,
/// 250 = 25mm; the labels customers see come from `Display`.
const ACIER_TENTHS: &[u32] = &[10, 15, 20, 30, 40, 50, 60, 80, 100, 150, 200, 250];
const INOX_TENTHS: &[u32] = &[10, 15, 20, 30, 40, 50, 60, 80, 100, 150, 200];
const ALUMINIUM_TENTHS: &[u32] = &[10, 15, 20, 30, 40, 50, 60, 80, 100, 120];
const GALVANISE_TENTHS: &[u32] = &[10, 15, 20, 30, 40, 50];

impl Material {
    pub const ALL: [Material; 4] = [Self::Acier, Self::Inox, Self::Aluminium, Self::Galvanise];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Acier => "acier",
            Self::Inox => "inox",
            Self::Aluminium => "aluminium",
            Self::Galvanise => "galvanise",
        }
    }

    /// Customer-facing label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Acier => "Acier",
            Self::Inox => "Inox 304L/316L",
            Self::Aluminium => "Aluminium",
            Self::Galvanise => "Acier Galvanisé",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "acier" => Some(Self::Acier),
            "inox" => Some(Self::Inox),
            "aluminium" => Some(Self::Aluminium),
            "galvanise" => Some(Self::Galvanise),
            _ => None,
        }
    }

    /// The ordered thickness options stocked for this material.
    ///
    /// # Example
    ///
    /// ```
    /// use devis_core::models::Material;
    ///
    /// let options = Material::Galvanise.thickness_options();
    /// assert_eq!(options.len(), 6);
    /// assert_eq!(options.last().unwrap().to_string(), "5mm");
    /// ```
    pub fn thickness_options(&self) -> Vec<Thickness> {
        let tenths = match self {
            Self::Acier => ACIER_TENTHS,
            Self::Inox => INOX_TENTHS,
            Self::Aluminium => ALUMINIUM_TENTHS,
            Self::Galvanise => GALVANISE_TENTHS,
        };
        tenths.iter().map(|&t| Thickness { tenths_mm: t }).collect()
    }

    /// Whether `thickness` is one of this material's stocked options.
    pub fn offers(&self, thickness: Thickness) -> bool {
        self.thickness_options().contains(&thickness)
    }
}

/// Error returned when a thickness label cannot be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ThicknessParseError {
    /// The label is not a number followed by an optional `mm` suffix.
    #[error("invalid thickness label '{0}'")]
    Malformed(String),

    /// The value is zero, negative, or finer than the 0.1 mm resolution.
    #[error("thickness '{0}' is out of range")]
    OutOfRange(String),
}

/// Sheet thickness, stored in tenths of a millimetre.
///
/// The pricing multiplier is the thickness in millimetres divided by two,
/// so a 3 mm sheet prices at 1.5× the per-square-metre material rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Thickness {
    tenths_mm: u32,
}

impl Thickness {
    /// Thickness in millimetres.
    pub fn mm(&self) -> Decimal {
        Decimal::new(i64::from(self.tenths_mm), 1)
    }

    /// Pricing multiplier: millimetres divided by two.
    ///
    /// # Example
    ///
    /// ```
    /// use devis_core::models::Thickness;
    /// use rust_decimal_macros::dec;
    ///
    /// let t = Thickness::parse("3mm").unwrap();
    /// assert_eq!(t.multiplier(), dec!(1.5));
    /// ```
    pub fn multiplier(&self) -> Decimal {
        self.mm() / Decimal::TWO
    }

    /// Parses a thickness label such as `"3mm"` or `"1.5"`.
    ///
    /// The `mm` suffix is optional. Parsing fails rather than defaulting:
    /// a garbage label is an error, never a silent 1× multiplier.
    pub fn parse(label: &str) -> Result<Self, ThicknessParseError> {
        let trimmed = label.trim();
        let number = trimmed.strip_suffix("mm").unwrap_or(trimmed).trim();
        let value: Decimal = number
            .parse()
            .map_err(|_| ThicknessParseError::Malformed(label.to_string()))?;

        let tenths = value * Decimal::TEN;
        if tenths <= Decimal::ZERO || tenths != tenths.trunc() {
            return Err(ThicknessParseError::OutOfRange(label.to_string()));
        }
        tenths
            .to_u32()
            .map(|tenths_mm| Self { tenths_mm })
            .ok_or_else(|| ThicknessParseError::OutOfRange(label.to_string()))
    }
}

impl fmt::Display for Thickness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.tenths_mm / 10;
        let frac = self.tenths_mm % 10;
        if frac == 0 {
            write!(f, "{whole}mm")
        } else {
            write!(f, "{whole}.{frac}mm")
        }
    }
}

/// Workshop services that can be added to a quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Service {
    Decoupe,
    Pliage,
    Soudure,
    Thermolaquage,
    Montage,
}

impl Service {
    pub const ALL: [Service; 5] = [
        Self::Decoupe,
        Self::Pliage,
        Self::Soudure,
        Self::Thermolaquage,
        Self::Montage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Decoupe => "decoupe",
            Self::Pliage => "pliage",
            Self::Soudure => "soudure",
            Self::Thermolaquage => "thermolaquage",
            Self::Montage => "montage",
        }
    }

    /// Customer-facing label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Decoupe => "Découpe Laser",
            Self::Pliage => "Pliage CNC",
            Self::Soudure => "Soudure",
            Self::Thermolaquage => "Thermolaquage",
            Self::Montage => "Pré-montage Usine",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "decoupe" => Some(Self::Decoupe),
            "pliage" => Some(Self::Pliage),
            "soudure" => Some(Self::Soudure),
            "thermolaquage" => Some(Self::Thermolaquage),
            "montage" => Some(Self::Montage),
            _ => None,
        }
    }
}

/// Surface finish applied after fabrication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Finish {
    Brut,
    Galvanise,
    ThermolaqueStd,
    ThermolaqueSpe,
    Brossage,
}

impl Finish {
    pub const ALL: [Finish; 5] = [
        Self::Brut,
        Self::Galvanise,
        Self::ThermolaqueStd,
        Self::ThermolaqueSpe,
        Self::Brossage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Brut => "brut",
            Self::Galvanise => "galvanise",
            Self::ThermolaqueStd => "thermolaque-std",
            Self::ThermolaqueSpe => "thermolaque-spe",
            Self::Brossage => "brossage",
        }
    }

    /// Customer-facing label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Brut => "Brut (sans finition)",
            Self::Galvanise => "Galvanisation à froid",
            Self::ThermolaqueStd => "Thermolaquage RAL standard",
            Self::ThermolaqueSpe => "Thermolaquage RAL spécial",
            Self::Brossage => "Brossage / Satinage",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "brut" => Some(Self::Brut),
            "galvanise" => Some(Self::Galvanise),
            "thermolaque-std" => Some(Self::ThermolaqueStd),
            "thermolaque-spe" => Some(Self::ThermolaqueSpe),
            "brossage" => Some(Self::Brossage),
            _ => None,
        }
    }

    /// Finishing surcharge in €/m² of sheet surface.
    pub fn surcharge_per_m2(&self) -> Decimal {
        let euros: u32 = match self {
            Self::Brut => 0,
            Self::Galvanise => 15,
            Self::ThermolaqueStd => 25,
            Self::ThermolaqueSpe => 35,
            Self::Brossage => 20,
        };
        Decimal::from(euros)
    }
}

/// Requested production lead time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Urgency {
    #[default]
    Standard,
    Urgent,
    Express,
}

impl Urgency {
    pub const ALL: [Urgency; 3] = [Self::Standard, Self::Urgent, Self::Express];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Urgent => "urgent",
            Self::Express => "express",
        }
    }

    /// Customer-facing label, including the promised lead time.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Standard => "Standard (10-15 jours)",
            Self::Urgent => "Urgent (5-7 jours)",
            Self::Express => "Express (3-5 jours)",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "standard" => Some(Self::Standard),
            "urgent" => Some(Self::Urgent),
            "express" => Some(Self::Express),
            _ => None,
        }
    }

    /// Price multiplier applied to the quote subtotal.
    pub fn multiplier(&self) -> Decimal {
        match self {
            Self::Standard => Decimal::ONE,
            Self::Urgent => Decimal::new(13, 1),
            Self::Express => Decimal::new(15, 1),
        }
    }
}
