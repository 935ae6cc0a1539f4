//! Per-field validation for quote input.
//!
//! Numeric fields arrive as raw text from the form. They are parsed here at
//! the boundary, parse-or-fail: a value that is missing, malformed, or not
//! strictly positive is reported as a [`ValidationError`] naming the field,
//! never silently replaced by a default that would make the resulting
//! estimate look more precise than the input deserves.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::warn;

use crate::models::{Material, Thickness};

/// A gated field of the quote form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    ProjectType,
    Material,
    Thickness,
    Length,
    Width,
    Quantity,
    ContactName,
    ContactEmail,
    ContactPhone,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProjectType => "project type",
            Self::Material => "material",
            Self::Thickness => "thickness",
            Self::Length => "length",
            Self::Width => "width",
            Self::Quantity => "quantity",
            Self::ContactName => "contact name",
            Self::ContactEmail => "contact email",
            Self::ContactPhone => "contact phone",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised when a quote form fails boundary validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field has no value yet.
    #[error("required field '{0}' is missing")]
    Missing(Field),

    /// A numeric field holds text that does not parse as a number.
    #[error("field '{field}' has invalid number '{input}'")]
    InvalidNumber { field: Field, input: String },

    /// A numeric field parsed but is zero or negative.
    #[error("field '{field}' must be positive, got {value}")]
    NotPositive { field: Field, value: Decimal },

    /// The chosen thickness is not stocked for the chosen material.
    #[error("thickness {thickness} is not offered for {material}", material = material.as_str())]
    ThicknessNotOffered {
        material: Material,
        thickness: Thickness,
    },

    /// A thickness was selected before any material.
    #[error("a material must be selected before a thickness")]
    ThicknessBeforeMaterial,

    /// The contact email does not look like an address.
    #[error("'{input}' is not a valid email address")]
    InvalidEmail { input: String },
}

/// Parses a dimension entered in millimetres.
///
/// Whitespace is trimmed; an empty entry is `Missing`, a non-numeric entry
/// is `InvalidNumber`, and zero or negative values are `NotPositive`.
///
/// # Example
///
/// ```
/// use devis_core::validation::{parse_millimetres, Field, ValidationError};
/// use rust_decimal_macros::dec;
///
/// assert_eq!(parse_millimetres(Field::Length, "2000").unwrap(), dec!(2000));
/// assert_eq!(
///     parse_millimetres(Field::Width, ""),
///     Err(ValidationError::Missing(Field::Width)),
/// );
/// ```
pub fn parse_millimetres(field: Field, input: &str) -> Result<Decimal, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Missing(field));
    }
    let value: Decimal = trimmed.parse().map_err(|_| {
        warn!(%field, input, "rejecting non-numeric dimension");
        ValidationError::InvalidNumber {
            field,
            input: input.to_string(),
        }
    })?;
    if value <= Decimal::ZERO {
        warn!(%field, %value, "rejecting non-positive dimension");
        return Err(ValidationError::NotPositive { field, value });
    }
    Ok(value)
}

/// Parses the quantity field into a piece count of at least one.
pub fn parse_quantity(input: &str) -> Result<u32, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Missing(Field::Quantity));
    }
    let quantity: i64 = trimmed
        .parse()
        .map_err(|_| ValidationError::InvalidNumber {
            field: Field::Quantity,
            input: input.to_string(),
        })?;
    if quantity < 1 {
        warn!(quantity, "rejecting non-positive quantity");
        return Err(ValidationError::NotPositive {
            field: Field::Quantity,
            value: Decimal::from(quantity),
        });
    }
    u32::try_from(quantity).map_err(|_| ValidationError::InvalidNumber {
        field: Field::Quantity,
        input: input.to_string(),
    })
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
    })
}

/// Checks that a contact email is present and plausibly formed.
pub fn validate_email(input: &str) -> Result<(), ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Missing(Field::ContactEmail));
    }
    if !email_pattern().is_match(trimmed) {
        return Err(ValidationError::InvalidEmail {
            input: input.to_string(),
        });
    }
    Ok(())
}

/// Checks that a required free-text field is non-empty.
pub fn require_text(field: Field, input: &str) -> Result<(), ValidationError> {
    if input.trim().is_empty() {
        Err(ValidationError::Missing(field))
    } else {
        Ok(())
    }
}
