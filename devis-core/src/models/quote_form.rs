//! The in-progress quote form.
//!
//! One [`QuoteForm`] exists per wizard session. Selection fields hold typed
//! catalog values; dimension and quantity fields hold the text exactly as
//! the customer entered it and are only converted at the validation
//! boundary. Nothing here is persisted: the form lives for the session and
//! is discarded once the quote request has been sent.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::catalog::{Finish, Material, ProjectType, Service, Thickness, Urgency};
use crate::validation::{
    Field, ValidationError, parse_millimetres, parse_quantity, require_text, validate_email,
};

/// Contact fields as entered, prior to validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub company: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

/// Validated contact details carried in the submission payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
    pub name: String,
    pub company: Option<String>,
    pub email: String,
    pub phone: String,
    pub message: Option<String>,
}

/// The fully typed, validated description of what is being quoted.
///
/// This is the only input the pricing worksheet accepts; by the time a
/// `QuoteSpec` exists, every numeric value is strictly positive and the
/// thickness is known to be stocked for the material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteSpec {
    pub project_type: ProjectType,
    pub material: Material,
    pub thickness: Thickness,
    pub length_mm: Decimal,
    pub width_mm: Decimal,
    pub quantity: u32,
    pub services: BTreeSet<Service>,
    pub finish: Option<Finish>,
    pub urgency: Urgency,
}

/// A complete, validated quote: the spec plus who asked for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedQuote {
    pub spec: QuoteSpec,
    pub contact: ContactDetails,
}

/// Mutable form state accumulated across the wizard steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteForm {
    project_type: Option<ProjectType>,
    material: Option<Material>,
    thickness: Option<Thickness>,
    length_mm: String,
    width_mm: String,
    quantity: String,
    services: BTreeSet<Service>,
    finish: Option<Finish>,
    urgency: Urgency,
    contact: ContactForm,
}

impl Default for QuoteForm {
    fn default() -> Self {
        Self {
            project_type: None,
            material: None,
            thickness: None,
            length_mm: String::new(),
            width_mm: String::new(),
            quantity: "1".to_string(),
            services: BTreeSet::new(),
            finish: None,
            urgency: Urgency::Standard,
            contact: ContactForm::default(),
        }
    }
}

impl QuoteForm {
    /// Creates an empty form: quantity 1, standard lead time, nothing else.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn project_type(&self) -> Option<ProjectType> {
        self.project_type
    }

    pub fn material(&self) -> Option<Material> {
        self.material
    }

    pub fn thickness(&self) -> Option<Thickness> {
        self.thickness
    }

    pub fn length_mm(&self) -> &str {
        &self.length_mm
    }

    pub fn width_mm(&self) -> &str {
        &self.width_mm
    }

    pub fn quantity(&self) -> &str {
        &self.quantity
    }

    pub fn services(&self) -> &BTreeSet<Service> {
        &self.services
    }

    pub fn finish(&self) -> Option<Finish> {
        self.finish
    }

    pub fn urgency(&self) -> Urgency {
        self.urgency
    }

    pub fn contact(&self) -> &ContactForm {
        &self.contact
    }

    pub fn contact_mut(&mut self) -> &mut ContactForm {
        &mut self.contact
    }

    pub fn set_project_type(&mut self, project_type: ProjectType) {
        self.project_type = Some(project_type);
    }

    /// Selects a material, clearing any previously chosen thickness.
    ///
    /// Thickness lists differ per material, so a thickness chosen for one
    /// material is meaningless for another. Clearing here keeps the
    /// material/thickness pairing valid by construction.
    ///
    /// # Example
    ///
    /// ```
    /// use devis_core::models::{Material, QuoteForm, Thickness};
    ///
    /// let mut form = QuoteForm::new();
    /// form.set_material(Material::Acier);
    /// form.set_thickness(Thickness::parse("8mm").unwrap()).unwrap();
    ///
    /// form.set_material(Material::Galvanise);
    /// assert_eq!(form.thickness(), None);
    /// ```
    pub fn set_material(&mut self, material: Material) {
        if self.material != Some(material) && self.thickness.is_some() {
            debug!(material = material.as_str(), "material changed, clearing thickness");
            self.thickness = None;
        }
        self.material = Some(material);
    }

    /// Selects a thickness from the current material's option list.
    ///
    /// # Errors
    ///
    /// `ThicknessBeforeMaterial` if no material is selected yet, and
    /// `ThicknessNotOffered` if the value is not stocked for the material.
    pub fn set_thickness(&mut self, thickness: Thickness) -> Result<(), ValidationError> {
        let material = self
            .material
            .ok_or(ValidationError::ThicknessBeforeMaterial)?;
        if !material.offers(thickness) {
            return Err(ValidationError::ThicknessNotOffered {
                material,
                thickness,
            });
        }
        self.thickness = Some(thickness);
        Ok(())
    }

    pub fn set_length_mm(&mut self, value: impl Into<String>) {
        self.length_mm = value.into();
    }

    pub fn set_width_mm(&mut self, value: impl Into<String>) {
        self.width_mm = value.into();
    }

    pub fn set_quantity(&mut self, value: impl Into<String>) {
        self.quantity = value.into();
    }

    /// Adds the service if absent, removes it if present.
    pub fn toggle_service(&mut self, service: Service) {
        if !self.services.insert(service) {
            self.services.remove(&service);
        }
    }

    pub fn set_finish(&mut self, finish: Finish) {
        self.finish = Some(finish);
    }

    pub fn set_urgency(&mut self, urgency: Urgency) {
        self.urgency = urgency;
    }

    /// Validates the quoted work itself, independent of contact details.
    ///
    /// This is the projection consumed by the pricing worksheet, both for
    /// the live preview on the dimensions step and for the final estimate.
    pub fn specify(&self) -> Result<QuoteSpec, ValidationError> {
        let project_type = self
            .project_type
            .ok_or(ValidationError::Missing(Field::ProjectType))?;
        let material = self
            .material
            .ok_or(ValidationError::Missing(Field::Material))?;
        let thickness = self
            .thickness
            .ok_or(ValidationError::Missing(Field::Thickness))?;
        if !material.offers(thickness) {
            return Err(ValidationError::ThicknessNotOffered {
                material,
                thickness,
            });
        }

        Ok(QuoteSpec {
            project_type,
            material,
            thickness,
            length_mm: parse_millimetres(Field::Length, &self.length_mm)?,
            width_mm: parse_millimetres(Field::Width, &self.width_mm)?,
            quantity: parse_quantity(&self.quantity)?,
            services: self.services.clone(),
            finish: self.finish,
            urgency: self.urgency,
        })
    }

    /// Validates the contact fields.
    pub fn contact_details(&self) -> Result<ContactDetails, ValidationError> {
        require_text(Field::ContactName, &self.contact.name)?;
        validate_email(&self.contact.email)?;
        require_text(Field::ContactPhone, &self.contact.phone)?;

        let optional = |s: &str| {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        };

        Ok(ContactDetails {
            name: self.contact.name.trim().to_string(),
            company: optional(&self.contact.company),
            email: self.contact.email.trim().to_string(),
            phone: self.contact.phone.trim().to_string(),
            message: optional(&self.contact.message),
        })
    }

    /// Validates the whole form, spec and contact together.
    pub fn validate(&self) -> Result<ValidatedQuote, ValidationError> {
        Ok(ValidatedQuote {
            spec: self.specify()?,
            contact: self.contact_details()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn filled_form() -> QuoteForm {
        let mut form = QuoteForm::new();
        form.set_project_type(ProjectType::Couvertine);
        form.set_material(Material::Acier);
        form.set_thickness(Thickness::parse("3mm").unwrap()).unwrap();
        form.set_length_mm("2000");
        form.set_width_mm("500");
        form.contact_mut().name = "Jean Dupont".to_string();
        form.contact_mut().email = "jean@exemple.com".to_string();
        form.contact_mut().phone = "06 12 34 56 78".to_string();
        form
    }

    #[test]
    fn new_form_defaults_quantity_to_one_and_standard_urgency() {
        let form = QuoteForm::new();

        assert_eq!(form.quantity(), "1");
        assert_eq!(form.urgency(), Urgency::Standard);
        assert_eq!(form.project_type(), None);
    }

    #[test]
    fn changing_material_clears_thickness() {
        let mut form = QuoteForm::new();
        form.set_material(Material::Acier);
        form.set_thickness(Thickness::parse("25mm").unwrap()).unwrap();

        form.set_material(Material::Inox);

        assert_eq!(form.thickness(), None);
    }

    #[test]
    fn reselecting_same_material_keeps_thickness() {
        let mut form = QuoteForm::new();
        form.set_material(Material::Acier);
        form.set_thickness(Thickness::parse("3mm").unwrap()).unwrap();

        form.set_material(Material::Acier);

        assert_eq!(form.thickness(), Some(Thickness::parse("3mm").unwrap()));
    }

    #[test]
    fn thickness_requires_material_first() {
        let mut form = QuoteForm::new();

        let result = form.set_thickness(Thickness::parse("3mm").unwrap());

        assert_eq!(result, Err(ValidationError::ThicknessBeforeMaterial));
    }

    #[test]
    fn thickness_must_be_stocked_for_material() {
        let mut form = QuoteForm::new();
        form.set_material(Material::Galvanise);

        let result = form.set_thickness(Thickness::parse("25mm").unwrap());

        assert!(matches!(
            result,
            Err(ValidationError::ThicknessNotOffered { .. })
        ));
    }

    #[test]
    fn toggle_service_adds_then_removes() {
        let mut form = QuoteForm::new();

        form.toggle_service(Service::Pliage);
        assert!(form.services().contains(&Service::Pliage));

        form.toggle_service(Service::Pliage);
        assert!(form.services().is_empty());
    }

    #[test]
    fn specify_produces_typed_values() {
        let spec = filled_form().specify().unwrap();

        assert_eq!(spec.length_mm, dec!(2000));
        assert_eq!(spec.width_mm, dec!(500));
        assert_eq!(spec.quantity, 1);
        assert_eq!(spec.thickness.multiplier(), dec!(1.5));
        assert_eq!(spec.finish, None);
    }

    #[test]
    fn specify_reports_missing_dimension() {
        let mut form = filled_form();
        form.set_width_mm("");

        assert_eq!(
            form.specify(),
            Err(ValidationError::Missing(Field::Width))
        );
    }

    #[test]
    fn specify_rejects_zero_dimension_instead_of_degenerate_estimate() {
        let mut form = filled_form();
        form.set_length_mm("0");

        assert_eq!(
            form.specify(),
            Err(ValidationError::NotPositive {
                field: Field::Length,
                value: dec!(0),
            })
        );
    }

    #[test]
    fn contact_details_normalises_optional_fields() {
        let mut form = filled_form();
        form.contact_mut().company = "  ".to_string();
        form.contact_mut().message = "Plans joints".to_string();

        let contact = form.contact_details().unwrap();

        assert_eq!(contact.company, None);
        assert_eq!(contact.message, Some("Plans joints".to_string()));
    }

    #[test]
    fn contact_details_rejects_bad_email() {
        let mut form = filled_form();
        form.contact_mut().email = "jean".to_string();

        assert!(matches!(
            form.contact_details(),
            Err(ValidationError::InvalidEmail { .. })
        ));
    }

    #[test]
    fn validate_combines_spec_and_contact() {
        let quote = filled_form().validate().unwrap();

        assert_eq!(quote.spec.material, Material::Acier);
        assert_eq!(quote.contact.name, "Jean Dupont");
    }
}
