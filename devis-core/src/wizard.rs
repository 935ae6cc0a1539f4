//! The four-step quote wizard.
//!
//! Steps are strictly linear: project type, then material and thickness,
//! then dimensions, services, finish and lead time, then contact details.
//! `next` is gated on the current step's required fields; `back` is always
//! allowed except on the first step. Submitting from the last step freezes
//! the session: the form is discarded and only the outcome remains, so a
//! fresh wizard is needed to quote again.

use std::fmt;

use thiserror::Error;
use tracing::info;

use crate::calculations::{
    EstimateRange, PricingBreakdown, PricingConfig, PricingError, PricingWorksheet,
};
use crate::intake::{IntakeError, IntakeReceipt, QuoteIntake, QuoteRequest};
use crate::models::QuoteForm;
use crate::validation::{Field, ValidationError};

/// A wizard step, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Step {
    ProjectType,
    MaterialThickness,
    DimensionsFinish,
    Contact,
}

impl Step {
    pub const ALL: [Step; 4] = [
        Self::ProjectType,
        Self::MaterialThickness,
        Self::DimensionsFinish,
        Self::Contact,
    ];

    /// 1-based position shown in the progress header.
    pub fn number(&self) -> u8 {
        match self {
            Self::ProjectType => 1,
            Self::MaterialThickness => 2,
            Self::DimensionsFinish => 3,
            Self::Contact => 4,
        }
    }

    /// Customer-facing step title.
    pub fn title(&self) -> &'static str {
        match self {
            Self::ProjectType => "Type de projet",
            Self::MaterialThickness => "Matériau",
            Self::DimensionsFinish => "Dimensions",
            Self::Contact => "Contact",
        }
    }

    fn next(&self) -> Option<Step> {
        match self {
            Self::ProjectType => Some(Self::MaterialThickness),
            Self::MaterialThickness => Some(Self::DimensionsFinish),
            Self::DimensionsFinish => Some(Self::Contact),
            Self::Contact => None,
        }
    }

    fn previous(&self) -> Option<Step> {
        match self {
            Self::ProjectType => None,
            Self::MaterialThickness => Some(Self::ProjectType),
            Self::DimensionsFinish => Some(Self::MaterialThickness),
            Self::Contact => Some(Self::DimensionsFinish),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {} ({})", self.number(), self.title())
    }
}

/// What a successful submission leaves behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionOutcome {
    pub receipt: IntakeReceipt,
    /// The estimate shown on the confirmation view, frozen at submission.
    pub estimate: EstimateRange,
}

/// Where a wizard session currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    InProgress(Step),
    Submitted(SubmissionOutcome),
}

/// Errors raised by wizard transitions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WizardError {
    /// `next` or `submit` was attempted with required fields still empty.
    #[error("{step} is incomplete: {} missing", format_fields(.missing))]
    IncompleteStep { step: Step, missing: Vec<Field> },

    /// `back` was attempted from the first step.
    #[error("already at the first step")]
    AtFirstStep,

    /// `next` was attempted from the last step; only `submit` leaves it.
    #[error("already at the final step")]
    AtFinalStep,

    /// `submit` was attempted before reaching the last step.
    #[error("cannot submit from {0}")]
    NotAtFinalStep(Step),

    /// Any transition attempted after a successful submission.
    #[error("the quote has been submitted; start a new session to quote again")]
    AlreadySubmitted,

    /// The full-form validation at submission failed.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// The pricing configuration was invalid.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// The intake service reported a failure.
    #[error(transparent)]
    Intake(#[from] IntakeError),
}

fn format_fields(fields: &[Field]) -> String {
    fields
        .iter()
        .map(Field::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A single quote session: current phase, the form, and the pricing table.
#[derive(Debug)]
pub struct QuoteWizard {
    phase: Phase,
    form: QuoteForm,
    pricing: PricingWorksheet,
}

impl QuoteWizard {
    pub fn new(config: PricingConfig) -> Self {
        Self {
            phase: Phase::InProgress(Step::ProjectType),
            form: QuoteForm::new(),
            pricing: PricingWorksheet::new(config),
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// The current step, or `None` once submitted.
    pub fn step(&self) -> Option<Step> {
        match &self.phase {
            Phase::InProgress(step) => Some(*step),
            Phase::Submitted(_) => None,
        }
    }

    pub fn form(&self) -> &QuoteForm {
        &self.form
    }

    /// Mutable access to the form while the session is open.
    pub fn form_mut(&mut self) -> Result<&mut QuoteForm, WizardError> {
        match &self.phase {
            Phase::InProgress(_) => Ok(&mut self.form),
            Phase::Submitted(_) => Err(WizardError::AlreadySubmitted),
        }
    }

    /// Required fields of the current step that are still empty.
    ///
    /// These are presence checks only; numeric and format validation
    /// happens when the estimate is computed and at submission.
    pub fn missing_fields(&self) -> Vec<Field> {
        let Phase::InProgress(step) = &self.phase else {
            return Vec::new();
        };
        let form = &self.form;
        let mut missing = Vec::new();
        match step {
            Step::ProjectType => {
                if form.project_type().is_none() {
                    missing.push(Field::ProjectType);
                }
            }
            Step::MaterialThickness => {
                if form.material().is_none() {
                    missing.push(Field::Material);
                }
                if form.thickness().is_none() {
                    missing.push(Field::Thickness);
                }
            }
            Step::DimensionsFinish => {
                if form.length_mm().trim().is_empty() {
                    missing.push(Field::Length);
                }
                if form.width_mm().trim().is_empty() {
                    missing.push(Field::Width);
                }
                if form.quantity().trim().is_empty() {
                    missing.push(Field::Quantity);
                }
            }
            Step::Contact => {
                if form.contact().name.trim().is_empty() {
                    missing.push(Field::ContactName);
                }
                if form.contact().email.trim().is_empty() {
                    missing.push(Field::ContactEmail);
                }
                if form.contact().phone.trim().is_empty() {
                    missing.push(Field::ContactPhone);
                }
            }
        }
        missing
    }

    /// Whether the current step's gate is open.
    pub fn can_proceed(&self) -> bool {
        matches!(&self.phase, Phase::InProgress(_)) && self.missing_fields().is_empty()
    }

    /// Advances to the next step.
    ///
    /// # Errors
    ///
    /// `IncompleteStep` if required fields are missing, `AtFinalStep` from
    /// the contact step, `AlreadySubmitted` after submission.
    pub fn next(&mut self) -> Result<Step, WizardError> {
        let step = self.current_step()?;
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(WizardError::IncompleteStep { step, missing });
        }
        let next = step.next().ok_or(WizardError::AtFinalStep)?;
        info!(from = %step, to = %next, "advancing wizard");
        self.phase = Phase::InProgress(next);
        Ok(next)
    }

    /// Returns to the previous step. Always allowed except on the first
    /// step; never loses entered data.
    pub fn back(&mut self) -> Result<Step, WizardError> {
        let step = self.current_step()?;
        let previous = step.previous().ok_or(WizardError::AtFirstStep)?;
        self.phase = Phase::InProgress(previous);
        Ok(previous)
    }

    /// The live estimate, shown once both dimensions have been entered.
    ///
    /// Returns `None` while either dimension is still empty; once both are
    /// present, invalid numeric input surfaces as an error rather than a
    /// silently defaulted price.
    pub fn preview_estimate(&self) -> Option<Result<PricingBreakdown, WizardError>> {
        if self.form.length_mm().trim().is_empty() || self.form.width_mm().trim().is_empty() {
            return None;
        }
        let result = self
            .form
            .specify()
            .map_err(WizardError::from)
            .and_then(|spec| self.pricing.calculate(&spec).map_err(WizardError::from));
        Some(result)
    }

    /// Validates the full form, prices it, sends the request through the
    /// intake, and freezes the session.
    ///
    /// # Errors
    ///
    /// `NotAtFinalStep` unless the wizard is on the contact step,
    /// `IncompleteStep` if its gate is closed, then any validation,
    /// pricing, or intake error. The session stays open on error.
    pub async fn submit(
        &mut self,
        intake: &dyn QuoteIntake,
    ) -> Result<SubmissionOutcome, WizardError> {
        let step = self.current_step()?;
        if step != Step::Contact {
            return Err(WizardError::NotAtFinalStep(step));
        }
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(WizardError::IncompleteStep { step, missing });
        }

        let quote = self.form.validate()?;
        let breakdown = self.pricing.calculate(&quote.spec)?;
        let request = QuoteRequest::new(quote, breakdown.estimate);

        let receipt = intake.send(&request).await?;
        info!(reference = %receipt.reference, "quote submitted");

        let outcome = SubmissionOutcome {
            receipt,
            estimate: breakdown.estimate,
        };
        self.form = QuoteForm::new();
        self.phase = Phase::Submitted(outcome.clone());
        Ok(outcome)
    }

    fn current_step(&self) -> Result<Step, WizardError> {
        self.step().ok_or(WizardError::AlreadySubmitted)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::intake::SimulatedIntake;
    use crate::models::{Finish, Material, ProjectType, Thickness, Urgency};

    fn wizard() -> QuoteWizard {
        QuoteWizard::new(PricingConfig::default())
    }

    fn advance_to_contact(wizard: &mut QuoteWizard) {
        let form = wizard.form_mut().unwrap();
        form.set_project_type(ProjectType::Couvertine);
        wizard.next().unwrap();

        let form = wizard.form_mut().unwrap();
        form.set_material(Material::Acier);
        form.set_thickness(Thickness::parse("3mm").unwrap()).unwrap();
        wizard.next().unwrap();

        let form = wizard.form_mut().unwrap();
        form.set_length_mm("2000");
        form.set_width_mm("500");
        wizard.next().unwrap();
    }

    fn fill_contact(wizard: &mut QuoteWizard) {
        let contact = wizard.form_mut().unwrap().contact_mut();
        contact.name = "Jean Dupont".to_string();
        contact.email = "jean@exemple.com".to_string();
        contact.phone = "06 12 34 56 78".to_string();
    }

    #[test]
    fn starts_on_project_type_step() {
        assert_eq!(wizard().step(), Some(Step::ProjectType));
    }

    #[test]
    fn next_is_blocked_until_project_type_is_set() {
        let mut wizard = wizard();

        let result = wizard.next();

        assert_eq!(
            result,
            Err(WizardError::IncompleteStep {
                step: Step::ProjectType,
                missing: vec![Field::ProjectType],
            })
        );
        assert_eq!(wizard.step(), Some(Step::ProjectType));
    }

    #[test]
    fn material_step_requires_both_material_and_thickness() {
        let mut wizard = wizard();
        wizard.form_mut().unwrap().set_project_type(ProjectType::Tolerie);
        wizard.next().unwrap();

        wizard.form_mut().unwrap().set_material(Material::Inox);

        assert_eq!(wizard.missing_fields(), vec![Field::Thickness]);
        assert!(!wizard.can_proceed());
    }

    #[test]
    fn back_is_rejected_on_the_first_step() {
        let mut wizard = wizard();

        assert_eq!(wizard.back(), Err(WizardError::AtFirstStep));
    }

    #[test]
    fn back_returns_without_losing_entered_data() {
        let mut wizard = wizard();
        advance_to_contact(&mut wizard);

        wizard.back().unwrap();

        assert_eq!(wizard.step(), Some(Step::DimensionsFinish));
        assert_eq!(wizard.form().length_mm(), "2000");
    }

    #[test]
    fn next_from_contact_step_is_rejected() {
        let mut wizard = wizard();
        advance_to_contact(&mut wizard);
        fill_contact(&mut wizard);

        assert_eq!(wizard.next(), Err(WizardError::AtFinalStep));
    }

    #[test]
    fn preview_is_hidden_until_both_dimensions_are_entered() {
        let mut wizard = wizard();
        wizard.form_mut().unwrap().set_project_type(ProjectType::Couvertine);
        wizard.next().unwrap();
        let form = wizard.form_mut().unwrap();
        form.set_material(Material::Acier);
        form.set_thickness(Thickness::parse("3mm").unwrap()).unwrap();
        wizard.next().unwrap();

        assert!(wizard.preview_estimate().is_none());

        wizard.form_mut().unwrap().set_length_mm("2000");
        assert!(wizard.preview_estimate().is_none());

        wizard.form_mut().unwrap().set_width_mm("500");
        let breakdown = wizard.preview_estimate().unwrap().unwrap();
        assert_eq!(breakdown.estimate.min, dec!(54));
        assert_eq!(breakdown.estimate.max, dec!(81));
    }

    #[test]
    fn preview_surfaces_invalid_numbers_instead_of_defaulting() {
        let mut wizard = wizard();
        advance_to_contact(&mut wizard);
        wizard.back().unwrap();
        wizard.form_mut().unwrap().set_width_mm("large");

        let result = wizard.preview_estimate().unwrap();

        assert!(matches!(result, Err(WizardError::Invalid(_))));
    }

    #[tokio::test]
    async fn submit_is_rejected_before_the_final_step() {
        let mut wizard = wizard();
        wizard.form_mut().unwrap().set_project_type(ProjectType::Couvertine);
        let intake = SimulatedIntake::new(Duration::ZERO);

        let result = wizard.submit(&intake).await;

        assert_eq!(result, Err(WizardError::NotAtFinalStep(Step::ProjectType)));
    }

    #[tokio::test]
    async fn submit_requires_contact_fields() {
        let mut wizard = wizard();
        advance_to_contact(&mut wizard);
        let intake = SimulatedIntake::new(Duration::ZERO);

        let result = wizard.submit(&intake).await;

        assert_eq!(
            result,
            Err(WizardError::IncompleteStep {
                step: Step::Contact,
                missing: vec![Field::ContactName, Field::ContactEmail, Field::ContactPhone],
            })
        );
    }

    #[tokio::test]
    async fn submit_freezes_the_session_and_discards_the_form() {
        let mut wizard = wizard();
        advance_to_contact(&mut wizard);
        fill_contact(&mut wizard);
        wizard.form_mut().unwrap().set_finish(Finish::Brut);
        wizard.form_mut().unwrap().set_urgency(Urgency::Standard);
        let intake = SimulatedIntake::new(Duration::ZERO);

        let outcome = wizard.submit(&intake).await.unwrap();

        assert_eq!(outcome.estimate, crate::calculations::EstimateRange {
            min: dec!(54),
            max: dec!(81),
        });
        assert_eq!(wizard.step(), None);
        assert_eq!(wizard.next(), Err(WizardError::AlreadySubmitted));
        assert_eq!(wizard.back(), Err(WizardError::AlreadySubmitted));
        assert!(matches!(wizard.form_mut(), Err(WizardError::AlreadySubmitted)));

        let another = wizard.submit(&intake).await;
        assert_eq!(another, Err(WizardError::AlreadySubmitted));
    }

    #[tokio::test]
    async fn submit_leaves_session_open_on_invalid_email() {
        let mut wizard = wizard();
        advance_to_contact(&mut wizard);
        fill_contact(&mut wizard);
        wizard.form_mut().unwrap().contact_mut().email = "jean".to_string();
        let intake = SimulatedIntake::new(Duration::ZERO);

        let result = wizard.submit(&intake).await;

        assert!(matches!(result, Err(WizardError::Invalid(_))));
        assert_eq!(wizard.step(), Some(Step::Contact));
    }
}
