//! Core domain logic for the metalwork quote estimator: the option
//! catalog, the quote form and its validation, the pricing worksheet, the
//! four-step wizard, and the submission boundary.

pub mod calculations;
pub mod intake;
pub mod models;
pub mod validation;
pub mod wizard;

pub use calculations::{EstimateRange, PricingBreakdown, PricingConfig, PricingWorksheet};
pub use intake::{IntakeError, IntakeReceipt, QuoteIntake, QuoteRequest, SimulatedIntake};
pub use models::{QuoteForm, QuoteSpec, ValidatedQuote};
pub use validation::{Field, ValidationError};
pub use wizard::{Phase, QuoteWizard, Step, SubmissionOutcome, WizardError};
