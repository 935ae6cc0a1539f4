pub mod catalog;
pub mod quote_form;

pub use catalog::{
    Finish, Material, ProjectType, Service, Thickness, ThicknessParseError, Urgency,
};
pub use quote_form::{ContactDetails, ContactForm, QuoteForm, QuoteSpec, ValidatedQuote};
