//! Enquiry intake: draft state, validation, delivery, and the submission state machine.

pub mod delivery;
pub mod domain;
pub mod emailjs;
pub mod form;
pub mod repository;
pub mod router;
pub mod schema;
pub mod service;
pub mod tracker;
pub mod validation;

#[cfg(test)]
mod tests;

pub use delivery::{
    template_parameters, DeliveryError, DeliverySettings, EnquiryMailer, OutboundMessage,
    SubmissionClient, TemplateParameters,
};
pub use domain::{EnquiryDraft, EnquiryKind, FieldValue, FormId, UnknownEnquiryKind};
pub use emailjs::EmailJsClient;
pub use form::{EnquiryForm, FormSnapshot};
pub use repository::{FormRegistry, RegistryError};
pub use router::enquiry_router;
pub use schema::{EnquirySchema, FieldSpec, FieldType, NONE_PROVIDED, NOT_PROVIDED, NOT_SPECIFIED};
pub use service::{EnquiryService, EnquiryServiceError, FieldUpdate, SubmissionReport};
pub use tracker::{SubmissionStatus, SubmissionTracker, SubmitOutcome};
pub use validation::{validate, ValidationErrors, ValidationResult, Violation};
