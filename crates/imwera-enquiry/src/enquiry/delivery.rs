use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::EmailJsConfig;

use super::domain::{EnquiryDraft, EnquiryKind};
use super::schema::FieldType;

/// Template parameters sent alongside each templated message.
pub type TemplateParameters = BTreeMap<String, String>;

/// One outbound call to the transactional email service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundMessage {
    pub service_id: String,
    pub template_id: String,
    pub parameters: TemplateParameters,
    pub auth_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    #[error("email delivery is not configured: {0}")]
    Configuration(String),
    #[error("email transport failed: {0}")]
    Transport(String),
    #[error("email service rejected the message (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },
    #[error("expected a {expected} draft but received a {found} draft")]
    KindMismatch {
        expected: EnquiryKind,
        found: EnquiryKind,
    },
}

/// Transport seam for the email service so flows can be exercised without the network.
#[async_trait]
pub trait EnquiryMailer: Debug + Send + Sync {
    async fn send(&self, message: OutboundMessage) -> Result<(), DeliveryError>;
}

/// Maps a draft onto the fixed parameter set its template expects.
pub fn template_parameters(draft: &EnquiryDraft) -> TemplateParameters {
    let schema = draft.schema();
    let mut parameters: TemplateParameters = schema
        .fields
        .iter()
        .map(|spec| {
            let value = match spec.field_type {
                FieldType::Selection { .. } => {
                    let items = draft.selection(spec.name);
                    (!items.is_empty()).then(|| items.join(", "))
                }
                _ => draft.text(spec.name).map(str::to_string),
            };
            (
                spec.param.to_string(),
                value.unwrap_or_else(|| spec.fallback.to_string()),
            )
        })
        .collect();
    parameters.insert("form_type".to_string(), schema.form_type().to_string());
    parameters
}

/// Service identifier, credentials, and per-kind template identifiers.
#[derive(Debug, Clone)]
pub struct DeliverySettings {
    pub service_id: String,
    pub public_key: Option<String>,
    pub private_key: Option<String>,
    pub sourcing_template: String,
    pub contact_template: String,
    pub partner_template: String,
}

impl DeliverySettings {
    pub fn template_for(&self, kind: EnquiryKind) -> &str {
        match kind {
            EnquiryKind::Sourcing => &self.sourcing_template,
            EnquiryKind::GeneralContact => &self.contact_template,
            EnquiryKind::PartnerIntroduction => &self.partner_template,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.public_key.is_some()
    }
}

impl From<&EmailJsConfig> for DeliverySettings {
    fn from(config: &EmailJsConfig) -> Self {
        Self {
            service_id: config.service_id.clone(),
            public_key: config.public_key.clone(),
            private_key: config.private_key.clone(),
            sourcing_template: config.templates.sourcing.clone(),
            contact_template: config.templates.contact.clone(),
            partner_template: config.templates.partner.clone(),
        }
    }
}

/// Turns validated drafts into exactly one outbound message each. Never retries.
#[derive(Debug, Clone)]
pub struct SubmissionClient {
    settings: DeliverySettings,
    mailer: Arc<dyn EnquiryMailer>,
}

impl SubmissionClient {
    pub fn new(settings: DeliverySettings, mailer: Arc<dyn EnquiryMailer>) -> Self {
        Self { settings, mailer }
    }

    pub fn is_configured(&self) -> bool {
        self.settings.is_configured()
    }

    pub async fn send_sourcing_enquiry(&self, draft: &EnquiryDraft) -> Result<(), DeliveryError> {
        self.send_as(EnquiryKind::Sourcing, draft).await
    }

    pub async fn send_general_contact(&self, draft: &EnquiryDraft) -> Result<(), DeliveryError> {
        self.send_as(EnquiryKind::GeneralContact, draft).await
    }

    pub async fn send_partner_introduction(
        &self,
        draft: &EnquiryDraft,
    ) -> Result<(), DeliveryError> {
        self.send_as(EnquiryKind::PartnerIntroduction, draft).await
    }

    /// Dispatches on the draft's own kind.
    pub async fn send(&self, draft: &EnquiryDraft) -> Result<(), DeliveryError> {
        self.send_as(draft.kind(), draft).await
    }

    async fn send_as(&self, kind: EnquiryKind, draft: &EnquiryDraft) -> Result<(), DeliveryError> {
        if draft.kind() != kind {
            return Err(DeliveryError::KindMismatch {
                expected: kind,
                found: draft.kind(),
            });
        }

        let message = self.message_for(draft)?;
        debug!(kind = %kind, template = %message.template_id, "dispatching enquiry");
        self.mailer.send(message).await?;
        info!(kind = %kind, "enquiry delivered");
        Ok(())
    }

    pub fn message_for(&self, draft: &EnquiryDraft) -> Result<OutboundMessage, DeliveryError> {
        let auth_token = self.settings.public_key.clone().ok_or_else(|| {
            DeliveryError::Configuration("EMAILJS_PUBLIC_KEY is not set".to_string())
        })?;

        Ok(OutboundMessage {
            service_id: self.settings.service_id.clone(),
            template_id: self.settings.template_for(draft.kind()).to_string(),
            parameters: template_parameters(draft),
            auth_token,
            access_token: self.settings.private_key.clone(),
        })
    }
}
