use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analytics::AnalyticsNotifier;

use super::delivery::SubmissionClient;
use super::domain::{EnquiryDraft, EnquiryKind, FieldValue, FormId};
use super::form::{EnquiryForm, FormSnapshot};
use super::repository::{FormRegistry, RegistryError};
use super::schema::FieldType;
use super::tracker::{SubmissionStatus, SubmitOutcome};

/// A single edit coming from the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum FieldUpdate {
    Set {
        field: String,
        value: String,
    },
    Toggle {
        field: String,
        item: String,
        included: bool,
    },
}

impl FieldUpdate {
    pub fn field(&self) -> &str {
        match self {
            FieldUpdate::Set { field, .. } | FieldUpdate::Toggle { field, .. } => field,
        }
    }
}

#[derive(Debug)]
pub struct SubmissionReport {
    pub snapshot: FormSnapshot,
    pub outcome: SubmitOutcome,
}

/// Service composing the form registry, submission client, and analytics notifier.
pub struct EnquiryService<R> {
    registry: Arc<R>,
    client: Arc<SubmissionClient>,
    analytics: Arc<dyn AnalyticsNotifier>,
}

impl<R> EnquiryService<R>
where
    R: FormRegistry + 'static,
{
    pub fn new(
        registry: Arc<R>,
        client: Arc<SubmissionClient>,
        analytics: Arc<dyn AnalyticsNotifier>,
    ) -> Self {
        Self {
            registry,
            client,
            analytics,
        }
    }

    pub fn open_form(&self, kind: EnquiryKind) -> Result<FormSnapshot, EnquiryServiceError> {
        let form = Arc::new(EnquiryForm::new(
            kind,
            self.client.clone(),
            self.analytics.clone(),
        ));
        form.open();
        self.registry.insert(form.clone())?;
        info!(form_id = %form.id(), kind = %kind, "enquiry form opened");
        Ok(form.snapshot())
    }

    pub fn form(&self, id: &FormId) -> Result<FormSnapshot, EnquiryServiceError> {
        Ok(self.fetch(id)?.snapshot())
    }

    pub fn update_field(
        &self,
        id: &FormId,
        update: FieldUpdate,
    ) -> Result<FormSnapshot, EnquiryServiceError> {
        let form = self.fetch(id)?;
        check_update(form.kind(), &update)?;

        match update {
            FieldUpdate::Set { field, value } => form.set_field(&field, value),
            FieldUpdate::Toggle {
                field,
                item,
                included,
            } => form.toggle_selection(&field, &item, included),
        }

        Ok(form.snapshot())
    }

    pub async fn submit_form(&self, id: &FormId) -> Result<SubmissionReport, EnquiryServiceError> {
        let form = self.fetch(id)?;
        let outcome = form.submit().await;
        Ok(SubmissionReport {
            snapshot: form.snapshot(),
            outcome,
        })
    }

    /// Returns the resulting status; `Submitting` means the reset was refused.
    pub fn reset_form(&self, id: &FormId) -> Result<FormSnapshot, EnquiryServiceError> {
        let form = self.fetch(id)?;
        form.reset();
        Ok(form.snapshot())
    }

    pub fn close_form(&self, id: &FormId) -> Result<(), EnquiryServiceError> {
        let form = self
            .registry
            .remove(id)?
            .ok_or_else(|| EnquiryServiceError::NotFound(id.clone()))?;
        form.close();
        info!(form_id = %id, "enquiry form closed");
        Ok(())
    }

    /// Validates and delivers a complete enquiry in one call, without registering a form.
    pub async fn submit_enquiry(
        &self,
        kind: EnquiryKind,
        fields: BTreeMap<String, FieldValue>,
    ) -> Result<SubmissionReport, EnquiryServiceError> {
        for (name, value) in &fields {
            check_value(kind, name, value)?;
        }

        let draft = EnquiryDraft::from_fields(kind, fields);
        let form = EnquiryForm::with_draft(draft, self.client.clone(), self.analytics.clone());
        let outcome = form.submit().await;
        Ok(SubmissionReport {
            snapshot: form.snapshot(),
            outcome,
        })
    }

    fn fetch(&self, id: &FormId) -> Result<Arc<EnquiryForm>, EnquiryServiceError> {
        self.registry
            .fetch(id)?
            .ok_or_else(|| EnquiryServiceError::NotFound(id.clone()))
    }
}

fn check_update(kind: EnquiryKind, update: &FieldUpdate) -> Result<(), EnquiryServiceError> {
    let is_toggle = matches!(update, FieldUpdate::Toggle { .. });
    check_field(kind, update.field(), is_toggle)
}

fn check_value(
    kind: EnquiryKind,
    name: &str,
    value: &FieldValue,
) -> Result<(), EnquiryServiceError> {
    check_field(kind, name, matches!(value, FieldValue::Selection(_)))
}

fn check_field(kind: EnquiryKind, name: &str, multi: bool) -> Result<(), EnquiryServiceError> {
    let spec = kind
        .schema()
        .field(name)
        .ok_or_else(|| EnquiryServiceError::UnknownField {
            kind,
            field: name.to_string(),
        })?;

    let is_selection = matches!(spec.field_type, FieldType::Selection { .. });
    if is_selection != multi {
        return Err(EnquiryServiceError::FieldTypeMismatch {
            field: name.to_string(),
            expected: if is_selection { "selection" } else { "text" },
        });
    }
    Ok(())
}

/// Error raised by the enquiry service.
#[derive(Debug, thiserror::Error)]
pub enum EnquiryServiceError {
    #[error("enquiry form {0} not found")]
    NotFound(FormId),
    #[error("{field} is not a field of the {kind} enquiry")]
    UnknownField { kind: EnquiryKind, field: String },
    #[error("{field} expects a {expected} value")]
    FieldTypeMismatch {
        field: String,
        expected: &'static str,
    },
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl SubmissionReport {
    pub fn status(&self) -> &SubmissionStatus {
        &self.snapshot.status
    }
}
