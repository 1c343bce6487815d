use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::analytics::{AnalyticsError, AnalyticsEvent, AnalyticsNotifier};
use crate::enquiry::delivery::{
    DeliveryError, DeliverySettings, EnquiryMailer, OutboundMessage, SubmissionClient,
};
use crate::enquiry::domain::{EnquiryDraft, EnquiryKind, FormId};
use crate::enquiry::form::EnquiryForm;
use crate::enquiry::repository::{FormRegistry, RegistryError};
use crate::enquiry::service::EnquiryService;

pub(super) fn settings() -> DeliverySettings {
    DeliverySettings {
        service_id: "service_imwera".to_string(),
        public_key: Some("public-key".to_string()),
        private_key: None,
        sourcing_template: "template_sourcing".to_string(),
        contact_template: "template_contact".to_string(),
        partner_template: "template_partner".to_string(),
    }
}

pub(super) fn client_with(mailer: Arc<dyn EnquiryMailer>) -> Arc<SubmissionClient> {
    Arc::new(SubmissionClient::new(settings(), mailer))
}

pub(super) fn sourcing_draft() -> EnquiryDraft {
    let mut draft = EnquiryDraft::new(EnquiryKind::Sourcing);
    draft.set_field("name", "Jane Roaster");
    draft.set_field("company", "RoastCo");
    draft.set_field("email", "jane@roastco.com");
    draft.set_field("country", "USA");
    draft.toggle_set_field("origins", "Kenya", true);
    draft.toggle_set_field("origins", "Ethiopia", true);
    draft.set_field("volume", "1-5");
    draft
}

pub(super) fn contact_draft() -> EnquiryDraft {
    let mut draft = EnquiryDraft::new(EnquiryKind::GeneralContact);
    draft.set_field("name", "Sam Trader");
    draft.set_field("email", "sam@beans.co");
    draft.set_field("country", "UK");
    draft.set_field("message", "Hello");
    draft
}

pub(super) fn partner_draft() -> EnquiryDraft {
    let mut draft = EnquiryDraft::new(EnquiryKind::PartnerIntroduction);
    draft.set_field("name", "Amina Wanjiru");
    draft.set_field("organization", "Kiambu Growers Cooperative");
    draft.set_field("role", "Chairperson");
    draft.set_field("email", "amina@kiambu.coop");
    draft.set_field("country", "Kenya");
    draft.set_field("representing", "coop");
    draft.set_field("description", "1,200 smallholders producing washed SL28.");
    draft
}

/// Accepts every message and keeps a copy.
#[derive(Debug, Default)]
pub(super) struct RecordingMailer {
    messages: Mutex<Vec<OutboundMessage>>,
}

impl RecordingMailer {
    pub(super) fn messages(&self) -> Vec<OutboundMessage> {
        self.messages.lock().expect("mailer mutex poisoned").clone()
    }

    pub(super) fn calls(&self) -> usize {
        self.messages.lock().expect("mailer mutex poisoned").len()
    }
}

#[async_trait]
impl EnquiryMailer for RecordingMailer {
    async fn send(&self, message: OutboundMessage) -> Result<(), DeliveryError> {
        self.messages
            .lock()
            .expect("mailer mutex poisoned")
            .push(message);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub(super) struct FailingMailer {
    calls: AtomicUsize,
}

impl FailingMailer {
    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EnquiryMailer for FailingMailer {
    async fn send(&self, _message: OutboundMessage) -> Result<(), DeliveryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(DeliveryError::Transport("connection reset".to_string()))
    }
}

/// Yields once before succeeding so concurrent submitters interleave.
#[derive(Debug, Default)]
pub(super) struct YieldingMailer {
    calls: AtomicUsize,
}

impl YieldingMailer {
    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EnquiryMailer for YieldingMailer {
    async fn send(&self, _message: OutboundMessage) -> Result<(), DeliveryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub(super) struct RecordingAnalytics {
    events: Mutex<Vec<AnalyticsEvent>>,
}

impl RecordingAnalytics {
    pub(super) fn events(&self) -> Vec<AnalyticsEvent> {
        self.events.lock().expect("analytics mutex poisoned").clone()
    }

    pub(super) fn names(&self) -> Vec<&'static str> {
        self.events().into_iter().map(|event| event.name).collect()
    }
}

impl AnalyticsNotifier for RecordingAnalytics {
    fn track(&self, event: AnalyticsEvent) -> Result<(), AnalyticsError> {
        self.events
            .lock()
            .expect("analytics mutex poisoned")
            .push(event);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub(super) struct FailingAnalytics;

impl AnalyticsNotifier for FailingAnalytics {
    fn track(&self, _event: AnalyticsEvent) -> Result<(), AnalyticsError> {
        Err(AnalyticsError::Transport("blocked by extension".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryRegistry {
    pub(super) forms: Arc<Mutex<HashMap<FormId, Arc<EnquiryForm>>>>,
}

impl FormRegistry for MemoryRegistry {
    fn insert(&self, form: Arc<EnquiryForm>) -> Result<(), RegistryError> {
        let mut guard = self.forms.lock().expect("registry mutex poisoned");
        if guard.contains_key(form.id()) {
            return Err(RegistryError::Conflict);
        }
        guard.insert(form.id().clone(), form);
        Ok(())
    }

    fn fetch(&self, id: &FormId) -> Result<Option<Arc<EnquiryForm>>, RegistryError> {
        let guard = self.forms.lock().expect("registry mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn remove(&self, id: &FormId) -> Result<Option<Arc<EnquiryForm>>, RegistryError> {
        let mut guard = self.forms.lock().expect("registry mutex poisoned");
        Ok(guard.remove(id))
    }
}

pub(super) struct UnavailableRegistry;

impl FormRegistry for UnavailableRegistry {
    fn insert(&self, _form: Arc<EnquiryForm>) -> Result<(), RegistryError> {
        Err(RegistryError::Unavailable("session store offline".to_string()))
    }

    fn fetch(&self, _id: &FormId) -> Result<Option<Arc<EnquiryForm>>, RegistryError> {
        Err(RegistryError::Unavailable("session store offline".to_string()))
    }

    fn remove(&self, _id: &FormId) -> Result<Option<Arc<EnquiryForm>>, RegistryError> {
        Err(RegistryError::Unavailable("session store offline".to_string()))
    }
}

pub(super) struct Harness<M> {
    pub(super) service: Arc<EnquiryService<MemoryRegistry>>,
    pub(super) registry: Arc<MemoryRegistry>,
    pub(super) mailer: Arc<M>,
    pub(super) analytics: Arc<RecordingAnalytics>,
}

pub(super) fn build_service<M>(mailer: M) -> Harness<M>
where
    M: EnquiryMailer + 'static,
{
    let mailer = Arc::new(mailer);
    let registry = Arc::new(MemoryRegistry::default());
    let analytics = Arc::new(RecordingAnalytics::default());
    let service = Arc::new(EnquiryService::new(
        registry.clone(),
        client_with(mailer.clone()),
        analytics.clone(),
    ));
    Harness {
        service,
        registry,
        mailer,
        analytics,
    }
}

pub(super) fn form_with<M>(kind: EnquiryKind, mailer: Arc<M>) -> (EnquiryForm, Arc<RecordingAnalytics>)
where
    M: EnquiryMailer + 'static,
{
    let analytics = Arc::new(RecordingAnalytics::default());
    let form = EnquiryForm::new(kind, client_with(mailer), analytics.clone());
    (form, analytics)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
