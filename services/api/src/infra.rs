use imwera_enquiry::enquiry::{
    EnquiryDraft, EnquiryForm, EnquiryKind, FieldValue, FormId, FormRegistry, RegistryError,
    SubmissionStatus,
};
use imwera_enquiry::error::AppError;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::debug;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Open forms older than this are dropped.
const FORM_TTL: Duration = Duration::from_secs(2 * 60 * 60);
const MAX_OPEN_FORMS: usize = 10_000;

/// Process-local store for open forms. Forms are lost on restart.
///
/// Expired forms are swept on insert and hidden on fetch. When the store is
/// full, the oldest form that is not mid-submission makes room.
#[derive(Clone)]
pub(crate) struct InMemoryFormRegistry {
    forms: Arc<Mutex<HashMap<FormId, Arc<EnquiryForm>>>>,
    ttl: Duration,
    capacity: usize,
}

impl Default for InMemoryFormRegistry {
    fn default() -> Self {
        Self::with_limits(FORM_TTL, MAX_OPEN_FORMS)
    }
}

impl InMemoryFormRegistry {
    pub(crate) fn with_limits(ttl: Duration, capacity: usize) -> Self {
        Self {
            forms: Arc::default(),
            ttl,
            capacity,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<FormId, Arc<EnquiryForm>>>, RegistryError> {
        self.forms
            .lock()
            .map_err(|_| RegistryError::Unavailable("form registry mutex poisoned".to_string()))
    }

    fn is_expired(&self, form: &EnquiryForm) -> bool {
        form.age() > self.ttl && form.status() != SubmissionStatus::Submitting
    }

    fn make_room(&self, forms: &mut HashMap<FormId, Arc<EnquiryForm>>) -> Result<(), RegistryError> {
        let before = forms.len();
        forms.retain(|_, form| !self.is_expired(form));
        if forms.len() < before {
            debug!(evicted = before - forms.len(), "expired enquiry forms dropped");
        }

        if forms.len() < self.capacity {
            return Ok(());
        }
        let oldest = forms
            .values()
            .filter(|form| form.status() != SubmissionStatus::Submitting)
            .min_by_key(|form| form.opened_at())
            .map(|form| form.id().clone())
            .ok_or_else(|| RegistryError::Unavailable("form registry is full".to_string()))?;
        debug!(form_id = %oldest, "oldest enquiry form dropped to make room");
        forms.remove(&oldest);
        Ok(())
    }
}

impl FormRegistry for InMemoryFormRegistry {
    fn insert(&self, form: Arc<EnquiryForm>) -> Result<(), RegistryError> {
        let mut guard = self.lock()?;
        if guard.contains_key(form.id()) {
            return Err(RegistryError::Conflict);
        }
        self.make_room(&mut guard)?;
        guard.insert(form.id().clone(), form);
        Ok(())
    }

    fn fetch(&self, id: &FormId) -> Result<Option<Arc<EnquiryForm>>, RegistryError> {
        let mut guard = self.lock()?;
        if guard.get(id).is_some_and(|form| self.is_expired(form)) {
            guard.remove(id);
            return Ok(None);
        }
        Ok(guard.get(id).cloned())
    }

    fn remove(&self, id: &FormId) -> Result<Option<Arc<EnquiryForm>>, RegistryError> {
        Ok(self.lock()?.remove(id))
    }
}

pub(crate) fn parse_kind(raw: &str) -> Result<EnquiryKind, String> {
    raw.parse::<EnquiryKind>().map_err(|err| err.to_string())
}

/// Reads a JSON object of field values, e.g. `{"name": "Jane", "origins": ["Kenya"]}`.
pub(crate) fn read_fields(path: &Path) -> Result<BTreeMap<String, FieldValue>, AppError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Builds a draft, refusing names the kind's form does not declare.
pub(crate) fn draft_from_fields(
    kind: EnquiryKind,
    fields: BTreeMap<String, FieldValue>,
) -> Result<EnquiryDraft, AppError> {
    let unknown: Vec<&str> = fields
        .keys()
        .map(String::as_str)
        .filter(|name| kind.schema().field(name).is_none())
        .collect();
    if !unknown.is_empty() {
        return Err(AppError::Input(format!(
            "unknown {kind} fields: {}",
            unknown.join(", ")
        )));
    }
    Ok(EnquiryDraft::from_fields(kind, fields))
}

#[cfg(test)]
mod tests {
    use super::*;
    use imwera_enquiry::analytics::TracingAnalytics;
    use imwera_enquiry::enquiry::{DeliverySettings, EnquiryMailer, SubmissionClient};

    #[derive(Debug)]
    struct NullMailer;

    #[async_trait::async_trait]
    impl EnquiryMailer for NullMailer {
        async fn send(
            &self,
            _message: imwera_enquiry::enquiry::OutboundMessage,
        ) -> Result<(), imwera_enquiry::enquiry::DeliveryError> {
            Ok(())
        }
    }

    fn form() -> Arc<EnquiryForm> {
        let settings = DeliverySettings {
            service_id: "service".to_string(),
            public_key: None,
            private_key: None,
            sourcing_template: "sourcing".to_string(),
            contact_template: "contact".to_string(),
            partner_template: "partner".to_string(),
        };
        Arc::new(EnquiryForm::new(
            EnquiryKind::GeneralContact,
            Arc::new(SubmissionClient::new(settings, Arc::new(NullMailer))),
            Arc::new(TracingAnalytics),
        ))
    }

    #[test]
    fn registry_rejects_duplicate_ids() {
        let registry = InMemoryFormRegistry::default();
        let form = form();
        registry.insert(form.clone()).expect("first insert");
        assert!(matches!(
            registry.insert(form.clone()),
            Err(RegistryError::Conflict)
        ));
        assert_eq!(registry.forms.lock().expect("registry").len(), 1);

        assert!(registry.remove(form.id()).expect("remove").is_some());
        assert!(registry.fetch(form.id()).expect("fetch").is_none());
    }

    #[test]
    fn stale_forms_are_evicted() {
        let registry = InMemoryFormRegistry::with_limits(Duration::ZERO, 100);
        let stale = form();
        registry.insert(stale.clone()).expect("insert stale");
        std::thread::sleep(Duration::from_millis(5));

        assert!(registry.fetch(stale.id()).expect("fetch").is_none());

        let abandoned = form();
        registry.insert(abandoned.clone()).expect("insert abandoned");
        std::thread::sleep(Duration::from_millis(5));
        let fresh = form();
        registry.insert(fresh.clone()).expect("insert fresh");

        let forms = registry.forms.lock().expect("registry");
        assert_eq!(forms.len(), 1);
        assert!(forms.contains_key(fresh.id()));
    }

    #[test]
    fn full_registry_drops_the_oldest_form() {
        let registry = InMemoryFormRegistry::with_limits(FORM_TTL, 2);
        let first = form();
        registry.insert(first.clone()).expect("first");
        std::thread::sleep(Duration::from_millis(2));
        let second = form();
        registry.insert(second.clone()).expect("second");
        let third = form();
        registry.insert(third.clone()).expect("third");

        assert!(registry.fetch(first.id()).expect("fetch").is_none());
        assert!(registry.fetch(second.id()).expect("fetch").is_some());
        assert!(registry.fetch(third.id()).expect("fetch").is_some());
    }

    #[test]
    fn draft_from_fields_rejects_undeclared_names() {
        let mut fields = BTreeMap::new();
        fields.insert("name".to_string(), FieldValue::Text("Sam".to_string()));
        fields.insert("origins".to_string(), FieldValue::Text("Kenya".to_string()));

        let err = draft_from_fields(EnquiryKind::GeneralContact, fields).expect_err("unknown");
        assert_eq!(err.to_string(), "invalid input: unknown contact fields: origins");
    }

    #[test]
    fn parse_kind_reports_expected_slugs() {
        assert_eq!(parse_kind("sourcing"), Ok(EnquiryKind::Sourcing));
        assert!(parse_kind("newsletter")
            .expect_err("unknown kind")
            .contains("sourcing, contact, or partner"));
    }
}
