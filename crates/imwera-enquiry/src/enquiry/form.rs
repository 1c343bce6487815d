use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analytics::{notify, AnalyticsEvent, AnalyticsNotifier, FormLifecycle};

use super::delivery::SubmissionClient;
use super::domain::{EnquiryDraft, EnquiryKind, FieldValue, FormId};
use super::tracker::{SubmissionStatus, SubmissionTracker, SubmitOutcome};

/// Serializable view of an open form for the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct FormSnapshot {
    pub form_id: FormId,
    pub kind: EnquiryKind,
    pub opened_at: DateTime<Utc>,
    pub status: SubmissionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub fields: BTreeMap<String, FieldValue>,
}

/// One open enquiry form: its draft, submission tracker, and analytics flags.
#[derive(Debug)]
pub struct EnquiryForm {
    id: FormId,
    kind: EnquiryKind,
    opened_at: DateTime<Utc>,
    draft: Mutex<EnquiryDraft>,
    tracker: SubmissionTracker,
    analytics: Arc<dyn AnalyticsNotifier>,
    started: AtomicBool,
}

impl EnquiryForm {
    pub fn new(
        kind: EnquiryKind,
        client: Arc<SubmissionClient>,
        analytics: Arc<dyn AnalyticsNotifier>,
    ) -> Self {
        Self {
            id: FormId::generate(),
            kind,
            opened_at: Utc::now(),
            draft: Mutex::new(EnquiryDraft::new(kind)),
            tracker: SubmissionTracker::new(client),
            analytics,
            started: AtomicBool::new(false),
        }
    }

    /// A pre-filled form for one-shot submissions; emits no open or start events.
    pub fn with_draft(
        draft: EnquiryDraft,
        client: Arc<SubmissionClient>,
        analytics: Arc<dyn AnalyticsNotifier>,
    ) -> Self {
        let form = Self::new(draft.kind(), client, analytics);
        *form.lock_draft() = draft;
        form.started.store(true, Ordering::Release);
        form
    }

    pub fn id(&self) -> &FormId {
        &self.id
    }

    pub fn kind(&self) -> EnquiryKind {
        self.kind
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    /// Time since the form was opened; zero if the clock went backwards.
    pub fn age(&self) -> std::time::Duration {
        (Utc::now() - self.opened_at).to_std().unwrap_or_default()
    }

    pub fn status(&self) -> SubmissionStatus {
        self.tracker.status()
    }

    pub fn draft(&self) -> EnquiryDraft {
        self.lock_draft().clone()
    }

    pub fn open(&self) {
        self.started.store(false, Ordering::Release);
        self.emit(FormLifecycle::Opened);
    }

    pub fn set_field(&self, name: &str, value: impl Into<String>) {
        self.mark_started();
        self.lock_draft().set_field(name, value);
    }

    pub fn toggle_selection(&self, name: &str, item: &str, included: bool) {
        self.mark_started();
        self.lock_draft().toggle_set_field(name, item, included);
    }

    pub async fn submit(&self) -> SubmitOutcome {
        let draft = self.draft();
        let outcome = self.tracker.submit(&draft).await;

        match &outcome {
            SubmitOutcome::Delivered => {
                notify(self.analytics.as_ref(), success_event(&draft));
                self.clear_draft();
            }
            SubmitOutcome::Failed(_) => self.emit(FormLifecycle::SubmitFailed),
            SubmitOutcome::Invalid(_) | SubmitOutcome::Ignored => {}
        }

        outcome
    }

    /// Success/Error → Idle with an empty draft. Refused while submitting.
    pub fn reset(&self) -> SubmissionStatus {
        self.tracker.reset_status_with(|| self.clear_draft())
    }

    /// Emits the close event (skipped after a successful submission) and
    /// discards the draft. An in-flight send is not aborted.
    pub fn close(&self) {
        if self.tracker.status() != SubmissionStatus::Success {
            self.emit(FormLifecycle::Closed);
        }
        self.clear_draft();
        self.tracker.reset_status();
    }

    pub fn snapshot(&self) -> FormSnapshot {
        let status = self.tracker.status();
        FormSnapshot {
            form_id: self.id.clone(),
            kind: self.kind,
            opened_at: self.opened_at,
            error: status.error().map(str::to_string),
            status,
            fields: self.lock_draft().fields().clone(),
        }
    }

    fn mark_started(&self) {
        if !self.started.swap(true, Ordering::AcqRel) {
            self.emit(FormLifecycle::Started);
        }
    }

    fn clear_draft(&self) {
        self.lock_draft().reset();
        self.started.store(false, Ordering::Release);
    }

    fn emit(&self, stage: FormLifecycle) {
        notify(self.analytics.as_ref(), AnalyticsEvent::form(self.kind, stage));
    }

    fn lock_draft(&self) -> MutexGuard<'_, EnquiryDraft> {
        self.draft
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn success_event(draft: &EnquiryDraft) -> AnalyticsEvent {
    let event = AnalyticsEvent::form(draft.kind(), FormLifecycle::SubmitSucceeded);
    if draft.kind() != EnquiryKind::Sourcing {
        return event;
    }

    let origins = draft.selection("origins");
    let origin_selected = match origins.as_slice() {
        [] => String::new(),
        [single] => single.to_string(),
        _ => "multiple".to_string(),
    };
    event
        .with_property("originSelected", origin_selected)
        .with_property("volumeRange", draft.text("volume").unwrap_or_default())
}
