use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use tracing::{info, warn};

use super::delivery::SubmissionClient;
use super::domain::{EnquiryDraft, EnquiryKind};
use super::validation::{validate, ValidationErrors};

/// Lifecycle of one form's current submission attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum SubmissionStatus {
    Idle,
    Submitting,
    Success,
    /// Carries the generic per-kind failure message, never the delivery cause.
    Error(String),
}

impl SubmissionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            SubmissionStatus::Idle => "idle",
            SubmissionStatus::Submitting => "submitting",
            SubmissionStatus::Success => "success",
            SubmissionStatus::Error(_) => "error",
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            SubmissionStatus::Error(reason) => Some(reason),
            _ => None,
        }
    }
}

/// Result of a single `submit` call.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum SubmitOutcome {
    Delivered,
    /// Delivery was attempted and failed; status is now `Error`. Holds the
    /// delivery cause for in-process callers.
    Failed(String),
    /// Validation failed; the client was not called and status is unchanged.
    Invalid(ValidationErrors),
    /// A submission is already in flight, or the last one succeeded and has
    /// not been reset.
    Ignored,
}

/// Submission state machine: Idle → Submitting → Success | Error → Idle.
///
/// The status lock is never held across the outbound call, so callers may
/// share the tracker; the Idle → Submitting step is a single check-and-set.
#[derive(Debug)]
pub struct SubmissionTracker {
    client: Arc<SubmissionClient>,
    status: Mutex<SubmissionStatus>,
}

impl SubmissionTracker {
    pub fn new(client: Arc<SubmissionClient>) -> Self {
        Self {
            client,
            status: Mutex::new(SubmissionStatus::Idle),
        }
    }

    pub fn status(&self) -> SubmissionStatus {
        self.lock().clone()
    }

    pub fn error(&self) -> Option<String> {
        self.lock().error().map(str::to_string)
    }

    /// Returns to `Idle` from `Success` or `Error`. An in-flight submission is
    /// left to finish; the current status is returned unchanged in that case.
    pub fn reset_status(&self) -> SubmissionStatus {
        self.reset_status_with(|| {})
    }

    /// Like `reset_status`, running `clear` under the same status guard so no
    /// submission can start between the check and the clear. `clear` is
    /// skipped when the reset is refused.
    pub fn reset_status_with(&self, clear: impl FnOnce()) -> SubmissionStatus {
        let mut status = self.lock();
        if !matches!(*status, SubmissionStatus::Submitting) {
            clear();
            *status = SubmissionStatus::Idle;
        }
        status.clone()
    }

    pub async fn submit_sourcing_enquiry(&self, draft: &EnquiryDraft) -> SubmitOutcome {
        self.submit_as(EnquiryKind::Sourcing, draft).await
    }

    pub async fn submit_general_contact(&self, draft: &EnquiryDraft) -> SubmitOutcome {
        self.submit_as(EnquiryKind::GeneralContact, draft).await
    }

    pub async fn submit_partner_introduction(&self, draft: &EnquiryDraft) -> SubmitOutcome {
        self.submit_as(EnquiryKind::PartnerIntroduction, draft).await
    }

    pub async fn submit(&self, draft: &EnquiryDraft) -> SubmitOutcome {
        self.submit_as(draft.kind(), draft).await
    }

    async fn submit_as(&self, kind: EnquiryKind, draft: &EnquiryDraft) -> SubmitOutcome {
        {
            let mut status = self.lock();
            match *status {
                SubmissionStatus::Submitting | SubmissionStatus::Success => {
                    return SubmitOutcome::Ignored
                }
                SubmissionStatus::Idle | SubmissionStatus::Error(_) => {}
            }

            if let Err(errors) = validate(draft, draft.schema()) {
                info!(kind = %kind, fields = ?errors.fields(), "enquiry blocked by validation");
                return SubmitOutcome::Invalid(errors);
            }

            *status = SubmissionStatus::Submitting;
        }

        let result = match kind {
            EnquiryKind::Sourcing => self.client.send_sourcing_enquiry(draft).await,
            EnquiryKind::GeneralContact => self.client.send_general_contact(draft).await,
            EnquiryKind::PartnerIntroduction => {
                self.client.send_partner_introduction(draft).await
            }
        };

        let mut status = self.lock();
        match result {
            Ok(()) => {
                *status = SubmissionStatus::Success;
                SubmitOutcome::Delivered
            }
            Err(err) => {
                warn!(kind = %kind, error = %err, "enquiry delivery failed");
                *status = SubmissionStatus::Error(kind.failure_message().to_string());
                SubmitOutcome::Failed(err.to_string())
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, SubmissionStatus> {
        // Writers never panic while holding the guard.
        self.status
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
