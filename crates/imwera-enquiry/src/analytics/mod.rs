//! Fire-and-forget product analytics for the enquiry funnel.
//!
//! Notifier failures are logged and dropped; they never reach the caller or
//! affect submission status.

mod umami;

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::config::AnalyticsConfig;
use crate::enquiry::EnquiryKind;

pub use umami::UmamiAnalytics;

/// Funnel stage an event reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormLifecycle {
    Opened,
    Started,
    SubmitSucceeded,
    SubmitFailed,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyticsEvent {
    pub name: &'static str,
    pub properties: BTreeMap<String, String>,
}

impl AnalyticsEvent {
    pub fn form(kind: EnquiryKind, stage: FormLifecycle) -> Self {
        Self {
            name: event_name(kind, stage),
            properties: BTreeMap::new(),
        }
    }

    pub fn with_property(mut self, key: &str, value: impl Into<String>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }
}

fn event_name(kind: EnquiryKind, stage: FormLifecycle) -> &'static str {
    use EnquiryKind::*;
    use FormLifecycle::*;

    match (kind, stage) {
        (Sourcing, Opened) => "sourcing_modal_open",
        (Sourcing, Started) => "sourcing_form_start",
        (Sourcing, SubmitSucceeded) => "sourcing_form_submit_success",
        (Sourcing, SubmitFailed) => "sourcing_form_submit_error",
        (Sourcing, Closed) => "sourcing_modal_close",
        (GeneralContact, Opened) => "contact_form_view",
        (GeneralContact, Started) => "contact_form_start",
        (GeneralContact, SubmitSucceeded) => "contact_form_submit_success",
        (GeneralContact, SubmitFailed) => "contact_form_submit_error",
        (GeneralContact, Closed) => "contact_form_close",
        (PartnerIntroduction, Opened) => "partner_form_view",
        (PartnerIntroduction, Started) => "partner_form_start",
        (PartnerIntroduction, SubmitSucceeded) => "partner_form_submit_success",
        (PartnerIntroduction, SubmitFailed) => "partner_form_submit_error",
        (PartnerIntroduction, Closed) => "partner_form_close",
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    #[error("analytics transport unavailable: {0}")]
    Transport(String),
}

pub trait AnalyticsNotifier: Debug + Send + Sync {
    fn track(&self, event: AnalyticsEvent) -> Result<(), AnalyticsError>;
}

/// Emits `event`, swallowing any notifier error.
pub fn notify(notifier: &dyn AnalyticsNotifier, event: AnalyticsEvent) {
    let name = event.name;
    if let Err(err) = notifier.track(event) {
        debug!(event = name, error = %err, "analytics event dropped");
    }
}

/// Writes events to the log; used when no analytics backend is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAnalytics;

impl AnalyticsNotifier for TracingAnalytics {
    fn track(&self, event: AnalyticsEvent) -> Result<(), AnalyticsError> {
        info!(target: "analytics", event = event.name, properties = ?event.properties, "analytics event");
        Ok(())
    }
}

/// Picks Umami when configured, falling back to log output.
pub fn notifier_from_config(
    config: &AnalyticsConfig,
) -> Result<Arc<dyn AnalyticsNotifier>, AnalyticsError> {
    match (&config.host, &config.website_id) {
        (Some(host), Some(website_id)) => Ok(Arc::new(UmamiAnalytics::new(
            host,
            website_id,
            &config.hostname,
        )?)),
        _ => Ok(Arc::new(TracingAnalytics)),
    }
}
