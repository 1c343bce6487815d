use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::debug;

use super::{AnalyticsError, AnalyticsEvent, AnalyticsNotifier};

const USER_AGENT: &str = "imwera-enquiry/0.1 (server-side analytics)";
const TIMEOUT_SECONDS: u64 = 5;

#[derive(Debug, Serialize)]
struct UmamiPayload {
    website: String,
    hostname: String,
    url: &'static str,
    name: &'static str,
    data: BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
struct UmamiRequest {
    #[serde(rename = "type")]
    kind: &'static str,
    payload: UmamiPayload,
}

/// Posts events to an Umami instance on the current tokio runtime.
#[derive(Debug, Clone)]
pub struct UmamiAnalytics {
    http_client: reqwest::Client,
    endpoint: String,
    website_id: String,
    hostname: String,
}

impl UmamiAnalytics {
    pub fn new(host: &str, website_id: &str, hostname: &str) -> Result<Self, AnalyticsError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECONDS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|err| AnalyticsError::Transport(err.to_string()))?;

        Ok(Self {
            http_client,
            endpoint: format!("{}/api/send", host.trim_end_matches('/')),
            website_id: website_id.to_string(),
            hostname: hostname.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request_for(&self, event: AnalyticsEvent) -> UmamiRequest {
        UmamiRequest {
            kind: "event",
            payload: UmamiPayload {
                website: self.website_id.clone(),
                hostname: self.hostname.clone(),
                url: "/",
                name: event.name,
                data: event.properties,
            },
        }
    }
}

impl AnalyticsNotifier for UmamiAnalytics {
    fn track(&self, event: AnalyticsEvent) -> Result<(), AnalyticsError> {
        let runtime = Handle::try_current()
            .map_err(|err| AnalyticsError::Transport(format!("no async runtime: {err}")))?;

        let name = event.name;
        let request = self.request_for(event);
        let http_client = self.http_client.clone();
        let endpoint = self.endpoint.clone();

        runtime.spawn(async move {
            let outcome = http_client.post(&endpoint).json(&request).send().await;
            match outcome {
                Ok(response) if response.status().is_success() => {}
                Ok(response) => {
                    debug!(event = name, status = response.status().as_u16(), "umami rejected event")
                }
                Err(err) => debug!(event = name, error = %err, "umami unreachable"),
            }
        });

        Ok(())
    }
}
