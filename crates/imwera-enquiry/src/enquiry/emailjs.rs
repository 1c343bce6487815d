use async_trait::async_trait;
use serde::Serialize;
use tracing::warn;

use crate::config::EmailJsConfig;

use super::delivery::{DeliveryError, EnquiryMailer, OutboundMessage, TemplateParameters};

/// Request body accepted by the EmailJS `email/send` endpoint.
#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: &'a TemplateParameters,
    #[serde(rename = "accessToken", skip_serializing_if = "Option::is_none")]
    access_token: Option<&'a str>,
}

/// Async EmailJS REST client.
#[derive(Debug, Clone)]
pub struct EmailJsClient {
    http_client: reqwest::Client,
    endpoint: String,
}

impl EmailJsClient {
    pub fn new(config: &EmailJsConfig) -> Result<Self, DeliveryError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| {
                DeliveryError::Configuration(format!("failed to build HTTP client: {err}"))
            })?;

        Ok(Self {
            http_client,
            endpoint: config.api_url.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl EnquiryMailer for EmailJsClient {
    async fn send(&self, message: OutboundMessage) -> Result<(), DeliveryError> {
        let body = SendRequest {
            service_id: &message.service_id,
            template_id: &message.template_id,
            user_id: &message.auth_token,
            template_params: &message.parameters,
            access_token: message.access_token.as_deref(),
        };

        let response = self
            .http_client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|err| DeliveryError::Transport(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        warn!(status = status.as_u16(), body = %error_text, "EmailJS rejected message");
        Err(DeliveryError::Rejected {
            status: status.as_u16(),
            body: error_text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn request_body_uses_emailjs_field_names() {
        let mut params = BTreeMap::new();
        params.insert("from_name".to_string(), "Jane Roaster".to_string());
        let body = SendRequest {
            service_id: "service_1",
            template_id: "template_sourcing",
            user_id: "pk_123",
            template_params: &params,
            access_token: None,
        };

        let json = serde_json::to_value(&body).expect("serializes");
        assert_eq!(json["user_id"], "pk_123");
        assert_eq!(json["template_params"]["from_name"], "Jane Roaster");
        assert!(json.get("accessToken").is_none());
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_transport_error() {
        let config = EmailJsConfig {
            api_url: "http://127.0.0.1:9/api/v1.0/email/send".to_string(),
            service_id: "service_1".to_string(),
            public_key: Some("pk_123".to_string()),
            private_key: None,
            templates: crate::config::TemplateIds {
                sourcing: "t1".to_string(),
                contact: "t2".to_string(),
                partner: "t3".to_string(),
            },
            timeout: std::time::Duration::from_secs(2),
        };
        let client = EmailJsClient::new(&config).expect("client builds");
        let message = OutboundMessage {
            service_id: "service_1".to_string(),
            template_id: "t1".to_string(),
            parameters: BTreeMap::new(),
            auth_token: "pk_123".to_string(),
            access_token: None,
        };

        match client.send(message).await {
            Err(DeliveryError::Transport(_)) => {}
            other => panic!("expected transport error, got {other:?}"),
        }
    }
}
