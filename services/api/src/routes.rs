use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use imwera_enquiry::catalog::catalog_router;
use imwera_enquiry::enquiry::{enquiry_router, EnquiryService, FormRegistry};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_enquiry_routes<R>(service: Arc<EnquiryService<R>>) -> axum::Router
where
    R: FormRegistry + 'static,
{
    enquiry_router(service)
        .merge(catalog_router())
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::InMemoryFormRegistry;
    use axum::body::Body;
    use axum::http::Request;
    use imwera_enquiry::analytics::TracingAnalytics;
    use imwera_enquiry::config::EmailJsConfig;
    use imwera_enquiry::enquiry::{DeliverySettings, EmailJsClient, SubmissionClient};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::AtomicBool;
    use std::time::Duration;
    use tower::ServiceExt;

    fn app(ready: bool) -> axum::Router {
        let email = EmailJsConfig {
            api_url: "http://127.0.0.1:9/api/v1.0/email/send".to_string(),
            service_id: "service".to_string(),
            public_key: None,
            private_key: None,
            templates: imwera_enquiry::config::TemplateIds {
                sourcing: "sourcing".to_string(),
                contact: "contact".to_string(),
                partner: "partner".to_string(),
            },
            timeout: Duration::from_secs(1),
        };
        let mailer = EmailJsClient::new(&email).expect("http client");
        let client = SubmissionClient::new(DeliverySettings::from(&email), Arc::new(mailer));
        let service = Arc::new(EnquiryService::new(
            Arc::new(InMemoryFormRegistry::default()),
            Arc::new(client),
            Arc::new(TracingAnalytics),
        ));

        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        with_enquiry_routes(service).layer(Extension(state))
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn readiness_reflects_flag() {
        let response = app(false).oneshot(get("/ready")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = app(true).oneshot(get("/ready")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn health_and_catalogue_are_mounted() {
        let response = app(true).oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app(true).oneshot(get("/api/v1/origins")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app(true)
            .oneshot(get("/api/v1/origins/colombia"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unconfigured_email_yields_bad_gateway() {
        let body = json!({
            "name": "Sam Trader",
            "email": "sam@beans.co",
            "country": "UK",
            "message": "Hello"
        });
        let request = Request::post("/api/v1/enquiries/contact")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap();

        let response = app(true).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn metrics_endpoint_serves_text() {
        let response = app(true).oneshot(get("/metrics")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; version=0.0.4"
        );
    }
}
