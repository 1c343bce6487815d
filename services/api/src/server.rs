use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryFormRegistry};
use crate::routes::with_enquiry_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use imwera_enquiry::analytics::notifier_from_config;
use imwera_enquiry::config::AppConfig;
use imwera_enquiry::enquiry::{DeliverySettings, EmailJsClient, EnquiryService, SubmissionClient};
use imwera_enquiry::error::AppError;
use imwera_enquiry::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let mailer = EmailJsClient::new(&config.email)?;
    let client = SubmissionClient::new(DeliverySettings::from(&config.email), Arc::new(mailer));
    if !client.is_configured() {
        warn!("EMAILJS_PUBLIC_KEY is not set; enquiries will fail until it is configured");
    }

    let analytics = notifier_from_config(&config.analytics)?;
    if !config.analytics.is_enabled() {
        info!("umami analytics not configured; events are logged only");
    }

    let enquiry_service = Arc::new(EnquiryService::new(
        Arc::new(InMemoryFormRegistry::default()),
        Arc::new(client),
        analytics,
    ));

    let app = with_enquiry_routes(enquiry_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "imwera enquiry service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
