use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{EnquiryKind, FieldValue, FormId};
use super::repository::FormRegistry;
use super::service::{EnquiryService, EnquiryServiceError, FieldUpdate, SubmissionReport};
use super::tracker::{SubmissionStatus, SubmitOutcome};

#[derive(Debug, Deserialize)]
pub(crate) struct OpenFormRequest {
    pub(crate) kind: EnquiryKind,
}

/// Router builder exposing form lifecycle and one-shot submission endpoints.
pub fn enquiry_router<R>(service: Arc<EnquiryService<R>>) -> Router
where
    R: FormRegistry + 'static,
{
    Router::new()
        .route("/api/v1/enquiries/:kind", post(submit_enquiry_handler::<R>))
        .route("/api/v1/forms", post(open_form_handler::<R>))
        .route(
            "/api/v1/forms/:form_id",
            get(form_handler::<R>).delete(close_form_handler::<R>),
        )
        .route(
            "/api/v1/forms/:form_id/fields",
            patch(update_field_handler::<R>),
        )
        .route("/api/v1/forms/:form_id/submit", post(submit_form_handler::<R>))
        .route("/api/v1/forms/:form_id/reset", post(reset_form_handler::<R>))
        .with_state(service)
}

pub(crate) async fn submit_enquiry_handler<R>(
    State(service): State<Arc<EnquiryService<R>>>,
    Path(kind): Path<String>,
    Json(fields): Json<BTreeMap<String, FieldValue>>,
) -> Response
where
    R: FormRegistry + 'static,
{
    let kind = match kind.parse::<EnquiryKind>() {
        Ok(kind) => kind,
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            return (StatusCode::NOT_FOUND, Json(payload)).into_response();
        }
    };

    match service.submit_enquiry(kind, fields).await {
        Ok(report) => submission_response(report, false),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn open_form_handler<R>(
    State(service): State<Arc<EnquiryService<R>>>,
    Json(request): Json<OpenFormRequest>,
) -> Response
where
    R: FormRegistry + 'static,
{
    match service.open_form(request.kind) {
        Ok(snapshot) => (StatusCode::CREATED, Json(snapshot)).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn form_handler<R>(
    State(service): State<Arc<EnquiryService<R>>>,
    Path(form_id): Path<String>,
) -> Response
where
    R: FormRegistry + 'static,
{
    match service.form(&FormId(form_id)) {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn update_field_handler<R>(
    State(service): State<Arc<EnquiryService<R>>>,
    Path(form_id): Path<String>,
    Json(update): Json<FieldUpdate>,
) -> Response
where
    R: FormRegistry + 'static,
{
    match service.update_field(&FormId(form_id), update) {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn submit_form_handler<R>(
    State(service): State<Arc<EnquiryService<R>>>,
    Path(form_id): Path<String>,
) -> Response
where
    R: FormRegistry + 'static,
{
    match service.submit_form(&FormId(form_id)).await {
        Ok(report) => submission_response(report, true),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn reset_form_handler<R>(
    State(service): State<Arc<EnquiryService<R>>>,
    Path(form_id): Path<String>,
) -> Response
where
    R: FormRegistry + 'static,
{
    match service.reset_form(&FormId(form_id)) {
        Ok(snapshot) if snapshot.status == SubmissionStatus::Submitting => {
            let payload = json!({
                "error": "submission in progress",
                "form": snapshot,
            });
            (StatusCode::CONFLICT, Json(payload)).into_response()
        }
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn close_form_handler<R>(
    State(service): State<Arc<EnquiryService<R>>>,
    Path(form_id): Path<String>,
) -> Response
where
    R: FormRegistry + 'static,
{
    match service.close_form(&FormId(form_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => service_error_response(err),
    }
}

/// One-shot submissions register no form, so their responses carry no `form_id`.
fn submission_response(report: SubmissionReport, registered: bool) -> Response {
    let SubmissionReport { snapshot, outcome } = report;
    let kind = snapshot.kind;

    let (status, mut payload) = match outcome {
        SubmitOutcome::Delivered => (
            StatusCode::ACCEPTED,
            json!({
                "status": snapshot.status,
                "message": kind.success_message(),
            }),
        ),
        SubmitOutcome::Invalid(errors) => {
            let payload = json!({
                "error": "enquiry is incomplete",
                "violations": errors,
            });
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response();
        }
        SubmitOutcome::Failed(_) => (
            StatusCode::BAD_GATEWAY,
            json!({
                "error": kind.failure_message(),
                "status": snapshot.status,
            }),
        ),
        SubmitOutcome::Ignored => (
            StatusCode::CONFLICT,
            json!({
                "error": "a submission is already in progress or complete",
                "status": snapshot.status,
            }),
        ),
    };

    if registered {
        payload["form_id"] = json!(snapshot.form_id);
    }
    (status, Json(payload)).into_response()
}

fn service_error_response(err: EnquiryServiceError) -> Response {
    let status = match &err {
        EnquiryServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        EnquiryServiceError::UnknownField { .. } | EnquiryServiceError::FieldTypeMismatch { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        EnquiryServiceError::Registry(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": err.to_string() });
    (status, Json(payload)).into_response()
}
