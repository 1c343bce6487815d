use axum::{
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;

use super::faqs::brokerage_faqs;
use super::origins::{Origin, OriginProfile};
use super::services::service_offerings;

/// Read-only catalogue endpoints backing the origin and brokerage pages.
pub fn catalog_router() -> Router {
    Router::new()
        .route("/api/v1/origins", get(list_origins))
        .route("/api/v1/origins/:slug", get(origin_detail))
        .route("/api/v1/services", get(list_services))
        .route("/api/v1/faqs", get(list_faqs))
}

async fn list_origins() -> Json<Vec<OriginProfile>> {
    Json(Origin::ALL.into_iter().map(Origin::profile).collect())
}

pub(crate) async fn origin_detail(Path(slug): Path<String>) -> Response {
    match Origin::from_slug(&slug) {
        Some(origin) => (StatusCode::OK, Json(origin.profile())).into_response(),
        None => {
            let payload = json!({ "error": format!("unknown origin '{slug}'") });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
    }
}

async fn list_services() -> impl IntoResponse {
    Json(service_offerings())
}

async fn list_faqs() -> impl IntoResponse {
    Json(brokerage_faqs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    #[tokio::test]
    async fn unknown_origin_is_not_found() {
        let response = origin_detail(Path("colombia".to_string())).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn origin_route_returns_profile() {
        let response = catalog_router()
            .oneshot(
                Request::get("/api/v1/origins/uganda")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
            .await
            .expect("read body");
        let value: serde_json::Value = serde_json::from_slice(&body).expect("json payload");
        assert_eq!(value["name"], "Uganda");
        assert_eq!(value["origin"], "uganda");
    }
}
