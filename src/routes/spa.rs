//! Front-end rewrite for requests that match no route.
//!
//! Browser navigation to any non-API path is answered by the static file
//! service, which falls back to the index document. Requests under the API
//! prefix, or asking for JSON, get a JSON 404 instead of HTML.

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header::ACCEPT, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tower::ServiceExt;

use crate::config::{API_CONTENT_TYPE, API_PREFIX};
use crate::http::static_files::create_app_service;
use crate::state::AppState;

/// Whether the request is an API call rather than browser navigation.
pub fn is_api_request(request: &Request) -> bool {
    let path = request.uri().path();
    let under_api = path == API_PREFIX
        || path
            .strip_prefix(API_PREFIX)
            .is_some_and(|rest| rest.starts_with('/'));

    let wants_api = request
        .headers()
        .get_all(ACCEPT)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.to_ascii_lowercase().contains(API_CONTENT_TYPE));

    under_api || wants_api
}

/// Router fallback.
pub async fn fallback(State(state): State<AppState>, request: Request) -> Response {
    if is_api_request(&request) {
        tracing::debug!(path = %request.uri().path(), "No API route matched");
        return (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "not found" })),
        )
            .into_response();
    }

    let service = create_app_service(&state.config.static_files);
    match service.oneshot(request).await {
        Ok(response) => response.map(Body::new),
        Err(never) => match never {},
    }
}
