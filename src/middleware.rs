//! Per-request tracing span for the health endpoint and the front end.
//!
//! The service runs behind a proxy, so an `x-request-id` set upstream is
//! reused when it is a valid UUID; otherwise one is generated. The span tags
//! each request as `api` or `app` (rewritten to the front end). Dependency
//! warnings logged by `/api/health` inherit its `request_id`, which ties a
//! 500 to the dependency that failed.

use std::time::Instant;

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Instrument;
use uuid::Uuid;

use crate::routes::spa::is_api_request;

/// Header read from the proxy and echoed on every response.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// ID of the current request, available to handlers as an extension.
#[derive(Clone, Debug)]
pub struct RequestId(pub Uuid);

impl RequestId {
    /// Take the proxy's ID when it parses, else mint a new one.
    fn for_request(request: &Request) -> Self {
        let upstream = request
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| Uuid::parse_str(v.trim()).ok());
        Self(upstream.unwrap_or_else(Uuid::new_v4))
    }
}

/// Outermost layer: wraps the request in a span and logs its completion.
pub async fn request_id_layer(mut request: Request, next: Next) -> Response {
    let RequestId(id) = RequestId::for_request(&request);
    let kind = if is_api_request(&request) { "api" } else { "app" };

    let span = tracing::info_span!(
        "request",
        request_id = %id,
        kind,
        method = %request.method(),
        path = %request.uri().path(),
        status = tracing::field::Empty,
        duration_ms = tracing::field::Empty,
    );
    request.extensions_mut().insert(RequestId(id));

    let start = Instant::now();
    let mut response = next.run(request).instrument(span.clone()).await;
    let duration_ms = start.elapsed().as_millis() as u64;
    let status = response.status();

    span.record("status", status.as_u16());
    span.record("duration_ms", duration_ms);
    span.in_scope(|| {
        if status.is_server_error() {
            tracing::warn!("Request failed");
        } else {
            tracing::info!("Request completed");
        }
    });

    if let Ok(value) = HeaderValue::from_str(&id.to_string()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
