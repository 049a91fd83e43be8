//! HTTP routes.
//!
//! Routes are grouped by caching policy, each group carrying its own
//! Cache-Control header:
//! - `/api/health` is never cached
//! - fingerprinted assets under the asset prefix are cached for a year
//! - everything else falls through to the front-end rewrite
//!
//! Request tracing is enabled via middleware that generates a unique request ID
//! for each incoming request, allowing correlation of all logs within a request.

pub mod health;
pub mod spa;

use axum::{middleware, routing::get, Router};
use axum::http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::config::{CACHE_CONTROL_HEALTH, CACHE_CONTROL_STATIC, HEALTH_PATH};
use crate::http::static_files::create_asset_service;
use crate::middleware::request_id_layer;
use crate::state::AppState;

/// Creates the Axum router with all routes and cache headers.
pub fn create_router(state: AppState) -> Router {
    let health_routes = Router::new()
        .route(HEALTH_PATH, get(health::health))
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_HEALTH),
        ));

    let static_routes = Router::new()
        .nest_service(
            &state.config.static_files.asset_prefix,
            create_asset_service(&state.config.static_files),
        )
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_STATIC),
        ));

    Router::new()
        .merge(health_routes)
        .merge(static_routes)
        .fallback(spa::fallback)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}
