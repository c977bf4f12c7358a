//! HTTP route handlers.
//!
//! `POST /` appends a row; `GET /`, `GET /config` and `GET /health` report
//! service status. Every response carries permissive CORS headers, and
//! `OPTIONS /` answers preflight requests.
//!
//! Request tracing is enabled via middleware that generates a unique request ID
//! for each incoming request, allowing correlation of all logs within a request.

pub mod append;
pub mod health;
pub mod status;

use axum::{middleware, routing::get, Router};
use http::header::{
    HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN,
};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::middleware::request_id_layer;
use crate::state::AppState;

pub const CORS_ALLOW_ORIGIN: &str = "*";
pub const CORS_ALLOW_METHODS: &str = "POST, OPTIONS";
pub const CORS_ALLOW_HEADERS: &str = "Content-Type";

/// Creates the Axum router with all routes and CORS headers.
pub fn create_router(state: AppState) -> Router {
    // Append endpoint shares the root path with the status page
    let root_routes = Router::new().route(
        "/",
        get(status::index)
            .post(append::submit)
            .options(append::preflight),
    );

    // Presence flags only, never the configured values
    let config_routes = Router::new().route("/config", get(status::config_flags));

    // Health check - liveness probe
    let health_routes = Router::new().route("/health", get(health::health));

    Router::new()
        .merge(root_routes)
        .merge(config_routes)
        .merge(health_routes)
        .with_state(state)
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static(CORS_ALLOW_ORIGIN),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(CORS_ALLOW_METHODS),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(CORS_ALLOW_HEADERS),
        ))
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}
