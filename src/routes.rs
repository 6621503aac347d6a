//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET    /`                    - Welcome message
//! - `GET    /health`              - Storage health check
//! - `GET    /{key}`               - Short link redirect
//! - `POST   /url`                 - Create a short link (rate limited)
//! - `GET    /admin/{secret_key}`  - Link details (rate limited)
//! - `DELETE /admin/{secret_key}`  - Deactivate link (rate limited)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket (configurable for proxy deployments)
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::middleware::{rate_limit, tracing};
use crate::state::AppState;
use axum::Router;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `behind_proxy` - when `true`, rate limiting reads client IP from
///   `X-Forwarded-For` / `X-Real-IP` headers instead of the peer socket address;
///   enable only when the service runs behind a trusted reverse proxy
pub fn app_router(state: AppState, behind_proxy: bool) -> NormalizePath<Router> {
    let management = api::routes::management_routes();
    let management = if behind_proxy {
        management.layer(rate_limit::proxied_layer())
    } else {
        management.layer(rate_limit::layer())
    };

    let router = Router::new()
        .merge(api::routes::public_routes())
        .merge(management)
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
