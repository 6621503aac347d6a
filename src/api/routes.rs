//! API route groups.

use crate::api::handlers::{
    admin_info_handler, create_url_handler, deactivate_handler, health_handler, redirect_handler,
    root_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Endpoints that create records or act on a secret key.
///
/// # Endpoints
///
/// - `POST   /url`                  - Create a short URL
/// - `GET    /admin/{secret_key}`   - Record details
/// - `DELETE /admin/{secret_key}`   - Deactivate the record
pub fn management_routes() -> Router<AppState> {
    Router::new()
        .route("/url", post(create_url_handler))
        .route(
            "/admin/{secret_key}",
            get(admin_info_handler).delete(deactivate_handler),
        )
}

/// Unthrottled endpoints.
///
/// # Endpoints
///
/// - `GET /`        - Welcome message
/// - `GET /health`  - Storage health
/// - `GET /{key}`   - Redirect to the target URL
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/{key}", get(redirect_handler))
}
