//! Handler for the service root.

use axum::Json;

/// Greets callers hitting the bare origin.
///
/// # Endpoint
///
/// `GET /`
pub async fn root_handler() -> Json<&'static str> {
    Json("Welcome to the URL Shortener!")
}
