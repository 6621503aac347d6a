//! Handler for the URL creation endpoint.

use axum::{Json, extract::State};
use validator::Validate;

use crate::api::dto::{CreateUrlRequest, UrlInfoResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short URL and returns its public and admin links.
///
/// # Endpoint
///
/// `POST /url`
///
/// # Request Body
///
/// ```json
/// { "target_url": "https://example.com" }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "target_url": "https://example.com",
///   "is_active": true,
///   "clicks": 0,
///   "url": "http://localhost:8000/AB12C",
///   "admin_url": "http://localhost:8000/admin/AB12C_QWERTY12"
/// }
/// ```
///
/// The `admin_url` is the only place the secret key is ever shown.
///
/// # Errors
///
/// - 400 Bad Request if the URL is empty, malformed, or unreachable
/// - 422 Unprocessable Entity if `target_url` is missing from the body
/// - 500 Internal Server Error if no unique key could be allocated
pub async fn create_url_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateUrlRequest>,
) -> Result<Json<UrlInfoResponse>, AppError> {
    payload.validate()?;

    let target_url = state.target_validator.validate(&payload.target_url).await?;
    let record = state.url_service.create_url(&target_url).await?;

    Ok(Json(UrlInfoResponse::from_record(&record, &state.base_url)))
}
