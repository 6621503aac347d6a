//! Handlers for secret-key administration endpoints.
//!
//! Possession of the secret key is the only authorization: whoever holds it
//! can read the record's stats and deactivate it.

use axum::{
    Json,
    extract::{OriginalUri, Path, State},
};

use super::name_missing_url;
use crate::api::dto::{DetailResponse, UrlInfoResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Returns the record's details, including its click count.
///
/// # Endpoint
///
/// `GET /admin/{secret_key}`
///
/// Does not count as a click.
///
/// # Errors
///
/// Returns 404 Not Found if no active record owns the secret key.
pub async fn admin_info_handler(
    Path(secret_key): Path<String>,
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
) -> Result<Json<UrlInfoResponse>, AppError> {
    let record = state
        .url_service
        .admin_info(&secret_key)
        .await
        .map_err(|e| name_missing_url(e, &state.base_url, &uri))?;

    Ok(Json(UrlInfoResponse::from_record(&record, &state.base_url)))
}

/// Deactivates the record owning the secret key.
///
/// # Endpoint
///
/// `DELETE /admin/{secret_key}`
///
/// # Response
///
/// ```json
/// { "detail": "Successfully deleted shortened URL for 'https://example.com'" }
/// ```
///
/// The row is kept; its public key is never reissued.
///
/// # Errors
///
/// Returns 404 Not Found if no active record owns the secret key, which
/// includes a second delete of the same record.
pub async fn deactivate_handler(
    Path(secret_key): Path<String>,
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
) -> Result<Json<DetailResponse>, AppError> {
    let record = state
        .url_service
        .deactivate(&secret_key)
        .await
        .map_err(|e| name_missing_url(e, &state.base_url, &uri))?;

    Ok(Json(DetailResponse {
        detail: format!(
            "Successfully deleted shortened URL for '{}'",
            record.target_url
        ),
    }))
}
