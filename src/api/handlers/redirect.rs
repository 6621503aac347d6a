//! Handler for short URL redirect.

use axum::{
    extract::{OriginalUri, Path, State},
    response::Redirect,
};
use tracing::debug;

use super::name_missing_url;
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a public key to its target URL.
///
/// # Endpoint
///
/// `GET /{key}`
///
/// Each successful redirect increments the record's click counter once, in
/// the store, before the response is sent.
///
/// # Errors
///
/// Returns 404 Not Found if no active record owns the key, including keys of
/// deactivated records.
pub async fn redirect_handler(
    Path(key): Path<String>,
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
) -> Result<Redirect, AppError> {
    let record = state
        .url_service
        .resolve(&key)
        .await
        .map_err(|e| name_missing_url(e, &state.base_url, &uri))?;

    debug!(key = %record.key, clicks = record.clicks, "Redirecting");

    Ok(Redirect::temporary(&record.target_url))
}
