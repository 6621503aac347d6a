//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod admin;
pub mod create_url;
pub mod health;
pub mod redirect;
pub mod root;

pub use admin::{admin_info_handler, deactivate_handler};
pub use create_url::create_url_handler;
pub use health::health_handler;
pub use redirect::redirect_handler;
pub use root::root_handler;

use axum::http::Uri;
use url::Url;

use crate::error::AppError;

/// Rewrites a not-found error so its message names the full requested URL,
/// e.g. `URL 'http://localhost:8000/ABCDE' doesn't exist`.
///
/// The request path and query are joined onto `base_url`. Other errors pass
/// through unchanged.
pub(crate) fn name_missing_url(err: AppError, base_url: &Url, uri: &Uri) -> AppError {
    match err {
        AppError::NotFound { details, .. } => {
            let mut requested = base_url.clone();
            requested.set_path(uri.path());
            requested.set_query(uri.query());
            requested.set_fragment(None);

            AppError::not_found(format!("URL '{requested}' doesn't exist"), details)
        }
        other => other,
    }
}
