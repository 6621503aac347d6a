//! DTOs for URL creation and administration.

use serde::{Deserialize, Serialize};
use url::Url;
use validator::Validate;

use crate::domain::entities::UrlRecord;
use crate::utils::public_url::{admin_url, short_url};

/// Request to shorten a single URL.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUrlRequest {
    /// The destination URL. Format and reachability are checked by
    /// [`crate::application::services::TargetValidator`].
    #[validate(length(min = 1, message = "URL is required"))]
    pub target_url: String,
}

/// Public view of a record, returned on creation and by the admin endpoint.
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
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UrlInfoResponse {
    pub target_url: String,
    pub is_active: bool,
    pub clicks: i64,
    pub url: String,
    pub admin_url: String,
}

impl UrlInfoResponse {
    pub fn from_record(record: &UrlRecord, base_url: &Url) -> Self {
        Self {
            target_url: record.target_url.clone(),
            is_active: record.is_active(),
            clicks: record.clicks,
            url: short_url(base_url, &record.key),
            admin_url: admin_url(base_url, &record.secret_key),
        }
    }
}

/// Human-readable confirmation message.
#[derive(Debug, Serialize, Deserialize)]
pub struct DetailResponse {
    pub detail: String,
}
