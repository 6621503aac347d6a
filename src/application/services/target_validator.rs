//! Validation of target URLs before a mapping is created.

use std::sync::Arc;

use serde_json::json;
use tracing::debug;

use crate::error::AppError;
use crate::infrastructure::reachability::{ProbeError, ReachabilityProbe};
use crate::utils::url_validator::{UrlValidationError, parse_target_url};

/// Rejects malformed and unreachable target URLs.
///
/// Runs before [`crate::application::services::UrlService::create_url`];
/// the service itself assumes its input already passed these checks.
pub struct TargetValidator {
    probe: Arc<dyn ReachabilityProbe>,
}

impl TargetValidator {
    pub fn new(probe: Arc<dyn ReachabilityProbe>) -> Self {
        Self { probe }
    }

    /// Returns the target URL, trimmed but otherwise as submitted, if it is
    /// well-formed and live.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] with one of:
    /// - "URL is required"
    /// - "Your provided URL is not valid"
    /// - "The provided URL is unreachable" (status >= 400)
    /// - "The provided URL is unreachable: <reason>" (transport failure)
    pub async fn validate(&self, raw: &str) -> Result<String, AppError> {
        let url = parse_target_url(raw).map_err(|e| match e {
            UrlValidationError::Empty => AppError::bad_request("URL is required", json!({})),
            other => AppError::bad_request(
                "Your provided URL is not valid",
                json!({ "reason": other.to_string() }),
            ),
        })?;

        self.probe.check(&url).await.map_err(|e| {
            debug!(%url, error = %e, "Target rejected by reachability probe");
            match e {
                ProbeError::ErrorStatus(status) => AppError::bad_request(
                    "The provided URL is unreachable",
                    json!({ "status": status }),
                ),
                ProbeError::Transport(reason) => AppError::bad_request(
                    format!("The provided URL is unreachable: {reason}"),
                    json!({}),
                ),
            }
        })?;

        Ok(raw.trim().to_string())
    }
}
