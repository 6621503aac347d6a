//! Shared application state injected into every handler.

use std::sync::Arc;
use url::Url;

use crate::application::services::{TargetValidator, UrlService};

/// Cheaply cloneable handle to the services behind the HTTP layer.
#[derive(Clone)]
pub struct AppState {
    pub url_service: Arc<UrlService>,
    pub target_validator: Arc<TargetValidator>,
    /// Origin used to build the `url` and `admin_url` fields of responses.
    pub base_url: Arc<Url>,
}

impl AppState {
    pub fn new(
        url_service: Arc<UrlService>,
        target_validator: Arc<TargetValidator>,
        base_url: Url,
    ) -> Self {
        Self {
            url_service,
            target_validator,
            base_url: Arc::new(base_url),
        }
    }
}
