//! Live HTTP reachability probe.

use super::service::{ProbeError, ReachabilityProbe};
use async_trait::async_trait;
use reqwest::{Client, redirect::Policy};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Probe that issues a `GET` and rejects targets answering with status >= 400.
///
/// Redirects are not followed: a `3xx` answer counts as reachable.
pub struct HttpProbe {
    client: Client,
}

impl HttpProbe {
    /// Builds a probe whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed (TLS backend
    /// initialisation failure).
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(Policy::none())
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl ReachabilityProbe for HttpProbe {
    async fn check(&self, url: &Url) -> Result<(), ProbeError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ProbeError::Transport(e.to_string()))?;

        let status = response.status();
        debug!(%url, %status, "Reachability probe answered");

        if status.as_u16() >= 400 {
            return Err(ProbeError::ErrorStatus(status.as_u16()));
        }

        Ok(())
    }
}
