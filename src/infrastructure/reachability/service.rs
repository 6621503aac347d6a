//! Reachability probe trait and error types.

use async_trait::async_trait;
use url::Url;

/// Reasons a target is considered unreachable.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ProbeError {
    /// The target answered with a status of 400 or above.
    #[error("target answered with HTTP {0}")]
    ErrorStatus(u16),

    /// The request never produced a response (DNS, connect, TLS, timeout).
    #[error("{0}")]
    Transport(String),
}

/// Checks that a target URL answers before a mapping is created.
///
/// The check runs once, at creation time. Resolutions never re-validate.
///
/// # Implementations
///
/// - [`crate::infrastructure::reachability::HttpProbe`] - live HTTP check
/// - [`crate::infrastructure::reachability::NullProbe`] - disabled check
#[async_trait]
pub trait ReachabilityProbe: Send + Sync {
    async fn check(&self, url: &Url) -> Result<(), ProbeError>;
}
