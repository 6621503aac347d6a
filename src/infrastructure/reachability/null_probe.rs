//! No-op probe for disabled reachability checks.

use super::service::{ProbeError, ReachabilityProbe};
use async_trait::async_trait;
use tracing::debug;
use url::Url;

/// A probe that accepts every URL without network access.
///
/// Used when `CHECK_REACHABILITY=false` and in tests that must not depend on
/// outbound connectivity.
pub struct NullProbe;

impl NullProbe {
    /// Creates a new NullProbe instance.
    pub fn new() -> Self {
        debug!("Using NullProbe (reachability checks disabled)");
        Self
    }
}

impl Default for NullProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReachabilityProbe for NullProbe {
    async fn check(&self, _url: &Url) -> Result<(), ProbeError> {
        Ok(())
    }
}
