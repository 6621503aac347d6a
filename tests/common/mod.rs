#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use std::sync::Arc;
use url::Url;
use url_keeper::api::routes::{management_routes, public_routes};
use url_keeper::application::services::{KeySettings, TargetValidator, UrlService};
use url_keeper::domain::repositories::UrlRepository;
use url_keeper::infrastructure::persistence::InMemoryUrlRepository;
use url_keeper::infrastructure::reachability::{NullProbe, ProbeError, ReachabilityProbe};
use url_keeper::state::AppState;

pub const BASE_URL: &str = "http://short.test/";

/// Probe that answers every check with the same result.
pub struct FixedProbe(pub Result<(), ProbeError>);

#[async_trait]
impl ReachabilityProbe for FixedProbe {
    async fn check(&self, _url: &Url) -> Result<(), ProbeError> {
        self.0.clone()
    }
}

pub fn base_url() -> Url {
    Url::parse(BASE_URL).unwrap()
}

pub fn create_test_state_with(
    repository: Arc<dyn UrlRepository>,
    probe: Arc<dyn ReachabilityProbe>,
) -> AppState {
    let url_service = Arc::new(UrlService::new(repository, KeySettings::default()));
    let target_validator = Arc::new(TargetValidator::new(probe));
    AppState::new(url_service, target_validator, base_url())
}

/// In-memory state with reachability checks disabled.
pub fn create_test_state() -> (AppState, Arc<InMemoryUrlRepository>) {
    let repository = Arc::new(InMemoryUrlRepository::new());
    let state = create_test_state_with(repository.clone(), Arc::new(NullProbe::new()));
    (state, repository)
}

/// Every route, without the rate limiter (it needs a peer address).
pub fn test_router(state: AppState) -> Router {
    Router::new()
        .merge(public_routes())
        .merge(management_routes())
        .with_state(state)
}

/// Splits an admin URL into its secret key.
pub fn secret_from_admin_url(admin_url: &str) -> String {
    admin_url
        .rsplit('/')
        .next()
        .unwrap()
        .to_string()
}

/// Splits a short URL into its public key.
pub fn key_from_short_url(short_url: &str) -> String {
    short_url.rsplit('/').next().unwrap().to_string()
}
