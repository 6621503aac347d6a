//! Short URL creation, resolution, and deactivation.

use std::sync::Arc;

use metrics::counter;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::entities::{NewUrlRecord, StoreStats, UrlRecord};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use crate::utils::key_generator::{
    DEFAULT_KEY_LENGTH, DEFAULT_SECRET_SUFFIX_LENGTH, KeyGenerator, RandomKeyGenerator,
    derive_secret_key, is_valid_key,
};

/// Tuning for key generation and allocation retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeySettings {
    /// Length of public keys.
    pub key_length: usize,
    /// Length of the random suffix appended to secret keys.
    pub secret_suffix_length: usize,
    /// Candidates sampled per allocation before giving up.
    pub max_key_attempts: usize,
    /// Allocations re-run after an insert-time uniqueness conflict.
    pub max_insert_attempts: usize,
}

impl Default for KeySettings {
    fn default() -> Self {
        Self {
            key_length: DEFAULT_KEY_LENGTH,
            secret_suffix_length: DEFAULT_SECRET_SUFFIX_LENGTH,
            max_key_attempts: 16,
            max_insert_attempts: 3,
        }
    }
}

/// Service owning the URL record lifecycle.
///
/// Creation allocates a key no record has ever used, pairs it with a secret
/// key, and persists the record. Resolution counts a click on the active
/// record. Deactivation is authorized solely by the secret key.
///
/// The service never caches records and holds no locks; concurrent
/// correctness rests on the repository's unique constraints and atomic
/// increments.
pub struct UrlService<R: UrlRepository + ?Sized = dyn UrlRepository> {
    repository: Arc<R>,
    generator: Arc<dyn KeyGenerator>,
    settings: KeySettings,
}

impl<R: UrlRepository + ?Sized> UrlService<R> {
    /// Creates a service that draws keys from the system CSPRNG.
    pub fn new(repository: Arc<R>, settings: KeySettings) -> Self {
        Self::with_generator(repository, Arc::new(RandomKeyGenerator), settings)
    }

    /// Creates a service with an explicit key source.
    pub fn with_generator(
        repository: Arc<R>,
        generator: Arc<dyn KeyGenerator>,
        settings: KeySettings,
    ) -> Self {
        Self {
            repository,
            generator,
            settings,
        }
    }

    pub fn settings(&self) -> KeySettings {
        self.settings
    }

    /// Creates a mapping for an already validated `target_url`.
    ///
    /// A uniqueness conflict at insert time means another request claimed the
    /// same key between the check and the insert. The whole allocation is then
    /// re-run, up to `max_insert_attempts` times.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if no unique key could be allocated or
    /// persisted within the configured attempts, or on storage errors.
    pub async fn create_url(&self, target_url: &str) -> Result<UrlRecord, AppError> {
        for attempt in 1..=self.settings.max_insert_attempts {
            let key = self.allocate_unique_key().await?;
            let secret_key = derive_secret_key(
                self.generator.as_ref(),
                &key,
                self.settings.secret_suffix_length,
            );

            let new_record = NewUrlRecord {
                key,
                secret_key,
                target_url: target_url.to_string(),
            };

            match self.repository.create(new_record).await {
                Ok(record) => {
                    counter!("urls_created_total").increment(1);
                    info!(key = %record.key, target_url = %record.target_url, "Created URL");
                    return Ok(record);
                }
                Err(e) if e.is_conflict() => {
                    counter!("key_collisions_total").increment(1);
                    warn!(attempt, error = %e, "Key claimed concurrently, re-running allocation");
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::internal(
            "Failed to persist a unique key",
            json!({
                "reason": "Repeated uniqueness conflicts",
                "attempts": self.settings.max_insert_attempts,
            }),
        ))
    }

    /// Draws candidate keys until one is unused by every record, active or not.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] after `max_key_attempts` collisions.
    pub async fn allocate_unique_key(&self) -> Result<String, AppError> {
        for attempt in 1..=self.settings.max_key_attempts {
            let candidate = self.generator.generate(self.settings.key_length);

            if !self.repository.key_exists(&candidate).await? {
                return Ok(candidate);
            }

            counter!("key_collisions_total").increment(1);
            debug!(attempt, key = %candidate, "Key already taken, drawing another");
        }

        Err(AppError::internal(
            "Failed to allocate a unique key",
            json!({
                "reason": "Too many collisions",
                "attempts": self.settings.max_key_attempts,
            }),
        ))
    }

    /// Resolves an active key and counts the click.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no active record owns `key`.
    pub async fn resolve(&self, key: &str) -> Result<UrlRecord, AppError> {
        if !is_valid_key(key) {
            return Err(key_not_found(key));
        }

        let record = self
            .repository
            .find_by_key(key)
            .await?
            .ok_or_else(|| key_not_found(key))?;

        let record = self.repository.increment_clicks(&record).await?;
        counter!("redirects_total").increment(1);

        Ok(record)
    }

    /// Returns the active record owning `secret_key` without counting a click.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no active record matches.
    pub async fn admin_info(&self, secret_key: &str) -> Result<UrlRecord, AppError> {
        self.repository
            .find_by_secret_key(secret_key)
            .await?
            .ok_or_else(secret_not_found)
    }

    /// Deactivates the record owning `secret_key`.
    ///
    /// After this call both the public key and the secret key resolve as
    /// not found. The key itself stays reserved.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no active record matches.
    pub async fn deactivate(&self, secret_key: &str) -> Result<UrlRecord, AppError> {
        let record = self.admin_info(secret_key).await?;
        let record = self.repository.deactivate(&record).await?;

        counter!("urls_deactivated_total").increment(1);
        info!(key = %record.key, "Deactivated URL");

        Ok(record)
    }

    pub async fn stats(&self) -> Result<StoreStats, AppError> {
        self.repository.stats().await
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }
}

fn key_not_found(key: &str) -> AppError {
    AppError::not_found("URL not found", json!({ "key": key }))
}

// Error details never carry the secret key.
fn secret_not_found() -> AppError {
    AppError::not_found("URL not found", json!({}))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::RecordStatus;
    use crate::domain::repositories::MockUrlRepository;
    use chrono::Utc;
    use mockall::Sequence;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Hands out public keys from a script and numbered secret suffixes.
    struct ScriptedGenerator {
        keys: Mutex<VecDeque<&'static str>>,
        suffixes: Mutex<u32>,
    }

    impl ScriptedGenerator {
        fn new(keys: &[&'static str]) -> Arc<Self> {
            Arc::new(Self {
                keys: Mutex::new(keys.iter().copied().collect()),
                suffixes: Mutex::new(0),
            })
        }
    }

    impl KeyGenerator for ScriptedGenerator {
        fn generate(&self, length: usize) -> String {
            if length == DEFAULT_KEY_LENGTH {
                return self.keys.lock().unwrap().pop_front().unwrap().to_string();
            }
            let mut n = self.suffixes.lock().unwrap();
            *n += 1;
            format!("{:0>width$}", n, width = length)
        }
    }

    fn record(key: &str, target: &str, clicks: i64) -> UrlRecord {
        UrlRecord::new(
            1,
            key.to_string(),
            format!("{key}_00000001"),
            target.to_string(),
            RecordStatus::Active,
            clicks,
            Utc::now(),
            None,
        )
    }

    fn echo_create(new: NewUrlRecord) -> Result<UrlRecord, AppError> {
        Ok(UrlRecord::new(
            7,
            new.key,
            new.secret_key,
            new.target_url,
            RecordStatus::Active,
            0,
            Utc::now(),
            None,
        ))
    }

    fn service(repo: MockUrlRepository, keys: &[&'static str]) -> UrlService<MockUrlRepository> {
        UrlService::with_generator(
            Arc::new(repo),
            ScriptedGenerator::new(keys),
            KeySettings::default(),
        )
    }

    #[tokio::test]
    async fn test_create_url_success() {
        let mut repo = MockUrlRepository::new();
        repo.expect_key_exists()
            .withf(|key| key == "AB12C")
            .times(1)
            .returning(|_| Ok(false));
        repo.expect_create()
            .withf(|new| {
                new.key == "AB12C"
                    && new.secret_key == "AB12C_00000001"
                    && new.target_url == "https://example.com"
            })
            .times(1)
            .returning(echo_create);

        let record = service(repo, &["AB12C"])
            .create_url("https://example.com")
            .await
            .unwrap();

        assert_eq!(record.key, "AB12C");
        assert_eq!(record.secret_key, "AB12C_00000001");
        assert_eq!(record.clicks, 0);
        assert!(record.is_active());
    }

    #[tokio::test]
    async fn test_create_url_with_random_keys_has_expected_shape() {
        let mut repo = MockUrlRepository::new();
        repo.expect_key_exists().returning(|_| Ok(false));
        repo.expect_create().times(1).returning(echo_create);

        let service = UrlService::new(Arc::new(repo), KeySettings::default());
        let record = service.create_url("https://example.com").await.unwrap();

        assert_eq!(record.key.len(), 5);
        assert!(is_valid_key(&record.key));
        let (prefix, suffix) = record.secret_key.split_once('_').unwrap();
        assert_eq!(prefix, record.key);
        assert_eq!(suffix.len(), 8);
        assert!(is_valid_key(suffix));
    }

    #[tokio::test]
    async fn test_allocate_skips_taken_keys() {
        let mut repo = MockUrlRepository::new();
        let mut seq = Sequence::new();
        repo.expect_key_exists()
            .withf(|key| key == "TAKEN")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(true));
        repo.expect_key_exists()
            .withf(|key| key == "FRESH")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(false));

        let key = service(repo, &["TAKEN", "FRESH"])
            .allocate_unique_key()
            .await
            .unwrap();

        assert_eq!(key, "FRESH");
    }

    #[tokio::test]
    async fn test_allocate_gives_up_after_max_attempts() {
        let mut repo = MockUrlRepository::new();
        repo.expect_key_exists().times(3).returning(|_| Ok(true));

        let service = UrlService::with_generator(
            Arc::new(repo),
            ScriptedGenerator::new(&["AAAAA", "BBBBB", "CCCCC"]),
            KeySettings {
                max_key_attempts: 3,
                ..KeySettings::default()
            },
        );

        let err = service.allocate_unique_key().await.unwrap_err();
        assert!(matches!(err, AppError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_create_url_retries_after_insert_conflict() {
        let mut repo = MockUrlRepository::new();
        repo.expect_key_exists().times(2).returning(|_| Ok(false));

        let mut seq = Sequence::new();
        repo.expect_create()
            .withf(|new| new.key == "RACED")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                Err(AppError::conflict(
                    "Unique constraint violation",
                    json!({ "constraint": "urls_key_key" }),
                ))
            });
        repo.expect_create()
            .withf(|new| new.key == "SAFE1")
            .times(1)
            .in_sequence(&mut seq)
            .returning(echo_create);

        let record = service(repo, &["RACED", "SAFE1"])
            .create_url("https://example.com")
            .await
            .unwrap();

        assert_eq!(record.key, "SAFE1");
        assert!(record.secret_key.starts_with("SAFE1_"));
    }

    #[tokio::test]
    async fn test_create_url_escalates_persistent_conflicts() {
        let mut repo = MockUrlRepository::new();
        repo.expect_key_exists().returning(|_| Ok(false));
        repo.expect_create()
            .times(3)
            .returning(|_| Err(AppError::conflict("dup", json!({}))));

        let err = service(repo, &["AAAAA", "BBBBB", "CCCCC"])
            .create_url("https://example.com")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_create_url_propagates_storage_errors() {
        let mut repo = MockUrlRepository::new();
        repo.expect_key_exists().returning(|_| Ok(false));
        repo.expect_create()
            .times(1)
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        let err = service(repo, &["AAAAA"])
            .create_url("https://example.com")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_resolve_increments_clicks() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_by_key()
            .withf(|key| key == "AB12C")
            .times(1)
            .returning(|_| Ok(Some(record("AB12C", "https://example.com", 0))));
        repo.expect_increment_clicks()
            .withf(|r| r.key == "AB12C")
            .times(1)
            .returning(|r| {
                let mut updated = r.clone();
                updated.clicks += 1;
                Ok(updated)
            });

        let resolved = service(repo, &[]).resolve("AB12C").await.unwrap();

        assert_eq!(resolved.target_url, "https://example.com");
        assert_eq!(resolved.clicks, 1);
    }

    #[tokio::test]
    async fn test_resolve_unknown_key_is_not_found() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_by_key().times(1).returning(|_| Ok(None));
        repo.expect_increment_clicks().times(0);

        let err = service(repo, &[]).resolve("ZZZZZ").await.unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_resolve_malformed_key_skips_store() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_by_key().times(0);

        let err = service(repo, &[]).resolve("favicon.ico").await.unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_admin_info_does_not_count_click() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_by_secret_key()
            .withf(|secret| secret == "AB12C_00000001")
            .times(1)
            .returning(|_| Ok(Some(record("AB12C", "https://example.com", 4))));
        repo.expect_increment_clicks().times(0);

        let info = service(repo, &[])
            .admin_info("AB12C_00000001")
            .await
            .unwrap();

        assert_eq!(info.clicks, 4);
    }

    #[tokio::test]
    async fn test_deactivate_with_secret_key() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_by_secret_key()
            .times(1)
            .returning(|_| Ok(Some(record("AB12C", "https://example.com", 2))));
        repo.expect_deactivate().times(1).returning(|r| {
            let mut updated = r.clone();
            updated.deactivate(Utc::now());
            Ok(updated)
        });

        let record = service(repo, &[])
            .deactivate("AB12C_00000001")
            .await
            .unwrap();

        assert!(!record.is_active());
        assert_eq!(record.clicks, 2);
    }

    #[tokio::test]
    async fn test_deactivate_unknown_secret_is_not_found() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_by_secret_key()
            .times(1)
            .returning(|_| Ok(None));
        repo.expect_deactivate().times(0);

        let err = service(repo, &[])
            .deactivate("NOPE_12345678")
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(err.to_error_info().details, json!({}));
    }
}
