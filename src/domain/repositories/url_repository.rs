//! Repository trait for URL record storage.

use crate::domain::entities::{NewUrlRecord, StoreStats, UrlRecord};
use crate::error::AppError;
use async_trait::async_trait;

/// Persistent table of URL records.
///
/// Every read that serves a caller (`find_by_key`, `find_by_secret_key`)
/// applies the active-only filter. Only [`key_exists`](Self::key_exists)
/// looks at the full table, because a key must never be reissued.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUrlRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryUrlRepository`] - single-process store
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Inserts a new active record with zero clicks.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the key or secret key already exists.
    /// Returns [`AppError::Internal`] on storage errors.
    async fn create(&self, new_record: NewUrlRecord) -> Result<UrlRecord, AppError>;

    /// Reports whether any record, active or not, owns `key`.
    async fn key_exists(&self, key: &str) -> Result<bool, AppError>;

    /// Finds an active record by public key.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(record))` if an active record matches
    /// - `Ok(None)` if none matches or the match is inactive
    async fn find_by_key(&self, key: &str) -> Result<Option<UrlRecord>, AppError>;

    /// Finds an active record by secret key.
    async fn find_by_secret_key(&self, secret_key: &str) -> Result<Option<UrlRecord>, AppError>;

    /// Atomically adds one click to an active record and returns the new state.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the record was deactivated since it
    /// was read; `clicks` is left unchanged in that case.
    async fn increment_clicks(&self, record: &UrlRecord) -> Result<UrlRecord, AppError>;

    /// Marks the record inactive and returns the new state.
    ///
    /// Idempotent: an already inactive record is returned unchanged.
    async fn deactivate(&self, record: &UrlRecord) -> Result<UrlRecord, AppError>;

    /// Store-wide totals.
    async fn stats(&self) -> Result<StoreStats, AppError>;

    /// Checks that the store is reachable.
    async fn ping(&self) -> Result<(), AppError>;
}
