//! In-process implementation of the URL repository.
//!
//! Backs `STORAGE_BACKEND=memory` and the HTTP test suite. Records are lost on
//! restart.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::domain::entities::{NewUrlRecord, RecordStatus, StoreStats, UrlRecord};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;

#[derive(Default)]
struct Table {
    next_id: i64,
    rows: HashMap<i64, UrlRecord>,
    by_key: HashMap<String, i64>,
    by_secret_key: HashMap<String, i64>,
}

impl Table {
    fn active(&self, id: Option<&i64>) -> Option<UrlRecord> {
        id.and_then(|id| self.rows.get(id))
            .filter(|r| r.is_active())
            .cloned()
    }
}

/// Repository holding all records behind a single mutex.
///
/// The mutex makes the uniqueness check and insert one step, so concurrent
/// inserts of the same key behave like a table with a unique constraint.
#[derive(Default)]
pub struct InMemoryUrlRepository {
    table: Mutex<Table>,
}

impl InMemoryUrlRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records, deactivated ones included.
    pub async fn len(&self) -> usize {
        self.table.lock().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl UrlRepository for InMemoryUrlRepository {
    async fn create(&self, new_record: NewUrlRecord) -> Result<UrlRecord, AppError> {
        let mut table = self.table.lock().await;

        if table.by_key.contains_key(&new_record.key) {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "urls_key_key" }),
            ));
        }
        if table.by_secret_key.contains_key(&new_record.secret_key) {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "urls_secret_key_key" }),
            ));
        }

        table.next_id += 1;
        let record = UrlRecord::new(
            table.next_id,
            new_record.key,
            new_record.secret_key,
            new_record.target_url,
            RecordStatus::Active,
            0,
            Utc::now(),
            None,
        );

        table.by_key.insert(record.key.clone(), record.id);
        table
            .by_secret_key
            .insert(record.secret_key.clone(), record.id);
        table.rows.insert(record.id, record.clone());

        Ok(record)
    }

    async fn key_exists(&self, key: &str) -> Result<bool, AppError> {
        Ok(self.table.lock().await.by_key.contains_key(key))
    }

    async fn find_by_key(&self, key: &str) -> Result<Option<UrlRecord>, AppError> {
        let table = self.table.lock().await;
        Ok(table.active(table.by_key.get(key)))
    }

    async fn find_by_secret_key(&self, secret_key: &str) -> Result<Option<UrlRecord>, AppError> {
        let table = self.table.lock().await;
        Ok(table.active(table.by_secret_key.get(secret_key)))
    }

    async fn increment_clicks(&self, record: &UrlRecord) -> Result<UrlRecord, AppError> {
        let mut table = self.table.lock().await;

        let no_longer_active =
            || AppError::not_found("URL is no longer active", json!({ "key": record.key }));

        let stored = table
            .rows
            .get_mut(&record.id)
            .ok_or_else(no_longer_active)?;

        if !stored.record_click() {
            return Err(no_longer_active());
        }

        Ok(stored.clone())
    }

    async fn deactivate(&self, record: &UrlRecord) -> Result<UrlRecord, AppError> {
        let mut table = self.table.lock().await;

        let stored = table
            .rows
            .get_mut(&record.id)
            .ok_or_else(|| AppError::not_found("URL not found", json!({ "key": record.key })))?;

        stored.deactivate(Utc::now());
        Ok(stored.clone())
    }

    async fn stats(&self) -> Result<StoreStats, AppError> {
        let table = self.table.lock().await;

        Ok(table
            .rows
            .values()
            .fold(StoreStats::default(), |mut acc, r| {
                acc.total += 1;
                acc.clicks += r.clicks;
                if r.is_active() {
                    acc.active += 1;
                }
                acc
            }))
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_record(key: &str, secret: &str) -> NewUrlRecord {
        NewUrlRecord {
            key: key.to_string(),
            secret_key: secret.to_string(),
            target_url: "https://example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_starts_active_with_zero_clicks() {
        let repo = InMemoryUrlRepository::new();

        let record = repo.create(new_record("AAAAA", "AAAAA_11111111")).await.unwrap();

        assert!(record.is_active());
        assert_eq!(record.clicks, 0);
        assert_eq!(record.key, "AAAAA");
        assert!(record.deactivated_at.is_none());
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_key() {
        let repo = InMemoryUrlRepository::new();
        repo.create(new_record("AAAAA", "AAAAA_11111111")).await.unwrap();

        let err = repo
            .create(new_record("AAAAA", "AAAAA_22222222"))
            .await
            .unwrap_err();

        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_secret_key() {
        let repo = InMemoryUrlRepository::new();
        repo.create(new_record("AAAAA", "SHARED")).await.unwrap();

        let err = repo.create(new_record("BBBBB", "SHARED")).await.unwrap_err();

        assert!(err.is_conflict());
        assert!(!repo.key_exists("BBBBB").await.unwrap());
    }

    #[tokio::test]
    async fn test_deactivated_record_is_hidden_but_key_is_kept() {
        let repo = InMemoryUrlRepository::new();
        let record = repo.create(new_record("AAAAA", "AAAAA_11111111")).await.unwrap();

        let deactivated = repo.deactivate(&record).await.unwrap();

        assert!(!deactivated.is_active());
        assert!(repo.find_by_key("AAAAA").await.unwrap().is_none());
        assert!(
            repo.find_by_secret_key("AAAAA_11111111")
                .await
                .unwrap()
                .is_none()
        );
        assert!(repo.key_exists("AAAAA").await.unwrap());
    }

    #[tokio::test]
    async fn test_deactivate_is_idempotent() {
        let repo = InMemoryUrlRepository::new();
        let record = repo.create(new_record("AAAAA", "AAAAA_11111111")).await.unwrap();

        let first = repo.deactivate(&record).await.unwrap();
        let second = repo.deactivate(&record).await.unwrap();

        assert_eq!(first.deactivated_at, second.deactivated_at);
        assert_eq!(second.status, RecordStatus::Inactive);
    }

    #[tokio::test]
    async fn test_increment_clicks_on_inactive_record_fails() {
        let repo = InMemoryUrlRepository::new();
        let record = repo.create(new_record("AAAAA", "AAAAA_11111111")).await.unwrap();
        repo.increment_clicks(&record).await.unwrap();
        repo.deactivate(&record).await.unwrap();

        let err = repo.increment_clicks(&record).await.unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(repo.stats().await.unwrap().clicks, 1);
    }

    #[tokio::test]
    async fn test_concurrent_increments_are_not_lost() {
        let repo = std::sync::Arc::new(InMemoryUrlRepository::new());
        let record = repo.create(new_record("AAAAA", "AAAAA_11111111")).await.unwrap();

        let handles: Vec<_> = (0..50)
            .map(|_| {
                let repo = repo.clone();
                let record = record.clone();
                tokio::spawn(async move { repo.increment_clicks(&record).await })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let stored = repo.find_by_key("AAAAA").await.unwrap().unwrap();
        assert_eq!(stored.clicks, 50);
    }

    #[tokio::test]
    async fn test_stats() {
        let repo = InMemoryUrlRepository::new();
        let a = repo.create(new_record("AAAAA", "A_1")).await.unwrap();
        let b = repo.create(new_record("BBBBB", "B_1")).await.unwrap();
        repo.increment_clicks(&a).await.unwrap();
        repo.increment_clicks(&a).await.unwrap();
        repo.deactivate(&b).await.unwrap();

        let stats = repo.stats().await.unwrap();

        assert_eq!(stats.total, 2);
        assert_eq!(stats.active, 1);
        assert_eq!(stats.inactive(), 1);
        assert_eq!(stats.clicks, 2);
    }
}
