//! PostgreSQL implementation of the URL repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewUrlRecord, RecordStatus, StoreStats, UrlRecord};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use crate::utils::db_error::unique_violation_constraint;

const RECORD_COLUMNS: &str =
    "id, key, secret_key, target_url, is_active, clicks, created_at, deactivated_at";

#[derive(sqlx::FromRow)]
struct UrlRow {
    id: i64,
    key: String,
    secret_key: String,
    target_url: String,
    is_active: bool,
    clicks: i64,
    created_at: DateTime<Utc>,
    deactivated_at: Option<DateTime<Utc>>,
}

impl From<UrlRow> for UrlRecord {
    fn from(r: UrlRow) -> Self {
        UrlRecord::new(
            r.id,
            r.key,
            r.secret_key,
            r.target_url,
            RecordStatus::from_active_flag(r.is_active),
            r.clicks,
            r.created_at,
            r.deactivated_at,
        )
    }
}

/// PostgreSQL repository for URL records.
///
/// Uniqueness of `key` and `secret_key` is enforced by table constraints, so a
/// racing insert surfaces as [`AppError::Conflict`]. Click increments are a
/// single `UPDATE ... SET clicks = clicks + 1` statement.
pub struct PgUrlRepository {
    pool: Arc<PgPool>,
}

impl PgUrlRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UrlRepository for PgUrlRepository {
    async fn create(&self, new_record: NewUrlRecord) -> Result<UrlRecord, AppError> {
        let sql = format!(
            "INSERT INTO urls (key, secret_key, target_url) VALUES ($1, $2, $3) RETURNING {RECORD_COLUMNS}"
        );

        let row = sqlx::query_as::<_, UrlRow>(&sql)
            .bind(&new_record.key)
            .bind(&new_record.secret_key)
            .bind(&new_record.target_url)
            .fetch_one(self.pool.as_ref())
            .await
            .inspect_err(|e| match unique_violation_constraint(e).as_deref() {
                Some("urls_key_key") => {
                    tracing::debug!(key = %new_record.key, "Insert lost a race for the key");
                }
                Some(constraint) => {
                    tracing::debug!(key = %new_record.key, constraint, "Insert hit a unique constraint");
                }
                None => {}
            })?;

        Ok(row.into())
    }

    async fn key_exists(&self, key: &str) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM urls WHERE key = $1)")
            .bind(key)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(exists)
    }

    async fn find_by_key(&self, key: &str) -> Result<Option<UrlRecord>, AppError> {
        let sql = format!("SELECT {RECORD_COLUMNS} FROM urls WHERE key = $1 AND is_active");

        let row = sqlx::query_as::<_, UrlRow>(&sql)
            .bind(key)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Into::into))
    }

    async fn find_by_secret_key(&self, secret_key: &str) -> Result<Option<UrlRecord>, AppError> {
        let sql = format!("SELECT {RECORD_COLUMNS} FROM urls WHERE secret_key = $1 AND is_active");

        let row = sqlx::query_as::<_, UrlRow>(&sql)
            .bind(secret_key)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Into::into))
    }

    async fn increment_clicks(&self, record: &UrlRecord) -> Result<UrlRecord, AppError> {
        let sql = format!(
            "UPDATE urls SET clicks = clicks + 1 WHERE id = $1 AND is_active RETURNING {RECORD_COLUMNS}"
        );

        sqlx::query_as::<_, UrlRow>(&sql)
            .bind(record.id)
            .fetch_optional(self.pool.as_ref())
            .await?
            .map(Into::into)
            .ok_or_else(|| {
                AppError::not_found("URL is no longer active", json!({ "key": record.key }))
            })
    }

    async fn deactivate(&self, record: &UrlRecord) -> Result<UrlRecord, AppError> {
        // COALESCE keeps the first deactivation time on repeated calls.
        let sql = format!(
            "UPDATE urls SET is_active = FALSE, deactivated_at = COALESCE(deactivated_at, NOW()) \
             WHERE id = $1 RETURNING {RECORD_COLUMNS}"
        );

        sqlx::query_as::<_, UrlRow>(&sql)
            .bind(record.id)
            .fetch_optional(self.pool.as_ref())
            .await?
            .map(Into::into)
            .ok_or_else(|| AppError::not_found("URL not found", json!({ "key": record.key })))
    }

    async fn stats(&self) -> Result<StoreStats, AppError> {
        let (total, active, clicks): (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*),
                COUNT(*) FILTER (WHERE is_active),
                COALESCE(SUM(clicks), 0)::BIGINT
            FROM urls
            "#,
        )
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(StoreStats {
            total,
            active,
            clicks,
        })
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await?;
        Ok(())
    }
}
