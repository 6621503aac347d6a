//! URL record entity and its lifecycle.

use chrono::{DateTime, Utc};

/// Lifecycle state of a URL record.
///
/// Records start [`Active`](RecordStatus::Active) and may move to
/// [`Inactive`](RecordStatus::Inactive) exactly once. There is no way back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordStatus {
    Active,
    Inactive,
}

impl RecordStatus {
    /// Maps the persisted `is_active` column onto a status.
    pub fn from_active_flag(is_active: bool) -> Self {
        if is_active { Self::Active } else { Self::Inactive }
    }

    pub fn is_active(self) -> bool {
        self == Self::Active
    }
}

/// A mapping from a short public key to a target URL.
///
/// Inactive records stay in the store so their keys are never reissued, but
/// every lookup treats them as absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlRecord {
    pub id: i64,
    pub key: String,
    pub secret_key: String,
    pub target_url: String,
    pub status: RecordStatus,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
    pub deactivated_at: Option<DateTime<Utc>>,
}

impl UrlRecord {
    /// Creates a new UrlRecord instance.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: i64,
        key: String,
        secret_key: String,
        target_url: String,
        status: RecordStatus,
        clicks: i64,
        created_at: DateTime<Utc>,
        deactivated_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            key,
            secret_key,
            target_url,
            status,
            clicks,
            created_at,
            deactivated_at,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Counts one resolution.
    ///
    /// Returns `false` and leaves `clicks` untouched when the record is inactive.
    pub fn record_click(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.clicks += 1;
        true
    }

    /// Moves the record to [`RecordStatus::Inactive`].
    ///
    /// Returns `true` if the state changed. Deactivating an inactive record
    /// keeps its original `deactivated_at`.
    pub fn deactivate(&mut self, at: DateTime<Utc>) -> bool {
        if !self.is_active() {
            return false;
        }
        self.status = RecordStatus::Inactive;
        self.deactivated_at = Some(at);
        true
    }
}

/// Input data for persisting a new record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUrlRecord {
    pub key: String,
    pub secret_key: String,
    pub target_url: String,
}

/// Store-wide totals reported by the admin tooling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub total: i64,
    pub active: i64,
    pub clicks: i64,
}

impl StoreStats {
    pub fn inactive(&self) -> i64 {
        self.total - self.active
    }
}
