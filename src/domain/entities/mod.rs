//! Core domain entities.
//!
//! - [`UrlRecord`] - A short key mapped to a target URL
//! - [`RecordStatus`] - The two-state lifecycle (`Active` -> `Inactive`)
//! - [`NewUrlRecord`] - Input for creating a record
//! - [`StoreStats`] - Aggregate counts over all records

pub mod url_record;

pub use url_record::{NewUrlRecord, RecordStatus, StoreStats, UrlRecord};
