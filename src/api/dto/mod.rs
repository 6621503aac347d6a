//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization and validator
//! for input validation.

pub mod health;
pub mod url_info;

pub use url_info::{CreateUrlRequest, DetailResponse, UrlInfoResponse};
