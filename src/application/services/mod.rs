//! Business logic services for the application layer.

pub mod target_validator;
pub mod url_service;

pub use target_validator::TargetValidator;
pub use url_service::{KeySettings, UrlService};
