//! Application layer services implementing business logic.
//!
//! Services consume repository and probe traits and provide a clean API for
//! HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::url_service::UrlService`] - Key allocation and the URL record lifecycle
//! - [`services::target_validator::TargetValidator`] - Format and reachability checks

pub mod services;
