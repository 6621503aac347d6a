//! Utility functions used across the application.
//!
//! - [`key_generator`] - Random public keys and secret-key derivation
//! - [`url_validator`] - Target URL format checks
//! - [`public_url`] - Short and admin link composition
//! - [`db_error`] - Database error classification

pub mod db_error;
pub mod key_generator;
pub mod public_url;
pub mod url_validator;
