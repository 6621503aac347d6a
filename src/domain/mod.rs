//! Domain layer containing the URL record model and storage contract.
//!
//! This module has no dependencies on infrastructure or presentation layers.
//!
//! - [`entities`] - URL record, its lifecycle, and creation input
//! - [`repositories`] - Data access trait implemented by the infrastructure layer
//!
//! Business rules built on top of these types live in
//! [`crate::application::services`].

pub mod entities;
pub mod repositories;
