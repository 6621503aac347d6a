//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain and application
//! layers, providing concrete storage and outbound network checks.
//!
//! # Modules
//!
//! - [`persistence`] - URL record stores (PostgreSQL and in-memory)
//! - [`reachability`] - Live checks that a target URL answers

pub mod persistence;
pub mod reachability;
