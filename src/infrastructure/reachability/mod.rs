//! Outbound reachability checks for target URLs.
//!
//! Provides a [`ReachabilityProbe`] trait with two implementations:
//! - [`HttpProbe`] - Live `GET` against the target
//! - [`NullProbe`] - Accepts every URL (check disabled)

mod http_probe;
mod null_probe;
mod service;

pub use http_probe::HttpProbe;
pub use null_probe::NullProbe;
pub use service::{ProbeError, ReachabilityProbe};
