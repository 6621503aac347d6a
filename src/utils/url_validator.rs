//! Target URL format validation.
//!
//! Reachability is checked separately by
//! [`crate::infrastructure::reachability`]; this module only decides whether
//! the string is a URL the service is willing to redirect to.

use url::Url;

/// Reasons a target URL is rejected before any network access.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlValidationError {
    #[error("URL is required")]
    Empty,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must include a host")]
    MissingHost,
}

/// Parses `input` as an absolute `http`/`https` URL with a host.
///
/// Surrounding whitespace is ignored. The URL is otherwise stored exactly as
/// given, so the redirect target matches what the caller submitted.
///
/// # Errors
///
/// See [`UrlValidationError`].
///
/// # Examples
///
/// ```ignore
/// assert!(parse_target_url("https://example.com").is_ok());
/// assert!(parse_target_url("javascript:alert(1)").is_err());
/// assert!(parse_target_url("example.com").is_err());
/// ```
pub fn parse_target_url(input: &str) -> Result<Url, UrlValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UrlValidationError::Empty);
    }

    // The parser silently drops tabs and newlines, but the stored target keeps
    // them and would later produce an invalid `Location` header.
    if trimmed.chars().any(|c| c.is_ascii_control()) {
        return Err(UrlValidationError::InvalidFormat(
            "URL contains control characters".to_string(),
        ));
    }

    let url = Url::parse(trimmed).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlValidationError::UnsupportedProtocol),
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(UrlValidationError::MissingHost),
    }
}
