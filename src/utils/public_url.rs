//! Composition of externally visible URLs from the configured base URL.

use url::Url;

/// Replaces the path of `base` with `path`.
///
/// Query and fragment of the base are dropped, so `http://host:8000/x?y`
/// with path `ABCDE` becomes `http://host:8000/ABCDE`.
pub fn with_path(base: &Url, path: &str) -> String {
    let mut url = base.clone();
    url.set_path(path);
    url.set_query(None);
    url.set_fragment(None);
    url.to_string()
}

/// Public short link for `key`.
pub fn short_url(base: &Url, key: &str) -> String {
    with_path(base, key)
}

/// Admin link for `secret_key`.
pub fn admin_url(base: &Url, secret_key: &str) -> String {
    with_path(base, &format!("admin/{secret_key}"))
}
