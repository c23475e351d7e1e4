//! Integrity checks for batches of translated document URLs.
//!
//! Three checks run in order and stop at the first failure:
//! 1. no blank entries
//! 2. no duplicates, compared case-insensitively
//! 3. every path character is alphanumeric or an RFC 3986 reserved/unreserved mark

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use tracing::warn;

use crate::error::UrlError;

/// Reserved and unreserved characters allowed in a path besides alphanumerics.
pub const RFC3986_PATH_CHARS: &str = ":/?#[]@!$&'()*+,;=-_.~";

/// URI splitter from RFC 3986 appendix B. Group 5 is the path.
static URI_PARTS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(([^:/?#]+):)?(//([^/?#]*))?([^?#]*)(\?([^#]*))?(#(.*))?")
        .expect("Invalid URI pattern")
});

/// The path component of `url`, or an empty string if it has none.
pub fn url_path(url: &str) -> &str {
    URI_PARTS
        .captures(url)
        .and_then(|caps| caps.get(5))
        .map(|m| m.as_str())
        .unwrap_or("")
}

pub fn check_empty_urls<S: AsRef<str>>(urls: &[S]) -> Result<(), UrlError> {
    if urls.iter().any(|u| u.as_ref().trim().is_empty()) {
        return Err(UrlError::Empty);
    }
    Ok(())
}

pub fn check_duplicate_urls<S: AsRef<str>>(urls: &[S]) -> Result<(), UrlError> {
    let mut seen = HashSet::new();
    for url in urls {
        let normalized = url.as_ref().trim().to_lowercase();
        if !seen.insert(normalized.clone()) {
            return Err(UrlError::Duplicate(normalized));
        }
    }
    Ok(())
}

pub fn check_url_paths<S: AsRef<str>>(urls: &[S]) -> Result<(), UrlError> {
    for url in urls {
        let url = url.as_ref().trim();
        let valid = url_path(url)
            .chars()
            .all(|c| c.is_alphanumeric() || RFC3986_PATH_CHARS.contains(c));
        if !valid {
            return Err(UrlError::MalformedPath(url.to_string()));
        }
    }
    Ok(())
}

/// Run all three checks, stopping at the first failure.
pub fn check_urls<S: AsRef<str>>(urls: &[S]) -> Result<(), UrlError> {
    check_empty_urls(urls)?;
    check_duplicate_urls(urls)?;
    check_url_paths(urls)
}

/// True if the whole batch passes. Failures are logged against `id`.
pub fn validate_urls<S: AsRef<str>>(urls: &[S], id: &str) -> bool {
    match check_urls(urls) {
        Ok(()) => true,
        Err(e) => {
            warn!(doc_id = id, "Skipping translated documents, URL batch {e}");
            false
        }
    }
}
