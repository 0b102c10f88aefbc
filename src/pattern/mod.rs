//! URL pattern normalization.
//!
//! This module turns concrete URLs into generalized patterns by replacing
//! variable path segments (numeric ids, UUIDs, 24-hex object ids) with
//! placeholders. The pattern is the grouping key for repeated-call (N+1)
//! detection: two URLs that differ only in their variable segments produce
//! the same pattern.
//!
//! All functions here fail open. A string that does not parse as a URL is
//! returned unchanged by [`pattern_of`], and [`page_key_of`] degrades to a
//! sentinel `"unknown"` domain; neither ever returns an error.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

/// Canonical UUID shape (8-4-4-4-12 hex), case-insensitive.
static UUID_SEGMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("Failed to compile UUID segment regex")
});

/// 24-character hex string (MongoDB-style object id).
static OBJECT_ID_SEGMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{24}$").expect("Failed to compile object id segment regex")
});

/// Domain/path pair identifying a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageKey {
    /// Hostname, with `:port` appended when the URL carries an explicit
    /// port. `"unknown"` for unparseable URLs.
    pub domain: String,

    /// Raw pathname, no placeholder substitution. `"/"` for unparseable
    /// URLs.
    pub path: String,
}

/// Returns the placeholder for a variable path segment, or `None` when the
/// segment is literal.
///
/// Substitution rules, first match wins:
/// 1. all-digit segment -> `:id`
/// 2. canonical UUID -> `:uuid`
/// 3. 24-character hex string -> `:objectId`
fn placeholder_for(segment: &str) -> Option<&'static str> {
    if !segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit()) {
        return Some(":id");
    }
    if UUID_SEGMENT.is_match(segment) {
        return Some(":uuid");
    }
    if OBJECT_ID_SEGMENT.is_match(segment) {
        return Some(":objectId");
    }
    None
}

/// Checks whether a path segment would be replaced by a placeholder.
///
/// Used by the filter engine to exclude variable segments from the set of
/// selectable route segments.
pub fn is_variable_segment(segment: &str) -> bool {
    placeholder_for(segment).is_some()
}

/// Derives the generalized pattern for a URL.
///
/// The pattern is `{origin}/{substituted-segments-joined-by-/}` with empty
/// segments dropped. On parse failure the original string is returned
/// unchanged, so every request ends up with a usable grouping key.
///
/// # Example
///
/// ```
/// use netpanel::pattern::pattern_of;
///
/// assert_eq!(
///     pattern_of("https://api.example.com/users/42/orders"),
///     "https://api.example.com/users/:id/orders"
/// );
/// ```
pub fn pattern_of(url: &str) -> String {
    let parsed = match Url::parse(url) {
        Ok(parsed) if !parsed.cannot_be_a_base() => parsed,
        _ => return url.to_string(),
    };

    let segments: Vec<&str> = parsed
        .path()
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| placeholder_for(s).unwrap_or(s))
        .collect();

    format!(
        "{}/{}",
        parsed.origin().ascii_serialization(),
        segments.join("/")
    )
}

/// Derives the page key (domain + raw path) for a page URL.
///
/// No placeholder substitution is applied; sessions are tracked per exact
/// page, not pattern-grouped. On parse failure (or a URL without a host)
/// falls back to `{domain: "unknown", path: "/"}`.
pub fn page_key_of(url: &str) -> PageKey {
    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(_) => {
            return PageKey {
                domain: "unknown".to_string(),
                path: "/".to_string(),
            }
        }
    };

    let host = match parsed.host_str() {
        Some(host) => host,
        None => {
            return PageKey {
                domain: "unknown".to_string(),
                path: "/".to_string(),
            }
        }
    };

    let domain = match parsed.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    };

    PageKey {
        domain,
        path: parsed.path().to_string(),
    }
}
