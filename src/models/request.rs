//! Captured request data model.
//!
//! A [`CapturedRequest`] is one completed HTTP exchange observed by the
//! browser's network instrumentation. Records are created once by the
//! ingestion pipeline, inserted into the store, and never mutated afterwards;
//! they only leave the store through an explicit clear or eviction.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Resource type of a captured request.
///
/// Only these types are captured; everything else (images, stylesheets,
/// fonts, ...) is filtered out before ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    /// XMLHttpRequest traffic.
    Xhr,
    /// `fetch()` traffic.
    Fetch,
    /// Top-level document loads.
    Document,
}

impl ResourceType {
    /// Returns the string tag used on the wire for this resource type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Xhr => "xhr",
            ResourceType::Fetch => "fetch",
            ResourceType::Document => "document",
        }
    }

    /// Parses a wire tag into a `ResourceType`.
    ///
    /// # Returns
    ///
    /// `Some(ResourceType)` for an allowed tag, `None` for anything else.
    /// A `None` here is how disallowed resource types are dropped by the
    /// ingestor without an error.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_lowercase().as_str() {
            "xhr" => Some(ResourceType::Xhr),
            "fetch" => Some(ResourceType::Fetch),
            "document" => Some(ResourceType::Document),
            _ => None,
        }
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One observed HTTP exchange.
///
/// Timestamps are epoch milliseconds. Header maps are keyed by lowercase
/// header name (normalized at ingestion so lookups are stable regardless of
/// the casing the server or page used).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapturedRequest {
    /// Unique identifier, assigned when the record is inserted into the
    /// store. Immutable thereafter.
    pub id: String,

    /// The raw request URL as observed. Preserved verbatim even when it
    /// fails to parse.
    pub url: String,

    /// Uppercase HTTP verb.
    pub method: String,

    /// Response status code.
    pub status: u16,

    /// Response status text.
    pub status_text: String,

    /// Request headers, keys lowercased.
    pub request_headers: HashMap<String, String>,

    /// Response headers, keys lowercased.
    pub response_headers: HashMap<String, String>,

    /// Raw request body text, if any. Not parsed.
    pub request_body: Option<String>,

    /// Raw response body text, if any. Not parsed.
    pub response_body: Option<String>,

    /// Epoch milliseconds at which the request started.
    pub start_time: i64,

    /// Epoch milliseconds at which the response completed.
    /// Always `start_time + duration`.
    pub end_time: i64,

    /// Elapsed time in milliseconds. Non-negative.
    pub duration: i64,

    /// Response size in bytes.
    pub size: u64,

    /// Resource type of the request.
    #[serde(rename = "type")]
    pub resource_type: ResourceType,

    /// Generalized URL pattern used as the grouping key for N+1 detection.
    ///
    /// Computed from `url` exactly once at insertion; two requests with
    /// structurally equivalent URLs always carry the same pattern.
    pub url_pattern: String,

    /// Best-effort initiator tag. `"unknown"` when the instrumentation did
    /// not report one.
    pub initiator: String,

    /// URL of the page that was active when this request was observed.
    /// Determines session membership by exact match.
    pub page_url: String,
}

impl CapturedRequest {
    /// Looks up a request header by name, case-insensitively.
    ///
    /// Header keys are stored lowercased, so this only lowercases the query.
    pub fn request_header(&self, name: &str) -> Option<&str> {
        self.request_headers
            .get(&name.to_lowercase())
            .map(String::as_str)
    }

    /// Looks up a response header by name, case-insensitively.
    pub fn response_header(&self, name: &str) -> Option<&str> {
        self.response_headers
            .get(&name.to_lowercase())
            .map(String::as_str)
    }
}
