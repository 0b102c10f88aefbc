//! Page session data model.

use serde::{Deserialize, Serialize};

/// One visited page and the requests observed while it was active.
///
/// At most one session exists per distinct page URL at any time; membership
/// of a request is determined solely by exact `page_url` match. Sessions are
/// created lazily, either on a navigation notification or on arrival of the
/// first request for an untracked page, and are destroyed only by eviction or
/// an explicit clear.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSession {
    /// Unique identifier for this session.
    pub id: String,

    /// Exact URL of the page.
    pub page_url: String,

    /// Hostname of the page, with `:port` appended when a non-default port
    /// is present. `"unknown"` when the page URL does not parse.
    pub domain: String,

    /// Raw pathname of the page URL. No placeholder substitution; sessions
    /// are per exact page, not pattern-grouped.
    pub path: String,

    /// Epoch milliseconds of the first navigation/observation of this page.
    pub timestamp: i64,

    /// Ids of the requests observed while this page was active, in
    /// ingestion-completion order.
    pub request_ids: Vec<String>,
}

impl PageSession {
    /// Number of requests attached to this session.
    pub fn request_count(&self) -> usize {
        self.request_ids.len()
    }
}
