//! Derived grouping models.
//!
//! Groups are recomputed from the current store contents on every read and
//! never persisted. Bounded, retention-capped collections keep the
//! recomputation cheap enough that no incremental maintenance is needed.

use super::request::CapturedRequest;
use super::session::PageSession;
use serde::{Deserialize, Serialize};

/// All requests sharing a URL pattern.
///
/// A count greater than one against the same pattern is the tool's N+1
/// signal: repeated calls that could potentially be batched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestGroup {
    /// The shared URL pattern (grouping key).
    pub pattern: String,

    /// Member requests, ascending by `start_time`.
    pub requests: Vec<CapturedRequest>,

    /// Number of member requests.
    pub count: usize,

    /// Arithmetic mean of member durations, in milliseconds.
    pub avg_duration: f64,
}

impl RequestGroup {
    /// Builds a group from member requests, sorting them ascending by start
    /// time and deriving `count` and `avg_duration`.
    pub fn from_requests(pattern: String, mut requests: Vec<CapturedRequest>) -> Self {
        requests.sort_by_key(|r| r.start_time);
        let count = requests.len();
        let avg_duration = if count == 0 {
            0.0
        } else {
            requests.iter().map(|r| r.duration as f64).sum::<f64>() / count as f64
        };
        Self {
            pattern,
            requests,
            count,
            avg_duration,
        }
    }
}

/// All page sessions sharing a domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainGroup {
    /// The shared hostname (with port when present).
    pub domain: String,

    /// Member sessions, descending by timestamp (newest first).
    pub sessions: Vec<PageSession>,

    /// Sum of the member sessions' request counts.
    pub total_requests: usize,
}

impl DomainGroup {
    /// Builds a group from member sessions, sorting them descending by
    /// timestamp and deriving `total_requests`.
    pub fn from_sessions(domain: String, mut sessions: Vec<PageSession>) -> Self {
        sessions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        let total_requests = sessions.iter().map(PageSession::request_count).sum();
        Self {
            domain,
            sessions,
            total_requests,
        }
    }
}
