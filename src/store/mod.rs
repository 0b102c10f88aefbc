//! The authoritative in-memory request store.
//!
//! A [`RequestStore`] owns both the captured-request collection and the
//! page-session collection behind a single mutation API, so the two are
//! always updated together and no caller can observe one without the other.
//! The hosting panel constructs one store instance and routes every event
//! through it; nothing here is a global.
//!
//! All operations are synchronous and expected to run on a single logical
//! thread (the host UI's event loop serializes event and timer callbacks).
//! Derived groupings are recomputed fresh on every read; the collections are
//! bounded by retention, so recomputation stays cheap.

use crate::ingest::RequestDraft;
use crate::models::{CapturedRequest, DomainGroup, PageSession, RequestGroup};
use crate::pattern::{page_key_of, pattern_of};
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// In-memory store of captured requests and page sessions.
///
/// Requests are appended in ingestion-completion order, which is not
/// wall-clock start order; consumers that need start-time order must sort by
/// `start_time` (the grouping derivations already do).
#[derive(Debug, Default)]
pub struct RequestStore {
    requests: Vec<CapturedRequest>,
    sessions: Vec<PageSession>,
    current_page_url: Option<String>,
    selected_request_id: Option<String>,
}

impl RequestStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured requests, in ingestion-completion order.
    pub fn requests(&self) -> &[CapturedRequest] {
        &self.requests
    }

    /// All page sessions, in first-seen order.
    pub fn sessions(&self) -> &[PageSession] {
        &self.sessions
    }

    /// The requests observed while the given page was active.
    pub fn requests_for_page(&self, page_url: &str) -> Vec<&CapturedRequest> {
        self.requests
            .iter()
            .filter(|r| r.page_url == page_url)
            .collect()
    }

    /// The URL of the page currently considered active, if known.
    pub fn current_page_url(&self) -> Option<&str> {
        self.current_page_url.as_deref()
    }

    /// Inserts a request draft, assigning its id and URL pattern.
    ///
    /// Ensures a session exists for the draft's page URL (created with the
    /// draft's start time when absent) and appends the request to that
    /// session. The two collections are updated together; callers never see
    /// a request without its session.
    ///
    /// # Returns
    ///
    /// A clone of the stored record, with id and pattern filled in.
    pub fn add(&mut self, draft: RequestDraft) -> CapturedRequest {
        let request = CapturedRequest {
            id: Uuid::new_v4().to_string(),
            url_pattern: pattern_of(&draft.url),
            url: draft.url,
            method: draft.method,
            status: draft.status,
            status_text: draft.status_text,
            request_headers: draft.request_headers,
            response_headers: draft.response_headers,
            request_body: draft.request_body,
            response_body: draft.response_body,
            start_time: draft.start_time,
            end_time: draft.end_time,
            duration: draft.duration,
            size: draft.size,
            resource_type: draft.resource_type,
            initiator: draft.initiator,
            page_url: draft.page_url,
        };

        let session_index = self.ensure_session(&request.page_url, request.start_time);
        self.sessions[session_index].request_ids.push(request.id.clone());
        self.requests.push(request.clone());
        request
    }

    /// Records a navigation to a new page.
    ///
    /// The navigation event carries the authoritative page URL; this always
    /// wins over any late-resolving initial-URL read. Idempotent: navigating
    /// to the already-active page is a no-op beyond refreshing the current
    /// URL.
    pub fn on_navigate(&mut self, page_url: &str) {
        self.current_page_url = Some(page_url.to_string());
        self.ensure_session(page_url, Utc::now().timestamp_millis());
    }

    /// Seeds the current page URL from an asynchronous initial read.
    ///
    /// Only fills the pre-first-navigation window: if a navigation has
    /// already recorded a URL, the late-resolving read is discarded.
    pub fn set_initial_page_url(&mut self, page_url: &str) {
        if self.current_page_url.is_none() {
            self.current_page_url = Some(page_url.to_string());
        }
    }

    /// Marks a request as selected, or clears the selection with `None`.
    ///
    /// Selecting an id that is not in the store clears the selection.
    pub fn select_request(&mut self, id: Option<&str>) {
        self.selected_request_id = id
            .filter(|id| self.requests.iter().any(|r| r.id == *id))
            .map(str::to_string);
    }

    /// The currently selected request, if any.
    pub fn selected_request(&self) -> Option<&CapturedRequest> {
        let id = self.selected_request_id.as_deref()?;
        self.requests.iter().find(|r| r.id == id)
    }

    /// Empties both collections and clears the selection.
    pub fn clear_all(&mut self) {
        self.requests.clear();
        self.sessions.clear();
        self.selected_request_id = None;
    }

    /// Removes every session under the given domain and every request whose
    /// page belonged to one of those sessions, regardless of age.
    pub fn clear_by_domain(&mut self, domain: &str) {
        let removed_pages: HashSet<String> = self
            .sessions
            .iter()
            .filter(|s| s.domain == domain)
            .map(|s| s.page_url.clone())
            .collect();
        if removed_pages.is_empty() {
            return;
        }
        self.sessions.retain(|s| s.domain != domain);
        self.requests.retain(|r| !removed_pages.contains(&r.page_url));
        self.prune_selection();
    }

    /// Removes the session for the given page (if present) and every request
    /// with that exact page URL, regardless of age.
    pub fn clear_by_page(&mut self, page_url: &str) {
        self.sessions.retain(|s| s.page_url != page_url);
        self.requests.retain(|r| r.page_url != page_url);
        self.prune_selection();
    }

    /// Evicts sessions older than the retention window, and the requests
    /// that no longer have either a tracked page or a fresh timestamp.
    ///
    /// A request survives the sweep if its page session is still tracked
    /// (even when the request itself is old) or if its own start time is
    /// newer than the cutoff. Explicit clears, by contrast, always cascade
    /// unconditionally.
    ///
    /// # Returns
    ///
    /// The number of sessions removed.
    pub fn evict_older_than(&mut self, retention: chrono::Duration) -> usize {
        self.evict_older_than_at(retention, Utc::now().timestamp_millis())
    }

    fn evict_older_than_at(&mut self, retention: chrono::Duration, now_ms: i64) -> usize {
        let cutoff = now_ms - retention.num_milliseconds();

        let before = self.sessions.len();
        self.sessions.retain(|s| s.timestamp >= cutoff);
        let removed = before - self.sessions.len();

        let tracked_pages: HashSet<&str> =
            self.sessions.iter().map(|s| s.page_url.as_str()).collect();
        self.requests
            .retain(|r| tracked_pages.contains(r.page_url.as_str()) || r.start_time >= cutoff);
        self.prune_selection();

        if removed > 0 {
            log::info!("evicted {} stale page session(s)", removed);
        }
        removed
    }

    /// Partitions the current requests by URL pattern.
    ///
    /// Groups appear in first-seen-pattern order; requests within a group
    /// are ascending by start time. Recomputed from scratch on every call.
    pub fn group_by_pattern(&self) -> Vec<RequestGroup> {
        let mut order: Vec<String> = Vec::new();
        let mut members: HashMap<String, Vec<CapturedRequest>> = HashMap::new();
        for request in &self.requests {
            if !members.contains_key(&request.url_pattern) {
                order.push(request.url_pattern.clone());
            }
            members
                .entry(request.url_pattern.clone())
                .or_default()
                .push(request.clone());
        }
        order
            .into_iter()
            .map(|pattern| {
                let requests = members.remove(&pattern).unwrap_or_default();
                RequestGroup::from_requests(pattern, requests)
            })
            .collect()
    }

    /// Partitions the current sessions by domain.
    ///
    /// Sessions within a domain are descending by timestamp; domains are
    /// descending by total request count, ties broken by first-seen order
    /// (the sort is stable).
    pub fn group_by_domain(&self) -> Vec<DomainGroup> {
        let mut order: Vec<String> = Vec::new();
        let mut members: HashMap<String, Vec<PageSession>> = HashMap::new();
        for session in &self.sessions {
            if !members.contains_key(&session.domain) {
                order.push(session.domain.clone());
            }
            members
                .entry(session.domain.clone())
                .or_default()
                .push(session.clone());
        }
        let mut groups: Vec<DomainGroup> = order
            .into_iter()
            .map(|domain| {
                let sessions = members.remove(&domain).unwrap_or_default();
                DomainGroup::from_sessions(domain, sessions)
            })
            .collect();
        groups.sort_by(|a, b| b.total_requests.cmp(&a.total_requests));
        groups
    }

    /// Returns the index of the session for `page_url`, creating one when
    /// absent. At most one session ever exists per distinct page URL.
    fn ensure_session(&mut self, page_url: &str, timestamp: i64) -> usize {
        if let Some(index) = self.sessions.iter().position(|s| s.page_url == page_url) {
            return index;
        }
        let key = page_key_of(page_url);
        self.sessions.push(PageSession {
            id: Uuid::new_v4().to_string(),
            page_url: page_url.to_string(),
            domain: key.domain,
            path: key.path,
            timestamp,
            request_ids: Vec::new(),
        });
        self.sessions.len() - 1
    }

    /// Drops the selection when the selected record no longer exists.
    fn prune_selection(&mut self) {
        if let Some(id) = &self.selected_request_id {
            if !self.requests.iter().any(|r| r.id == *id) {
                self.selected_request_id = None;
            }
        }
    }
}
