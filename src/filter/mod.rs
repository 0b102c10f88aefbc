//! Filtering and sorting of captured requests.
//!
//! The engine is a set of pure functions over the store's data: the caller
//! hands in the current request collection and a [`FilterSpec`], and gets
//! back the visible subset in deterministic order. Applying the same spec to
//! the same collection twice always yields identical output.

use crate::models::{CapturedRequest, RequestGroup};
use crate::pattern::is_variable_segment;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use url::Url;

/// Sentinel value disabling the method or segment predicate.
pub const ALL: &str = "ALL";

/// Sort key and direction for the visible request list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortBy {
    /// Oldest start time first.
    #[serde(rename = "time-ascending")]
    TimeAscending,
    /// Newest start time first.
    #[serde(rename = "time-descending")]
    TimeDescending,
    /// Lexical by HTTP verb.
    #[serde(rename = "method-alphabetical")]
    MethodAlphabetical,
    /// Numeric by status code, ascending.
    #[serde(rename = "status-ascending")]
    StatusAscending,
}

impl Default for SortBy {
    fn default() -> Self {
        SortBy::TimeDescending
    }
}

/// The user's current filter selection.
///
/// All predicates are ANDed. An empty `search` and the `"ALL"` sentinel for
/// `method`/`segment` disable the respective predicate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    /// Case-insensitive substring matched against URL or method.
    #[serde(default)]
    pub search: String,

    /// Exact HTTP verb, or `"ALL"`.
    #[serde(default = "default_all")]
    pub method: String,

    /// Exact non-placeholder path segment, or `"ALL"`. A request matches
    /// when its URL path contains `/segment/` or ends with `/segment`.
    #[serde(default = "default_all")]
    pub segment: String,

    /// Sort applied after filtering.
    #[serde(default)]
    pub sort_by: SortBy,
}

fn default_all() -> String {
    ALL.to_string()
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            search: String::new(),
            method: default_all(),
            segment: default_all(),
            sort_by: SortBy::default(),
        }
    }
}

impl FilterSpec {
    /// Spec that matches everything, sorted newest first.
    pub fn all() -> Self {
        Self::default()
    }

    /// Sets the free-text search term.
    pub fn with_search(mut self, search: &str) -> Self {
        self.search = search.to_string();
        self
    }

    /// Sets the method predicate (use [`ALL`] to disable).
    pub fn with_method(mut self, method: &str) -> Self {
        self.method = method.to_uppercase();
        self
    }

    /// Sets the route-segment predicate (use [`ALL`] to disable).
    pub fn with_segment(mut self, segment: &str) -> Self {
        self.segment = segment.to_string();
        self
    }

    /// Sets the sort key.
    pub fn with_sort(mut self, sort_by: SortBy) -> Self {
        self.sort_by = sort_by;
        self
    }

    fn matches(&self, request: &CapturedRequest) -> bool {
        if !self.search.is_empty() {
            let query = self.search.to_lowercase();
            let in_url = request.url.to_lowercase().contains(&query);
            let in_method = request.method.to_lowercase().contains(&query);
            if !in_url && !in_method {
                return false;
            }
        }

        if self.method != ALL && request.method != self.method {
            return false;
        }

        if self.segment != ALL {
            let path = url_path(&request.url);
            let infix = format!("/{}/", self.segment);
            let suffix = format!("/{}", self.segment);
            if !path.contains(&infix) && !path.ends_with(&suffix) {
                return false;
            }
        }

        true
    }
}

/// Path component of a URL, falling back to the raw string for URLs that do
/// not parse (their whole text doubles as the "path" for segment matching).
fn url_path(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) if !parsed.cannot_be_a_base() => parsed.path().to_string(),
        _ => url.to_string(),
    }
}

/// Applies a filter spec to a request collection.
///
/// Predicates are ANDed, then the survivors are sorted by the spec's sort
/// key. Sorting is stable: equal keys preserve their relative input order.
pub fn filter_requests(requests: &[CapturedRequest], spec: &FilterSpec) -> Vec<CapturedRequest> {
    let mut visible: Vec<CapturedRequest> = requests
        .iter()
        .filter(|r| spec.matches(r))
        .cloned()
        .collect();

    match spec.sort_by {
        SortBy::TimeAscending => visible.sort_by(|a, b| a.start_time.cmp(&b.start_time)),
        SortBy::TimeDescending => visible.sort_by(|a, b| b.start_time.cmp(&a.start_time)),
        SortBy::MethodAlphabetical => visible.sort_by(|a, b| a.method.cmp(&b.method)),
        SortBy::StatusAscending => visible.sort_by(|a, b| a.status.cmp(&b.status)),
    }

    visible
}

/// Applies a filter spec to derived pattern groups.
///
/// Each group's `count` and `avg_duration` are re-derived from the members
/// that survive the predicates, not carried over from the unfiltered group;
/// a group left with no members is dropped entirely. Member order (ascending
/// start time) is preserved.
pub fn filter_groups(groups: &[RequestGroup], spec: &FilterSpec) -> Vec<RequestGroup> {
    groups
        .iter()
        .filter_map(|group| {
            let survivors: Vec<CapturedRequest> = group
                .requests
                .iter()
                .filter(|r| spec.matches(r))
                .cloned()
                .collect();
            if survivors.is_empty() {
                None
            } else {
                Some(RequestGroup::from_requests(group.pattern.clone(), survivors))
            }
        })
        .collect()
}

/// Collects the selectable route-segment filter values for a request set.
///
/// Takes every path segment of every known request, discards segments that
/// the pattern normalizer would replace with a placeholder, and returns the
/// rest deduplicated in lexical order.
pub fn route_segments(requests: &[CapturedRequest]) -> Vec<String> {
    let mut segments = BTreeSet::new();
    for request in requests {
        let path = url_path(&request.url);
        for segment in path.split('/') {
            if segment.is_empty() || is_variable_segment(segment) {
                continue;
            }
            segments.insert(segment.to_string());
        }
    }
    segments.into_iter().collect()
}
