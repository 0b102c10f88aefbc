//! Request ingestion.
//!
//! This module decodes raw network-instrumentation events into canonical
//! request drafts. The event source delivers one [`RawNetworkEvent`] per
//! completed request, pre-filtered to the relevant resource types;
//! [`build_draft`] still re-checks the type tag so it is safe as a
//! general-purpose entry point, silently dropping anything it does not
//! accept.
//!
//! Ingestion never fails. Malformed URLs are preserved verbatim (the pattern
//! normalizer falls back to the raw string at insertion), and a malformed
//! `startedAt` degrades to the ingestion-time clock.

use crate::models::ResourceType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One header name/value pair as delivered on the wire.
///
/// The instrumentation API reports headers as an ordered list, not a map;
/// order matters because duplicate names keep the last-seen value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaderPair {
    /// Header name, in whatever casing the page or server used.
    pub name: String,
    /// Header value, preserved verbatim.
    pub value: String,
}

/// Start timestamp as delivered by the event source: either an ISO-8601
/// string or epoch milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StartedAt {
    /// Epoch milliseconds.
    EpochMillis(i64),
    /// ISO-8601 / RFC 3339 timestamp string.
    Timestamp(String),
}

impl StartedAt {
    /// Converts to epoch milliseconds.
    ///
    /// # Returns
    ///
    /// `None` when the string form does not parse as RFC 3339.
    pub fn to_epoch_ms(&self) -> Option<i64> {
        match self {
            StartedAt::EpochMillis(ms) => Some(*ms),
            StartedAt::Timestamp(s) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.timestamp_millis()),
        }
    }
}

/// A completed network event as delivered by the browser instrumentation.
///
/// Field names follow the instrumentation wire shape (camelCase). The host
/// resolves the asynchronous response-body fetch before handing the event
/// over, so `responseBodyText` is already present when available.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawNetworkEvent {
    /// Request URL. May be malformed; preserved either way.
    pub url: String,

    /// HTTP verb, any casing.
    pub method: String,

    /// Response status code.
    #[serde(default)]
    pub status: u16,

    /// Response status text.
    #[serde(default)]
    pub status_text: String,

    /// Request headers in wire order.
    #[serde(default)]
    pub request_headers: Vec<HeaderPair>,

    /// Response headers in wire order.
    #[serde(default)]
    pub response_headers: Vec<HeaderPair>,

    /// Raw request body text, when the request carried one.
    #[serde(default)]
    pub request_body_text: Option<String>,

    /// Raw response body text, when the host has fetched it.
    #[serde(default)]
    pub response_body_text: Option<String>,

    /// When the request started.
    pub started_at: StartedAt,

    /// Elapsed time in milliseconds.
    #[serde(default)]
    pub elapsed_ms: i64,

    /// Response size in bytes.
    #[serde(default)]
    pub content_size: u64,

    /// Resource type tag ("xhr", "fetch", "document", ...).
    pub resource_type_tag: String,

    /// Best-effort initiator tag.
    #[serde(default)]
    pub initiator_tag: Option<String>,
}

/// A canonical request record minus the store-assigned fields.
///
/// The store assigns the unique id and derives the URL pattern at insertion,
/// so both exist exactly once per record and the pattern is never
/// recomputed.
#[derive(Debug, Clone)]
pub struct RequestDraft {
    pub url: String,
    pub method: String,
    pub status: u16,
    pub status_text: String,
    pub request_headers: HashMap<String, String>,
    pub response_headers: HashMap<String, String>,
    pub request_body: Option<String>,
    pub response_body: Option<String>,
    pub start_time: i64,
    pub end_time: i64,
    pub duration: i64,
    pub size: u64,
    pub resource_type: ResourceType,
    pub initiator: String,
    pub page_url: String,
}

/// Normalizes a wire header list into a lowercase-keyed map.
///
/// Duplicate names keep the last-seen value.
fn normalize_headers(pairs: &[HeaderPair]) -> HashMap<String, String> {
    let mut headers = HashMap::with_capacity(pairs.len());
    for pair in pairs {
        headers.insert(pair.name.to_lowercase(), pair.value.clone());
    }
    headers
}

/// Builds a request draft from a raw event and the current page URL.
///
/// # Arguments
///
/// * `event` - The completed network event
/// * `page_url` - URL of the page active when the request was observed
///
/// # Returns
///
/// `Some(RequestDraft)` ready for [`RequestStore::add`], or `None` when the
/// event's resource type is not captured (the event is dropped, not an
/// error).
///
/// [`RequestStore::add`]: crate::store::RequestStore::add
pub fn build_draft(event: &RawNetworkEvent, page_url: &str) -> Option<RequestDraft> {
    let resource_type = match ResourceType::from_tag(&event.resource_type_tag) {
        Some(resource_type) => resource_type,
        None => {
            log::debug!(
                "dropping event with unsupported resource type {:?}: {}",
                event.resource_type_tag,
                event.url
            );
            return None;
        }
    };

    let start_time = event
        .started_at
        .to_epoch_ms()
        .unwrap_or_else(|| Utc::now().timestamp_millis());
    let duration = event.elapsed_ms.max(0);

    Some(RequestDraft {
        url: event.url.clone(),
        method: event.method.to_uppercase(),
        status: event.status,
        status_text: event.status_text.clone(),
        request_headers: normalize_headers(&event.request_headers),
        response_headers: normalize_headers(&event.response_headers),
        request_body: event.request_body_text.clone(),
        response_body: event.response_body_text.clone(),
        start_time,
        end_time: start_time + duration,
        duration,
        size: event.content_size,
        resource_type,
        initiator: event
            .initiator_tag
            .clone()
            .unwrap_or_else(|| "unknown".to_string()),
        page_url: page_url.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_event() -> RawNetworkEvent {
        RawNetworkEvent {
            url: "https://api.example.com/users/1".to_string(),
            method: "get".to_string(),
            status: 200,
            status_text: "OK".to_string(),
            request_headers: vec![
                HeaderPair {
                    name: "Authorization".to_string(),
                    value: "Bearer abc".to_string(),
                },
                HeaderPair {
                    name: "Accept".to_string(),
                    value: "application/json".to_string(),
                },
            ],
            response_headers: vec![HeaderPair {
                name: "Content-Type".to_string(),
                value: "application/json".to_string(),
            }],
            request_body_text: None,
            response_body_text: Some(r#"{"id": 1}"#.to_string()),
            started_at: StartedAt::EpochMillis(1_000),
            elapsed_ms: 50,
            content_size: 128,
            resource_type_tag: "xhr".to_string(),
            initiator_tag: None,
        }
    }

    #[test]
    fn test_build_draft_basic() {
        let draft = build_draft(&sample_event(), "https://example.com/").unwrap();
        assert_eq!(draft.method, "GET");
        assert_eq!(draft.start_time, 1_000);
        assert_eq!(draft.duration, 50);
        assert_eq!(draft.end_time, 1_050);
        assert_eq!(draft.size, 128);
        assert_eq!(draft.resource_type, ResourceType::Xhr);
        assert_eq!(draft.initiator, "unknown");
        assert_eq!(draft.page_url, "https://example.com/");
    }

    #[test]
    fn test_build_draft_lowercases_header_keys() {
        let draft = build_draft(&sample_event(), "https://example.com/").unwrap();
        assert_eq!(
            draft.request_headers.get("authorization"),
            Some(&"Bearer abc".to_string())
        );
        assert!(!draft.request_headers.contains_key("Authorization"));
        assert_eq!(
            draft.response_headers.get("content-type"),
            Some(&"application/json".to_string())
        );
    }

    #[test]
    fn test_build_draft_duplicate_header_last_wins() {
        let mut event = sample_event();
        event.request_headers.push(HeaderPair {
            name: "accept".to_string(),
            value: "text/plain".to_string(),
        });
        let draft = build_draft(&event, "https://example.com/").unwrap();
        assert_eq!(
            draft.request_headers.get("accept"),
            Some(&"text/plain".to_string())
        );
    }

    #[test]
    fn test_build_draft_rejects_disallowed_type() {
        let mut event = sample_event();
        event.resource_type_tag = "stylesheet".to_string();
        assert!(build_draft(&event, "https://example.com/").is_none());
    }

    #[test]
    fn test_build_draft_iso_timestamp() {
        let mut event = sample_event();
        event.started_at = StartedAt::Timestamp("2024-01-01T00:00:00Z".to_string());
        let draft = build_draft(&event, "https://example.com/").unwrap();
        assert_eq!(draft.start_time, 1_704_067_200_000);
        assert_eq!(draft.end_time, draft.start_time + 50);
    }

    #[test]
    fn test_build_draft_malformed_timestamp_falls_back_to_now() {
        let before = Utc::now().timestamp_millis();
        let mut event = sample_event();
        event.started_at = StartedAt::Timestamp("yesterday-ish".to_string());
        let draft = build_draft(&event, "https://example.com/").unwrap();
        let after = Utc::now().timestamp_millis();
        assert!(draft.start_time >= before && draft.start_time <= after);
    }

    #[test]
    fn test_build_draft_negative_elapsed_clamped() {
        let mut event = sample_event();
        event.elapsed_ms = -20;
        let draft = build_draft(&event, "https://example.com/").unwrap();
        assert_eq!(draft.duration, 0);
        assert_eq!(draft.end_time, draft.start_time);
    }

    #[test]
    fn test_build_draft_keeps_malformed_url() {
        let mut event = sample_event();
        event.url = "not a url at all".to_string();
        let draft = build_draft(&event, "https://example.com/").unwrap();
        assert_eq!(draft.url, "not a url at all");
    }

    #[test]
    fn test_event_deserialization_wire_shape() {
        let json = r#"{
            "url": "https://api.example.com/orders",
            "method": "POST",
            "status": 201,
            "statusText": "Created",
            "requestHeaders": [{"name": "Content-Type", "value": "application/json"}],
            "responseHeaders": [],
            "requestBodyText": "{\"sku\": 7}",
            "startedAt": "2024-06-01T12:00:00Z",
            "elapsedMs": 42,
            "contentSize": 10,
            "resourceTypeTag": "fetch",
            "initiatorTag": "app.js"
        }"#;
        let event: RawNetworkEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.method, "POST");
        assert_eq!(event.request_headers.len(), 1);

        let draft = build_draft(&event, "https://example.com/shop").unwrap();
        assert_eq!(draft.resource_type, ResourceType::Fetch);
        assert_eq!(draft.initiator, "app.js");
        assert_eq!(draft.request_body, Some("{\"sku\": 7}".to_string()));
    }

    #[test]
    fn test_event_deserialization_epoch_started_at() {
        let json = r#"{
            "url": "https://api.example.com/ping",
            "method": "GET",
            "startedAt": 1700000000000,
            "resourceTypeTag": "xhr"
        }"#;
        let event: RawNetworkEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.started_at.to_epoch_ms(), Some(1_700_000_000_000));
        assert_eq!(event.status, 0);
        assert!(event.request_headers.is_empty());
    }
}
