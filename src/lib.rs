//! Netpanel — request capture and grouping core for a DevTools-style
//! network inspector.
//!
//! This crate is the data-modeling heart of a network traffic panel: it
//! takes completed network events from the browser's instrumentation,
//! normalizes them into canonical records, aggregates them into per-page
//! sessions, and derives the pattern-based groupings that surface repeated
//! ("N+1") calls. Rendering, the instrumentation event source, request
//! replay, and JWT decoding are the host's concern; this crate only owns
//! the pipeline between the raw event and the structures the views read.
//!
//! # Architecture
//!
//! - **models**: `CapturedRequest`, `PageSession`, and the derived
//!   `RequestGroup` / `DomainGroup` aggregations
//! - **pattern**: URL pattern normalization (the N+1 grouping key)
//! - **ingest**: decodes raw instrumentation events into request drafts
//! - **store**: the authoritative in-memory store; the single mutation API
//!   for both collections
//! - **filter**: pure filter/sort derivations for the visible request list
//! - **retention**: cooperative retention sweeping
//! - **settings**: panel settings schema and loading
//!
//! # Flow
//!
//! The host wires the pieces together like this:
//!
//! ```
//! use netpanel::filter::{filter_requests, FilterSpec};
//! use netpanel::ingest::{build_draft, RawNetworkEvent, StartedAt};
//! use netpanel::retention::RetentionSweeper;
//! use netpanel::settings::load_settings;
//! use netpanel::store::RequestStore;
//!
//! let settings = load_settings(None).unwrap();
//! let mut store = RequestStore::new();
//! let mut sweeper = RetentionSweeper::new(settings.retention_window());
//!
//! // Navigation events carry the authoritative page URL.
//! store.on_navigate("https://example.com/dashboard");
//!
//! // One event per completed request, delivered by the instrumentation.
//! let event = RawNetworkEvent {
//!     url: "https://api.example.com/users/42".to_string(),
//!     method: "GET".to_string(),
//!     status: 200,
//!     status_text: "OK".to_string(),
//!     request_headers: Vec::new(),
//!     response_headers: Vec::new(),
//!     request_body_text: None,
//!     response_body_text: None,
//!     started_at: StartedAt::EpochMillis(0),
//!     elapsed_ms: 12,
//!     content_size: 256,
//!     resource_type_tag: "xhr".to_string(),
//!     initiator_tag: None,
//! };
//! let page_url = store.current_page_url().unwrap_or("unknown").to_string();
//! if let Some(draft) = build_draft(&event, &page_url) {
//!     store.add(draft);
//! }
//!
//! // Derivations are recomputed on demand; the caller decides when.
//! let groups = store.group_by_pattern();
//! let visible = filter_requests(store.requests(), &FilterSpec::all());
//! assert_eq!(groups.len(), 1);
//! assert_eq!(visible.len(), 1);
//!
//! // The host's timer drives the sweeper.
//! sweeper.tick_now(&mut store);
//! ```

pub mod filter;
pub mod ingest;
pub mod models;
pub mod pattern;
pub mod retention;
pub mod settings;
pub mod store;

pub use filter::{FilterSpec, SortBy};
pub use ingest::{build_draft, RawNetworkEvent, RequestDraft};
pub use models::{CapturedRequest, DomainGroup, PageSession, RequestGroup, ResourceType};
pub use pattern::{page_key_of, pattern_of, PageKey};
pub use retention::RetentionSweeper;
pub use settings::{load_settings, PanelSettings};
pub use store::RequestStore;
