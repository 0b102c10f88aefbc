//! Core data models for captured network traffic.
//!
//! This module defines the structures every view of the inspector panel is
//! built on: individual [`CapturedRequest`] records, per-page
//! [`PageSession`]s, and the derived [`RequestGroup`] / [`DomainGroup`]
//! aggregations.

pub mod groups;
pub mod request;
pub mod session;

pub use groups::{DomainGroup, RequestGroup};
pub use request::{CapturedRequest, ResourceType};
pub use session::PageSession;
