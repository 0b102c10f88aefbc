//! Retention sweeping.
//!
//! The sweeper periodically evicts sessions (and their orphaned requests)
//! older than the configured retention window. It is cooperative: the host
//! drives it by calling [`RetentionSweeper::tick`] from its timer callback,
//! which keeps every store mutation on the single logical thread the store
//! expects. The sweeper holds no interval handle of its own, so there is
//! nothing to leak or tear down when the hosting panel unmounts.
//!
//! Sweep schedule: immediately on the first tick after construction,
//! immediately after a retention-window change, and every five minutes
//! otherwise.

use crate::store::RequestStore;
use chrono::{Duration, Utc};

/// Fixed sweep cadence between forced sweeps, in milliseconds.
pub const SWEEP_INTERVAL_MS: i64 = 5 * 60 * 1_000;

/// Drives periodic retention eviction against a [`RequestStore`].
#[derive(Debug)]
pub struct RetentionSweeper {
    window: Duration,
    last_sweep_ms: Option<i64>,
}

impl RetentionSweeper {
    /// Creates a sweeper with the given retention window.
    ///
    /// The first [`tick`](Self::tick) after construction sweeps
    /// unconditionally, covering the "sweep once at startup" requirement.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_sweep_ms: None,
        }
    }

    /// The current retention window.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Replaces the retention window.
    ///
    /// The cadence is reset so the next tick sweeps immediately with the new
    /// window, mirroring an interval that is torn down and recreated when
    /// the setting changes mid-run.
    pub fn set_window(&mut self, window: Duration) {
        self.window = window;
        self.last_sweep_ms = None;
    }

    /// Runs a sweep if one is due.
    ///
    /// # Arguments
    ///
    /// * `store` - The store to evict from
    /// * `now_ms` - Current time in epoch milliseconds (injected so hosts
    ///   and tests control the clock)
    ///
    /// # Returns
    ///
    /// `Some(removed_sessions)` when a sweep ran, `None` when the cadence
    /// has not elapsed yet.
    pub fn tick(&mut self, store: &mut RequestStore, now_ms: i64) -> Option<usize> {
        let due = match self.last_sweep_ms {
            None => true,
            Some(last) => now_ms - last >= SWEEP_INTERVAL_MS,
        };
        if !due {
            return None;
        }

        self.last_sweep_ms = Some(now_ms);
        let removed = store.evict_older_than(self.window);
        log::debug!(
            "retention sweep complete: {} session(s) removed, window {}h",
            removed,
            self.window.num_hours()
        );
        Some(removed)
    }

    /// Convenience wrapper around [`tick`](Self::tick) using the wall
    /// clock.
    pub fn tick_now(&mut self, store: &mut RequestStore) -> Option<usize> {
        self.tick(store, Utc::now().timestamp_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::RequestDraft;
    use crate::models::ResourceType;
    use std::collections::HashMap;

    fn old_draft(page_url: &str, start_time: i64) -> RequestDraft {
        RequestDraft {
            url: "https://api.x.com/ping".to_string(),
            method: "GET".to_string(),
            status: 200,
            status_text: "OK".to_string(),
            request_headers: HashMap::new(),
            response_headers: HashMap::new(),
            request_body: None,
            response_body: None,
            start_time,
            end_time: start_time,
            duration: 0,
            size: 0,
            resource_type: ResourceType::Xhr,
            initiator: "unknown".to_string(),
            page_url: page_url.to_string(),
        }
    }

    #[test]
    fn test_first_tick_sweeps_immediately() {
        let mut store = RequestStore::new();
        let mut sweeper = RetentionSweeper::new(Duration::hours(24));
        assert_eq!(sweeper.tick(&mut store, 0), Some(0));
    }

    #[test]
    fn test_tick_respects_cadence() {
        let mut store = RequestStore::new();
        let mut sweeper = RetentionSweeper::new(Duration::hours(24));

        assert!(sweeper.tick(&mut store, 0).is_some());
        assert!(sweeper.tick(&mut store, SWEEP_INTERVAL_MS - 1).is_none());
        assert!(sweeper.tick(&mut store, SWEEP_INTERVAL_MS).is_some());
        assert!(sweeper.tick(&mut store, SWEEP_INTERVAL_MS + 1).is_none());
    }

    #[test]
    fn test_window_change_forces_immediate_sweep() {
        let mut store = RequestStore::new();
        let mut sweeper = RetentionSweeper::new(Duration::hours(24));

        assert!(sweeper.tick(&mut store, 0).is_some());
        assert!(sweeper.tick(&mut store, 1).is_none());

        sweeper.set_window(Duration::hours(1));
        assert_eq!(sweeper.window(), Duration::hours(1));
        assert!(sweeper.tick(&mut store, 2).is_some());
    }

    #[test]
    fn test_sweep_evicts_stale_sessions() {
        let now = Utc::now().timestamp_millis();
        let mut store = RequestStore::new();
        store.add(old_draft(
            "https://a.com/old",
            now - Duration::hours(25).num_milliseconds(),
        ));
        store.add(old_draft(
            "https://a.com/new",
            now - Duration::hours(1).num_milliseconds(),
        ));

        let mut sweeper = RetentionSweeper::new(Duration::hours(24));
        let removed = sweeper.tick_now(&mut store);

        assert_eq!(removed, Some(1));
        assert_eq!(store.sessions().len(), 1);
        assert_eq!(store.sessions()[0].page_url, "https://a.com/new");
    }
}
