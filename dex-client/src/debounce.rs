//! Search input debouncing.
//!
//! Owned by whatever handles the search input; nothing here is shared
//! between components.

use std::time::{Duration, Instant};

use dex_core::constants::SEARCH_DELAY_MS;

/// Tracks the last input change and decides when a query has settled.
#[derive(Clone, Debug)]
pub struct SearchDebouncer {
    delay: Duration,
    last_change: Option<Instant>,
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new(Duration::from_millis(SEARCH_DELAY_MS))
    }
}

impl SearchDebouncer {
    /// Creates a debouncer with the given quiet period.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_change: None,
        }
    }

    /// Returns the quiet period.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Records an input change at `at`.
    pub fn record_change(&mut self, at: Instant) {
        self.last_change = Some(at);
    }

    /// Returns when the input last changed.
    pub fn last_change(&self) -> Option<Instant> {
        self.last_change
    }

    /// Returns true if the input made at `input_time` is still the latest
    /// and has been quiet for the full delay at `now`.
    ///
    /// A timer started for a keystroke calls this when it fires; a later
    /// keystroke makes the earlier timers stale.
    pub fn is_settled(&self, input_time: Instant, now: Instant) -> bool {
        let latest = self.last_change.map_or(false, |last| last <= input_time);
        latest && now.saturating_duration_since(input_time) >= self.delay
    }

    /// Forgets the last change, e.g. when the input is cleared.
    pub fn reset(&mut self) {
        self.last_change = None;
    }
}
