//! Search input debouncing.
//!
//! The caller passes the clock in, so the debouncer works the same under a
//! UI event loop, a tokio timer, or a test.

use std::time::{Duration, Instant};

/// Default quiet period before typed search text is committed.
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 600;

/// Holds typed search text until the input has been quiet long enough.
#[derive(Debug, Clone)]
pub struct SearchDebouncer {
    quiet: Duration,
    committed: String,
    pending: Option<(String, Instant)>,
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_SEARCH_DEBOUNCE_MS))
    }
}

impl SearchDebouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            committed: String::new(),
            pending: None,
        }
    }

    /// Record a keystroke. Restarts the quiet period.
    pub fn input(&mut self, text: impl Into<String>, now: Instant) {
        let text = text.into();
        if text == self.committed {
            self.pending = None;
        } else {
            self.pending = Some((text, now));
        }
    }

    /// Commit the pending text once the quiet period has passed.
    ///
    /// # Returns
    /// The newly committed text, or `None` if nothing changed.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let ready = matches!(
            &self.pending,
            Some((_, since)) if now.saturating_duration_since(*since) >= self.quiet
        );
        if !ready {
            return None;
        }
        let (text, _) = self.pending.take()?;
        self.committed = text.clone();
        Some(text)
    }

    /// Instant at which the pending text would be committed.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, since)| *since + self.quiet)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Text currently applied to the query.
    pub fn committed(&self) -> &str {
        &self.committed
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet
    }
}
