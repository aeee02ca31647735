use std::time::{Duration, Instant};

/// Cancelable quiet-period timer for suggestion computation.
///
/// Every new input replaces the pending one and restarts the quiet period,
/// so at most one query per quiet period is released.
#[derive(Debug, Clone)]
pub struct Debouncer {
    quiet: Duration,
    pending: Option<(String, Instant)>,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
        }
    }

    pub fn input(&mut self, query: impl Into<String>, now: Instant) {
        self.pending = Some((query.into(), now + self.quiet));
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Time left before the pending query fires, if any.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|(_, due)| due.saturating_duration_since(now))
    }

    /// Releases the pending query once its quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let due = self.pending.as_ref().map(|(_, due)| *due)?;
        if now < due {
            return None;
        }
        self.pending.take().map(|(query, _)| query)
    }
}
