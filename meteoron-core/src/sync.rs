//! Sync scheduler
//!
//! Gates network refresh attempts on a monotonic interval, independent of
//! the display rotation cadence. `last_attempt` is updated after every
//! attempt regardless of outcome: a failing fetch defers a full interval
//! instead of hot-looping, trading fetch freshness for display
//! availability. A station with no credentials therefore makes exactly one
//! (short-circuited) attempt per interval - existing behavior, kept as-is.

/// Minimum spacing between refresh attempts
pub const SYNC_INTERVAL_SECS: u64 = 3600;

/// Interval gate for network refresh attempts
#[derive(Debug, Clone, Copy)]
pub struct SyncScheduler {
    interval_secs: u64,
    last_attempt: Option<u64>,
}

impl SyncScheduler {
    /// Create a scheduler; the first check is immediately due
    pub const fn new(interval_secs: u64) -> Self {
        Self {
            interval_secs,
            last_attempt: None,
        }
    }

    /// Whether a refresh attempt is due at the given monotonic instant
    pub fn is_due(&self, now_secs: u64) -> bool {
        match self.last_attempt {
            None => true,
            Some(last) => now_secs.saturating_sub(last) >= self.interval_secs,
        }
    }

    /// Record that an attempt was made, successful or not
    pub fn mark_attempt(&mut self, now_secs: u64) {
        self.last_attempt = Some(now_secs);
    }
}

impl Default for SyncScheduler {
    fn default() -> Self {
        Self::new(SYNC_INTERVAL_SECS)
    }
}
