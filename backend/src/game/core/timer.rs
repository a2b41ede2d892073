//! Round countdown.
//!
//! A running round is described by a single absolute start instant plus the
//! configured duration. Pausing captures the remaining seconds; resuming
//! rebuilds a start instant that yields exactly that remainder again, so time
//! spent paused never counts against the team.
//!
//! All instants are milliseconds since the Unix epoch.

/// Countdown for rounds of a fixed duration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundTimer {
    duration_secs: u32,
}

impl RoundTimer {
    pub fn new(duration_secs: u32) -> Self {
        Self { duration_secs }
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    pub fn start(&self, now: u64) -> u64 {
        now
    }

    /// Whole seconds left, rounded up and clamped at zero
    pub fn remaining(&self, started_at: u64, now: u64) -> u32 {
        let elapsed = now as i64 - started_at as i64;
        let left_ms = i64::from(self.duration_secs) * 1000 - elapsed;
        if left_ms <= 0 {
            return 0;
        }
        // ceil division for positive values
        ((left_ms + 999) / 1000) as u32
    }

    pub fn is_expired(&self, started_at: u64, now: u64) -> bool {
        self.remaining(started_at, now) == 0
    }

    /// Remaining seconds to hold while the round is suspended
    pub fn pause(&self, started_at: u64, now: u64) -> u32 {
        self.remaining(started_at, now)
    }

    /// New start instant such that `remaining(new_start, now) == remaining_secs`
    pub fn resume(&self, remaining_secs: u32, now: u64) -> u64 {
        let remaining_secs = remaining_secs.min(self.duration_secs);
        let already_elapsed_ms = u64::from(self.duration_secs - remaining_secs) * 1000;
        now.saturating_sub(already_elapsed_ms)
    }
}
