//! Shared wall-clock origin and deadline.

use std::time::{Duration, Instant};

/// A monotonically advancing origin shared by all threads, plus the
/// deadline derived from the configured time limit.
#[derive(Debug, Clone, Copy)]
pub struct GlobalClock {
    t0: Instant,
    deadline: Instant,
}

impl GlobalClock {
    /// Starts the clock now, with a deadline `time_limit` in the future.
    pub fn start(time_limit: Duration) -> Self {
        let t0 = Instant::now();
        GlobalClock { t0, deadline: t0 + time_limit }
    }

    pub fn now(&self) -> Instant {
        Instant::now()
    }

    pub fn t0(&self) -> Instant {
        self.t0
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn elapsed(&self) -> Duration {
        self.t0.elapsed()
    }

    /// Remaining time budget, zero once the deadline has passed.
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    pub fn is_past_deadline(&self) -> bool {
        Instant::now() >= self.deadline
    }
}
