//! Wall-clock budget.

use std::time::{Duration, Instant};

/// A fixed wall-clock deadline.
///
/// Remaining budget shrinks with real elapsed time, not CPU time. Build it
/// with [`Deadline::at`] when time spent before the solve (loading, parsing)
/// must count against the same budget.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    start: Instant,
    end: Instant,
}

impl Deadline {
    /// A deadline `limit` from now.
    pub fn after(limit: Duration) -> Self {
        let start = Instant::now();
        Self {
            start,
            end: start + limit,
        }
    }

    /// A deadline at `end`, measured from now.
    pub fn at(end: Instant) -> Self {
        Self {
            start: Instant::now(),
            end,
        }
    }

    /// Time left, zero once the deadline has passed.
    pub fn remaining(&self) -> Duration {
        self.end.saturating_duration_since(Instant::now())
    }

    /// Time since the deadline was created.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Whether more than `threshold` is left.
    pub fn allows(&self, threshold: Duration) -> bool {
        self.remaining() > threshold
    }
}
