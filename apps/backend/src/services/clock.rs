//! Wall-clock source for deadlines.

use std::time::Duration;

use time::OffsetDateTime;

pub trait Clock: Send + Sync {
    fn now(&self) -> OffsetDateTime;
}

/// Plain system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// Wall time derived from tokio's monotonic clock.
///
/// Captures the wall time once and adds tokio's elapsed time to it, so when
/// tokio time is paused or advanced in tests, deadlines and timers agree.
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    wall_origin: OffsetDateTime,
    origin: tokio::time::Instant,
}

impl TokioClock {
    pub fn new() -> Self {
        Self::starting_at(OffsetDateTime::now_utc())
    }

    pub fn starting_at(wall_origin: OffsetDateTime) -> Self {
        Self {
            wall_origin,
            origin: tokio::time::Instant::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioClock {
    fn now(&self) -> OffsetDateTime {
        self.wall_origin + self.origin.elapsed()
    }
}

/// How long to sleep until `deadline`; zero once it has passed.
pub fn until(now: OffsetDateTime, deadline: OffsetDateTime) -> Duration {
    Duration::try_from(deadline - now).unwrap_or(Duration::ZERO)
}
