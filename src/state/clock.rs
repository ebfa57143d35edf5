//! Time source for deck cooldowns.

use std::time::Instant;

/// Supplies the current instant to time-dependent state.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall clock used by the running application.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[cfg(test)]
pub use manual::ManualClock;
