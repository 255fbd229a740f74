//! Time sources for schedulers.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Monotonic time source, measured from an arbitrary origin.
pub trait Clock: Send {
    fn now(&self) -> Duration;
}

/// Wall-clock time measured from construction.
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Start a clock reading zero now.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Clock that only moves when told to.
///
/// Clones share the same reading, so a test can keep one copy and hand
/// the other to a scheduler.
///
/// # Example
///
/// ```rust
/// use linkstate::scheduler::{Clock, ManualClock};
/// use std::time::Duration;
///
/// let clock = ManualClock::new();
/// let shared = clock.clone();
///
/// clock.advance(Duration::from_millis(16));
/// assert_eq!(shared.now(), Duration::from_millis(16));
/// ```
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Arc<Mutex<Duration>>,
}

impl ManualClock {
    /// Create a clock reading zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the reading.
    pub fn set(&self, now: Duration) {
        *self.lock() = now;
    }

    /// Move the reading forward.
    pub fn advance(&self, by: Duration) {
        let mut now = self.lock();
        *now = now.saturating_add(by);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Duration> {
        // A poisoned reading is still a valid Duration.
        self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        *self.lock()
    }
}
