//! Time primitives shared by every controller
//!
//! Controllers never read a clock themselves. Each operation takes `now`, a
//! [`Timestamp`] measured from an arbitrary origin, which keeps them
//! deterministic under simulation. Drivers obtain `now` from a [`Clock`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Monotonic point in time, relative to the driver's origin
pub type Timestamp = Duration;

/// Source of the current timestamp for a driver loop
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// Wall-clock monotonic time, origin at construction
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
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
    fn now(&self) -> Timestamp {
        self.origin.elapsed()
    }
}

/// Manually advanced clock for simulations and tests
///
/// Clones share the same underlying time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    millis: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward
    pub fn advance(&self, by: Duration) -> Timestamp {
        let by = by.as_millis() as u64;
        let now = self.millis.fetch_add(by, Ordering::SeqCst) + by;
        Duration::from_millis(now)
    }

    /// Jump to an absolute timestamp; earlier values are ignored
    pub fn set(&self, to: Timestamp) {
        self.millis.fetch_max(to.as_millis() as u64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Duration::from_millis(self.millis.load(Ordering::SeqCst))
    }
}

/// Check whether an optional deadline has been reached
#[inline]
pub fn is_due(deadline: Option<Timestamp>, now: Timestamp) -> bool {
    matches!(deadline, Some(at) if at <= now)
}

/// Calculate animation progress (0.0 to 1.0) from start time and duration
#[inline]
pub fn progress(start: Timestamp, duration: Duration, now: Timestamp) -> f64 {
    if duration.is_zero() {
        return if now >= start { 1.0 } else { 0.0 };
    }
    let elapsed = now.saturating_sub(start);
    let ratio = elapsed.as_secs_f64() / duration.as_secs_f64();
    ratio.clamp(0.0, 1.0)
}

/// Linear interpolation between two values
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Earliest of a set of optional deadlines
pub fn earliest(deadlines: &[Option<Timestamp>]) -> Option<Timestamp> {
    deadlines.iter().flatten().copied().min()
}
