//! Clock abstraction so scheduling is testable.
//!
//! The process-wide time source defaults to the real system clock. Tests
//! (with the `testing-support` feature) can install a fixed clock before
//! any time is read.

use chrono::{DateTime, Local};
use once_cell::sync::OnceCell;
use std::sync::Arc;
use std::time::Duration;

static TIME_SOURCE: OnceCell<Arc<dyn TimeSource>> = OnceCell::new();

pub trait TimeSource: Send + Sync {
    /// Current wall-clock time.
    fn now(&self) -> DateTime<Local>;

    /// Sleep for the given duration (or skip it entirely).
    fn sleep(&self, duration: Duration);
}

/// Real system clock.
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Install a time source for the whole process. Fails if one is already
/// active (including the implicitly-installed system clock).
pub fn init(source: Arc<dyn TimeSource>) -> Result<(), ()> {
    TIME_SOURCE.set(source).map_err(|_| ())
}

fn source() -> &'static Arc<dyn TimeSource> {
    TIME_SOURCE.get_or_init(|| Arc::new(SystemClock))
}

/// Current time from the active source.
pub fn now() -> DateTime<Local> {
    source().now()
}

/// Sleep through the active source.
pub fn sleep(duration: Duration) {
    source().sleep(duration)
}

/// Fixed clock for deterministic tests; `sleep` returns immediately.
#[cfg(feature = "testing-support")]
pub struct FixedClock(pub DateTime<Local>);

#[cfg(feature = "testing-support")]
impl TimeSource for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }

    fn sleep(&self, _duration: Duration) {}
}
