use parking_lot::Mutex;
use std::sync::Arc;
use web_time::{Duration, Instant};

/// Time source for a `TimerQueue`.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> Instant;
}

pub struct SystemClock;
impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A test clock you can drive deterministically. Clones share the same time.
#[derive(Clone)]
pub struct TestClock {
    t: Arc<Mutex<Instant>>,
}

impl Default for TestClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TestClock {
    pub fn new() -> Self {
        Self::at(Instant::now())
    }

    pub fn at(t: Instant) -> Self {
        Self {
            t: Arc::new(Mutex::new(t)),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut t = self.t.lock();
        *t += by;
    }

    /// Moves the clock to `t`. Going backwards is allowed; due timers simply wait longer.
    pub fn set(&self, t: Instant) {
        *self.t.lock() = t;
    }
}

impl Clock for TestClock {
    fn now(&self) -> Instant {
        *self.t.lock()
    }
}
