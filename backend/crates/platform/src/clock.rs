//! Clock
//!
//! Source of "now" for token issuance and verification. Production code uses
//! [`SystemClock`]; tests drive time with [`ManualClock`].

use std::sync::atomic::{AtomicI64, Ordering};

/// Wall clock reporting Unix seconds
pub trait Clock: Send + Sync {
    fn now(&self) -> i64;
}

/// System time in UTC
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// Clock that only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock(AtomicI64);

impl ManualClock {
    pub fn new(now: i64) -> Self {
        Self(AtomicI64::new(now))
    }

    pub fn set(&self, now: i64) {
        self.0.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, secs: i64) {
        self.0.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}
