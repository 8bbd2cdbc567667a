//! Blocking clock abstraction.
//!
//! Every wait in the sequence goes through a [`Clock`]. [`SystemClock`]
//! blocks the calling thread; [`SimulatedClock`] only advances a counter so
//! timing can be checked without sleeping.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Source of blocking delays.
pub trait Clock {
    /// Block for `duration`.
    fn sleep(&self, duration: Duration);
}

/// Wall clock backed by `std::thread::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Virtual clock that advances instantly on `sleep`.
///
/// Clones share the same time base, so a register backend holding a clone
/// observes the same "now" as the controller.
#[derive(Debug, Clone, Default)]
pub struct SimulatedClock {
    elapsed_ns: Arc<AtomicU64>,
}

impl SimulatedClock {
    /// Create a clock at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time since creation.
    pub fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.elapsed_ns.load(Ordering::SeqCst))
    }

    /// Move virtual time forward.
    pub fn advance(&self, duration: Duration) {
        let ns = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        self.elapsed_ns.fetch_add(ns, Ordering::SeqCst);
    }
}

impl Clock for SimulatedClock {
    fn sleep(&self, duration: Duration) {
        self.advance(duration);
    }
}
