use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Per-tick inputs handed to every node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickContext {
    pub tick: u64,
    /// Monotonic time in seconds. Successive reads within one tree never decrease.
    pub now: f64,
}

impl TickContext {
    pub fn new(tick: u64, now: f64) -> Self {
        Self { tick, now }
    }

    /// Seconds elapsed since `since`, never negative.
    pub fn elapsed_since(&self, since: f64) -> f64 {
        (self.now - since).max(0.0)
    }
}

/// Monotonic time source consumed by time-based decorators.
pub trait Clock: Send {
    fn now(&self) -> f64;
}

/// Wall clock backed by [`Instant`], measured from construction.
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
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Hand-driven clock for tests and deterministic replays.
///
/// Clones share the same time, so a test can keep one handle while a tree
/// driver owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    bits: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(start: f64) -> Self {
        let clock = Self::default();
        clock.set(start);
        clock
    }

    /// Moves time forward. Negative steps are ignored to keep reads monotonic.
    pub fn advance(&self, seconds: f64) {
        if seconds > 0.0 {
            self.set(self.now() + seconds);
        }
    }

    pub fn set(&self, seconds: f64) {
        self.bits.store(seconds.to_bits(), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new(1.0);
        let handle = clock.clone();
        handle.advance(0.5);
        assert_eq!(clock.now(), 1.5);

        handle.advance(-3.0);
        assert_eq!(clock.now(), 1.5);
    }

    #[test]
    fn elapsed_is_clamped_at_zero() {
        let ctx = TickContext::new(0, 1.0);
        assert_eq!(ctx.elapsed_since(2.0), 0.0);
        assert_eq!(ctx.elapsed_since(0.25), 0.75);
    }
}
