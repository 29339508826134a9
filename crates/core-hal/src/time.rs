//! Time Source (L0) — monotonic millisecond clock, `sleep`, `sleep_until`.

use std::sync::Mutex;
use std::time::Instant;

/// Monotonic clock + blocking sleep contract (spec.md §6).
///
/// Implementors must be monotonic: `now_ms()` never decreases across
/// calls on the same instance.
pub trait TimeSource: Send + Sync {
    fn now_ms(&self) -> u64;
    fn sleep(&self, ms: u64);

    fn sleep_until(&self, deadline_ms: u64) {
        let now = self.now_ms();
        if deadline_ms > now {
            self.sleep(deadline_ms - now);
        }
    }
}

/// Real-clock implementation, backed by `std::time::Instant`.
pub struct SystemTimeSource {
    epoch: Instant,
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemTimeSource {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl TimeSource for SystemTimeSource {
    fn now_ms(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }

    fn sleep(&self, ms: u64) {
        std::thread::sleep(std::time::Duration::from_millis(ms));
    }
}

/// Virtual clock for tests: `now_ms` is driven explicitly by `advance`,
/// and `sleep` just fast-forwards the clock rather than blocking the
/// calling thread. This lets engine/calibration tests run deterministically
/// and instantly instead of waiting on wall-clock delays.
pub struct VirtualTimeSource {
    now_ms: Mutex<u64>,
}

impl Default for VirtualTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualTimeSource {
    pub fn new() -> Self {
        Self {
            now_ms: Mutex::new(0),
        }
    }

    pub fn advance(&self, ms: u64) {
        let mut guard = self.now_ms.lock().expect("virtual clock poisoned");
        *guard += ms;
    }
}

impl TimeSource for VirtualTimeSource {
    fn now_ms(&self) -> u64 {
        *self.now_ms.lock().expect("virtual clock poisoned")
    }

    fn sleep(&self, ms: u64) {
        self.advance(ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn virtual_clock_advances_on_sleep() {
        let clock = VirtualTimeSource::new();
        assert_eq!(clock.now_ms(), 0);
        clock.sleep(250);
        assert_eq!(clock.now_ms(), 250);
        clock.sleep_until(1000);
        assert_eq!(clock.now_ms(), 1000);
        // sleep_until never rewinds the clock.
        clock.sleep_until(500);
        assert_eq!(clock.now_ms(), 1000);
    }
}
