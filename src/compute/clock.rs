//! Millisecond clocks used to time stepper invocations.

use std::cell::Cell;

/// Source of monotonic millisecond readings.
///
/// `None` means the clock is unavailable; callers skip whatever depended on
/// the reading instead of failing.
pub trait Clock {
    fn now_ms(&self) -> Option<f64>;
}

/// Platform wall clock.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: std::time::Instant,
}

#[cfg(not(target_arch = "wasm32"))]
impl Default for SystemClock {
    fn default() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Clock for SystemClock {
    fn now_ms(&self) -> Option<f64> {
        Some(self.origin.elapsed().as_secs_f64() * 1000.0)
    }
}

/// Platform wall clock (`Date.now()` in the browser).
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct SystemClock;

#[cfg(target_arch = "wasm32")]
impl Clock for SystemClock {
    fn now_ms(&self) -> Option<f64> {
        let now = js_sys::Date::now();
        now.is_finite().then_some(now)
    }
}

/// Deterministic clock that advances by a fixed amount on every reading.
///
/// Two consecutive readings are `increment_ms` apart, so every timed step
/// appears to take exactly that long.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Cell<f64>,
    increment_ms: f64,
}

impl ManualClock {
    pub fn new(increment_ms: f64) -> Self {
        Self {
            now: Cell::new(0.0),
            increment_ms,
        }
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> Option<f64> {
        let now = self.now.get();
        self.now.set(now + self.increment_ms);
        Some(now)
    }
}

/// A clock that is never available.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoClock;

impl Clock for NoClock {
    fn now_ms(&self) -> Option<f64> {
        None
    }
}

/// Milliseconds between two readings, if both exist and are ordered.
pub fn elapsed_ms(start: Option<f64>, end: Option<f64>) -> Option<f64> {
    match (start, end) {
        (Some(s), Some(e)) if e >= s => Some(e - s),
        _ => None,
    }
}
