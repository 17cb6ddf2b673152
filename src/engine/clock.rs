//=========================================================================
// Clocks
//=========================================================================
//
// Monotonic time sources for the engine loop.
//
// The loop only ever asks "what time is it now", expressed as the time
// elapsed since the clock's own origin. `SystemClock` answers from the
// OS; `ManualClock` answers whatever it was last told, which makes frame
// deltas scriptable.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

//=== Clock Trait =========================================================

/// Monotonic time source.
pub trait Clock {
    /// Time elapsed since this clock's origin. Never decreases.
    fn now(&self) -> Duration;
}

//=== SystemClock =========================================================

/// Wall-clock time from [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
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

//=== ManualClock =========================================================

/// Clock advanced by hand.
///
/// Clones share the same time, so a scene (or test) holding a clone can
/// move time forward while the engine owns the original.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    /// A clock standing at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves time forward by `delta`.
    pub fn advance(&self, delta: Duration) {
        self.now.set(self.now.get() + delta);
    }

    /// Moves time forward by `seconds`.
    pub fn advance_secs(&self, seconds: f64) {
        self.advance(Duration::from_secs_f64(seconds));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
