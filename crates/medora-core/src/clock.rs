//! # Clock and Latency
//!
//! Time is injected rather than read from globals so that services can be
//! driven deterministically in tests.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Injectable Time                                      │
//! │                                                                         │
//! │  Production wiring              Test wiring                             │
//! │  ─────────────────              ───────────                             │
//! │  SystemClock (Utc::now)         ManualClock (set / advance)             │
//! │  Latency::from_millis(300)      Latency::instant()                      │
//! │                                                                         │
//! │  Services only ever see `Arc<dyn Clock>` and `Latency`.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`Latency`] is only a duration value here; the services do the waiting.

use std::fmt::Debug;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Clock
// =============================================================================

/// Source of wall-clock time.
pub trait Clock: Send + Sync + Debug {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// The real wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same instant, so a test can keep one handle and give
/// another to the service under test.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    /// Creates a clock frozen at `start`.
    pub fn new(start: DateTime<Utc>) -> Self {
        ManualClock {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Creates a clock frozen at the current wall-clock time.
    pub fn starting_now() -> Self {
        ManualClock::new(Utc::now())
    }

    /// Moves the clock to `instant`.
    pub fn set(&self, instant: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = instant;
    }

    /// Moves the clock forward by `delta` (negative moves it back).
    pub fn advance(&self, delta: chrono::Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += delta;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// =============================================================================
// Latency
// =============================================================================

/// Artificial delay applied before a simulated remote operation completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Latency(Duration);

impl Latency {
    /// No delay at all (tests).
    #[inline]
    pub const fn instant() -> Self {
        Latency(Duration::ZERO)
    }

    /// Delay of `ms` milliseconds.
    #[inline]
    pub const fn from_millis(ms: u64) -> Self {
        Latency(Duration::from_millis(ms))
    }

    /// The delay as a `Duration`.
    #[inline]
    pub const fn duration(&self) -> Duration {
        self.0
    }

    /// True if no delay should be applied.
    #[inline]
    pub const fn is_instant(&self) -> bool {
        self.0.is_zero()
    }
}

impl From<Duration> for Latency {
    fn from(d: Duration) -> Self {
        Latency(d)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
