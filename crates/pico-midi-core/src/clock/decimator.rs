//! Divides the word-clock edge stream down to the transfer rate.

use core::sync::atomic::{AtomicU32, Ordering};

use crate::config::WORD_CLOCK_DIVISOR;

use super::signal::ReleaseSignal;

/// Counts edges down from `divisor` and releases the signal each time the
/// count reaches zero.
///
/// `on_edge` updates the counter with a single compare-and-swap, so edges
/// from more than one context are each counted once. It takes no locks.
pub struct ClockDecimator {
    divisor: u32,
    remaining: AtomicU32,
    signal: ReleaseSignal,
}

impl Default for ClockDecimator {
    fn default() -> Self {
        Self::new(WORD_CLOCK_DIVISOR)
    }
}

impl ClockDecimator {
    /// Create a decimator releasing once every `divisor` edges.
    ///
    /// Panics if `divisor` is zero.
    pub const fn new(divisor: u32) -> Self {
        assert!(divisor > 0, "divisor must be non-zero");
        Self {
            divisor,
            remaining: AtomicU32::new(divisor),
            signal: ReleaseSignal::new(),
        }
    }

    /// Edges per release.
    pub fn divisor(&self) -> u32 {
        self.divisor
    }

    /// Edges left until the next release.
    pub fn remaining(&self) -> u32 {
        self.remaining.load(Ordering::Relaxed)
    }

    /// Register one clock edge. Returns true if this edge issued a release.
    pub fn on_edge(&self) -> bool {
        let divisor = self.divisor;
        let next = |remaining: u32| Some(if remaining <= 1 { divisor } else { remaining - 1 });
        let previous = match self.remaining.fetch_update(Ordering::AcqRel, Ordering::Relaxed, next) {
            Ok(previous) | Err(previous) => previous,
        };
        if previous <= 1 {
            self.signal.release();
            true
        } else {
            false
        }
    }

    /// Block until a release is available and consume it.
    pub fn wait_for_release(&self) {
        self.signal.wait();
    }

    /// Consume a pending release without blocking.
    pub fn try_acquire(&self) -> bool {
        self.signal.try_acquire()
    }

    /// The release signal driven by this decimator.
    pub fn signal(&self) -> &ReleaseSignal {
        &self.signal
    }
}
