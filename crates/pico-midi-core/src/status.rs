//! Status LED heartbeat.

use crate::config::HEARTBEAT_PERIOD_MS;

/// Toggles an indicator once more than `period_ms` has passed since the
/// last toggle.
pub struct Heartbeat {
    period_ms: u32,
    last_ms: u32,
    level: bool,
}

impl Default for Heartbeat {
    fn default() -> Self {
        Self::new(HEARTBEAT_PERIOD_MS)
    }
}

impl Heartbeat {
    pub const fn new(period_ms: u32) -> Self {
        Self {
            period_ms,
            last_ms: 0,
            level: false,
        }
    }

    /// Returns the level to drive when it is time to toggle.
    pub fn poll(&mut self, now_ms: u32) -> Option<bool> {
        if now_ms.wrapping_sub(self.last_ms) <= self.period_ms {
            return None;
        }
        let level = self.level;
        self.level = !self.level;
        self.last_ms = now_ms;
        Some(level)
    }
}
