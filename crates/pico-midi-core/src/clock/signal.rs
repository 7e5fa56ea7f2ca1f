//! Binary semaphore capped at one outstanding release.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

/// Release signal between the word-clock interrupt and the transfer loop.
///
/// `release` never blocks and may be called from interrupt context. Extra
/// releases while one is pending are dropped, not accumulated.
pub struct ReleaseSignal {
    inner: Signal<CriticalSectionRawMutex, ()>,
}

impl Default for ReleaseSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl ReleaseSignal {
    /// Create a signal with no release pending.
    pub const fn new() -> Self {
        Self { inner: Signal::new() }
    }

    /// Make one release available.
    pub fn release(&self) {
        self.inner.signal(());
    }

    /// Consume the pending release, if any.
    pub fn try_acquire(&self) -> bool {
        self.inner.try_take().is_some()
    }

    /// Spin until a release is available, then consume it.
    pub fn wait(&self) {
        while !self.try_acquire() {
            core::hint::spin_loop();
        }
    }

    /// True if a release is pending. Does not consume it.
    pub fn is_pending(&self) -> bool {
        self.inner.signaled()
    }
}
