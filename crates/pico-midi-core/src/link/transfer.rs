//! Word-clock gated transfer loop.
//!
//! Waits for a release from the clock decimator, then clocks the mailbox
//! frame out on the serial link while holding the mailbox lock. Both steps
//! happen inside one call, so between calls the loop is always waiting.
//! Runs for the lifetime of the program on its own core.

use pico_midi_hal::SerialExchange;

use crate::clock::ClockDecimator;
use crate::config::FRAME_SIZE;
use crate::error::TransferError;

use super::mailbox::{Drained, Mailbox};

/// Counters kept by the transfer loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransferStats {
    /// Exchanges attempted, successful or not.
    pub frames: u32,
    /// Frames that carried a non-empty payload.
    pub payload_frames: u32,
    /// Exchanges that failed or came up short.
    pub errors: u32,
}

/// Periodic consumer of the mailbox.
pub struct TransferLoop<'a, X: SerialExchange, const N: usize = FRAME_SIZE> {
    mailbox: &'a Mailbox<N>,
    clock: &'a ClockDecimator,
    link: X,
    rx: [u8; N],
    stats: TransferStats,
}

impl<'a, X: SerialExchange, const N: usize> TransferLoop<'a, X, N> {
    pub fn new(mailbox: &'a Mailbox<N>, clock: &'a ClockDecimator, link: X) -> Self {
        Self {
            mailbox,
            clock,
            link,
            rx: [0; N],
            stats: TransferStats::default(),
        }
    }

    /// Wait for the next clock release and transfer one frame.
    pub fn run_once(&mut self) -> Result<Drained, TransferError<X::Error>> {
        self.clock.wait_for_release();
        self.transfer()
    }

    /// Transfer one frame if a clock release is pending, without blocking.
    pub fn poll_once(&mut self) -> Option<Result<Drained, TransferError<X::Error>>> {
        if self.clock.try_acquire() {
            Some(self.transfer())
        } else {
            None
        }
    }

    /// Run forever, handing every exchange result to `after_each`.
    pub fn run(
        &mut self,
        mut after_each: impl FnMut(&Result<Drained, TransferError<X::Error>>, &TransferStats),
    ) -> ! {
        loop {
            let result = self.run_once();
            after_each(&result, &self.stats);
        }
    }

    fn transfer(&mut self) -> Result<Drained, TransferError<X::Error>> {
        self.stats.frames = self.stats.frames.wrapping_add(1);

        let result = self.mailbox.drain_and_transfer(&mut self.link, &mut self.rx);
        match &result {
            Ok(drained) if drained.payload_len > 0 => {
                self.stats.payload_frames = self.stats.payload_frames.wrapping_add(1)
            }
            Ok(_) => {}
            Err(_) => self.stats.errors = self.stats.errors.wrapping_add(1),
        }
        result
    }

    pub fn stats(&self) -> TransferStats {
        self.stats
    }

    /// Bytes received during the most recent exchange.
    pub fn last_received(&self) -> &[u8; N] {
        &self.rx
    }

    /// Give back the serial link.
    pub fn into_link(self) -> X {
        self.link
    }
}
