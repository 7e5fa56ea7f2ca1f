//! Single-slot, lock-protected frame shared between the USB context and the
//! transfer context.
//!
//! A write overwrites whatever the transfer loop has not yet sent: only the
//! most recent payload before a transfer edge goes out on the wire. Both
//! sides hold the lock for one memory copy or one fixed-size exchange, never
//! across an unbounded wait. The lock is a spin mutex, so holding it does
//! not mask the word-clock interrupt.

use pico_midi_hal::SerialExchange;

use crate::config::{FINGERPRINT, FRAME_SIZE};
use crate::error::{BridgeError, TransferError};

use super::frame::SharedFrame;

/// Outcome of one successful `Mailbox::drain_and_transfer`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Drained {
    /// Bytes moved by the link, always the full frame size.
    pub transferred: usize,
    /// Payload bytes the frame carried.
    pub payload_len: usize,
}

/// Mailbox holding one `SharedFrame` for the lifetime of the program.
pub struct Mailbox<const N: usize = FRAME_SIZE> {
    frame: spin::Mutex<SharedFrame<N>>,
}

impl Default for Mailbox<FRAME_SIZE> {
    fn default() -> Self {
        Self::new(FINGERPRINT)
    }
}

impl<const N: usize> Mailbox<N> {
    /// Largest payload `write` accepts.
    pub const MAX_PAYLOAD: usize = SharedFrame::<N>::MAX_PAYLOAD;

    /// Create an empty mailbox. Usable in `static` initializers.
    pub const fn new(fingerprint: [u8; 2]) -> Self {
        Self {
            frame: spin::Mutex::new(SharedFrame::new(fingerprint)),
        }
    }

    /// Replace the pending payload.
    ///
    /// Oversized payloads are rejected before the lock is taken and leave the
    /// frame unchanged.
    pub fn write(&self, payload: &[u8]) -> Result<usize, BridgeError> {
        if payload.len() > Self::MAX_PAYLOAD {
            return Err(BridgeError::Oversize {
                len: payload.len(),
                max: Self::MAX_PAYLOAD,
            });
        }
        self.frame.lock().set_payload(payload)
    }

    /// Clock the whole frame out on `link`, receiving into `rx`, then mark
    /// it consumed.
    ///
    /// The frame is consumed even when the exchange fails: a failed frame is
    /// dropped, not retried.
    pub fn drain_and_transfer<X: SerialExchange>(
        &self,
        link: &mut X,
        rx: &mut [u8; N],
    ) -> Result<Drained, TransferError<X::Error>> {
        let mut frame = self.frame.lock();
        let payload_len = frame.payload_len();
        let result = link.exchange(frame.as_bytes(), rx);
        frame.clear();
        drop(frame);

        let transferred = result?;
        if transferred < N {
            return Err(TransferError::ShortTransfer {
                expected: N,
                actual: transferred,
            });
        }
        Ok(Drained {
            transferred,
            payload_len,
        })
    }

    /// Number of payload bytes waiting for the next transfer.
    pub fn payload_len(&self) -> usize {
        self.frame.lock().payload_len()
    }

    /// Copy of the current frame.
    pub fn snapshot(&self) -> SharedFrame<N> {
        *self.frame.lock()
    }
}
