//! Wire layout of one serial-link frame.
//!
//! ```text
//! offset  size      field
//! 0       2         fingerprint (0xCA 0xFE)
//! 2       1         payload length, 0..=N-3
//! 3       N-3       payload (MIDI byte stream), zero-padded tail undefined
//! ```

use crate::config::{FINGERPRINT, FRAME_SIZE, HEADER_LEN};
use crate::error::BridgeError;

const LEN_OFFSET: usize = 2;

/// One fixed-size frame, stored as its wire bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SharedFrame<const N: usize = FRAME_SIZE> {
    bytes: [u8; N],
}

impl<const N: usize> SharedFrame<N> {
    /// Largest payload this frame size can carry.
    pub const MAX_PAYLOAD: usize = N - HEADER_LEN;

    /// Create an empty frame with the given fingerprint.
    ///
    /// Panics if `N` cannot hold the header or if the payload capacity does
    /// not fit the one-byte length field.
    pub const fn new(fingerprint: [u8; 2]) -> Self {
        assert!(N > HEADER_LEN, "frame must be larger than its header");
        assert!(N - HEADER_LEN <= u8::MAX as usize, "payload length must fit in one byte");
        let mut bytes = [0u8; N];
        bytes[0] = fingerprint[0];
        bytes[1] = fingerprint[1];
        Self { bytes }
    }

    /// Two marker bytes at the start of the frame.
    pub fn fingerprint(&self) -> [u8; 2] {
        [self.bytes[0], self.bytes[1]]
    }

    /// Number of meaningful payload bytes.
    pub fn payload_len(&self) -> usize {
        self.bytes[LEN_OFFSET] as usize
    }

    /// The meaningful part of the payload region.
    pub fn payload(&self) -> &[u8] {
        &self.bytes[HEADER_LEN..HEADER_LEN + self.payload_len()]
    }

    /// The whole frame as clocked out on the link.
    pub fn as_bytes(&self) -> &[u8; N] {
        &self.bytes
    }

    /// Replace the payload. Leaves the frame untouched when `payload` is too
    /// large.
    pub fn set_payload(&mut self, payload: &[u8]) -> Result<usize, BridgeError> {
        if payload.len() > Self::MAX_PAYLOAD {
            return Err(BridgeError::Oversize {
                len: payload.len(),
                max: Self::MAX_PAYLOAD,
            });
        }
        self.bytes[LEN_OFFSET] = payload.len() as u8;
        self.bytes[HEADER_LEN..HEADER_LEN + payload.len()].copy_from_slice(payload);
        Ok(payload.len())
    }

    /// Mark the frame consumed. Stale payload bytes stay in place; only the
    /// length is cleared.
    pub fn clear(&mut self) {
        self.bytes[LEN_OFFSET] = 0;
    }
}

impl Default for SharedFrame<FRAME_SIZE> {
    fn default() -> Self {
        Self::new(FINGERPRINT)
    }
}
