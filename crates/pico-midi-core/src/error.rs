//! Error types shared by the bridge components.
//!
//! None of these are fatal: every condition is handled by dropping or
//! deferring the operation that caused it.

use core::fmt;

/// Recoverable conditions reported by the mailbox, router and sequencer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BridgeError {
    /// Payload does not fit the frame. The write was skipped.
    Oversize { len: usize, max: usize },
    /// A second device mounted while another one is active. The new device
    /// stays disabled.
    ConnectionConflict { active: u8, rejected: u8 },
    /// The outbound stream accepted zero bytes. Retried on the next tick.
    Backpressure,
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeError::Oversize { len, max } => {
                write!(f, "payload of {len} bytes exceeds frame capacity of {max}")
            }
            BridgeError::ConnectionConflict { active, rejected } => write!(
                f,
                "device {rejected} rejected: device {active} is already connected"
            ),
            BridgeError::Backpressure => write!(f, "outbound stream is full"),
        }
    }
}

/// Error from one frame exchange, generic over the link's error type.
#[derive(Debug, PartialEq, Eq)]
pub enum TransferError<E: fmt::Debug> {
    /// The serial link reported an error.
    Transport(E),
    /// The link moved fewer bytes than one full frame.
    ShortTransfer { expected: usize, actual: usize },
}

impl<E: fmt::Debug> From<E> for TransferError<E> {
    fn from(e: E) -> Self {
        TransferError::Transport(e)
    }
}

impl<E: fmt::Debug> fmt::Display for TransferError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferError::Transport(e) => write!(f, "serial link error: {e:?}"),
            TransferError::ShortTransfer { expected, actual } => {
                write!(f, "short transfer: {actual} of {expected} bytes")
            }
        }
    }
}
