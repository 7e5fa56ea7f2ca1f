//! Frame handoff from the USB side to the serial link.

pub mod frame;
pub mod mailbox;
pub mod transfer;

pub use frame::SharedFrame;
pub use mailbox::{Drained, Mailbox};
pub use transfer::{TransferLoop, TransferStats};
