//! Platform-agnostic core of the pico-midi bridge.
//!
//! Everything here runs unchanged on the RP2350 firmware and on the host
//! simulator. Hardware collaborators are reached through the traits in
//! `pico-midi-hal`.

#![no_std]

pub mod clock;
pub mod config;
pub mod error;
pub mod link;
pub mod midi;
pub mod status;

pub use error::{BridgeError, TransferError};
