#![no_std]

/// Abstracts the full-duplex serial link the shared frame is clocked out on.
///
/// Implementations own chip-select handling. The exchange blocks until every
/// byte of `tx` has been shifted out and the same number shifted in.
pub trait SerialExchange {
    type Error: core::fmt::Debug;

    /// Send `tx` while receiving into `rx`. Returns the number of bytes
    /// transferred, which is at most `min(tx.len(), rx.len())`.
    fn exchange(&mut self, tx: &[u8], rx: &mut [u8]) -> Result<usize, Self::Error>;
}

/// Abstracts the USB MIDI host stack for a device identified by its USB
/// address.
///
/// Streams are byte-oriented: the stack handles USB-MIDI event packet
/// framing internally.
pub trait MidiHost {
    /// Returns true once the device at `addr` is enumerated and its MIDI
    /// interface is ready for streaming.
    fn is_configured(&self, addr: u8) -> bool;

    /// Number of virtual output cables the device exposes (host to device).
    fn out_cable_count(&self, addr: u8) -> u8;

    /// Queue `bytes` for transmission on `cable`. Returns the number of bytes
    /// accepted; 0 means the outbound buffer is full.
    fn stream_write(&mut self, addr: u8, cable: u8, bytes: &[u8]) -> usize;

    /// Transmit any queued outbound bytes. Returns the number of bytes sent.
    fn stream_flush(&mut self, addr: u8) -> usize;

    /// Read received MIDI bytes into `buf`. Returns `(cable, bytes_read)`;
    /// `bytes_read == 0` when nothing is pending.
    fn stream_read(&mut self, addr: u8, buf: &mut [u8]) -> (u8, usize);
}
