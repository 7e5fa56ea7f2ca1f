//! Single-device connection tracking and inbound data routing.
//!
//! Only one USB MIDI device is served at a time. The first device to mount
//! becomes active and stays active until it unmounts; later devices are left
//! disabled, not queued.

use pico_midi_hal::MidiHost;

use crate::config::RX_CHUNK_SIZE;
use crate::error::BridgeError;
use crate::link::Mailbox;

/// The device currently being served.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActiveDevice {
    pub addr: u8,
    pub in_cables: u8,
    pub out_cables: u16,
}

/// What happened to one inbound chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delivery {
    /// The chunk came from a device other than the active one.
    Ignored,
    /// The chunk replaced the mailbox payload.
    Queued(usize),
}

#[derive(Debug, Default)]
pub struct ConnectionRouter {
    active: Option<ActiveDevice>,
}

impl ConnectionRouter {
    pub const fn new() -> Self {
        Self { active: None }
    }

    /// The active device, if any.
    pub fn active(&self) -> Option<ActiveDevice> {
        self.active
    }

    /// USB address of the active device, if any.
    pub fn active_addr(&self) -> Option<u8> {
        self.active.map(|d| d.addr)
    }

    /// True when a device is active and the host stack reports it configured.
    pub fn is_connected<H: MidiHost>(&self, host: &H) -> bool {
        self.active_addr().is_some_and(|addr| host.is_configured(addr))
    }

    /// Adopt a newly mounted device unless one is already active.
    ///
    /// Address 0 is the unaddressed default device and is never adopted.
    pub fn on_connect(&mut self, addr: u8, in_cables: u8, out_cables: u16) -> Result<(), BridgeError> {
        if addr == 0 {
            return Ok(());
        }
        if let Some(active) = self.active {
            return Err(BridgeError::ConnectionConflict {
                active: active.addr,
                rejected: addr,
            });
        }
        self.active = Some(ActiveDevice {
            addr,
            in_cables,
            out_cables,
        });
        Ok(())
    }

    /// Forget the active device if `addr` is it. Returns true if it was.
    pub fn on_disconnect(&mut self, addr: u8) -> bool {
        if self.active_addr() == Some(addr) {
            self.active = None;
            true
        } else {
            false
        }
    }

    /// Route one chunk of received MIDI bytes into the mailbox.
    ///
    /// Chunks larger than the frame payload are reported and dropped. They
    /// are not split across frames.
    pub fn on_inbound<const N: usize>(
        &self,
        addr: u8,
        payload: &[u8],
        mailbox: &Mailbox<N>,
    ) -> Result<Delivery, BridgeError> {
        if self.active_addr() != Some(addr) {
            return Ok(Delivery::Ignored);
        }
        mailbox.write(payload).map(Delivery::Queued)
    }

    /// Drain the receive stream of `addr`, routing every chunk.
    ///
    /// `report` sees each chunk with its cable number and routing result.
    /// Returns the number of chunks read.
    pub fn pump_inbound<H: MidiHost, const N: usize>(
        &self,
        host: &mut H,
        addr: u8,
        mailbox: &Mailbox<N>,
        mut report: impl FnMut(u8, &[u8], Result<Delivery, BridgeError>),
    ) -> usize {
        if self.active_addr() != Some(addr) {
            return 0;
        }

        let mut buf = [0u8; RX_CHUNK_SIZE];
        let mut chunks = 0;
        loop {
            let (cable, read) = host.stream_read(addr, &mut buf);
            let read = read.min(buf.len());
            if read == 0 {
                return chunks;
            }
            chunks += 1;
            let bytes = &buf[..read];
            report(cable, bytes, self.on_inbound(addr, bytes, mailbox));
        }
    }
}
