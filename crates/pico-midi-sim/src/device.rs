//! Virtual USB MIDI host with scripted devices.

use std::collections::VecDeque;

use pico_midi_core::midi::{enqueue, HostEvent, HostEventQueue};
use pico_midi_hal::MidiHost;

/// One simulated MIDI device on the virtual bus.
struct VirtualDevice {
    addr: u8,
    out_cables: u8,
    rx: VecDeque<(u8, Vec<u8>)>,
    pending_tx: usize,
    sent: Vec<Vec<u8>>,
}

/// Virtual host stack. Raises the same events the TinyUSB callbacks do.
#[derive(Default)]
pub struct VirtualMidiHost {
    devices: Vec<VirtualDevice>,
    events: HostEventQueue,
}

impl VirtualMidiHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn raise(&mut self, event: HostEvent) {
        if enqueue(&mut self.events, event).is_err() {
            log::warn!("USB event queue full, dropped {event:?}");
        }
    }

    fn device(&self, addr: u8) -> Option<&VirtualDevice> {
        self.devices.iter().find(|d| d.addr == addr)
    }

    fn device_mut(&mut self, addr: u8) -> Option<&mut VirtualDevice> {
        self.devices.iter_mut().find(|d| d.addr == addr)
    }

    /// Plug in a device.
    pub fn attach(&mut self, addr: u8, in_cables: u8, out_cables: u8) {
        self.devices.push(VirtualDevice {
            addr,
            out_cables,
            rx: VecDeque::new(),
            pending_tx: 0,
            sent: Vec::new(),
        });
        self.raise(HostEvent::Mounted {
            addr,
            in_cables,
            out_cables: out_cables as u16,
        });
    }

    /// Unplug a device.
    pub fn detach(&mut self, addr: u8) {
        self.devices.retain(|d| d.addr != addr);
        self.raise(HostEvent::Unmounted { addr, instance: 0 });
    }

    /// The device at `addr` sends `bytes` on `cable`.
    pub fn play(&mut self, addr: u8, cable: u8, bytes: &[u8]) {
        let Some(device) = self.device_mut(addr) else {
            return;
        };
        device.rx.push_back((cable, bytes.to_vec()));
        self.raise(HostEvent::RxReady { addr, packets: 1 });
    }

    pub fn next_event(&mut self) -> Option<HostEvent> {
        self.events.pop_front()
    }

    /// Messages the device at `addr` has received from the host.
    pub fn received(&self, addr: u8) -> usize {
        self.device(addr).map_or(0, |d| d.sent.len())
    }
}

impl MidiHost for VirtualMidiHost {
    fn is_configured(&self, addr: u8) -> bool {
        self.device(addr).is_some()
    }

    fn out_cable_count(&self, addr: u8) -> u8 {
        self.device(addr).map_or(0, |d| d.out_cables)
    }

    fn stream_write(&mut self, addr: u8, cable: u8, bytes: &[u8]) -> usize {
        let Some(device) = self.device_mut(addr) else {
            return 0;
        };
        if cable >= device.out_cables {
            return 0;
        }
        device.sent.push(bytes.to_vec());
        device.pending_tx += bytes.len();
        bytes.len()
    }

    fn stream_flush(&mut self, addr: u8) -> usize {
        self.device_mut(addr)
            .map_or(0, |d| std::mem::take(&mut d.pending_tx))
    }

    fn stream_read(&mut self, addr: u8, buf: &mut [u8]) -> (u8, usize) {
        let Some(device) = self.device_mut(addr) else {
            return (0, 0);
        };
        match device.rx.pop_front() {
            Some((cable, bytes)) => {
                let n = bytes.len().min(buf.len());
                buf[..n].copy_from_slice(&bytes[..n]);
                (cable, n)
            }
            None => (0, 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attach_play_detach_raise_events_in_order() {
        let mut host = VirtualMidiHost::new();
        host.attach(3, 1, 2);
        host.play(3, 0, &[0x90, 0x40, 0x7F]);
        host.play(9, 0, &[0x90, 0x40, 0x7F]);
        host.detach(3);

        assert_eq!(
            host.next_event(),
            Some(HostEvent::Mounted {
                addr: 3,
                in_cables: 1,
                out_cables: 2
            })
        );
        assert_eq!(host.next_event(), Some(HostEvent::RxReady { addr: 3, packets: 1 }));
        assert_eq!(host.next_event(), Some(HostEvent::Unmounted { addr: 3, instance: 0 }));
        assert_eq!(host.next_event(), None);
        assert!(!host.is_configured(3));
    }

    #[test]
    fn writes_beyond_cable_count_are_refused() {
        let mut host = VirtualMidiHost::new();
        host.attach(1, 1, 1);

        assert_eq!(host.stream_write(1, 0, &[0x90, 0x3C, 0x00]), 3);
        assert_eq!(host.stream_write(1, 1, &[0x90, 0x3C, 0x00]), 0);
        assert_eq!(host.stream_flush(1), 3);
        assert_eq!(host.stream_flush(1), 0);
        assert_eq!(host.received(1), 1);
    }
}
