//! Events raised by the USB host stack callbacks.
//!
//! Callbacks run inside the host stack's task function and only enqueue;
//! the main loop drains the queue and applies each event to owned state.

use crate::config::HOST_EVENT_CAPACITY;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostEvent {
    /// A MIDI interface was mounted.
    Mounted {
        addr: u8,
        in_cables: u8,
        out_cables: u16,
    },
    /// A MIDI interface was unmounted.
    Unmounted { addr: u8, instance: u8 },
    /// Received MIDI packets are waiting in the device's stream.
    RxReady { addr: u8, packets: u32 },
}

impl HostEvent {
    /// USB address of the device the event refers to.
    pub fn addr(&self) -> u8 {
        match *self {
            HostEvent::Mounted { addr, .. }
            | HostEvent::Unmounted { addr, .. }
            | HostEvent::RxReady { addr, .. } => addr,
        }
    }
}

/// Bounded queue between the USB callbacks and the main loop.
pub type HostEventQueue = heapless::Deque<HostEvent, HOST_EVENT_CAPACITY>;

/// Queue `event`, folding an `RxReady` into one already waiting for the
/// same device.
///
/// A fold only happens if no mount or unmount for that device is queued
/// after the waiting `RxReady`, so event order per device is kept. Returns
/// the event back if the queue is full.
pub fn enqueue(queue: &mut HostEventQueue, event: HostEvent) -> Result<(), HostEvent> {
    if let HostEvent::RxReady { addr, packets } = event {
        for queued in queue.iter_mut().rev() {
            match queued {
                HostEvent::RxReady {
                    addr: queued_addr,
                    packets: queued_packets,
                } if *queued_addr == addr => {
                    *queued_packets = queued_packets.saturating_add(packets);
                    return Ok(());
                }
                other if other.addr() == addr => break,
                _ => {}
            }
        }
    }
    queue.push_back(event)
}
