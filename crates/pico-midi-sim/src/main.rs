//! Host simulator for the pico-midi bridge.
//!
//! Runs the firmware's core 0 / core 1 split on std threads: a word-clock
//! thread stands in for the GPIO interrupt, a transfer thread for core 1,
//! and the main thread for the USB side, driven by a scripted virtual
//! device. Set `RUST_LOG=debug` to see every frame.

mod device;
mod link;

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use pico_midi_core::clock::ClockDecimator;
use pico_midi_core::link::{Mailbox, TransferLoop};
use pico_midi_core::midi::{ConnectionRouter, Delivery, HostEvent, NoteSequencer, SequencerStep};
use pico_midi_core::status::Heartbeat;

use device::VirtualMidiHost;
use link::LoopbackLink;

/// Total simulated run time.
const RUN_TIME: Duration = Duration::from_secs(5);

/// Word-clock edges delivered per millisecond (44.1 kHz).
const EDGES_PER_MS: u32 = 44;

/// Main loop poll period.
const POLL_PERIOD: Duration = Duration::from_millis(1);

fn main() {
    env_logger::init();
    log::info!("pico-midi-sim: starting, run time {RUN_TIME:?}");

    let mailbox: Mailbox = Mailbox::default();
    let clock = ClockDecimator::default();
    let stop = AtomicBool::new(false);

    let transfer_stats = thread::scope(|s| {
        s.spawn(|| {
            while !stop.load(Ordering::Relaxed) {
                for _ in 0..EDGES_PER_MS {
                    clock.on_edge();
                }
                thread::sleep(Duration::from_millis(1));
            }
        });

        let transfer = s.spawn(|| {
            let mut transfer = TransferLoop::new(&mailbox, &clock, LoopbackLink::default());
            while !stop.load(Ordering::Relaxed) {
                match transfer.poll_once() {
                    Some(Err(e)) => log::warn!("SPI frame exchange failed: {e}"),
                    Some(Ok(_)) => {}
                    None => thread::sleep(Duration::from_micros(100)),
                }
            }
            transfer.stats()
        });

        run_usb_side(&mailbox);
        stop.store(true, Ordering::Relaxed);
        transfer.join().expect("transfer thread panicked")
    });

    log::info!(
        "pico-midi-sim: done, frames={}, with_payload={}, errors={}",
        transfer_stats.frames,
        transfer_stats.payload_frames,
        transfer_stats.errors
    );
}

/// Core 0 equivalent: device script, event handling, heartbeat, sequencer.
fn run_usb_side(mailbox: &Mailbox) {
    let mut host = VirtualMidiHost::new();
    let mut router = ConnectionRouter::new();
    let mut sequencer = NoteSequencer::default();
    let mut heartbeat = Heartbeat::default();
    let mut script = Script::default();

    let start = Instant::now();
    while start.elapsed() < RUN_TIME {
        let now_ms = start.elapsed().as_millis() as u32;
        script.advance(&mut host, now_ms);

        while let Some(event) = host.next_event() {
            handle_event(event, &mut router, &mut host, mailbox);
        }

        if let Some(level) = heartbeat.poll(now_ms) {
            log::trace!("LED {}", if level { "on" } else { "off" });
        }

        let device = if router.is_connected(&host) {
            router.active_addr()
        } else {
            None
        };
        match sequencer.tick(&mut host, device, now_ms) {
            Ok(SequencerStep::Sent { cable, note_off, note_on }) => {
                log::info!("Note {note_off:#04x} off / {note_on:#04x} on, cable {cable}");
            }
            Ok(_) => {}
            Err(e) => log::debug!("Note not sent: {e}"),
        }

        thread::sleep(POLL_PERIOD);
    }

    for addr in [1, 2] {
        log::info!("Device {addr} received {} note pairs", host.received(addr));
    }
}

fn handle_event(event: HostEvent, router: &mut ConnectionRouter, host: &mut VirtualMidiHost, mailbox: &Mailbox) {
    match event {
        HostEvent::Mounted {
            addr,
            in_cables,
            out_cables,
        } => {
            log::info!("MIDI device address = {addr}, IN cables = {in_cables}, OUT cables = {out_cables}");
            if let Err(e) = router.on_connect(addr, in_cables, out_cables) {
                log::warn!("{e}; only one device at a time is supported, device disabled");
            }
        }
        HostEvent::Unmounted { addr, instance } => {
            if router.on_disconnect(addr) {
                log::info!("MIDI device address = {addr}, instance = {instance} is unmounted");
            } else {
                log::info!("Unused MIDI device address = {addr}, instance = {instance} is unmounted");
            }
        }
        HostEvent::RxReady { addr, .. } => {
            router.pump_inbound(host, addr, mailbox, |cable, bytes, result| match result {
                Ok(Delivery::Queued(n)) => log::debug!("MIDI RX cable #{cable}, bytes read {n}: {bytes:02X?}"),
                Ok(Delivery::Ignored) => {}
                Err(e) => log::warn!("MIDI RX cable #{cable}: {e}"),
            });
        }
    }
}

/// Scripted plug/unplug and playing for the virtual devices.
#[derive(Default)]
struct Script {
    step: usize,
    last_note_ms: u32,
    note: u8,
}

impl Script {
    fn advance(&mut self, host: &mut VirtualMidiHost, now_ms: u32) {
        const PLAN: [(u32, Action); 4] = [
            (0, Action::Attach(1)),
            (1500, Action::Attach(2)),
            (3000, Action::Detach(1)),
            (3200, Action::Reattach(2)),
        ];

        while let Some(&(at_ms, action)) = PLAN.get(self.step) {
            if now_ms < at_ms {
                break;
            }
            match action {
                Action::Attach(addr) => host.attach(addr, 1, 1),
                Action::Detach(addr) => host.detach(addr),
                Action::Reattach(addr) => {
                    host.detach(addr);
                    host.attach(addr, 1, 2);
                }
            }
            self.step += 1;
        }

        // Both devices play a note every 200 ms; only the active one is bridged.
        if now_ms.wrapping_sub(self.last_note_ms) >= 200 {
            self.last_note_ms = now_ms;
            self.note = (self.note + 1) % 12;
            for addr in [1, 2] {
                host.play(addr, 0, &[0x90, 0x3C + self.note, 0x64]);
            }
        }
    }
}

#[derive(Clone, Copy)]
enum Action {
    Attach(u8),
    Detach(u8),
    Reattach(u8),
}
