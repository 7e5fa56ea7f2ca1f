//! Periodic note toggling on the connected device.
//!
//! Every interval the sequencer sends a note-off for the previous note and a
//! note-on for the next one, walking a fixed ring of notes. With the default
//! range this lights the transport button LEDs of a Mackie Control
//! compatible surface one after another.

use pico_midi_hal::MidiHost;

use crate::config::SequencerConfig;
use crate::error::BridgeError;

/// MIDI note-on status byte, channel 1. Velocity 0 doubles as note-off.
const NOTE_ON: u8 = 0x90;

/// Result of one `NoteSequencer::tick`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SequencerStep {
    /// No configured device with an output cable.
    Idle,
    /// The interval has not elapsed yet.
    Waiting,
    /// A note pair was written.
    Sent { cable: u8, note_off: u8, note_on: u8 },
}

pub struct NoteSequencer {
    config: SequencerConfig,
    note: u8,
    slot_ms: u32,
}

impl Default for NoteSequencer {
    fn default() -> Self {
        Self::new(SequencerConfig::default())
    }
}

impl NoteSequencer {
    /// Create a sequencer positioned at the first note of the range.
    ///
    /// Panics if the range is empty.
    pub fn new(config: SequencerConfig) -> Self {
        assert!(config.first_note <= config.last_note, "empty note range");
        Self {
            config,
            note: config.first_note,
            slot_ms: 0,
        }
    }

    /// The note the next successful tick turns on.
    pub fn note(&self) -> u8 {
        self.note
    }

    pub fn config(&self) -> &SequencerConfig {
        &self.config
    }

    /// Note that precedes `note` in the ring.
    fn previous(&self, note: u8) -> u8 {
        if note <= self.config.first_note {
            self.config.last_note
        } else {
            note - 1
        }
    }

    /// Note that follows `note` in the ring.
    fn next(&self, note: u8) -> u8 {
        if note >= self.config.last_note {
            self.config.first_note
        } else {
            note + 1
        }
    }

    /// The six bytes sent for the current note: off for the previous note,
    /// on for the current one.
    pub fn message(&self) -> [u8; 6] {
        [
            NOTE_ON,
            self.previous(self.note),
            0x00,
            NOTE_ON,
            self.note,
            self.config.velocity,
        ]
    }

    /// Advance the sequencer to `now_ms`.
    ///
    /// `device` is the active device address. Outbound bytes queued earlier
    /// are flushed on every call while a device is connected. A zero-byte
    /// write keeps the current note so the same pair is retried next
    /// interval.
    pub fn tick<H: MidiHost>(
        &mut self,
        host: &mut H,
        device: Option<u8>,
        now_ms: u32,
    ) -> Result<SequencerStep, BridgeError> {
        let Some(addr) = device else {
            return Ok(SequencerStep::Idle);
        };
        let cables = host.out_cable_count(addr);
        if !host.is_configured(addr) || cables < 1 {
            return Ok(SequencerStep::Idle);
        }

        host.stream_flush(addr);

        let interval = self.config.interval_ms;
        let elapsed = now_ms.wrapping_sub(self.slot_ms);
        if elapsed < interval {
            return Ok(SequencerStep::Waiting);
        }
        // Resync after a long idle stretch instead of bursting catch-up notes.
        self.slot_ms = if elapsed >= interval.saturating_mul(2) {
            now_ms
        } else {
            self.slot_ms.wrapping_add(interval)
        };

        let cable = cables - 1;
        let message = self.message();
        let written = host.stream_write(addr, cable, &message);
        host.stream_flush(addr);
        if written == 0 {
            return Err(BridgeError::Backpressure);
        }

        let note_on = self.note;
        self.note = self.next(self.note);
        Ok(SequencerStep::Sent {
            cable,
            note_off: message[1],
            note_on,
        })
    }
}
