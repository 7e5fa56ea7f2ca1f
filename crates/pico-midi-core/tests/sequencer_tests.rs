//! Note sequencer timing, wrap-around and backpressure handling.

mod common;

use common::{MockHost, WriteRecord};

use pico_midi_core::config::SequencerConfig;
use pico_midi_core::midi::{NoteSequencer, SequencerStep};
use pico_midi_core::BridgeError;

const DEV: u8 = 1;

#[test]
fn five_ticks_walk_and_wrap_the_ring() {
    let mut seq = NoteSequencer::default();
    let mut host = MockHost::new(1);

    let mut notes = vec![seq.note()];
    for tick in 1..=5u32 {
        let step = seq.tick(&mut host, Some(DEV), tick * 1000).unwrap();
        assert!(matches!(step, SequencerStep::Sent { .. }), "tick {tick}: {step:?}");
        notes.push(seq.note());
    }

    assert_eq!(notes, vec![0x5B, 0x5C, 0x5D, 0x5E, 0x5F, 0x5B]);
}

#[test]
fn message_turns_off_previous_and_on_current() {
    let mut seq = NoteSequencer::default();
    let mut host = MockHost::new(1);

    assert_eq!(seq.message(), [0x90, 0x5F, 0x00, 0x90, 0x5B, 0x7F]);

    seq.tick(&mut host, Some(DEV), 1000).unwrap();
    seq.tick(&mut host, Some(DEV), 2000).unwrap();

    assert_eq!(
        host.writes,
        vec![
            WriteRecord {
                addr: DEV,
                cable: 0,
                bytes: vec![0x90, 0x5F, 0x00, 0x90, 0x5B, 0x7F],
            },
            WriteRecord {
                addr: DEV,
                cable: 0,
                bytes: vec![0x90, 0x5B, 0x00, 0x90, 0x5C, 0x7F],
            },
        ]
    );
}

#[test]
fn sends_on_highest_cable() {
    let mut seq = NoteSequencer::default();
    let mut host = MockHost::new(4);

    let step = seq.tick(&mut host, Some(DEV), 1000).unwrap();
    assert_eq!(
        step,
        SequencerStep::Sent {
            cable: 3,
            note_off: 0x5F,
            note_on: 0x5B
        }
    );
    assert_eq!(host.writes[0].cable, 3);
}

#[test]
fn zero_byte_write_keeps_note() {
    let mut seq = NoteSequencer::default();
    let mut host = MockHost::new(1);
    host.accept_writes = false;

    let before = seq.note();
    assert_eq!(seq.tick(&mut host, Some(DEV), 1000), Err(BridgeError::Backpressure));
    assert_eq!(seq.note(), before);

    // Next interval retries the same pair.
    host.accept_writes = true;
    seq.tick(&mut host, Some(DEV), 2000).unwrap();
    assert_eq!(host.writes[0].bytes[4], before);
}

#[test]
fn waits_for_interval() {
    let mut seq = NoteSequencer::default();
    let mut host = MockHost::new(1);

    assert_eq!(seq.tick(&mut host, Some(DEV), 999), Ok(SequencerStep::Waiting));
    assert!(matches!(
        seq.tick(&mut host, Some(DEV), 1000),
        Ok(SequencerStep::Sent { .. })
    ));
    assert_eq!(seq.tick(&mut host, Some(DEV), 1500), Ok(SequencerStep::Waiting));
    assert_eq!(host.writes.len(), 1);
}

#[test]
fn flushes_on_every_connected_poll() {
    let mut seq = NoteSequencer::default();
    let mut host = MockHost::new(1);

    seq.tick(&mut host, Some(DEV), 10).unwrap();
    seq.tick(&mut host, Some(DEV), 20).unwrap();
    assert_eq!(host.flushes, 2);

    // A send flushes before and after the write.
    seq.tick(&mut host, Some(DEV), 1000).unwrap();
    assert_eq!(host.flushes, 4);
}

#[test]
fn idle_without_usable_device() {
    let mut seq = NoteSequencer::default();

    let mut host = MockHost::new(1);
    assert_eq!(seq.tick(&mut host, None, 5000), Ok(SequencerStep::Idle));

    let mut no_cables = MockHost::new(0);
    assert_eq!(seq.tick(&mut no_cables, Some(DEV), 5000), Ok(SequencerStep::Idle));

    let mut unconfigured = MockHost::new(1);
    unconfigured.configured = false;
    assert_eq!(seq.tick(&mut unconfigured, Some(DEV), 5000), Ok(SequencerStep::Idle));

    assert_eq!(host.flushes + no_cables.flushes + unconfigured.flushes, 0);
    assert_eq!(seq.note(), 0x5B);
}

#[test]
fn resyncs_after_long_idle() {
    let mut seq = NoteSequencer::default();
    let mut host = MockHost::new(1);

    // Connected after 30 s: one note, not thirty.
    assert!(matches!(
        seq.tick(&mut host, Some(DEV), 30_000),
        Ok(SequencerStep::Sent { .. })
    ));
    assert_eq!(seq.tick(&mut host, Some(DEV), 30_001), Ok(SequencerStep::Waiting));
    assert!(matches!(
        seq.tick(&mut host, Some(DEV), 31_000),
        Ok(SequencerStep::Sent { .. })
    ));
    assert_eq!(host.writes.len(), 2);
}

#[test]
fn custom_range_and_velocity() {
    let mut seq = NoteSequencer::new(SequencerConfig {
        first_note: 60,
        last_note: 61,
        interval_ms: 10,
        velocity: 0x40,
    });
    let mut host = MockHost::new(1);

    seq.tick(&mut host, Some(DEV), 10).unwrap();
    seq.tick(&mut host, Some(DEV), 20).unwrap();
    seq.tick(&mut host, Some(DEV), 30).unwrap();

    let on_notes: Vec<u8> = host.writes.iter().map(|w| w.bytes[4]).collect();
    assert_eq!(on_notes, vec![60, 61, 60]);
    assert!(host.writes.iter().all(|w| w.bytes[5] == 0x40));
}

#[test]
#[should_panic(expected = "empty note range")]
fn inverted_range_is_rejected() {
    let _ = NoteSequencer::new(SequencerConfig {
        first_note: 70,
        last_note: 60,
        ..SequencerConfig::default()
    });
}
