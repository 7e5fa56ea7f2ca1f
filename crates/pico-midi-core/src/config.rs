//! Compile-time configuration for the bridge.

/// Total size of one frame on the serial link, header included.
pub const FRAME_SIZE: usize = 64;

/// Marker bytes at the start of every frame.
pub const FINGERPRINT: [u8; 2] = [0xCA, 0xFE];

/// Fingerprint (2 bytes) + payload length (1 byte).
pub const HEADER_LEN: usize = 3;

/// Largest payload a default-sized frame can carry.
pub const MAX_PAYLOAD: usize = FRAME_SIZE - HEADER_LEN;

/// Word-clock edges per serial transfer.
///
/// The codec word clock runs at 44.1 kHz; 32 edges is one audio block.
pub const WORD_CLOCK_DIVISOR: u32 = 32;

/// Size of one read from the host stack's receive stream.
pub const RX_CHUNK_SIZE: usize = 48;

/// Depth of the USB callback event queue.
pub const HOST_EVENT_CAPACITY: usize = 16;

/// Status LED toggle period.
pub const HEARTBEAT_PERIOD_MS: u32 = 1000;

/// Mackie Control "rewind" transport button.
pub const FIRST_NOTE: u8 = 0x5B;

/// Mackie Control "stop" transport button.
pub const LAST_NOTE: u8 = 0x5F;

/// Time between note toggles.
pub const NOTE_INTERVAL_MS: u32 = 1000;

/// Note sequencer settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SequencerConfig {
    /// Lowest note of the ring (inclusive).
    pub first_note: u8,
    /// Highest note of the ring (inclusive).
    pub last_note: u8,
    /// Milliseconds between two note toggles.
    pub interval_ms: u32,
    /// Velocity used for the note-on half of each pair.
    pub velocity: u8,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            first_note: FIRST_NOTE,
            last_note: LAST_NOTE,
            interval_ms: NOTE_INTERVAL_MS,
            velocity: 0x7F,
        }
    }
}
