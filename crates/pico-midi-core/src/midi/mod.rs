//! USB MIDI side of the bridge: device connection routing and the note
//! sequencer.

pub mod event;
pub mod router;
pub mod sequencer;

pub use event::{enqueue, HostEvent, HostEventQueue};
pub use router::{ActiveDevice, ConnectionRouter, Delivery};
pub use sequencer::{NoteSequencer, SequencerStep};
