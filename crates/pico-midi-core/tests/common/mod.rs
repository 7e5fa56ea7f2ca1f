//! Mock collaborators shared by the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use pico_midi_hal::{MidiHost, SerialExchange};

#[derive(Debug, PartialEq, Eq)]
pub struct MockLinkError;

/// How the mock link answers the next exchange.
#[derive(Clone, Copy, Debug)]
pub enum LinkBehaviour {
    Full,
    Short(usize),
    Fail,
}

/// Serial link that records every frame sent and answers with a fixed
/// byte pattern. Clones share the same record.
#[derive(Clone)]
pub struct MockLink {
    sent: Arc<Mutex<Vec<Vec<u8>>>>,
    behaviour: Arc<Mutex<LinkBehaviour>>,
    reply: u8,
}

impl MockLink {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            behaviour: Arc::new(Mutex::new(LinkBehaviour::Full)),
            reply: 0xA5,
        }
    }

    pub fn set_behaviour(&self, behaviour: LinkBehaviour) {
        *self.behaviour.lock().unwrap() = behaviour;
    }

    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last_sent(&self) -> Option<Vec<u8>> {
        self.sent.lock().unwrap().last().cloned()
    }
}

impl SerialExchange for MockLink {
    type Error = MockLinkError;

    fn exchange(&mut self, tx: &[u8], rx: &mut [u8]) -> Result<usize, Self::Error> {
        self.sent.lock().unwrap().push(tx.to_vec());
        let len = tx.len().min(rx.len());
        match *self.behaviour.lock().unwrap() {
            LinkBehaviour::Full => {
                rx[..len].fill(self.reply);
                Ok(len)
            }
            LinkBehaviour::Short(n) => Ok(n.min(len)),
            LinkBehaviour::Fail => Err(MockLinkError),
        }
    }
}

/// One `stream_write` call seen by the mock host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriteRecord {
    pub addr: u8,
    pub cable: u8,
    pub bytes: Vec<u8>,
}

/// USB MIDI host with one configurable device.
pub struct MockHost {
    pub configured: bool,
    pub out_cables: u8,
    /// When false, `stream_write` accepts nothing.
    pub accept_writes: bool,
    pub writes: Vec<WriteRecord>,
    pub flushes: usize,
    /// Chunks returned by `stream_read`, in order: (cable, bytes).
    pub rx: VecDeque<(u8, Vec<u8>)>,
}

impl MockHost {
    pub fn new(out_cables: u8) -> Self {
        Self {
            configured: true,
            out_cables,
            accept_writes: true,
            writes: Vec::new(),
            flushes: 0,
            rx: VecDeque::new(),
        }
    }

    pub fn push_rx(&mut self, cable: u8, bytes: &[u8]) {
        self.rx.push_back((cable, bytes.to_vec()));
    }
}

impl MidiHost for MockHost {
    fn is_configured(&self, _addr: u8) -> bool {
        self.configured
    }

    fn out_cable_count(&self, _addr: u8) -> u8 {
        self.out_cables
    }

    fn stream_write(&mut self, addr: u8, cable: u8, bytes: &[u8]) -> usize {
        if !self.accept_writes {
            return 0;
        }
        self.writes.push(WriteRecord {
            addr,
            cable,
            bytes: bytes.to_vec(),
        });
        bytes.len()
    }

    fn stream_flush(&mut self, _addr: u8) -> usize {
        self.flushes += 1;
        0
    }

    fn stream_read(&mut self, _addr: u8, buf: &mut [u8]) -> (u8, usize) {
        match self.rx.pop_front() {
            Some((cable, bytes)) => {
                let n = bytes.len().min(buf.len());
                buf[..n].copy_from_slice(&bytes[..n]);
                (cable, n)
            }
            None => (0, 0),
        }
    }
}
