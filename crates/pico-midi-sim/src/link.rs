//! Loopback serial link: MISO is wired to MOSI.

use pico_midi_hal::SerialExchange;

#[derive(Debug)]
pub enum LoopbackError {}

/// Echoes every frame back and logs the ones carrying payload.
#[derive(Default)]
pub struct LoopbackLink {
    exchanges: u64,
}

impl LoopbackLink {
    pub fn exchanges(&self) -> u64 {
        self.exchanges
    }
}

impl SerialExchange for LoopbackLink {
    type Error = LoopbackError;

    fn exchange(&mut self, tx: &[u8], rx: &mut [u8]) -> Result<usize, Self::Error> {
        let len = tx.len().min(rx.len());
        rx[..len].copy_from_slice(&tx[..len]);
        self.exchanges += 1;

        if len > 2 && tx[2] != 0 {
            let payload_len = (tx[2] as usize).min(len - 3);
            log::debug!(
                "SPI frame #{}: {:02X?} len={} payload={:02X?}",
                self.exchanges,
                &tx[..2],
                payload_len,
                &tx[3..3 + payload_len]
            );
        }
        Ok(len)
    }
}
