//! RP2350 SPI link: implements SerialExchange for rp235x-hal SPI1 with a
//! manually driven chip select.

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus as _;
use pico_midi_hal::SerialExchange;
use rp235x_hal as hal;

/// SPI link error for the RP2350 platform.
#[derive(Debug, defmt::Format)]
pub enum LinkError {
    /// SPI bus error during the exchange.
    SpiBus,
}

/// SPI1 pins in (MOSI, MISO, SCLK) order.
type SpiPins = (
    hal::gpio::Pin<hal::gpio::bank0::Gpio27, hal::gpio::FunctionSpi, hal::gpio::PullDown>,
    hal::gpio::Pin<hal::gpio::bank0::Gpio28, hal::gpio::FunctionSpi, hal::gpio::PullDown>,
    hal::gpio::Pin<hal::gpio::bank0::Gpio26, hal::gpio::FunctionSpi, hal::gpio::PullDown>,
);

pub type SpiBus = hal::spi::Spi<hal::spi::Enabled, hal::pac::SPI1, SpiPins, 8>;
pub type CsPin =
    hal::gpio::Pin<hal::gpio::bank0::Gpio29, hal::gpio::FunctionSioOutput, hal::gpio::PullDown>;

/// Full-duplex frame link to the audio-side controller.
pub struct Rp2350Link {
    spi: SpiBus,
    cs: CsPin,
}

impl Rp2350Link {
    /// Take ownership of the configured bus and deassert chip select.
    pub fn new(spi: SpiBus, mut cs: CsPin) -> Self {
        let _ = cs.set_high();
        Self { spi, cs }
    }
}

impl SerialExchange for Rp2350Link {
    type Error = LinkError;

    fn exchange(&mut self, tx: &[u8], rx: &mut [u8]) -> Result<usize, Self::Error> {
        let len = tx.len().min(rx.len());

        let _ = self.cs.set_low();
        let result = self
            .spi
            .transfer(&mut rx[..len], &tx[..len])
            .and_then(|()| self.spi.flush());
        let _ = self.cs.set_high();

        result.map_err(|_| LinkError::SpiBus)?;
        Ok(len)
    }
}
