//! Core 1: word-clock interrupt and frame transfers.
//!
//! The falling edge of the codec word clock drives `WORD_CLOCK`; every
//! `WORD_CLOCK_DIVISOR` edges the transfer loop clocks the mailbox frame out
//! on SPI1.

use core::cell::RefCell;

use critical_section::Mutex;
use rp235x_hal as hal;

use hal::gpio::Interrupt::EdgeLow;
use hal::pac::interrupt;
use hal::sio::Sio;

use pico_midi_core::link::TransferLoop;

use crate::transport::Rp2350Link;
use crate::{MAILBOX, WORD_CLOCK};

/// Word sent by core 1 once it is running.
pub const CORE1_HELLO: u32 = 42;
/// Core 0's answer to `CORE1_HELLO`.
pub const CORE0_ACK: u32 = 43;

/// Transfers between statistics log lines (about one second at 44.1 kHz / 32).
const PERF_LOG_INTERVAL: u32 = 1378;

pub type WordClockPin =
    hal::gpio::Pin<hal::gpio::bank0::Gpio5, hal::gpio::FunctionSioInput, hal::gpio::PullUp>;

/// Word-clock pin, owned by the interrupt handler once core 1 starts.
static WORD_CLOCK_PIN: Mutex<RefCell<Option<WordClockPin>>> = Mutex::new(RefCell::new(None));

/// Core 1 entry point. Owns the SPI link and the word-clock interrupt.
pub fn core1_main(link: Rp2350Link, word_clock: WordClockPin) -> ! {
    // Safety: core 1 only touches its own FIFO endpoint through this handle.
    let pac = unsafe { hal::pac::Peripherals::steal() };
    let mut sio = Sio::new(pac.SIO);

    sio.fifo.write_blocking(CORE1_HELLO);
    if sio.fifo.read_blocking() != CORE0_ACK {
        defmt::warn!("Core 1: unexpected handshake reply from core 0");
    } else {
        defmt::info!("Core 1: handshake complete");
    }

    // Enabling from core 1 routes the bank interrupt to this core's NVIC.
    word_clock.set_interrupt_enabled(EdgeLow, true);
    critical_section::with(|cs| WORD_CLOCK_PIN.borrow(cs).replace(Some(word_clock)));
    unsafe {
        cortex_m::peripheral::NVIC::unmask(hal::pac::Interrupt::IO_IRQ_BANK0);
    }

    defmt::info!("Core 1 started, entering transfer loop");

    let mut transfer = TransferLoop::new(&MAILBOX, &WORD_CLOCK, link);
    transfer.run(|result, stats| {
        if let Err(e) = result {
            defmt::warn!("SPI frame exchange failed: {}", defmt::Display2Format(e));
        }
        if stats.frames % PERF_LOG_INTERVAL == 0 {
            defmt::info!(
                "Core1: frames={}, with_payload={}, errors={}",
                stats.frames,
                stats.payload_frames,
                stats.errors
            );
        }
    })
}

#[interrupt]
fn IO_IRQ_BANK0() {
    critical_section::with(|cs| {
        if let Some(pin) = WORD_CLOCK_PIN.borrow_ref_mut(cs).as_mut() {
            if pin.interrupt_status(EdgeLow) {
                pin.clear_interrupt(EdgeLow);
                WORD_CLOCK.on_edge();
            }
        }
    });
}
