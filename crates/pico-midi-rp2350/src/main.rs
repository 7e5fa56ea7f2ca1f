//! RP2350 USB MIDI host bridge.
//!
//! Core 0: USB MIDI host, connection routing, status LED, note sequencer.
//! Core 1: word-clock interrupt and SPI frame transfers.
//!
//! Only one USB MIDI device is served at a time, directly or through a hub.

#![no_std]
#![no_main]

mod core1;
mod transport;
mod usb_host;

use defmt_rtt as _;
use panic_probe as _;
use rp235x_hal as hal;

use embedded_hal::digital::OutputPin;
use hal::clocks::Clock;
use hal::fugit::RateExtU32;
use hal::multicore::{Multicore, Stack};
use hal::sio::Sio;

use pico_midi_core::clock::ClockDecimator;
use pico_midi_core::config::{FINGERPRINT, WORD_CLOCK_DIVISOR};
use pico_midi_core::link::Mailbox;
use pico_midi_core::midi::{ConnectionRouter, Delivery, HostEvent, NoteSequencer, SequencerStep};
use pico_midi_core::status::Heartbeat;

use transport::Rp2350Link;
use usb_host::UsbMidiHost;

/// Boot ROM image definition for Cortex-M33 secure mode.
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: hal::block::ImageDef = hal::block::ImageDef::secure_exe();

/// External crystal frequency (Pico 2 standard).
const XTAL_FREQ_HZ: u32 = 12_000_000;

/// SPI link clock.
const SPI_FREQ_MHZ: u32 = 8;

/// Core 1 stack: 16 KiB.
static CORE1_STACK: Stack<4096> = Stack::new();

/// Frame handed from core 0 (USB) to core 1 (SPI).
pub(crate) static MAILBOX: Mailbox = Mailbox::new(FINGERPRINT);

/// Word-clock gate driven by the core 1 GPIO interrupt.
pub(crate) static WORD_CLOCK: ClockDecimator = ClockDecimator::new(WORD_CLOCK_DIVISOR);

#[hal::entry]
fn main() -> ! {
    defmt::info!("pico-midi-rp2350: Core 0 starting");

    let mut pac = hal::pac::Peripherals::take().unwrap();
    let mut watchdog = hal::Watchdog::new(pac.WATCHDOG);

    // Initialize clocks from 12 MHz crystal.
    let clocks = hal::clocks::init_clocks_and_plls(
        XTAL_FREQ_HZ,
        pac.XOSC,
        pac.CLOCKS,
        pac.PLL_SYS,
        pac.PLL_USB,
        &mut pac.RESETS,
        &mut watchdog,
    )
    .unwrap();

    let mut sio = Sio::new(pac.SIO);
    let timer = hal::Timer::new_timer0(pac.TIMER0, &mut pac.RESETS, &clocks);

    let pins = hal::gpio::Pins::new(
        pac.IO_BANK0,
        pac.PADS_BANK0,
        sio.gpio_bank0,
        &mut pac.RESETS,
    );

    // --- SPI1 link to the audio-side controller ---
    let spi_sclk = pins.gpio26.into_function::<hal::gpio::FunctionSpi>();
    let spi_mosi = pins.gpio27.into_function::<hal::gpio::FunctionSpi>();
    let spi_miso = pins.gpio28.into_function::<hal::gpio::FunctionSpi>();

    let spi_bus = hal::spi::Spi::<_, _, _, 8>::new(pac.SPI1, (spi_mosi, spi_miso, spi_sclk));
    let spi_bus = spi_bus.init(
        &mut pac.RESETS,
        clocks.peripheral_clock.freq(),
        SPI_FREQ_MHZ.MHz(),
        embedded_hal::spi::MODE_0,
    );

    // Manual CS pin (GPIO29).
    let spi_cs = pins.gpio29.into_push_pull_output();
    let link = Rp2350Link::new(spi_bus, spi_cs);

    // Codec word clock (GPIO5), falling edge.
    let word_clock = pins.gpio5.into_pull_up_input();

    // Onboard LED (GP25).
    let mut led = pins.gpio25.into_push_pull_output();

    // USB-A port power (GPIO1).
    let mut usb_a_enable = pins.gpio1.into_push_pull_output();
    usb_a_enable.set_high().unwrap();

    // --- Spawn Core 1 ---
    {
        let mut mc = Multicore::new(&mut pac.PSM, &mut pac.PPB, &mut sio.fifo);
        let cores = mc.cores();
        let core1 = &mut cores[1];
        let _ = core1.spawn(CORE1_STACK.take().unwrap(), move || {
            core1::core1_main(link, word_clock);
        });
    }

    if sio.fifo.read_blocking() != core1::CORE1_HELLO {
        defmt::warn!("Core 0: unexpected handshake word from core 1");
    } else {
        sio.fifo.write_blocking(core1::CORE0_ACK);
        defmt::info!("Core 0: handshake complete");
    }

    let mut host = UsbMidiHost::init();
    let mut router = ConnectionRouter::new();
    let mut sequencer = NoteSequencer::default();
    let mut heartbeat = Heartbeat::default();

    defmt::info!("Core 1 spawned, entering Core 0 main loop");

    // --- Core 0 main loop ---
    loop {
        host.task();
        while let Some(event) = host.next_event() {
            handle_event(event, &mut router, &mut host);
        }

        let now_ms = timer.get_counter().duration_since_epoch().to_millis() as u32;

        if let Some(level) = heartbeat.poll(now_ms) {
            let _ = led.set_state(level.into());
        }

        let device = if router.is_connected(&host) {
            router.active_addr()
        } else {
            None
        };
        match sequencer.tick(&mut host, device, now_ms) {
            Ok(SequencerStep::Sent { cable, note_on, .. }) => {
                defmt::trace!("Note {=u8:#x} on cable {}", note_on, cable);
            }
            Ok(_) => {}
            Err(e) => defmt::debug!("Note not sent: {}", defmt::Display2Format(&e)),
        }
    }
}

/// Apply one USB host event to the connection state.
fn handle_event(event: HostEvent, router: &mut ConnectionRouter, host: &mut UsbMidiHost) {
    match event {
        HostEvent::Mounted {
            addr,
            in_cables,
            out_cables,
        } => {
            defmt::info!(
                "MIDI device address = {}, IN cables = {}, OUT cables = {}",
                addr,
                in_cables,
                out_cables
            );
            if let Err(e) = router.on_connect(addr, in_cables, out_cables) {
                defmt::warn!(
                    "{}; only one device at a time is supported, device disabled",
                    defmt::Display2Format(&e)
                );
            }
        }
        HostEvent::Unmounted { addr, instance } => {
            if router.on_disconnect(addr) {
                defmt::info!("MIDI device address = {}, instance = {} is unmounted", addr, instance);
            } else {
                defmt::info!("Unused MIDI device address = {}, instance = {} is unmounted", addr, instance);
            }
        }
        HostEvent::RxReady { addr, .. } => {
            router.pump_inbound(host, addr, &MAILBOX, |cable, bytes, result| match result {
                Ok(Delivery::Queued(_)) => {
                    defmt::debug!("MIDI RX cable #{}, bytes read {}: {=[u8]:x}", cable, bytes.len(), bytes);
                }
                Ok(Delivery::Ignored) => {}
                Err(e) => {
                    defmt::warn!("MIDI RX cable #{}: {}", cable, defmt::Display2Format(&e));
                }
            });
        }
    }
}

/// Program metadata for `picotool info`.
#[link_section = ".bi_entries"]
#[used]
pub static PICOTOOL_ENTRIES: [hal::binary_info::EntryAddr; 5] = [
    hal::binary_info::rp_cargo_bin_name!(),
    hal::binary_info::rp_cargo_version!(),
    hal::binary_info::rp_program_description!(c"USB MIDI host to SPI bridge"),
    hal::binary_info::rp_cargo_homepage_url!(),
    hal::binary_info::rp_program_build_attribute!(),
];
