//! USB MIDI host.
//!
//! When the `usb-host` feature is enabled, uses TinyUSB and its MIDI host
//! class driver through C FFI. Otherwise, provides a stub host that never
//! sees a device.
//!
//! TinyUSB callbacks fire from inside `tuh_task()` on core 0. They only push
//! `HostEvent`s; the main loop applies them.

use pico_midi_core::midi::HostEvent;
use pico_midi_hal::MidiHost;

// --- TinyUSB FFI (usb-host feature) ---

#[cfg(feature = "usb-host")]
mod tinyusb_ffi {
    use core::cell::RefCell;

    use critical_section::Mutex;
    use pico_midi_core::midi::{enqueue, HostEvent, HostEventQueue};

    extern "C" {
        /// Initialize TinyUSB host stack.
        pub fn tuh_init(rhport: u8) -> bool;
        /// Process TinyUSB host events (must be called frequently).
        pub fn tuh_task();
        pub fn tuh_midi_configured(dev_addr: u8) -> bool;
        pub fn tuh_midih_get_num_tx_cables(dev_addr: u8) -> u8;
        pub fn tuh_midi_stream_write(dev_addr: u8, cable_num: u8, buffer: *const u8, bufsize: u32) -> u32;
        pub fn tuh_midi_stream_flush(dev_addr: u8) -> u32;
        pub fn tuh_midi_stream_read(
            dev_addr: u8,
            p_cable_num: *mut u8,
            p_buffer: *mut u8,
            bufsize: u16,
        ) -> u32;
    }

    static EVENTS: Mutex<RefCell<HostEventQueue>> = Mutex::new(RefCell::new(HostEventQueue::new()));

    fn push(event: HostEvent) {
        let pushed = critical_section::with(|cs| enqueue(&mut EVENTS.borrow_ref_mut(cs), event).is_ok());
        if !pushed {
            defmt::warn!("USB event queue full, dropped {}", defmt::Debug2Format(&event));
        }
    }

    pub fn pop() -> Option<HostEvent> {
        critical_section::with(|cs| EVENTS.borrow_ref_mut(cs).pop_front())
    }

    #[no_mangle]
    pub extern "C" fn tuh_midi_mount_cb(
        dev_addr: u8,
        _in_ep: u8,
        _out_ep: u8,
        num_cables_rx: u8,
        num_cables_tx: u16,
    ) {
        push(HostEvent::Mounted {
            addr: dev_addr,
            in_cables: num_cables_rx,
            out_cables: num_cables_tx,
        });
    }

    #[no_mangle]
    pub extern "C" fn tuh_midi_umount_cb(dev_addr: u8, instance: u8) {
        push(HostEvent::Unmounted {
            addr: dev_addr,
            instance,
        });
    }

    #[no_mangle]
    pub extern "C" fn tuh_midi_rx_cb(dev_addr: u8, num_packets: u32) {
        if num_packets != 0 {
            push(HostEvent::RxReady {
                addr: dev_addr,
                packets: num_packets,
            });
        }
    }

    #[no_mangle]
    pub extern "C" fn tuh_midi_tx_cb(_dev_addr: u8) {}
}

// --- Public API ---

/// Handle to the USB MIDI host stack. Lives on core 0.
pub struct UsbMidiHost {
    _private: (),
}

impl UsbMidiHost {
    /// Initialize the USB host stack. Call once at startup.
    pub fn init() -> Self {
        #[cfg(feature = "usb-host")]
        {
            unsafe {
                tinyusb_ffi::tuh_init(0);
            }
            defmt::info!("USB host initialized");
        }

        #[cfg(not(feature = "usb-host"))]
        defmt::info!("USB host disabled (no usb-host feature)");

        Self { _private: () }
    }

    /// Run the host stack once. Callbacks fire from here.
    pub fn task(&mut self) {
        #[cfg(feature = "usb-host")]
        unsafe {
            tinyusb_ffi::tuh_task();
        }
    }

    /// Next event raised by the callbacks, if any.
    pub fn next_event(&mut self) -> Option<HostEvent> {
        #[cfg(feature = "usb-host")]
        {
            return tinyusb_ffi::pop();
        }

        #[cfg(not(feature = "usb-host"))]
        None
    }
}

#[cfg(feature = "usb-host")]
impl MidiHost for UsbMidiHost {
    fn is_configured(&self, addr: u8) -> bool {
        unsafe { tinyusb_ffi::tuh_midi_configured(addr) }
    }

    fn out_cable_count(&self, addr: u8) -> u8 {
        unsafe { tinyusb_ffi::tuh_midih_get_num_tx_cables(addr) }
    }

    fn stream_write(&mut self, addr: u8, cable: u8, bytes: &[u8]) -> usize {
        unsafe { tinyusb_ffi::tuh_midi_stream_write(addr, cable, bytes.as_ptr(), bytes.len() as u32) as usize }
    }

    fn stream_flush(&mut self, addr: u8) -> usize {
        unsafe { tinyusb_ffi::tuh_midi_stream_flush(addr) as usize }
    }

    fn stream_read(&mut self, addr: u8, buf: &mut [u8]) -> (u8, usize) {
        let mut cable = 0u8;
        let len = buf.len().min(u16::MAX as usize) as u16;
        let read = unsafe { tinyusb_ffi::tuh_midi_stream_read(addr, &mut cable, buf.as_mut_ptr(), len) };
        (cable, read as usize)
    }
}

#[cfg(not(feature = "usb-host"))]
impl MidiHost for UsbMidiHost {
    fn is_configured(&self, _addr: u8) -> bool {
        false
    }

    fn out_cable_count(&self, _addr: u8) -> u8 {
        0
    }

    fn stream_write(&mut self, _addr: u8, _cable: u8, _bytes: &[u8]) -> usize {
        0
    }

    fn stream_flush(&mut self, _addr: u8) -> usize {
        0
    }

    fn stream_read(&mut self, _addr: u8, _buf: &mut [u8]) -> (u8, usize) {
        (0, 0)
    }
}
