//! ESP32 busy-wait delay adapter.
//!
//! Implements [`DelayNs`] for the software PWM and the sensor charge /
//! discharge waits.  The delay must not yield: a yielding sleep would
//! stretch every PWM interval by a scheduler tick.
//!
//! - **`target_os = "espidf"`**: wraps `esp_rom_delay_us()`, a ROM
//!   busy-wait with microsecond precision.
//! - **`not(target_os = "espidf")`**: uses `std::thread::sleep` for
//!   host-side simulation.

use embedded_hal::delay::DelayNs;

#[derive(Debug, Clone, Copy, Default)]
pub struct BusyWaitDelay;

impl DelayNs for BusyWaitDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.delay_us(ns.div_ceil(1_000));
    }

    #[cfg(target_os = "espidf")]
    fn delay_us(&mut self, us: u32) {
        // SAFETY: ROM busy-wait; no side effects beyond spinning.
        unsafe { esp_idf_sys::esp_rom_delay_us(us) };
    }

    #[cfg(not(target_os = "espidf"))]
    fn delay_us(&mut self, us: u32) {
        std::thread::sleep(std::time::Duration::from_micros(u64::from(us)));
    }
}
