//! Indicator LEDs on the top breadboard.
//!
//! Both LEDs are driven together.  The level lives in an atomic so the
//! toggle can be registered as a plain [`BlinkCallback`](super::blink::BlinkCallback)
//! and run from the blink tick interrupt.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: writes the LED GPIOs via hw_init.
//! On host/test: tracks the level in-memory only.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::drivers::hw_init;
use crate::pins;

static INDICATOR_ON: AtomicBool = AtomicBool::new(false);

pub fn set_indicator(on: bool) {
    for &gpio in &pins::INDICATOR_LED_GPIOS {
        hw_init::gpio_write(gpio, on);
    }
    INDICATOR_ON.store(on, Ordering::Release);
}

/// Invert the LEDs.  Used as the blink callback.
pub fn toggle_indicator() {
    let on = !INDICATOR_ON.load(Ordering::Acquire);
    set_indicator(on);
}

pub fn indicator_on() -> bool {
    INDICATOR_ON.load(Ordering::Acquire)
}
