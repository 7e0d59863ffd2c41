//! Interrupt control adapter.
//!
//! On ESP-IDF the core's "interrupts" are the esp_timer callbacks and a
//! deferred button task, all gated by one global flag.  Every interrupt
//! source bumps [`WAKE_COUNT`] via [`note_wake`]; `wait_for_interrupt`
//! sleeps the calling task until the count moves.
//!
//! - **`target_os = "espidf"`**: sleeps with `FreeRtos::delay_ms(1)`
//!   between polls, letting the idle task run.
//! - **`not(target_os = "espidf")`**: sleeps with `std::thread::sleep`.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::app::ports::InterruptControl;

static GLOBAL_ENABLED: AtomicBool = AtomicBool::new(false);
static WAKE_COUNT: AtomicU32 = AtomicU32::new(0);

/// Record that an interrupt source fired.  Lock-free; ISR-safe.
pub fn note_wake() {
    WAKE_COUNT.fetch_add(1, Ordering::AcqRel);
}

/// Whether deferred handlers may run.
pub fn handlers_enabled() -> bool {
    GLOBAL_ENABLED.load(Ordering::Acquire)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalInterrupts;

impl InterruptControl for GlobalInterrupts {
    fn enable_global(&self) {
        GLOBAL_ENABLED.store(true, Ordering::Release);
    }

    fn disable_global(&self) {
        GLOBAL_ENABLED.store(false, Ordering::Release);
    }

    fn wait_for_interrupt(&self) {
        let seen = WAKE_COUNT.load(Ordering::Acquire);
        while WAKE_COUNT.load(Ordering::Acquire) == seen {
            pause();
        }
    }

    fn notify(&self) {
        note_wake();
    }
}

#[cfg(target_os = "espidf")]
fn pause() {
    esp_idf_hal::delay::FreeRtos::delay_ms(1);
}

#[cfg(not(target_os = "espidf"))]
fn pause() {
    std::thread::sleep(std::time::Duration::from_millis(1));
}
