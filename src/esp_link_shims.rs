//! `critical-section` 1.x symbols for the device build.
//!
//! The blink divider sits behind an `embassy-sync` `CriticalSectionRawMutex`,
//! which links against `_critical_section_1_0_acquire` / `_release`.  On
//! ESP-IDF every caller (esp_timer task, button task, main task) is a
//! FreeRTOS task, so one process-wide std mutex is enough.  Nesting on the
//! same task is tracked per thread.  Host tests link `critical-section/std`.

use std::cell::RefCell;
use std::sync::{Mutex, MutexGuard};

static SECTION: Mutex<()> = Mutex::new(());

/// Nesting depth plus the guard held by the outermost section.
struct Held {
    depth: u8,
    guard: Option<MutexGuard<'static, ()>>,
}

thread_local! {
    static HELD: RefCell<Held> = const { RefCell::new(Held { depth: 0, guard: None }) };
}

#[unsafe(no_mangle)]
pub extern "C" fn _critical_section_1_0_acquire() -> u8 {
    HELD.with(|held| {
        let mut held = held.borrow_mut();
        if held.depth == 0 {
            held.guard = Some(SECTION.lock().unwrap_or_else(|poisoned| poisoned.into_inner()));
        }
        held.depth = held.depth.saturating_add(1);
        held.depth
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn _critical_section_1_0_release(_token: u8) {
    HELD.with(|held| {
        let mut held = held.borrow_mut();
        match held.depth {
            0 => {}
            1 => {
                held.depth = 0;
                held.guard = None;
            }
            _ => held.depth -= 1,
        }
    });
}
