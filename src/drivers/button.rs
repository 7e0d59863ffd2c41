//! Operator button edge latch.
//!
//! ## Hardware
//!
//! Two momentary switches, left and right, each on its own GPIO with an
//! internal pull-up.  The GPIO ISR does nothing but set the line's bit in
//! an atomic pending mask and note a wake-up; the button handler reads
//! the mask, acknowledges it, and applies the mode table.
//!
//! | Bit | Line  |
//! |-----|-------|
//! | 0   | left  |
//! | 1   | right |
//!
//! Acknowledging clears the flags of both lines at once, so the handler
//! must read [`pending`](EdgeInterrupts::pending) first.

use core::sync::atomic::{AtomicU8, Ordering};

use crate::app::ports::{ButtonLines, Edge, EdgeInterrupts};
use crate::drivers::hw_init;
use crate::pins;

/// Edge flags.  Set by the ISR, cleared by the button handler.
static BUTTON_PENDING: AtomicU8 = AtomicU8::new(0);

/// ISR body.  Register on both button GPIOs with the line bit as the
/// argument.  Lock-free; safe in interrupt context.
pub fn button_isr_handler(line: ButtonLines) {
    BUTTON_PENDING.fetch_or(line.0, Ordering::AcqRel);
    crate::adapters::interrupts::note_wake();
}

#[cfg(target_os = "espidf")]
pub unsafe extern "C" fn button_gpio_isr(arg: *mut core::ffi::c_void) {
    button_isr_handler(ButtonLines(arg as usize as u8));
}

/// The process-wide button edge port.
#[derive(Debug, Clone, Copy, Default)]
pub struct ButtonEdges;

impl EdgeInterrupts for ButtonEdges {
    fn arm(&self, lines: ButtonLines, edge: Edge) {
        let rising = matches!(edge, Edge::Rising);
        if lines.contains(ButtonLines::LEFT) {
            hw_init::gpio_arm_edge(pins::LEFT_BUTTON_GPIO, rising);
        }
        if lines.contains(ButtonLines::RIGHT) {
            hw_init::gpio_arm_edge(pins::RIGHT_BUTTON_GPIO, rising);
        }
    }

    fn pending(&self) -> ButtonLines {
        ButtonLines(BUTTON_PENDING.load(Ordering::Acquire))
    }

    fn acknowledge(&self, lines: ButtonLines) {
        BUTTON_PENDING.fetch_and(!lines.0, Ordering::AcqRel);
    }
}
