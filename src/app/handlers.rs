//! Interrupt handler bodies.
//!
//! Both handlers are short and never allocate.  The firmware binds them
//! to the sampling timer and the button GPIO interrupt; tests call them
//! directly against mock ports.

use embedded_hal::delay::DelayNs;
use log::trace;

use super::ports::{ButtonLines, EdgeInterrupts, InterruptControl, PeriodicTimer, ReflectanceBus};
use crate::drivers::blink::BlinkTask;
use crate::fsm::context::SharedState;
use crate::fsm::{Button, next_mode};
use crate::sensors::LineSensor;

/// Sampling timer interrupt: overwrite the shared snapshot with one fresh
/// reading, then reload the timer for a full period.
pub fn on_sample_tick<B, D, T>(state: &SharedState, sensor: &mut LineSensor<B, D>, timer: &T)
where
    B: ReflectanceBus,
    D: DelayNs,
    T: PeriodicTimer,
{
    state.set_snapshot(sensor.read());
    timer.restart();
}

/// The button whose edge is honoured when several are pending.
fn pressed_button(pending: ButtonLines) -> Option<Button> {
    if pending.contains(ButtonLines::LEFT) {
        Some(Button::Left)
    } else if pending.contains(ButtonLines::RIGHT) {
        Some(Button::Right)
    } else {
        None
    }
}

/// Button edge interrupt.
///
/// Reads the pending lines before acknowledging (the acknowledgement
/// clears both), applies the mode table, then unconditionally silences
/// the blink task, re-enables and restarts the sampler, and re-enables
/// global interrupts.  The foreground loop is woken last, once the new
/// mode is visible.
pub fn on_button_edge<E, S, K, I>(
    state: &SharedState,
    edges: &E,
    sampler: &S,
    blink: &BlinkTask<K>,
    irq: &I,
) where
    E: EdgeInterrupts,
    S: PeriodicTimer,
    K: PeriodicTimer,
    I: InterruptControl,
{
    let pending = edges.pending();
    edges.acknowledge(ButtonLines::BOTH);

    if let Some(button) = pressed_button(pending) {
        let current = state.mode();
        if let Some(next) = next_mode(current, button) {
            state.set_mode(next);
        }
        trace!("button {:?}: {:?} -> {:?}", button, current, state.mode());
    }

    blink.stop();
    sampler.enable_interrupt();
    sampler.restart();
    irq.enable_global();
    irq.notify();
}
