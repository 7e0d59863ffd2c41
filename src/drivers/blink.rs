//! Blink task divider.
//!
//! A fast hardware tick (1 ms by default) is divided down to a coarse
//! period by counting ticks.  Once per coarse period the registered
//! callback fires and the repeat count drops by one; at zero the tick
//! timer is disarmed.
//!
//! ```text
//!   start(cb, tick, N) ──▶ Armed { remaining: N, count: 0 }
//!   tick ×divisor ──▶ cb(), remaining -= 1
//!   remaining == 0 ──▶ Disarmed, timer off
//!   stop()        ──▶ Disarmed, count 0
//! ```
//!
//! [`BlinkDivider`] is the bare state machine.  [`BlinkTask`] puts it
//! behind a critical-section mutex and owns the tick timer so that
//! `start`/`stop` from the button handler and `on_tick` from the timer
//! interrupt never see a half-updated divider.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

use crate::app::ports::PeriodicTimer;

/// Callback invoked once per coarse period.  Runs in interrupt context, inside
/// the divider's critical section.
pub type BlinkCallback = fn();

/// Result of feeding one hardware tick to the divider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not armed; the tick is ignored.
    Idle,
    /// Armed, coarse period not yet reached.
    Counting,
    /// Coarse period reached, more repeats to go.
    Fire,
    /// Coarse period reached and that was the last repeat.
    FireLast,
}

impl TickOutcome {
    pub const fn fires(self) -> bool {
        matches!(self, Self::Fire | Self::FireLast)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BlinkDivider {
    callback: Option<BlinkCallback>,
    remaining: u8,
    count: u16,
    divisor: u16,
    armed: bool,
}

impl BlinkDivider {
    /// `divisor` hardware ticks make one coarse period.  Zero behaves
    /// like one.
    pub const fn new(divisor: u16) -> Self {
        Self {
            callback: None,
            remaining: 0,
            count: 0,
            divisor: if divisor == 0 { 1 } else { divisor },
            armed: false,
        }
    }

    /// Arm for `times` callbacks.  Always resets the tick count.  Returns
    /// whether the divider is now armed; `times == 0` arms nothing.
    pub fn start(&mut self, callback: BlinkCallback, times: u8) -> bool {
        self.count = 0;
        self.callback = Some(callback);
        self.remaining = times;
        self.armed = times > 0;
        self.armed
    }

    pub fn stop(&mut self) {
        self.armed = false;
        self.count = 0;
    }

    pub fn tick(&mut self) -> TickOutcome {
        if !self.armed {
            return TickOutcome::Idle;
        }
        self.count += 1;
        if self.count < self.divisor {
            return TickOutcome::Counting;
        }
        self.count = 0;
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.armed = false;
            TickOutcome::FireLast
        } else {
            TickOutcome::Fire
        }
    }

    pub fn callback(&self) -> Option<BlinkCallback> {
        self.callback
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn remaining(&self) -> u8 {
        self.remaining
    }

    pub fn count(&self) -> u16 {
        self.count
    }
}

/// The divider plus the hardware tick timer that feeds it.
///
/// Timer arm/disarm and the callback both run inside the critical
/// section, so once [`stop`](Self::stop) returns no further callback can
/// land.  The callback must not call back into the task.
pub struct BlinkTask<T> {
    divider: Mutex<CriticalSectionRawMutex, RefCell<BlinkDivider>>,
    timer: T,
}

impl<T: PeriodicTimer> BlinkTask<T> {
    pub const fn new(timer: T, divisor: u16) -> Self {
        Self {
            divider: Mutex::const_new(
                CriticalSectionRawMutex::new(),
                RefCell::new(BlinkDivider::new(divisor)),
            ),
            timer,
        }
    }

    /// Reset the divider and arm the tick timer at `tick_us` for `times`
    /// callbacks.
    pub fn start(&self, callback: BlinkCallback, tick_us: u32, times: u8) {
        self.divider.lock(|d| {
            if d.borrow_mut().start(callback, times) {
                self.timer.arm(tick_us);
            } else {
                self.timer.disarm();
            }
        });
    }

    /// Silence any pending sequence.  Safe at any point of the countdown.
    pub fn stop(&self) {
        self.divider.lock(|d| {
            d.borrow_mut().stop();
            self.timer.disarm();
        });
    }

    /// Tick-timer interrupt body.
    pub fn on_tick(&self) -> TickOutcome {
        self.divider.lock(|d| {
            let mut d = d.borrow_mut();
            let outcome = d.tick();
            if outcome == TickOutcome::FireLast {
                self.timer.disarm();
            }
            if outcome.fires() {
                if let Some(callback) = d.callback() {
                    callback();
                }
            }
            outcome
        })
    }

    pub fn is_armed(&self) -> bool {
        self.divider.lock(|d| d.borrow().is_armed())
    }

    /// Copy of the divider state.
    pub fn divider(&self) -> BlinkDivider {
        self.divider.lock(|d| *d.borrow())
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }
}
