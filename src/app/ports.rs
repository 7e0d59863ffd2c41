//! Port traits: the boundary between the control core and the hardware.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ handlers / ControlService (domain)
//! ```
//!
//! Hardware adapters implement these traits; the handlers and the
//! [`ControlService`](super::service::ControlService) take them as
//! generics at the call site, so the core never touches registers
//! directly and tests can substitute a virtual clock.
//!
//! Busy-wait delays use [`embedded_hal::delay::DelayNs`] directly.
//!
//! Ports shared between interrupt and foreground context take `&self`:
//! the underlying operations are single register writes.

use super::events::AppEvent;

// ───────────────────────────────────────────────────────────────
// Reflectance sensor bus (RC discharge timing)
// ───────────────────────────────────────────────────────────────

/// The eight sensor lines plus the IR emitter.
pub trait ReflectanceBus {
    /// Switch the IR emitter on or off.
    fn set_emitter(&self, on: bool);

    /// Configure every sensor line as an output driven high, charging
    /// the sensor capacitors.
    fn charge(&self);

    /// Return every sensor line to input mode so the capacitors discharge.
    fn release(&self);

    /// Read all lines at once; bit n = line n.
    fn sample(&self) -> u8;
}

impl<T: ReflectanceBus + ?Sized> ReflectanceBus for &T {
    fn set_emitter(&self, on: bool) {
        (**self).set_emitter(on);
    }
    fn charge(&self) {
        (**self).charge();
    }
    fn release(&self) {
        (**self).release();
    }
    fn sample(&self) -> u8 {
        (**self).sample()
    }
}

// ───────────────────────────────────────────────────────────────
// Motor driver lines
// ───────────────────────────────────────────────────────────────

/// A single wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wheel {
    Left,
    Right,
}

/// The set of wheels a PWM write applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wheels {
    Left,
    Right,
    Both,
}

impl Wheels {
    pub const fn contains(self, wheel: Wheel) -> bool {
        matches!(
            (self, wheel),
            (Self::Both, _) | (Self::Left, Wheel::Left) | (Self::Right, Wheel::Right)
        )
    }
}

/// Rotation direction of one wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Digital lines of the two motor drivers.
pub trait MotorLines {
    fn set_direction(&mut self, wheel: Wheel, dir: Direction);

    /// `false` puts the wheel's driver into low-current sleep.
    fn set_awake(&mut self, wheel: Wheel, awake: bool);

    /// Drive the PWM line(s) high or low.
    fn set_pwm(&mut self, wheels: Wheels, high: bool);
}

// ───────────────────────────────────────────────────────────────
// Timers and interrupt plumbing
// ───────────────────────────────────────────────────────────────

/// A periodic hardware timer with a maskable interrupt.
pub trait PeriodicTimer {
    /// Load `period_us`, reset the count, and start with the interrupt enabled.
    fn arm(&self, period_us: u32);

    /// Stop the timer.  No further interrupts until [`arm`](Self::arm).
    fn disarm(&self);

    /// Reload the configured period so the next interrupt is a full
    /// period away.
    fn restart(&self);

    /// Let the running timer raise interrupts.  Idempotent.
    fn enable_interrupt(&self);

    /// Keep the timer counting but stop it raising interrupts.
    fn disable_interrupt(&self);
}

impl<T: PeriodicTimer + ?Sized> PeriodicTimer for &T {
    fn arm(&self, period_us: u32) {
        (**self).arm(period_us);
    }
    fn disarm(&self) {
        (**self).disarm();
    }
    fn restart(&self) {
        (**self).restart();
    }
    fn enable_interrupt(&self) {
        (**self).enable_interrupt();
    }
    fn disable_interrupt(&self) {
        (**self).disable_interrupt();
    }
}

/// Bitmask of operator button lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonLines(pub u8);

impl ButtonLines {
    pub const NONE: Self = Self(0);
    pub const LEFT: Self = Self(0b01);
    pub const RIGHT: Self = Self(0b10);
    pub const BOTH: Self = Self(0b11);

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// Which signal edge raises the interrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Rising,
    Falling,
}

/// Edge-triggered GPIO interrupts for the button lines.
pub trait EdgeInterrupts {
    fn arm(&self, lines: ButtonLines, edge: Edge);

    /// Lines whose edge flag is currently set.
    fn pending(&self) -> ButtonLines;

    /// Clear the edge flags of `lines`.
    fn acknowledge(&self, lines: ButtonLines);
}

/// Global interrupt mask and low-power wait.
pub trait InterruptControl {
    fn enable_global(&self);
    fn disable_global(&self);

    /// Sleep until any interrupt has been taken.
    fn wait_for_interrupt(&self);

    /// Release a task blocked in [`wait_for_interrupt`](Self::wait_for_interrupt).
    fn notify(&self);
}

// ───────────────────────────────────────────────────────────────
// Event sink (domain → logging)
// ───────────────────────────────────────────────────────────────

/// The foreground loop emits structured [`AppEvent`]s through this port.
/// Never called from interrupt context.
pub trait EventSink {
    fn emit(&mut self, event: &AppEvent);
}
