//! Dual DC motor actuator with software PWM.
//!
//! Each wheel's driver has three lines: PWM, direction and an active-low
//! sleep.  Speed is emulated by toggling the PWM line inside busy-wait
//! intervals; every command blocks for its full duration.
//!
//! ## Timing
//!
//! ```text
//!   on  µs = duty          * 48 * 1000 / (10000 * PWM_SCALE)
//!   off µs = (10000 - duty) * 48 * 1000 / (10000 * PWM_SCALE)
//!   cycles = units * 23 * PWM_SCALE / 100        (units of 10 ms)
//! ```
//!
//! The off duty is a wrapping `u16` subtraction: duties above full scale
//! are not clamped.  Zero-length intervals are skipped, so duty 0 never
//! raises the line and full duty never drops it mid-command.  Every
//! command finishes with its PWM line(s) low.
//!
//! ## Dual-target design
//!
//! The actuator only talks to [`MotorLines`] and a [`DelayNs`]; on the
//! device these are GPIO writes and a ROM busy-wait, in tests a virtual
//! clock.

use embedded_hal::delay::DelayNs;

use crate::app::ports::{Direction, MotorLines, Wheel, Wheels};
use crate::config::DUTY_FULL_SCALE;

/// Smoothing scale: more, shorter PWM cycles per commanded duration.
pub const PWM_SCALE: u32 = 8;

/// Core clock in MHz the interval formula was calibrated against.
const CLOCK_MHZ: u32 = 48;

/// Empirical cycles-per-unit factor, in percent.
const CYCLE_FACTOR_PCT: u32 = 23;

/// Spin manoeuvres run a fixed pulse train independent of any duty.
const SPIN_ON_US: u32 = 2_000;
const SPIN_OFF_US: u32 = 3_000;
const SPIN_90_CYCLES: u32 = 86;
const SPIN_45_CYCLES: u32 = 43;
const SPIN_180_CYCLES: u32 = 205;

/// High time of one PWM cycle for `duty`.
pub const fn on_interval_us(duty: u16) -> u32 {
    duty as u32 * CLOCK_MHZ * 1000 / (DUTY_FULL_SCALE as u32 * PWM_SCALE)
}

/// Low time of one PWM cycle for `duty`.
pub const fn off_interval_us(duty: u16) -> u32 {
    on_interval_us(DUTY_FULL_SCALE.wrapping_sub(duty))
}

/// Number of PWM cycles for a duration of `units` × 10 ms.
pub const fn cycles_for(units: u32) -> u32 {
    units.saturating_mul(CYCLE_FACTOR_PCT * PWM_SCALE) / 100
}

pub struct MotorActuator<M, D> {
    lines: M,
    delay: D,
}

impl<M: MotorLines, D: DelayNs> MotorActuator<M, D> {
    pub fn new(lines: M, delay: D) -> Self {
        Self { lines, delay }
    }

    /// Bring the drivers to a known state: PWM low, forward, asleep.
    pub fn init(&mut self) {
        self.stop();
    }

    /// PWM low, directions forward, both drivers in low-current sleep.
    pub fn stop(&mut self) {
        self.lines.set_pwm(Wheels::Both, false);
        for wheel in [Wheel::Left, Wheel::Right] {
            self.lines.set_direction(wheel, Direction::Forward);
            self.lines.set_awake(wheel, false);
        }
    }

    pub fn drive_forward(&mut self, duty: u16, units: u32) {
        self.drive_both(Direction::Forward, duty, units);
    }

    pub fn drive_backward(&mut self, duty: u16, units: u32) {
        self.drive_both(Direction::Backward, duty, units);
    }

    /// Drive only the left wheel forward.
    pub fn drive_left(&mut self, duty: u16, units: u32) {
        self.drive_wheel(Wheel::Left, duty, units);
    }

    /// Drive only the right wheel forward.
    pub fn drive_right(&mut self, duty: u16, units: u32) {
        self.drive_wheel(Wheel::Right, duty, units);
    }

    /// Drive one wheel forward with the other wheel's PWM held low.
    /// The idle wheel's sleep line is left as it was.
    pub fn drive_wheel(&mut self, wheel: Wheel, duty: u16, units: u32) {
        let (driven, idle) = match wheel {
            Wheel::Left => (Wheels::Left, Wheels::Right),
            Wheel::Right => (Wheels::Right, Wheels::Left),
        };
        self.lines.set_direction(wheel, Direction::Forward);
        self.lines.set_awake(wheel, true);
        self.lines.set_pwm(idle, false);
        self.pulse_train(driven, on_interval_us(duty), off_interval_us(duty), cycles_for(units));
    }

    /// Clockwise: left wheel forward, right wheel backward.
    pub fn spin_right_90(&mut self) {
        self.spin(Direction::Forward, SPIN_90_CYCLES);
    }

    pub fn spin_right_45(&mut self) {
        self.spin(Direction::Forward, SPIN_45_CYCLES);
    }

    /// Counter-clockwise: right wheel forward, left wheel backward.
    pub fn spin_left_90(&mut self) {
        self.spin(Direction::Backward, SPIN_90_CYCLES);
    }

    pub fn spin_left_45(&mut self) {
        self.spin(Direction::Backward, SPIN_45_CYCLES);
    }

    /// Half turn, clockwise.
    pub fn spin_180(&mut self) {
        self.spin(Direction::Forward, SPIN_180_CYCLES);
    }

    /// Set `wheels`' PWM to `high` and busy-wait `us`.  A zero duration
    /// touches nothing.
    pub fn hold_line_for(&mut self, wheels: Wheels, high: bool, us: u32) {
        if us == 0 {
            return;
        }
        self.lines.set_pwm(wheels, high);
        self.delay.delay_us(us);
    }

    /// Borrow the underlying lines (test inspection).
    pub fn lines(&self) -> &M {
        &self.lines
    }

    fn drive_both(&mut self, dir: Direction, duty: u16, units: u32) {
        for wheel in [Wheel::Left, Wheel::Right] {
            self.lines.set_direction(wheel, dir);
            self.lines.set_awake(wheel, true);
        }
        self.pulse_train(Wheels::Both, on_interval_us(duty), off_interval_us(duty), cycles_for(units));
    }

    /// `left_dir` is the left wheel's direction; the right wheel turns
    /// the opposite way.
    fn spin(&mut self, left_dir: Direction, cycles: u32) {
        let right_dir = match left_dir {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        };
        self.lines.set_direction(Wheel::Left, left_dir);
        self.lines.set_direction(Wheel::Right, right_dir);
        self.lines.set_awake(Wheel::Left, true);
        self.lines.set_awake(Wheel::Right, true);
        self.pulse_train(Wheels::Both, SPIN_ON_US, SPIN_OFF_US, cycles);
    }

    fn pulse_train(&mut self, wheels: Wheels, on_us: u32, off_us: u32, cycles: u32) {
        for _ in 0..cycles {
            self.hold_line_for(wheels, true, on_us);
            self.hold_line_for(wheels, false, off_us);
        }
        self.lines.set_pwm(wheels, false);
    }
}
