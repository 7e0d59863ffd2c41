//! Hardware adapter: bridges real GPIOs to domain port traits.
//!
//! [`SensorBarBus`] implements [`ReflectanceBus`] and [`MotorDriverLines`]
//! implements [`MotorLines`].  These are the only types in the system
//! that write sensor or motor pins.  On non-espidf targets the underlying
//! `hw_init` helpers are simulation stubs.

use crate::app::ports::{Direction, MotorLines, ReflectanceBus, Wheel, Wheels};
use crate::drivers::hw_init;
use crate::pins;

// ── ReflectanceBus implementation ─────────────────────────────

/// The QTR-style sensor bar.  Zero-sized: the foreground loop and the
/// sampling handler each hold their own copy.
#[derive(Debug, Clone, Copy, Default)]
pub struct SensorBarBus;

impl ReflectanceBus for SensorBarBus {
    fn set_emitter(&self, on: bool) {
        hw_init::gpio_write(pins::IR_EMITTER_GPIO, on);
    }

    fn charge(&self) {
        hw_init::set_sensor_lines_output(true);
    }

    fn release(&self) {
        hw_init::set_sensor_lines_output(false);
    }

    fn sample(&self) -> u8 {
        pins::LINE_SENSOR_GPIOS
            .iter()
            .enumerate()
            .fold(0u8, |bits, (channel, &gpio)| {
                if hw_init::gpio_read(gpio) { bits | (1 << channel) } else { bits }
            })
    }
}

// ── MotorLines implementation ─────────────────────────────────

/// PWM, DIR and nSLEEP of both wheel drivers.
#[derive(Debug, Default)]
pub struct MotorDriverLines;

struct WheelPins {
    pwm: i32,
    dir: i32,
    sleep: i32,
}

const fn wheel_pins(wheel: Wheel) -> WheelPins {
    match wheel {
        Wheel::Left => WheelPins {
            pwm: pins::LEFT_PWM_GPIO,
            dir: pins::LEFT_DIR_GPIO,
            sleep: pins::LEFT_SLEEP_GPIO,
        },
        Wheel::Right => WheelPins {
            pwm: pins::RIGHT_PWM_GPIO,
            dir: pins::RIGHT_DIR_GPIO,
            sleep: pins::RIGHT_SLEEP_GPIO,
        },
    }
}

impl MotorLines for MotorDriverLines {
    fn set_direction(&mut self, wheel: Wheel, dir: Direction) {
        hw_init::gpio_write(wheel_pins(wheel).dir, matches!(dir, Direction::Backward));
    }

    fn set_awake(&mut self, wheel: Wheel, awake: bool) {
        hw_init::gpio_write(wheel_pins(wheel).sleep, awake);
    }

    fn set_pwm(&mut self, wheels: Wheels, high: bool) {
        for wheel in [Wheel::Left, Wheel::Right] {
            if wheels.contains(wheel) {
                hw_init::gpio_write(wheel_pins(wheel).pwm, high);
            }
        }
    }
}
