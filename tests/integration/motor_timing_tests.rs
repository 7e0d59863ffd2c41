//! Software PWM timing checked against the virtual clock.

use crate::mock_hw::{
    Clock, MockMotors, MotorCall, MotorLog, VirtualDelay, awake, high_pulses, pwm_level,
};

use mazebot::app::ports::{Direction, Wheel, Wheels};
use mazebot::config::DUTY_FULL_SCALE;
use mazebot::drivers::motor::MotorActuator;

fn make_actuator() -> (MotorActuator<MockMotors, VirtualDelay>, MotorLog, Clock) {
    let clock = Clock::default();
    let (lines, log) = MockMotors::new(clock.clone());
    (MotorActuator::new(lines, VirtualDelay(clock.clone())), log, clock)
}

fn direction(log: &MotorLog, wheel: Wheel) -> Option<Direction> {
    log.borrow().iter().rev().find_map(|&(_, call)| match call {
        MotorCall::Dir(w, d) if w == wheel => Some(d),
        _ => None,
    })
}

#[test]
fn forward_runs_duty_cycle_for_commanded_duration() {
    let (mut motors, log, clock) = make_actuator();

    motors.drive_forward(4000, 5);

    assert_eq!(high_pulses(&log, Wheel::Left), vec![2400; 9]);
    assert_eq!(high_pulses(&log, Wheel::Right), vec![2400; 9]);
    assert_eq!(clock.now(), 9 * 6_000);
    assert_eq!(direction(&log, Wheel::Left), Some(Direction::Forward));
    assert_eq!(awake(&log, Wheel::Left), Some(true));
    assert!(!pwm_level(&log, Wheel::Left) && !pwm_level(&log, Wheel::Right));
}

#[test]
fn backward_uses_same_timing() {
    let (mut motors, log, clock) = make_actuator();

    motors.drive_backward(4000, 2);

    assert_eq!(high_pulses(&log, Wheel::Right), vec![2400; 3]);
    assert_eq!(clock.now(), 3 * 6_000);
    assert_eq!(direction(&log, Wheel::Right), Some(Direction::Backward));
}

#[test]
fn zero_duty_holds_the_line_low_for_the_full_duration() {
    let (mut motors, log, clock) = make_actuator();

    motors.drive_forward(0, 5);

    assert!(high_pulses(&log, Wheel::Left).is_empty());
    assert_eq!(clock.now(), 9 * 6_000);
}

#[test]
fn full_duty_is_one_continuous_pulse() {
    let (mut motors, log, clock) = make_actuator();

    motors.drive_forward(DUTY_FULL_SCALE, 5);

    assert_eq!(high_pulses(&log, Wheel::Left), vec![9 * 6_000]);
    assert_eq!(clock.now(), 9 * 6_000);
    assert!(!pwm_level(&log, Wheel::Left));
}

#[test]
fn single_wheel_holds_the_other_low_and_keeps_its_sleep_line() {
    let (mut motors, log, _clock) = make_actuator();

    motors.drive_left(4000, 5);

    assert_eq!(high_pulses(&log, Wheel::Left), vec![2400; 9]);
    assert!(high_pulses(&log, Wheel::Right).is_empty());
    assert!(log.borrow().iter().any(|&(_, c)| c == MotorCall::Pwm(Wheels::Right, false)));
    assert_eq!(awake(&log, Wheel::Right), None);
}

#[test]
fn spin_right_turns_wheels_in_opposite_directions() {
    let (mut motors, log, clock) = make_actuator();

    motors.spin_right_90();

    assert_eq!(direction(&log, Wheel::Left), Some(Direction::Forward));
    assert_eq!(direction(&log, Wheel::Right), Some(Direction::Backward));
    assert_eq!(high_pulses(&log, Wheel::Left), vec![2_000; 86]);
    assert_eq!(clock.now(), 86 * 5_000);
}

#[test]
fn spin_left_mirrors_spin_right() {
    let (mut motors, log, clock) = make_actuator();

    motors.spin_left_90();

    assert_eq!(direction(&log, Wheel::Left), Some(Direction::Backward));
    assert_eq!(direction(&log, Wheel::Right), Some(Direction::Forward));
    assert_eq!(clock.now(), 86 * 5_000);
}

#[test]
fn half_spins_and_half_turn_use_calibrated_cycle_counts() {
    let (mut motors, log, clock) = make_actuator();
    motors.spin_right_45();
    assert_eq!(high_pulses(&log, Wheel::Right).len(), 43);
    assert_eq!(clock.now(), 43 * 5_000);

    let (mut motors, _log, clock) = make_actuator();
    motors.spin_left_45();
    assert_eq!(clock.now(), 43 * 5_000);

    let (mut motors, log, clock) = make_actuator();
    motors.spin_180();
    assert_eq!(high_pulses(&log, Wheel::Left).len(), 205);
    assert_eq!(clock.now(), 205 * 5_000);
}

#[test]
fn stop_sleeps_both_drivers() {
    let (mut motors, log, clock) = make_actuator();

    motors.drive_forward(4000, 1);
    motors.stop();

    assert_eq!(awake(&log, Wheel::Left), Some(false));
    assert_eq!(awake(&log, Wheel::Right), Some(false));
    assert_eq!(direction(&log, Wheel::Left), Some(Direction::Forward));
    assert_eq!(clock.now(), 6_000, "stop does not block");
}
