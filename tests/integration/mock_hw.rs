//! Mock hardware for integration tests.
//!
//! Every mock shares one virtual clock (microseconds).  Delays advance the
//! clock instead of sleeping, and the motor mock stamps every line write
//! with the current time, so PWM timing can be asserted exactly.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use mazebot::app::events::AppEvent;
use mazebot::app::ports::{
    ButtonLines, Direction, Edge, EdgeInterrupts, EventSink, InterruptControl, MotorLines,
    PeriodicTimer, ReflectanceBus, Wheel, Wheels,
};

// ── Virtual clock ─────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct Clock(Rc<Cell<u64>>);

impl Clock {
    pub fn now(&self) -> u64 {
        self.0.get()
    }

    fn advance(&self, us: u64) {
        self.0.set(self.0.get() + us);
    }
}

pub struct VirtualDelay(pub Clock);

impl DelayNs for VirtualDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.advance(u64::from(ns.div_ceil(1_000)));
    }

    fn delay_us(&mut self, us: u32) {
        self.0.advance(u64::from(us));
    }
}

// ── Sensor bus ────────────────────────────────────────────────

/// Returns queued readings in order, then `fallback` forever.
#[derive(Default)]
pub struct MockBus {
    readings: RefCell<VecDeque<u8>>,
    fallback: Cell<u8>,
    samples: Cell<u32>,
    emitter: Cell<bool>,
}

#[allow(dead_code)]
impl MockBus {
    pub fn with_fallback(bits: u8) -> Self {
        let bus = Self::default();
        bus.fallback.set(bits);
        bus
    }

    pub fn queue(&self, bits: u8) {
        self.readings.borrow_mut().push_back(bits);
    }

    pub fn samples(&self) -> u32 {
        self.samples.get()
    }

    pub fn emitter_on(&self) -> bool {
        self.emitter.get()
    }
}

impl ReflectanceBus for MockBus {
    fn set_emitter(&self, on: bool) {
        self.emitter.set(on);
    }

    fn charge(&self) {}

    fn release(&self) {}

    fn sample(&self) -> u8 {
        self.samples.set(self.samples.get() + 1);
        self.readings
            .borrow_mut()
            .pop_front()
            .unwrap_or(self.fallback.get())
    }
}

// ── Motor lines ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorCall {
    Pwm(Wheels, bool),
    Dir(Wheel, Direction),
    Awake(Wheel, bool),
}

pub type MotorLog = Rc<RefCell<Vec<(u64, MotorCall)>>>;

pub struct MockMotors {
    clock: Clock,
    log: MotorLog,
}

impl MockMotors {
    pub fn new(clock: Clock) -> (Self, MotorLog) {
        let log = MotorLog::default();
        (
            Self {
                clock,
                log: Rc::clone(&log),
            },
            log,
        )
    }

    fn record(&mut self, call: MotorCall) {
        self.log.borrow_mut().push((self.clock.now(), call));
    }
}

impl MotorLines for MockMotors {
    fn set_direction(&mut self, wheel: Wheel, dir: Direction) {
        self.record(MotorCall::Dir(wheel, dir));
    }

    fn set_awake(&mut self, wheel: Wheel, awake: bool) {
        self.record(MotorCall::Awake(wheel, awake));
    }

    fn set_pwm(&mut self, wheels: Wheels, high: bool) {
        self.record(MotorCall::Pwm(wheels, high));
    }
}

/// Lengths (µs) of every high pulse seen on `wheel`'s PWM line.
pub fn high_pulses(log: &MotorLog, wheel: Wheel) -> Vec<u64> {
    let mut pulses = Vec::new();
    let mut rose_at: Option<u64> = None;
    for &(t, call) in log.borrow().iter() {
        if let MotorCall::Pwm(wheels, high) = call {
            if !wheels.contains(wheel) {
                continue;
            }
            match (high, rose_at) {
                (true, None) => rose_at = Some(t),
                (false, Some(start)) => {
                    pulses.push(t - start);
                    rose_at = None;
                }
                _ => {}
            }
        }
    }
    pulses
}

/// Final level of `wheel`'s PWM line.
pub fn pwm_level(log: &MotorLog, wheel: Wheel) -> bool {
    log.borrow()
        .iter()
        .rev()
        .find_map(|&(_, call)| match call {
            MotorCall::Pwm(wheels, high) if wheels.contains(wheel) => Some(high),
            _ => None,
        })
        .unwrap_or(false)
}

/// Last awake state written for `wheel`.
pub fn awake(log: &MotorLog, wheel: Wheel) -> Option<bool> {
    log.borrow().iter().rev().find_map(|&(_, call)| match call {
        MotorCall::Awake(w, a) if w == wheel => Some(a),
        _ => None,
    })
}

// ── Timers ────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct MockTimer {
    pub period_us: Cell<Option<u32>>,
    pub irq_enabled: Cell<bool>,
    pub restarts: Cell<u32>,
}

#[allow(dead_code)]
impl MockTimer {
    pub fn is_armed(&self) -> bool {
        self.period_us.get().is_some()
    }
}

impl PeriodicTimer for MockTimer {
    fn arm(&self, period_us: u32) {
        self.period_us.set(Some(period_us));
        self.irq_enabled.set(true);
    }

    fn disarm(&self) {
        self.period_us.set(None);
        self.irq_enabled.set(false);
    }

    fn restart(&self) {
        self.restarts.set(self.restarts.get() + 1);
    }

    fn enable_interrupt(&self) {
        self.irq_enabled.set(true);
    }

    fn disable_interrupt(&self) {
        self.irq_enabled.set(false);
    }
}

// ── Button edges ──────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct MockEdges {
    pub pending: Cell<u8>,
    pub armed: Cell<Option<(ButtonLines, Edge)>>,
}

#[allow(dead_code)]
impl MockEdges {
    pub fn press(&self, lines: ButtonLines) {
        self.pending.set(self.pending.get() | lines.0);
    }
}

impl EdgeInterrupts for MockEdges {
    fn arm(&self, lines: ButtonLines, edge: Edge) {
        self.armed.set(Some((lines, edge)));
    }

    fn pending(&self) -> ButtonLines {
        ButtonLines(self.pending.get())
    }

    fn acknowledge(&self, lines: ButtonLines) {
        self.pending.set(self.pending.get() & !lines.0);
    }
}

// ── Interrupt control ─────────────────────────────────────────

/// `wait_for_interrupt` returns immediately and counts the call.
#[derive(Debug, Default)]
pub struct MockIrq {
    pub global: Cell<bool>,
    pub waits: Cell<u32>,
    pub notifies: Cell<u32>,
}

impl InterruptControl for MockIrq {
    fn enable_global(&self) {
        self.global.set(true);
    }

    fn disable_global(&self) {
        self.global.set(false);
    }

    fn wait_for_interrupt(&self) {
        self.waits.set(self.waits.get() + 1);
    }

    fn notify(&self) {
        self.notifies.set(self.notifies.get() + 1);
    }
}

// ── Event sink ────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(*event);
    }
}
