//! Integration tests for the two interrupt handler bodies.

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crate::mock_hw::{Clock, MockBus, MockEdges, MockIrq, MockTimer, VirtualDelay};

use mazebot::adapters::interrupts::GlobalInterrupts;
use mazebot::app::handlers::{on_button_edge, on_sample_tick};
use mazebot::app::ports::{ButtonLines, InterruptControl, PeriodicTimer};
use mazebot::config::RobotConfig;
use mazebot::drivers::blink::BlinkTask;
use mazebot::fsm::Mode;
use mazebot::fsm::context::{SensorSnapshot, SharedState};
use mazebot::sensors::LineSensor;

fn noop() {}

struct Bench {
    state: SharedState,
    edges: MockEdges,
    sampler: MockTimer,
    blink_timer: MockTimer,
    irq: MockIrq,
}

impl Bench {
    /// Sampler armed but masked, a blink sequence running, global
    /// interrupts off: the state a press has to recover from.
    fn new(mode: Mode) -> Self {
        let bench = Self {
            state: SharedState::new(),
            edges: MockEdges::default(),
            sampler: MockTimer::default(),
            blink_timer: MockTimer::default(),
            irq: MockIrq::default(),
        };
        bench.state.set_mode(mode);
        bench.sampler.arm(25_000);
        bench.sampler.disable_interrupt();
        bench
    }

    fn press(&self, lines: ButtonLines) -> Mode {
        let blink = BlinkTask::new(&self.blink_timer, 50);
        blink.start(noop, 1_000, 6);
        self.edges.press(lines);
        on_button_edge(&self.state, &self.edges, &self.sampler, &blink, &self.irq);
        assert!(!blink.is_armed(), "every press silences the blink task");
        self.state.mode()
    }

    fn assert_rearmed(&self) {
        assert!(self.sampler.irq_enabled.get(), "sampler interrupt re-enabled");
        assert_eq!(self.sampler.restarts.get(), 1, "sampler countdown restarted");
        assert_eq!(self.blink_timer.period_us.get(), None, "blink tick disarmed");
        assert!(self.irq.global.get(), "global interrupts re-enabled");
        assert_eq!(self.irq.notifies.get(), 1, "foreground loop woken");
        assert!(self.edges.pending.get() == 0, "both edge flags acknowledged");
    }
}

// ── Mode table ────────────────────────────────────────────────

#[test]
fn any_press_starts_a_stopped_vehicle() {
    for lines in [ButtonLines::LEFT, ButtonLines::RIGHT] {
        let bench = Bench::new(Mode::Stopped);
        assert_eq!(bench.press(lines), Mode::Running);
        bench.assert_rearmed();
    }
}

#[test]
fn any_press_restarts_after_a_win() {
    for lines in [ButtonLines::LEFT, ButtonLines::RIGHT] {
        assert_eq!(Bench::new(Mode::Win).press(lines), Mode::Running);
    }
}

#[test]
fn left_press_stops_a_running_vehicle() {
    let bench = Bench::new(Mode::Running);
    assert_eq!(bench.press(ButtonLines::LEFT), Mode::Stopped);
    bench.assert_rearmed();
}

#[test]
fn right_press_while_running_is_ignored_but_still_rearms() {
    let bench = Bench::new(Mode::Running);
    assert_eq!(bench.press(ButtonLines::RIGHT), Mode::Running);
    bench.assert_rearmed();
}

#[test]
fn any_press_ends_solutioning() {
    for lines in [ButtonLines::LEFT, ButtonLines::RIGHT] {
        assert_eq!(Bench::new(Mode::Solutioning).press(lines), Mode::Stopped);
    }
}

#[test]
fn left_takes_precedence_when_both_fire() {
    let bench = Bench::new(Mode::Running);
    assert_eq!(bench.press(ButtonLines::BOTH), Mode::Stopped);
    bench.assert_rearmed();
}

#[test]
fn spurious_edge_changes_nothing_but_rearms() {
    let bench = Bench::new(Mode::Stopped);
    assert_eq!(bench.press(ButtonLines::NONE), Mode::Stopped);
    bench.assert_rearmed();
}

static HANDOFF_STATE: SharedState = SharedState::new();

#[test]
fn press_wakes_a_parked_loop_after_the_mode_change() {
    HANDOFF_STATE.set_mode(Mode::Stopped);
    let (tx, rx) = mpsc::channel();
    let parked_loop = thread::spawn(move || {
        GlobalInterrupts.wait_for_interrupt();
        let _ = tx.send(HANDOFF_STATE.mode());
    });
    thread::sleep(Duration::from_millis(20));

    let edges = MockEdges::default();
    let sampler = MockTimer::default();
    let blink_timer = MockTimer::default();
    let blink = BlinkTask::new(&blink_timer, 50);
    edges.press(ButtonLines::RIGHT);
    on_button_edge(&HANDOFF_STATE, &edges, &sampler, &blink, &GlobalInterrupts);

    let seen = rx
        .recv_timeout(Duration::from_secs(1))
        .expect("button handler wakes the parked loop");
    assert_eq!(seen, Mode::Running);
    parked_loop.join().expect("parked loop thread");
}

// ── Sampling ──────────────────────────────────────────────────

#[test]
fn sample_tick_overwrites_snapshot_and_restarts_timer() {
    let bus = MockBus::default();
    bus.queue(0x24);
    let clock = Clock::default();
    let mut sensor = LineSensor::new(&bus, VirtualDelay(clock.clone()), &RobotConfig::default());
    let state = SharedState::new();
    let sampler = MockTimer::default();

    on_sample_tick(&state, &mut sensor, &sampler);

    assert_eq!(state.snapshot(), SensorSnapshot(0x24));
    assert_eq!(sampler.restarts.get(), 1);
    assert_eq!(clock.now(), 810, "charge and discharge waits only");
}

#[test]
fn sample_tick_masks_unfitted_channels() {
    let bus = MockBus::with_fallback(0xFF);
    let config = RobotConfig { sensor_channels: 6, ..RobotConfig::default() };
    let mut sensor = LineSensor::new(&bus, VirtualDelay(Clock::default()), &config);
    let state = SharedState::new();

    on_sample_tick(&state, &mut sensor, &MockTimer::default());

    assert_eq!(state.snapshot(), SensorSnapshot(0x3F));
}

#[test]
fn back_to_back_ticks_keep_latest_reading() {
    let bus = MockBus::default();
    for bits in [0x80, 0x40, 0x18] {
        bus.queue(bits);
    }
    let mut sensor = LineSensor::new(&bus, VirtualDelay(Clock::default()), &RobotConfig::default());
    let state = SharedState::new();
    let sampler = MockTimer::default();

    for _ in 0..3 {
        on_sample_tick(&state, &mut sensor, &sampler);
    }

    assert_eq!(state.snapshot(), SensorSnapshot(0x18));
    assert_eq!(sampler.restarts.get(), 3);
}
