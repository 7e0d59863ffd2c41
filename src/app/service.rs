//! Control service: the foreground decision loop.
//!
//! [`ControlService`] owns the foreground line sensor and the motor
//! actuator.  Everything it shares with interrupt context flows through
//! [`SharedState`]; the interrupt-side ports are injected at each call.
//!
//! ```text
//!  SharedState ──▶ ┌─────────────────────────┐ ──▶ EventSink
//!                  │     ControlService      │
//!  LineSensor  ──▶ │ normalize · decide · act│ ──▶ MotorActuator
//!                  └─────────────────────────┘
//! ```
//!
//! One [`step`](ControlService::step) is one loop iteration.  Motor
//! commands block for their whole duration, so a button press during
//! motion is only observed once the command has finished.

use embedded_hal::delay::DelayNs;
use log::info;

use crate::config::{RobotConfig, TurnProfile};
use crate::drivers::blink::{BlinkCallback, BlinkTask};
use crate::drivers::motor::MotorActuator;
use crate::fsm::Mode;
use crate::fsm::context::{SensorSnapshot, SharedState};
use crate::sensors::LineSensor;

use super::decision::{Decision, DriveCommand, TurnTier, decide, normalize};
use super::events::AppEvent;
use super::ports::{
    ButtonLines, Edge, EdgeInterrupts, EventSink, InterruptControl, MotorLines, PeriodicTimer,
    ReflectanceBus,
};

/// What one loop iteration did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Sampling masked, snapshot reset, slept until an interrupt.
    Parked,
    /// Off the line: re-sampled without driving.
    Coasted,
    /// Executed a motor command, then re-sampled.
    Drove(DriveCommand),
    /// Nothing defined for the current mode.
    Idled,
}

pub struct ControlService<B, SD, M, MD> {
    sensor: LineSensor<B, SD>,
    motors: MotorActuator<M, MD>,
    config: RobotConfig,
    last_mode: Option<Mode>,
    /// Motors already stopped for the current parked stretch.
    parked: bool,
}

impl<B, SD, M, MD> ControlService<B, SD, M, MD>
where
    B: ReflectanceBus,
    SD: DelayNs,
    M: MotorLines,
    MD: DelayNs,
{
    pub fn new(sensor: LineSensor<B, SD>, motors: MotorActuator<M, MD>, config: RobotConfig) -> Self {
        Self {
            sensor,
            motors,
            config,
            last_mode: None,
            parked: false,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Bring the core to its initial state and start the interrupt sources.
    ///
    /// Motors parked, sensor bar idle, mode `Stopped` with a straight
    /// snapshot, sampling timer armed, both button lines armed on the
    /// rising edge, the ready blink started, global interrupts on.
    pub fn init_control_core<S, E, K, I>(
        &mut self,
        state: &SharedState,
        sampler: &S,
        edges: &E,
        blink: &BlinkTask<K>,
        irq: &I,
        ready_blink: BlinkCallback,
    ) where
        S: PeriodicTimer,
        E: EdgeInterrupts,
        K: PeriodicTimer,
        I: InterruptControl,
    {
        irq.disable_global();

        self.motors.init();
        self.sensor.init();
        state.set_mode(Mode::Stopped);
        state.set_snapshot(self.centred());

        sampler.arm(self.config.sampling_period_us);
        edges.acknowledge(ButtonLines::BOTH);
        edges.arm(ButtonLines::BOTH, Edge::Rising);
        blink.start(ready_blink, self.config.blink_tick_us, self.config.startup_blinks);

        irq.enable_global();
        info!(
            "control core ready (sampling every {} us, {} ready blinks)",
            self.config.sampling_period_us, self.config.startup_blinks
        );
    }

    /// Loop forever.  Never returns.
    pub fn run_control_loop<S, I>(
        &mut self,
        state: &SharedState,
        sampler: &S,
        irq: &I,
        sink: &mut impl EventSink,
    ) -> !
    where
        S: PeriodicTimer,
        I: InterruptControl,
    {
        self.start(state, sink);
        loop {
            self.step(state, sampler, irq, sink);
        }
    }

    /// Announce the initial mode.  `run_control_loop` calls this itself.
    pub fn start(&mut self, state: &SharedState, sink: &mut impl EventSink) {
        let mode = state.mode();
        self.last_mode = Some(mode);
        sink.emit(&AppEvent::Started(mode));
    }

    // ── Per-iteration orchestration ───────────────────────────

    /// Run one iteration of the decision loop.
    pub fn step<S, I>(
        &mut self,
        state: &SharedState,
        sampler: &S,
        irq: &I,
        sink: &mut impl EventSink,
    ) -> StepOutcome
    where
        S: PeriodicTimer,
        I: InterruptControl,
    {
        let mode = state.mode();
        self.note_mode(mode, sink);

        let snapshot = normalize(state.snapshot());

        match decide(mode, snapshot) {
            Decision::Park => {
                sampler.disable_interrupt();
                state.set_snapshot(self.centred());
                if !self.parked {
                    self.motors.stop();
                    self.parked = true;
                    sink.emit(&AppEvent::Parked);
                }
                irq.wait_for_interrupt();
                StepOutcome::Parked
            }
            Decision::Coast => {
                self.parked = false;
                sink.emit(&AppEvent::Coasting);
                state.set_snapshot(self.sensor.read());
                StepOutcome::Coasted
            }
            Decision::Drive(command) => {
                self.parked = false;
                sink.emit(&AppEvent::Drive { snapshot, command });
                self.execute(command);
                state.set_snapshot(self.sensor.read());
                StepOutcome::Drove(command)
            }
            Decision::Idle => StepOutcome::Idled,
        }
    }

    /// The straight pattern restricted to the fitted channels.
    fn centred(&self) -> SensorSnapshot {
        SensorSnapshot::STRAIGHT.masked(self.config.sensor_mask())
    }

    fn note_mode(&mut self, mode: Mode, sink: &mut impl EventSink) {
        if let Some(previous) = self.last_mode {
            if previous != mode {
                sink.emit(&AppEvent::ModeChanged { from: previous, to: mode });
            }
        }
        self.last_mode = Some(mode);
    }

    fn execute(&mut self, command: DriveCommand) {
        let duty = self.config.move_duty;
        match command {
            DriveCommand::Cross => {
                self.motors
                    .drive_forward(self.config.crossing_duty, self.config.crossing_units);
            }
            DriveCommand::Pivot { wheel, tier } => {
                let profile = self.turn_profile(tier);
                self.motors.drive_wheel(wheel, duty, profile.turn_units);
                self.motors.drive_forward(duty, profile.nudge_units);
            }
            DriveCommand::Straight => {
                self.motors.drive_forward(duty, self.config.straight_units);
            }
        }
    }

    fn turn_profile(&self, tier: TurnTier) -> TurnProfile {
        match tier {
            TurnTier::Sharp => self.config.sharp_turn,
            TurnTier::Medium => self.config.medium_turn,
            TurnTier::Gentle => self.config.gentle_turn,
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn config(&self) -> &RobotConfig {
        &self.config
    }

    pub fn motors(&self) -> &MotorActuator<M, MD> {
        &self.motors
    }
}
