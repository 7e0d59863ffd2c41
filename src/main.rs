//! MazeBot Firmware: Main Entry Point
//!
//! Hexagonal architecture with interrupt-driven sampling and a blocking
//! foreground decision loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  SensorBarBus      MotorDriverLines   LogEventSink             │
//! │  (ReflectanceBus)  (MotorLines)       (EventSink)              │
//! │  HwTimer ×2        ButtonEdges        GlobalInterrupts         │
//! │  (PeriodicTimer)   (EdgeInterrupts)   (InterruptControl)       │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │   ControlService (decision loop)  ·  handlers (ISRs)   │    │
//! │  │   normalize · decide · mode table · blink divider      │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │            SharedState (CONTROL_STATE, lock-free bytes)        │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::delay::FreeRtos;
use log::{error, info, warn};

use mazebot::adapters::hardware::{MotorDriverLines, SensorBarBus};
use mazebot::adapters::interrupts::{self, GlobalInterrupts};
use mazebot::adapters::log_sink::LogEventSink;
use mazebot::adapters::time::BusyWaitDelay;
use mazebot::app::handlers::{on_button_edge, on_sample_tick};
use mazebot::app::ports::{ButtonLines, EdgeInterrupts};
use mazebot::app::service::ControlService;
use mazebot::config::RobotConfig;
use mazebot::drivers::blink::BlinkTask;
use mazebot::error::Error;
use mazebot::drivers::button::{ButtonEdges, button_gpio_isr};
use mazebot::drivers::hw_init;
use mazebot::drivers::hw_timer::HwTimer;
use mazebot::drivers::indicator;
use mazebot::drivers::motor::MotorActuator;
use mazebot::fsm::context::CONTROL_STATE;
use mazebot::sensors::LineSensor;

// ── Interrupt sources ─────────────────────────────────────────

static SAMPLER: HwTimer = HwTimer::new(c"sampler");
static BLINK_TICK: HwTimer = HwTimer::new(c"blink");

/// Stack for the deferred button handler task.
const BUTTON_TASK_STACK: usize = 4096;

/// Apply the build-time JSON override from `MAZEBOT_CONFIG`, if any.
fn load_config() -> RobotConfig {
    let Some(text) = option_env!("MAZEBOT_CONFIG") else {
        info!("Config: defaults");
        return RobotConfig::default();
    };
    match RobotConfig::from_json(text) {
        Ok(cfg) => {
            info!("Config: build-time override applied");
            cfg
        }
        Err(e) => {
            warn!("Config override rejected ({}), using defaults", e);
            RobotConfig::default()
        }
    }
}

/// Bring-up failed: the core must not run on a half-initialised board.
fn halt(stage: &str, e: &dyn core::fmt::Display) -> ! {
    error!("{} failed: {}, halting", stage, e);
    loop {
        FreeRtos::delay_ms(1_000);
    }
}

/// GPIO directions, then the button ISR service.
fn bring_up() -> mazebot::error::Result<()> {
    hw_init::init_peripherals()?;
    hw_init::init_isr_service(
        button_gpio_isr,
        usize::from(ButtonLines::LEFT.0),
        usize::from(ButtonLines::RIGHT.0),
    )?;
    Ok(())
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  MazeBot v{}                         ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let config = load_config();

    // ── 2. Peripherals ────────────────────────────────────────
    if let Err(e) = bring_up() {
        halt("Bring-up", &e);
    }

    // ── 3. Interrupt handlers ─────────────────────────────────
    let blink: &'static BlinkTask<&'static HwTimer> =
        Box::leak(Box::new(BlinkTask::new(&BLINK_TICK, config.blink_divisor)));

    // The sampling handler reads through its own sensor instance; the
    // bus itself is shared with the foreground loop.
    let mut isr_sensor = LineSensor::new(SensorBarBus, BusyWaitDelay, &config);
    if let Err(e) = SAMPLER.create(move || {
        if interrupts::handlers_enabled() {
            on_sample_tick(&CONTROL_STATE, &mut isr_sensor, &SAMPLER);
            interrupts::note_wake();
        }
    }) {
        halt("Sampler timer", &Error::from(e));
    }

    if let Err(e) = BLINK_TICK.create(move || {
        if interrupts::handlers_enabled() {
            blink.on_tick();
            interrupts::note_wake();
        }
    }) {
        halt("Blink timer", &Error::from(e));
    }

    // The GPIO ISR only latches the edge; the handler body runs in a task
    // that preempts the control loop.
    std::thread::Builder::new()
        .name("buttons".into())
        .stack_size(BUTTON_TASK_STACK)
        .spawn(move || {
            loop {
                if interrupts::handlers_enabled() && !ButtonEdges.pending().is_empty() {
                    on_button_edge(&CONTROL_STATE, &ButtonEdges, &SAMPLER, blink, &GlobalInterrupts);
                }
                FreeRtos::delay_ms(1);
            }
        })?;

    // ── 4. Control core ───────────────────────────────────────
    let sensor = LineSensor::new(SensorBarBus, BusyWaitDelay, &config);
    let motors = MotorActuator::new(MotorDriverLines, BusyWaitDelay);
    let mut service = ControlService::new(sensor, motors, config);

    service.init_control_core(
        &CONTROL_STATE,
        &SAMPLER,
        &ButtonEdges,
        blink,
        &GlobalInterrupts,
        indicator::toggle_indicator,
    );

    let mut log_sink = LogEventSink::new();
    info!("System ready. Press a button to start.");

    // ── 5. Decision loop ──────────────────────────────────────
    service.run_control_loop(&CONTROL_STATE, &SAMPLER, &GlobalInterrupts, &mut log_sink)
}
