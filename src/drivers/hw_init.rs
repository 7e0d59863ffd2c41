//! One-shot hardware peripheral initialization.
//!
//! Configures GPIO directions for the sensor bar, motor drivers, buttons
//! and indicator LEDs using raw ESP-IDF sys calls.  Called once from
//! `main()` before the control core is initialised.

#[cfg(target_os = "espidf")]
use esp_idf_sys::*;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    IsrInstallFailed(i32),
    TimerCreateFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::IsrInstallFailed(rc) => write!(f, "GPIO ISR service install failed (rc={})", rc),
            Self::TimerCreateFailed(rc) => write!(f, "esp_timer create failed (rc={})", rc),
        }
    }
}

impl core::error::Error for HwInitError {}

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::pins;

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before any interrupt source is armed.
    unsafe {
        init_gpio_outputs()?;
        init_sensor_lines()?;
        init_buttons()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

#[cfg(target_os = "espidf")]
unsafe fn config_pins(mask: u64, mode: gpio_mode_t, pull_up: bool) -> Result<(), HwInitError> {
    let cfg = gpio_config_t {
        pin_bit_mask: mask,
        mode,
        pull_up_en: if pull_up {
            gpio_pullup_t_GPIO_PULLUP_ENABLE
        } else {
            gpio_pullup_t_GPIO_PULLUP_DISABLE
        },
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 { return Err(HwInitError::GpioConfigFailed(ret)); }
    Ok(())
}

#[cfg(target_os = "espidf")]
fn mask_of(gpios: &[i32]) -> u64 {
    gpios.iter().fold(0u64, |mask, &pin| mask | (1u64 << pin))
}

// ── GPIO Outputs ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs() -> Result<(), HwInitError> {
    let output_pins = [
        pins::IR_EMITTER_GPIO,
        pins::LEFT_PWM_GPIO,
        pins::LEFT_DIR_GPIO,
        pins::LEFT_SLEEP_GPIO,
        pins::RIGHT_PWM_GPIO,
        pins::RIGHT_DIR_GPIO,
        pins::RIGHT_SLEEP_GPIO,
        pins::INDICATOR_LED_GPIOS[0],
        pins::INDICATOR_LED_GPIOS[1],
    ];

    unsafe { config_pins(mask_of(&output_pins), gpio_mode_t_GPIO_MODE_OUTPUT, false)? };
    for &pin in &output_pins {
        unsafe { gpio_set_level(pin, 0) };
    }

    info!("hw_init: GPIO outputs configured (emitter, motors, LEDs)");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: gpio_set_level writes to an already-configured output pin.
    unsafe { gpio_set_level(pin, if high { 1 } else { 0 }); }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(_pin: i32, _high: bool) {}

// ── Sensor lines (switch between output and input at runtime) ─

#[cfg(target_os = "espidf")]
unsafe fn init_sensor_lines() -> Result<(), HwInitError> {
    unsafe {
        config_pins(
            mask_of(&pins::LINE_SENSOR_GPIOS),
            gpio_mode_t_GPIO_MODE_INPUT_OUTPUT,
            false,
        )?
    };
    set_sensor_lines_output(false);
    info!("hw_init: {} sensor lines configured", pins::LINE_SENSOR_GPIOS.len());
    Ok(())
}

/// `true`: drive every sensor line high as an output.
/// `false`: release them to inputs.
#[cfg(target_os = "espidf")]
pub fn set_sensor_lines_output(output: bool) {
    for &pin in &pins::LINE_SENSOR_GPIOS {
        // SAFETY: direction and level writes on pins configured in
        // init_sensor_lines(); no other code touches these pins.
        unsafe {
            if output {
                gpio_set_direction(pin, gpio_mode_t_GPIO_MODE_OUTPUT);
                gpio_set_level(pin, 1);
            } else {
                gpio_set_direction(pin, gpio_mode_t_GPIO_MODE_INPUT);
            }
        }
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn set_sensor_lines_output(_output: bool) {}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: gpio_get_level is a read-only register access.
    (unsafe { gpio_get_level(pin) }) != 0
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(_pin: i32) -> bool {
    false
}

// ── Buttons ───────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_buttons() -> Result<(), HwInitError> {
    let buttons = [pins::LEFT_BUTTON_GPIO, pins::RIGHT_BUTTON_GPIO];
    // Edge type is set when the core arms the lines.
    unsafe { config_pins(mask_of(&buttons), gpio_mode_t_GPIO_MODE_INPUT, true)? };
    info!("hw_init: button inputs configured");
    Ok(())
}

// ── GPIO ISR Service ──────────────────────────────────────────

/// Install the per-pin GPIO ISR service and register `handler` on both
/// button lines.  `handler` receives the line bit as its argument.
/// Interrupts stay disabled until the lines are armed.
#[cfg(target_os = "espidf")]
pub fn init_isr_service(
    handler: unsafe extern "C" fn(*mut core::ffi::c_void),
    left_arg: usize,
    right_arg: usize,
) -> Result<(), HwInitError> {
    // SAFETY: gpio_install_isr_service is idempotent; ESP_ERR_INVALID_STATE
    // means it was already installed (acceptable).  The handler only
    // touches atomics.
    unsafe {
        let ret = gpio_install_isr_service(0);
        if ret != ESP_OK && ret != ESP_ERR_INVALID_STATE {
            return Err(HwInitError::IsrInstallFailed(ret));
        }

        for (pin, arg) in [(pins::LEFT_BUTTON_GPIO, left_arg), (pins::RIGHT_BUTTON_GPIO, right_arg)] {
            gpio_intr_disable(pin);
            let ret = gpio_isr_handler_add(pin, Some(handler), arg as *mut core::ffi::c_void);
            if ret != ESP_OK {
                return Err(HwInitError::IsrInstallFailed(ret));
            }
        }

        info!("hw_init: ISR service installed (left, right button)");
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_isr_service(
    _handler: unsafe extern "C" fn(*mut core::ffi::c_void),
    _left_arg: usize,
    _right_arg: usize,
) -> Result<(), HwInitError> {
    log::info!("hw_init(sim): ISR service skipped");
    Ok(())
}

/// Set the interrupt edge of `pin` and enable it.
#[cfg(target_os = "espidf")]
pub fn gpio_arm_edge(pin: i32, rising: bool) {
    let edge = if rising {
        gpio_int_type_t_GPIO_INTR_POSEDGE
    } else {
        gpio_int_type_t_GPIO_INTR_NEGEDGE
    };
    // SAFETY: pin was configured as an input in init_buttons().
    unsafe {
        gpio_set_intr_type(pin, edge);
        gpio_intr_enable(pin);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_arm_edge(_pin: i32, _rising: bool) {}
