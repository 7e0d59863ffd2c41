//! GPIO pin assignments for the MazeBot carrier board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Reflectance sensor bar (QTR-8RC style, RC discharge timing)
// ---------------------------------------------------------------------------

/// Sensor channel GPIOs, index = bit position in the snapshot.
/// Bit 0 is the right-most sensor, bit 7 the left-most.
pub const LINE_SENSOR_GPIOS: [i32; 8] = [4, 5, 6, 7, 15, 16, 17, 18];

/// Digital output: IR emitter enable (active HIGH).
pub const IR_EMITTER_GPIO: i32 = 8;

// ---------------------------------------------------------------------------
// Motor driver (DRV8838 per wheel: PWM, DIR, nSLEEP)
// ---------------------------------------------------------------------------

pub const LEFT_PWM_GPIO: i32 = 9;
/// LOW = forward, HIGH = backward.
pub const LEFT_DIR_GPIO: i32 = 10;
/// LOW = driver asleep.
pub const LEFT_SLEEP_GPIO: i32 = 11;

pub const RIGHT_PWM_GPIO: i32 = 12;
pub const RIGHT_DIR_GPIO: i32 = 13;
pub const RIGHT_SLEEP_GPIO: i32 = 14;

// ---------------------------------------------------------------------------
// Operator buttons (active-high edge on press, internal pull-up)
// ---------------------------------------------------------------------------

pub const LEFT_BUTTON_GPIO: i32 = 1;
pub const RIGHT_BUTTON_GPIO: i32 = 2;

// ---------------------------------------------------------------------------
// Indicator LEDs on the top breadboard
// ---------------------------------------------------------------------------

pub const INDICATOR_LED_GPIOS: [i32; 2] = [38, 39];
