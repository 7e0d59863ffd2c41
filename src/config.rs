//! Vehicle configuration parameters
//!
//! All tunable parameters for the MazeBot control core.  Defaults are the
//! calibrated values the drive train was tuned with; a JSON override can
//! be supplied at build time (see `main.rs`).

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Full-scale duty value.  Duties are expressed on a 0–10000 scale.
pub const DUTY_FULL_SCALE: u16 = 10_000;

/// One graduated turn: how long to pivot, then how long to nudge forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnProfile {
    /// Pivot duration in 10 ms units.
    pub turn_units: u32,
    /// Forward nudge duration in 10 ms units.
    pub nudge_units: u32,
}

/// Core vehicle configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotConfig {
    // --- Drive ---
    /// Cruising duty (0–10000) used for line following.
    pub move_duty: u16,
    /// Duty used to push across an intersection (all-black pattern).
    pub crossing_duty: u16,
    /// Duration of the intersection push, 10 ms units.
    pub crossing_units: u32,
    /// Duration of a centred straight run, 10 ms units.
    pub straight_units: u32,

    // --- Turns (outer, middle, inner sensor pairs) ---
    pub sharp_turn: TurnProfile,
    pub medium_turn: TurnProfile,
    pub gentle_turn: TurnProfile,

    // --- Sensor bar ---
    /// Number of physically fitted sensor channels (1–8).
    pub sensor_channels: u8,
    /// Capacitor charge time before release (µs).
    pub sensor_charge_us: u32,
    /// Discharge time before sampling (µs).
    pub sensor_discharge_us: u32,

    // --- Timing ---
    /// Sampling timer period (µs).
    pub sampling_period_us: u32,
    /// Hardware tick period of the blink timer (µs).
    pub blink_tick_us: u32,
    /// Hardware ticks per blink callback.
    pub blink_divisor: u16,
    /// Indicator toggles issued at power-on (0 disables the ready blink).
    pub startup_blinks: u8,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            // Drive
            move_duty: 4000,
            crossing_duty: 4600, // 15 % boost over cruising
            crossing_units: 4,
            straight_units: 2,

            // Turns
            sharp_turn: TurnProfile { turn_units: 5, nudge_units: 1 },
            medium_turn: TurnProfile { turn_units: 5, nudge_units: 1 },
            gentle_turn: TurnProfile { turn_units: 5, nudge_units: 1 },

            // Sensor bar
            sensor_channels: 8,
            sensor_charge_us: 10,
            sensor_discharge_us: 800,

            // Timing
            sampling_period_us: 25_000, // 40 Hz
            blink_tick_us: 1_000,
            blink_divisor: 50, // 50 ms per blink step
            startup_blinks: 6,
        }
    }
}

impl RobotConfig {
    /// Range-check every field.  Values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.move_duty > DUTY_FULL_SCALE || self.crossing_duty > DUTY_FULL_SCALE {
            return Err(ConfigError::ValidationFailed("duty above 10000"));
        }
        if self.sensor_channels == 0 || self.sensor_channels > 8 {
            return Err(ConfigError::ValidationFailed("sensor_channels outside 1..=8"));
        }
        if self.sampling_period_us == 0 {
            return Err(ConfigError::ValidationFailed("sampling_period_us is zero"));
        }
        if self.blink_tick_us == 0 {
            return Err(ConfigError::ValidationFailed("blink_tick_us is zero"));
        }
        if self.blink_divisor == 0 {
            return Err(ConfigError::ValidationFailed("blink_divisor is zero"));
        }
        Ok(())
    }

    /// Parse a JSON override.  Missing fields keep their defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text).map_err(|_| ConfigError::Malformed)?;
        config.validate()?;
        Ok(config)
    }

    /// Mask with one bit per fitted sensor channel.
    pub fn sensor_mask(&self) -> u8 {
        match self.sensor_channels {
            0 => 0,
            n if n >= 8 => 0xFF,
            n => (1u8 << n) - 1,
        }
    }
}
