//! Reflectance sensor bar driver (RC discharge timing).
//!
//! ## Read sequence
//!
//! 1. IR emitter on.
//! 2. Drive every sensor line high to charge its capacitor (10 µs).
//! 3. Switch the lines to inputs and let them discharge (800 µs).
//!    Over a dark line little IR is reflected, the phototransistor
//!    conducts weakly, and the line still reads high.
//! 4. Sample all lines at once, emitter off.
//!
//! The two waits are the only latency a sampling interrupt incurs.

use embedded_hal::delay::DelayNs;

use crate::app::ports::ReflectanceBus;
use crate::config::RobotConfig;
use crate::fsm::context::SensorSnapshot;

pub struct LineSensor<B, D> {
    bus: B,
    delay: D,
    charge_us: u32,
    discharge_us: u32,
    /// One bit per fitted channel; unfitted bits always read zero.
    mask: u8,
}

impl<B: ReflectanceBus, D: DelayNs> LineSensor<B, D> {
    pub fn new(bus: B, delay: D, config: &RobotConfig) -> Self {
        Self {
            bus,
            delay,
            charge_us: config.sensor_charge_us,
            discharge_us: config.sensor_discharge_us,
            mask: config.sensor_mask(),
        }
    }

    /// Leave the bar idle: emitter off, lines released.
    pub fn init(&mut self) {
        self.bus.set_emitter(false);
        self.bus.release();
    }

    /// Take one reading.  Blocks for charge + discharge time.
    pub fn read(&mut self) -> SensorSnapshot {
        self.bus.set_emitter(true);
        self.bus.charge();
        self.delay.delay_us(self.charge_us);
        self.bus.release();
        self.delay.delay_us(self.discharge_us);
        let raw = self.bus.sample();
        self.bus.set_emitter(false);
        SensorSnapshot(raw & self.mask)
    }
}
