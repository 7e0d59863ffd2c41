//! Sensor subsystem.
//!
//! The only sensor on the vehicle is the eight-channel reflectance bar.
//! The sampling handler and the decision loop each own a [`LineSensor`]
//! over the same bus; the read sequence is short and self-contained, so
//! an interrupted foreground read simply yields a stale pattern.

pub mod line_sensor;

pub use line_sensor::LineSensor;
