//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the rules of the line follower: sensor pattern
//! decisions, the interrupt handler bodies, and the foreground decision
//! loop.  All interaction with hardware happens through **port traits**
//! defined in [`ports`], keeping this layer fully testable without real
//! peripherals.

pub mod decision;
pub mod events;
pub mod handlers;
pub mod ports;
pub mod service;
