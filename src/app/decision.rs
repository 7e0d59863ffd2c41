//! Sensor-pattern → motor-command decision logic.
//!
//! Pure functions, no I/O.  The [`ControlService`](super::service::ControlService)
//! snapshots the shared reading once per iteration, runs it through
//! [`normalize`] and [`decide`], and executes the result.
//!
//! ## Dispatch precedence (first match wins)
//!
//! | Pattern                         | Decision                           |
//! |---------------------------------|------------------------------------|
//! | `0x00`                          | coast, re-sample                   |
//! | `0xFF` `0x7F` `0xFE` `0x3F`     | cross the intersection             |
//! | bit 7, 0, 6, 1, 2, 5 (in order) | pivot on the opposite wheel        |
//! | bit 4 or bit 3                  | straight ahead                     |
//!
//! The pivot channels are checked in that literal order, not by bit
//! magnitude: an outer channel always wins over a middle one.

use super::ports::Wheel;
use crate::fsm::Mode;
use crate::fsm::context::SensorSnapshot;

/// Crosstalk patterns seen at intersections that mean "straight".
const CROSSTALK_PATTERNS: [u8; 2] = [0x58, 0x1A];

/// All-black or nearly all-black: a T or four-way crossing.
const CROSSING_PATTERNS: [u8; 4] = [0xFF, 0x7F, 0xFE, 0x3F];

/// How hard a pivot is, by which sensor pair saw the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnTier {
    /// Outer pair (channels 7 and 0).
    Sharp,
    /// Middle pair (channels 6 and 1).
    Medium,
    /// Inner pair (channels 5 and 2).
    Gentle,
}

/// Pivot checks in dispatch order: (channel, driven wheel, tier).
/// Left-side channels drive the right wheel to swing back onto the line.
const PIVOT_ORDER: [(u8, Wheel, TurnTier); 6] = [
    (7, Wheel::Right, TurnTier::Sharp),
    (0, Wheel::Left, TurnTier::Sharp),
    (6, Wheel::Right, TurnTier::Medium),
    (1, Wheel::Left, TurnTier::Medium),
    (2, Wheel::Left, TurnTier::Gentle),
    (5, Wheel::Right, TurnTier::Gentle),
];

/// A motor command chosen for one loop iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveCommand {
    /// Push across an intersection at the crossing duty.
    Cross,
    /// Drive only `wheel`, then nudge forward.
    Pivot { wheel: Wheel, tier: TurnTier },
    /// Centred on the line: straight ahead.
    Straight,
}

/// What the loop does this iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Mask sampling, reset the snapshot, sleep until an interrupt.
    Park,
    /// Off the line: re-sample without driving.
    Coast,
    /// Issue a motor command, then re-sample.
    Drive(DriveCommand),
    /// No behaviour defined for the current mode.
    Idle,
}

/// Map the two known crosstalk patterns to the straight pattern.
/// Every other value passes through unchanged.
pub fn normalize(snapshot: SensorSnapshot) -> SensorSnapshot {
    if CROSSTALK_PATTERNS.contains(&snapshot.bits()) {
        SensorSnapshot::STRAIGHT
    } else {
        snapshot
    }
}

/// Decide what to do with an already-normalized snapshot under `mode`.
pub fn decide(mode: Mode, snapshot: SensorSnapshot) -> Decision {
    if mode.is_parked() {
        return Decision::Park;
    }
    if mode != Mode::Running {
        return Decision::Idle;
    }
    if snapshot == SensorSnapshot::EMPTY {
        return Decision::Coast;
    }
    Decision::Drive(dispatch(snapshot))
}

fn dispatch(snapshot: SensorSnapshot) -> DriveCommand {
    if CROSSING_PATTERNS.contains(&snapshot.bits()) {
        return DriveCommand::Cross;
    }

    PIVOT_ORDER
        .iter()
        .find(|(channel, _, _)| snapshot.is_set(*channel))
        .map_or(
            // Only channels 3 and 4 can remain set here.
            DriveCommand::Straight,
            |&(_, wheel, tier)| DriveCommand::Pivot { wheel, tier },
        )
}
