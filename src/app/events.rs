//! Outbound application events.
//!
//! The [`ControlService`](super::service::ControlService) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  Adapters on
//! the other side decide what to do with them (log to serial, count them
//! in a test).

use super::decision::DriveCommand;
use crate::fsm::Mode;
use crate::fsm::context::SensorSnapshot;

/// Structured events emitted by the control core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// The control loop has started (carries the initial mode).
    Started(Mode),

    /// The loop observed a different mode than on its previous iteration.
    ModeChanged { from: Mode, to: Mode },

    /// The vehicle parked: sampling masked, snapshot reset to straight.
    Parked,

    /// No channel saw the line; the loop re-sampled without driving.
    Coasting,

    /// A motor command was issued for `snapshot`.
    Drive {
        snapshot: SensorSnapshot,
        command: DriveCommand,
    },
}
