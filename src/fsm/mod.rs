//! Table-driven vehicle mode machine.
//!
//! Classic embedded transition table ported to Rust:
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │  TRANSITIONS[mode][button]                      │
//! │  ┌─────────────┬──────────────┬──────────────┐  │
//! │  │ Mode        │ Left press   │ Right press  │  │
//! │  ├─────────────┼──────────────┼──────────────┤  │
//! │  │ Stopped     │ Running      │ Running      │  │
//! │  │ Running     │ Stopped      │ (ignored)    │  │
//! │  │ Win         │ Running      │ Running      │  │
//! │  │ Solutioning │ Stopped      │ Stopped      │  │
//! │  └─────────────┴──────────────┴──────────────┘  │
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! The machine has no terminal state and no error path: a stimulus the
//! table does not model is a no-op.  The button handler applies it from
//! interrupt context, so [`next_mode`] is a pure lookup with no side
//! effects.

pub mod context;

// ---------------------------------------------------------------------------
// Mode identity
// ---------------------------------------------------------------------------

/// Vehicle behaviour state.  Stored as a single byte in shared state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Mode {
    /// Just powered on, or stopped part-way through a run.
    Stopped = 0,
    /// Following the line.
    Running = 1,
    /// Target reached.  Nothing in the core sets this.
    Win = 2,
    /// Replaying a solution.  No motor behaviour is defined for it.
    Solutioning = 3,
}

impl Mode {
    /// Total number of modes, used to size the transition table.
    pub const COUNT: usize = 4;

    /// Decode a stored byte.  Any out-of-range byte decodes as `Stopped`,
    /// the only mode that never drives the motors.
    pub const fn from_u8(raw: u8) -> Self {
        match raw {
            1 => Self::Running,
            2 => Self::Win,
            3 => Self::Solutioning,
            _ => Self::Stopped,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Stopped => "Stopped",
            Self::Running => "Running",
            Self::Win => "Win",
            Self::Solutioning => "Solutioning",
        }
    }

    /// Modes in which the decision loop parks the vehicle.
    pub const fn is_parked(self) -> bool {
        matches!(self, Self::Stopped | Self::Win)
    }
}

// ---------------------------------------------------------------------------
// Stimuli
// ---------------------------------------------------------------------------

/// The two operator buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Button {
    Left = 0,
    Right = 1,
}

// ---------------------------------------------------------------------------
// Transition table
// ---------------------------------------------------------------------------

/// `TRANSITIONS[mode as usize][button as usize]`; `None` = ignored.
const TRANSITIONS: [[Option<Mode>; 2]; Mode::COUNT] = [
    // Stopped
    [Some(Mode::Running), Some(Mode::Running)],
    // Running
    [Some(Mode::Stopped), None],
    // Win
    [Some(Mode::Running), Some(Mode::Running)],
    // Solutioning
    [Some(Mode::Stopped), Some(Mode::Stopped)],
];

/// Look up the mode a button press leads to.
/// Returns `None` when the press is ignored in `current`.
pub const fn next_mode(current: Mode, button: Button) -> Option<Mode> {
    TRANSITIONS[current as usize][button as usize]
}
