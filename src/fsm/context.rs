//! State shared between the interrupt handlers and the decision loop.
//!
//! Every field is a single byte, written with a plain store and read with a
//! plain load.  No field is ever read-modify-written, so no lock is needed:
//! a reader sees either the previous value or the new one, and every reader
//! tolerates being one write stale.
//!
//! | Field    | Writers                               | Readers         |
//! |----------|---------------------------------------|-----------------|
//! | mode     | button handler, decision loop         | decision loop   |
//! | snapshot | sampling handler, decision loop       | decision loop   |

use core::sync::atomic::{AtomicU8, Ordering};

use heapless::String;

use super::Mode;

// ---------------------------------------------------------------------------
// Sensor snapshot
// ---------------------------------------------------------------------------

/// One reflectance reading: bit 0 = right-most channel, bit 7 = left-most,
/// 1 = line detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SensorSnapshot(pub u8);

impl SensorSnapshot {
    /// Both centre channels over the line.
    pub const STRAIGHT: Self = Self(0x18);
    /// No channel sees the line.
    pub const EMPTY: Self = Self(0x00);

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Clear every bit outside `mask`.
    pub const fn masked(self, mask: u8) -> Self {
        Self(self.0 & mask)
    }

    pub const fn is_set(self, channel: u8) -> bool {
        self.0 & (1 << channel) != 0
    }

    /// Render as eight `0`/`1` characters, left-most channel first.
    pub fn bit_string(self) -> String<8> {
        let mut s = String::new();
        for channel in (0..8).rev() {
            // Capacity is exactly eight characters.
            let _ = s.push(if self.is_set(channel) { '1' } else { '0' });
        }
        s
    }
}

// ---------------------------------------------------------------------------
// SharedState
// ---------------------------------------------------------------------------

/// Lock-free cross-context state.  The firmware uses the
/// [`CONTROL_STATE`] static; tests build their own instances.
pub struct SharedState {
    mode: AtomicU8,
    snapshot: AtomicU8,
}

/// The process-wide instance read and written by the firmware's ISRs.
pub static CONTROL_STATE: SharedState = SharedState::new();

impl SharedState {
    /// Initial state: `Stopped`, snapshot straight ahead.
    pub const fn new() -> Self {
        Self {
            mode: AtomicU8::new(Mode::Stopped as u8),
            snapshot: AtomicU8::new(SensorSnapshot::STRAIGHT.0),
        }
    }

    pub fn mode(&self) -> Mode {
        Mode::from_u8(self.mode.load(Ordering::Acquire))
    }

    pub fn set_mode(&self, mode: Mode) {
        self.mode.store(mode as u8, Ordering::Release);
    }

    pub fn snapshot(&self) -> SensorSnapshot {
        SensorSnapshot(self.snapshot.load(Ordering::Acquire))
    }

    pub fn set_snapshot(&self, snapshot: SensorSnapshot) {
        self.snapshot.store(snapshot.0, Ordering::Release);
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}
