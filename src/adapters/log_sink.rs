//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).
//! Sensor snapshots are printed as bit strings, left-most channel first.

use log::{debug, info};

use crate::app::decision::DriveCommand;
use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(mode) => {
                info!("START | initial_mode={}", mode.name());
            }
            AppEvent::ModeChanged { from, to } => {
                info!("MODE  | {} -> {}", from.name(), to.name());
            }
            AppEvent::Parked => {
                info!("PARK  | sampling masked, waiting for a button");
            }
            AppEvent::Coasting => {
                debug!("COAST | sensors=00000000");
            }
            AppEvent::Drive { snapshot, command } => {
                let sensors = snapshot.bit_string();
                match command {
                    DriveCommand::Cross => debug!("DRIVE | sensors={} | cross", sensors),
                    DriveCommand::Straight => debug!("DRIVE | sensors={} | straight", sensors),
                    DriveCommand::Pivot { wheel, tier } => {
                        debug!("DRIVE | sensors={} | pivot {:?} wheel ({:?})", sensors, wheel, tier)
                    }
                }
            }
        }
    }
}
