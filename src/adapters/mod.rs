//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter      | Implements        | Connects to              |
//! |--------------|-------------------|--------------------------|
//! | `hardware`   | ReflectanceBus    | Sensor bar GPIOs         |
//! |              | MotorLines        | Motor driver GPIOs       |
//! | `interrupts` | InterruptControl  | Handler gate, wake count |
//! | `log_sink`   | EventSink         | Serial log output        |
//! | `time`       | DelayNs           | ROM busy-wait            |
//!
//! The timer and button-edge ports are implemented next to their
//! drivers (`drivers::hw_timer`, `drivers::button`).

pub mod hardware;
pub mod interrupts;
pub mod log_sink;
pub mod time;
