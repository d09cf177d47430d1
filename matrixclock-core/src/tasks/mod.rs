//! Periodic task bodies
//!
//! Each task is a small struct holding its own error side channel and a
//! `run` method that borrows the shared state and the collaborators it
//! needs. The application dispatches on [`TaskKind`].

pub mod blink;
pub mod clock;
pub mod sensor;
pub mod time_sync;

pub use blink::BlinkTask;
pub use clock::ClockTask;
pub use sensor::{brightness_from_light, fallback_brightness, SensorTask};
pub use time_sync::TimeSyncTask;

/// Number of periodic tasks
pub const TASK_COUNT: usize = 4;

/// Periodic task identity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TaskKind {
    /// Full frame redraw
    Clock,
    /// Separator fade step
    Blink,
    /// Light sampling and brightness
    Sensor,
    /// Network time resync
    TimeSync,
}

impl TaskKind {
    /// Registration and arming order
    pub const ALL: [TaskKind; TASK_COUNT] = [
        TaskKind::Clock,
        TaskKind::Blink,
        TaskKind::Sensor,
        TaskKind::TimeSync,
    ];
}
