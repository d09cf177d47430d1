//! Local time source trait

/// Errors that can occur reading or syncing the clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimeError {
    /// Clock has never been set
    NotSet,
    /// Clock hardware or sync path unavailable
    Unavailable,
}

/// Local wall-clock time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LocalTime {
    /// 0-23
    pub hour: u8,
    /// 0-59
    pub minute: u8,
    /// 0-59
    pub second: u8,
}

/// Trait for a local (time zone adjusted) clock
pub trait TimeSource {
    /// Current local time
    fn local_time(&mut self) -> Result<LocalTime, TimeError>;

    /// Start a resynchronization with the network time source
    ///
    /// Completion is asynchronous; later `local_time` calls observe the
    /// corrected time.
    fn request_sync(&mut self) -> Result<(), TimeError>;
}
