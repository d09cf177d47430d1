//! Ambient light sensor trait

/// Errors that can occur with light sensing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// Sensor did not answer on the bus
    NotResponding,
    /// Bus transaction failed
    Bus,
    /// Measurement not ready yet
    NotReady,
}

/// Trait for ambient light sensors
pub trait LightSensor {
    /// Detect and initialize the sensor
    ///
    /// Called once at startup. A sensor that fails the probe is never
    /// read again.
    fn probe(&mut self) -> bool;

    /// Read the current illuminance in lux
    fn read_lux(&mut self) -> Result<f32, SensorError>;
}
