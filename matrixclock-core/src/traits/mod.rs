//! Collaborator traits
//!
//! These traits define the interface between the application logic
//! and hardware- or network-specific implementations.

pub mod display;
pub mod sensor;
pub mod time;
pub mod transport;

pub use display::{Color565, DisplayError, DisplaySurface, Font};
pub use sensor::{LightSensor, SensorError};
pub use time::{LocalTime, TimeError, TimeSource};
pub use transport::{ConnectProgress, Transport, TransportError};
