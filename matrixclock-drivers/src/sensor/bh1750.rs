//! BH1750 ambient light sensor (I2C)
//!
//! Runs in continuous high-resolution mode 2 (0.5 lx per count, ~120 ms
//! per measurement). A reading is two bytes, big-endian.

use embedded_hal::i2c::I2c;
use matrixclock_core::traits::{LightSensor, SensorError};

/// Address with the ADDR pin low
pub const DEFAULT_ADDRESS: u8 = 0x23;

/// Address with the ADDR pin high
pub const ALT_ADDRESS: u8 = 0x5C;

/// BH1750 instruction set
#[allow(dead_code)]
mod cmd {
    pub const POWER_DOWN: u8 = 0x00;
    pub const POWER_ON: u8 = 0x01;
    pub const RESET: u8 = 0x07;
    pub const CONTINUOUS_HIGH_RES: u8 = 0x10;
    pub const CONTINUOUS_HIGH_RES_2: u8 = 0x11;
    pub const CONTINUOUS_LOW_RES: u8 = 0x13;
}

/// Counts per lux at the default measurement time
const COUNTS_PER_LUX: f32 = 1.2;

/// BH1750 driver
pub struct Bh1750<I2C> {
    i2c: I2C,
    address: u8,
    ready: bool,
}

impl<I2C: I2c> Bh1750<I2C> {
    /// Create a driver at the default address
    pub fn new(i2c: I2C) -> Self {
        Self::with_address(i2c, DEFAULT_ADDRESS)
    }

    pub fn with_address(i2c: I2C, address: u8) -> Self {
        Self {
            i2c,
            address,
            ready: false,
        }
    }

    /// Power up and start continuous measurement
    pub fn init(&mut self) -> Result<(), I2C::Error> {
        self.i2c.write(self.address, &[cmd::POWER_ON])?;
        self.i2c.write(self.address, &[cmd::CONTINUOUS_HIGH_RES_2])?;
        self.ready = true;
        Ok(())
    }

    /// Read the latest raw measurement count
    pub fn read_raw(&mut self) -> Result<u16, I2C::Error> {
        let mut buf = [0u8; 2];
        self.i2c.read(self.address, &mut buf)?;
        Ok(u16::from_be_bytes(buf))
    }

    /// Release the bus
    pub fn release(self) -> I2C {
        self.i2c
    }
}

/// Convert a high-resolution mode 2 count to lux
pub fn counts_to_lux(raw: u16) -> f32 {
    f32::from(raw) / COUNTS_PER_LUX / 2.0
}

impl<I2C: I2c> LightSensor for Bh1750<I2C> {
    fn probe(&mut self) -> bool {
        self.init().is_ok()
    }

    fn read_lux(&mut self) -> Result<f32, SensorError> {
        if !self.ready {
            return Err(SensorError::NotResponding);
        }
        self.read_raw()
            .map(counts_to_lux)
            .map_err(|_| SensorError::Bus)
    }
}
