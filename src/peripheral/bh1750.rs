//! BH1750 ambient light sensor driver

use embedded_hal::{delay::DelayNs, i2c::I2c};
use tracing::debug;

use crate::core::error::SensorError;

/// Default bus address (ADDR pin low)
pub const DEFAULT_ADDRESS: u8 = 0x23;

const POWER_ON: u8 = 0x01;
const RESET: u8 = 0x07;
/// Continuous high resolution mode, 1 lx steps
const CONTINUOUS_HIGH_RES: u8 = 0x10;

const COMMAND_DELAY_MS: u32 = 10;
const FIRST_MEASUREMENT_MS: u32 = 180;

/// Raw counts per lux in high resolution mode
const COUNTS_PER_LUX: f32 = 1.2;

pub struct Bh1750<I: I2c> {
    i2c: I,
    address: u8,
}

impl<I: I2c> Bh1750<I> {
    /// Power the sensor up and start continuous measurement
    pub fn new<D: DelayNs>(i2c: I, address: u8, delay: &mut D) -> Result<Self, SensorError> {
        let mut sensor = Self { i2c, address };

        sensor.command(POWER_ON)?;
        delay.delay_ms(COMMAND_DELAY_MS);
        sensor.command(RESET)?;
        delay.delay_ms(COMMAND_DELAY_MS);
        sensor.command(CONTINUOUS_HIGH_RES)?;
        delay.delay_ms(FIRST_MEASUREMENT_MS);

        debug!("BH1750 at {:#04x} initialised", address);
        Ok(sensor)
    }

    /// Latest illuminance in lux
    pub fn read_lux(&mut self) -> Result<f32, SensorError> {
        Ok(self.read_raw()? as f32 / COUNTS_PER_LUX)
    }

    /// Latest raw 16-bit measurement
    pub fn read_raw(&mut self) -> Result<u16, SensorError> {
        let mut data = [0u8; 2];
        self.i2c
            .read(self.address, &mut data)
            .map_err(|e| SensorError::Bus(format!("{:?}", e)))?;
        Ok(u16::from_be_bytes(data))
    }

    pub fn release(self) -> I {
        self.i2c
    }

    fn command(&mut self, opcode: u8) -> Result<(), SensorError> {
        self.i2c
            .write(self.address, &[opcode])
            .map_err(|e| SensorError::Bus(format!("{:?}", e)))
    }
}
