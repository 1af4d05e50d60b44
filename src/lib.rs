#![cfg_attr(not(test), no_std)]

//! ESP32-C3 Ambient Light Night Light Library
//!
//! This library samples an LTR-303 ambient light sensor over I2C, converts the
//! raw channel counts to lux and switches a single WS2812 indicator pixel on
//! when the room gets dark.

pub mod control;
pub mod led_control;
pub mod ltr303;
pub mod lux;
pub mod state_machine;

use embedded_hal::i2c::ErrorKind;

/// Project version information
pub const VERSION: &str = "0.1.0-dev";

/// Default configuration constants
pub mod config {
    use crate::lux::{Gain, IntegrationTime};

    /// 7-bit I2C address of the LTR-303
    pub const SENSOR_I2C_ADDRESS: u8 = 0x29;

    /// I2C bus frequency in kHz
    pub const I2C_FREQUENCY_KHZ: u32 = 100;

    /// I2C SDA GPIO pin
    pub const I2C_SDA_PIN: u8 = 5;

    /// I2C SCL GPIO pin
    pub const I2C_SCL_PIN: u8 = 6;

    /// WS2812 data GPIO pin (on-board pixel of the ESP32-C3 DevKitM)
    pub const LED_DATA_PIN: u8 = 8;

    /// Time between two sensor samples in milliseconds
    pub const SAMPLE_INTERVAL_MS: u32 = 2000;

    /// Wake-up time of the sensor after leaving standby, in milliseconds
    pub const SENSOR_SETTLE_MS: u32 = 10;

    /// At or below this illuminance the indicator is switched on
    pub const LUX_THRESHOLD: f32 = 20.0;

    /// Gain assumed until ALS_CONTR is read back at start-up (power-on default)
    pub const SENSOR_GAIN: Gain = Gain::X1;

    /// Integration time assumed until ALS_MEAS_RATE is read back at start-up
    /// (power-on default)
    pub const SENSOR_INTEGRATION_TIME: IntegrationTime = IntegrationTime::Ms100;
}

/// Error types for the night light board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    /// The register-address or value write was not acknowledged
    I2cWriteError(ErrorKind),
    /// The data phase of a register read failed
    I2cReadError(ErrorKind),
    /// LED transmission error
    LedError,
}
