//! LTR-303ALS register access over I2C
//!
//! Every access addresses a single 8-bit register. A read is a write of the
//! register address followed by a separate one-byte read; a write sends the
//! address and value in one transaction.

use crate::BoardError;
use embedded_hal::i2c::{Error as _, I2c};
use log::{debug, info, warn};

/// Registers of the LTR-303 used by this board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Register {
    /// ALS_CONTR: gain, software reset and active mode
    AlsControl = 0x80,
    /// ALS_MEAS_RATE: integration time and repeat rate
    AlsMeasRate = 0x85,
    PartId = 0x86,
    ManufacturerId = 0x87,
    /// ALS_DATA_CH1_0
    Ch1Low = 0x88,
    /// ALS_DATA_CH1_1
    Ch1High = 0x89,
    /// ALS_DATA_CH0_0
    Ch0Low = 0x8A,
    /// ALS_DATA_CH0_1
    Ch0High = 0x8B,
    /// ALS_STATUS
    AlsStatus = 0x8C,
}

/// How a register may be accessed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterAccess {
    /// Control registers
    ReadWrite,
    /// Measurement data and status
    ReadOnly,
    /// Part and manufacturer identification
    Identification,
}

impl Register {
    pub fn address(self) -> u8 {
        self as u8
    }

    pub fn access(self) -> RegisterAccess {
        match self {
            Register::AlsControl | Register::AlsMeasRate => RegisterAccess::ReadWrite,
            Register::PartId | Register::ManufacturerId => RegisterAccess::Identification,
            Register::Ch1Low
            | Register::Ch1High
            | Register::Ch0Low
            | Register::Ch0High
            | Register::AlsStatus => RegisterAccess::ReadOnly,
        }
    }
}

/// ALS_CONTR bit 0: active mode
pub const ALS_MODE_ACTIVE: u8 = 0x01;

/// Content of the ALS_STATUS register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AlsStatus(pub u8);

impl AlsStatus {
    const DATA_READY: u8 = 0x04;
    const DATA_INVALID: u8 = 0x80;

    /// A new measurement is waiting in the data registers
    pub fn data_ready(self) -> bool {
        self.0 & Self::DATA_READY != 0
    }

    pub fn data_invalid(self) -> bool {
        self.0 & Self::DATA_INVALID != 0
    }
}

/// Raw counts of one measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChannelReading {
    /// Visible + infrared
    pub ch0: u16,
    /// Infrared
    pub ch1: u16,
}

impl ChannelReading {
    /// Assemble a reading from the four data register bytes in bus order
    /// (CH1 low, CH1 high, CH0 low, CH0 high)
    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Self {
            ch1: (bytes[1] as u16) << 8 | bytes[0] as u16,
            ch0: (bytes[3] as u16) << 8 | bytes[2] as u16,
        }
    }
}

/// Data registers in the order the sensor requires them to be read
pub const DATA_REGISTERS: [Register; 4] = [
    Register::Ch1Low,
    Register::Ch1High,
    Register::Ch0Low,
    Register::Ch0High,
];

/// Register client for one LTR-303 on an exclusively owned bus
pub struct Ltr303<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> Ltr303<I2C>
where
    I2C: I2c,
{
    /// Create a client for the sensor at `address`
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Give the bus back
    pub fn release(self) -> I2C {
        self.i2c
    }

    /// Read one register
    ///
    /// The data phase is only issued once the address write was acknowledged.
    pub fn read_register(&mut self, register: Register) -> Result<u8, BoardError> {
        self.i2c
            .write(self.address, &[register.address()])
            .map_err(|e| BoardError::I2cWriteError(e.kind()))?;

        let mut buf = [0u8; 1];
        self.i2c
            .read(self.address, &mut buf)
            .map_err(|e| BoardError::I2cReadError(e.kind()))?;

        Ok(buf[0])
    }

    /// Write one register
    pub fn write_register(&mut self, register: Register, value: u8) -> Result<(), BoardError> {
        debug_assert_eq!(
            register.access(),
            RegisterAccess::ReadWrite,
            "{:?} is not writable",
            register
        );
        self.i2c
            .write(self.address, &[register.address(), value])
            .map_err(|e| BoardError::I2cWriteError(e.kind()))
    }

    pub fn part_id(&mut self) -> Result<u8, BoardError> {
        self.read_register(Register::PartId)
    }

    pub fn manufacturer_id(&mut self) -> Result<u8, BoardError> {
        self.read_register(Register::ManufacturerId)
    }

    pub fn control(&mut self) -> Result<u8, BoardError> {
        self.read_register(Register::AlsControl)
    }

    pub fn meas_rate(&mut self) -> Result<u8, BoardError> {
        self.read_register(Register::AlsMeasRate)
    }

    pub fn status(&mut self) -> Result<AlsStatus, BoardError> {
        self.read_register(Register::AlsStatus).map(AlsStatus)
    }

    /// Move the sensor from standby to active mode, keeping the other control bits
    ///
    /// A failed read of ALS_CONTR is tolerated and the active bit is set on top
    /// of 0x00, the register's power-on value. Only the write is reported.
    pub fn activate(&mut self) -> Result<u8, BoardError> {
        let control = self.control().unwrap_or_else(|e| {
            warn!("[ALS] Failed to read ALS_CONTR: {:?}", e);
            0
        }) | ALS_MODE_ACTIVE;
        self.write_register(Register::AlsControl, control)?;
        info!("[ALS] Active mode enabled (ALS_CONTR=0x{:02X})", control);
        Ok(control)
    }

    /// Read all four data registers, CH1 first
    ///
    /// A register that cannot be read contributes a zero byte; the remaining
    /// registers are still read.
    pub fn read_channels(&mut self) -> ChannelReading {
        let mut bytes = [0u8; 4];
        for (byte, register) in bytes.iter_mut().zip(DATA_REGISTERS) {
            match self.read_register(register) {
                Ok(value) => *byte = value,
                Err(e) => warn!("[ALS] Failed to read {:?}: {:?}", register, e),
            }
        }
        let reading = ChannelReading::from_bytes(bytes);
        debug!("[ALS] ch0={} ch1={}", reading.ch0, reading.ch1);
        reading
    }
}
