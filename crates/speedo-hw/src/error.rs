//! Error types for speedo-hw.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("GPIO: {0}")]
    Gpio(#[from] rppal::gpio::Error),

    #[error("I2C: {0}")]
    I2c(#[from] rppal::i2c::Error),

    #[error("Invalid ADC channel {0} (0-3)")]
    InvalidChannel(u8),

    #[error("ADC conversion did not complete after {0} polls")]
    ConversionTimeout(u32),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<Error> for speedo_core::Error {
    fn from(e: Error) -> Self {
        speedo_core::Error::Sensor(e.to_string())
    }
}
