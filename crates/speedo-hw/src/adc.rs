//! ADS1015 / ADS1115 single-ended readings over I2C.
//!
//! Each read starts a single-shot conversion at ±4.096 V full scale,
//! polls the OS bit until the conversion completes, then reads the result.

use crate::{Error, Result};
use rppal::i2c::I2c;
use speedo_core::{AdcChip, VoltageReader};
use std::thread;
use std::time::Duration;

pub const DEFAULT_ADDRESS: u16 = 0x48;

const REG_CONVERSION: u8 = 0x00;
const REG_CONFIG: u8 = 0x01;

const OS_SINGLE: u16 = 0x8000;
const MUX_SINGLE_ENDED: u16 = 0x4000;
const PGA_4_096V: u16 = 0x0200;
const MODE_SINGLE_SHOT: u16 = 0x0100;
const COMP_QUEUE_DISABLE: u16 = 0x0003;

const FULL_SCALE_VOLTS: f32 = 4.096;
const MAX_POLLS: u32 = 10;

/// Data-rate bits and the matching conversion time.
fn data_rate(chip: AdcChip) -> (u16, Duration) {
    match chip {
        // 1600 SPS
        AdcChip::Ads1015 => (0x0080, Duration::from_micros(700)),
        // 860 SPS
        AdcChip::Ads1115 => (0x00E0, Duration::from_micros(1200)),
    }
}

/// Config register value starting a conversion on `channel` (AIN0-AIN3 vs GND).
pub fn config_word(chip: AdcChip, channel: u8) -> Result<u16> {
    if channel > 3 {
        return Err(Error::InvalidChannel(channel));
    }
    let (rate, _) = data_rate(chip);
    Ok(OS_SINGLE
        | MUX_SINGLE_ENDED
        | ((channel as u16) << 12)
        | PGA_4_096V
        | MODE_SINGLE_SHOT
        | rate
        | COMP_QUEUE_DISABLE)
}

/// Convert the big-endian conversion register to volts.
pub fn raw_to_volts(chip: AdcChip, raw: [u8; 2]) -> f32 {
    let value = i16::from_be_bytes(raw);
    match chip {
        // 12-bit result, left-justified
        AdcChip::Ads1015 => (value >> 4) as f32 * FULL_SCALE_VOLTS / 2048.0,
        AdcChip::Ads1115 => value as f32 * FULL_SCALE_VOLTS / 32768.0,
    }
}

pub struct Ads1x15 {
    i2c: I2c,
    chip: AdcChip,
    config: u16,
}

impl Ads1x15 {
    pub fn open(chip: AdcChip, address: u16, channel: u8) -> Result<Self> {
        let config = config_word(chip, channel)?;
        let mut i2c = I2c::new()?;
        i2c.set_slave_address(address)?;
        tracing::info!(?chip, address, channel, "ADC opened");

        Ok(Self { i2c, chip, config })
    }

    pub fn chip(&self) -> AdcChip {
        self.chip
    }

    pub fn read_volts(&mut self) -> Result<f32> {
        let [hi, lo] = self.config.to_be_bytes();
        self.i2c.write(&[REG_CONFIG, hi, lo])?;

        let (_, conversion_time) = data_rate(self.chip);
        let mut status = [0u8; 2];
        let mut polls = 0;
        loop {
            thread::sleep(conversion_time);
            self.i2c.write_read(&[REG_CONFIG], &mut status)?;
            if u16::from_be_bytes(status) & OS_SINGLE != 0 {
                break;
            }
            polls += 1;
            if polls >= MAX_POLLS {
                return Err(Error::ConversionTimeout(polls));
            }
        }

        let mut raw = [0u8; 2];
        self.i2c.write_read(&[REG_CONVERSION], &mut raw)?;
        Ok(raw_to_volts(self.chip, raw))
    }
}

impl VoltageReader for Ads1x15 {
    fn read_voltage(&mut self) -> speedo_core::Result<f32> {
        Ok(self.read_volts()?)
    }
}
