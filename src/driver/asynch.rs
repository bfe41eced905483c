//! Async driver over the `embedded-hal-async` traits.
//!
//! The wait between starting a conversion and reading its result is an awaited
//! [`DelayNs`] call, so the executor is free to run other tasks meanwhile.
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

use super::Session;
use crate::config::{ConfigWord, DifferentialRead, Gain, Request, SingleEndedRead};
use crate::constants::{POINTER_CONFIG, POINTER_CONVERSION};
use crate::error::{ConfigError, Error};
use crate::variant::Variant;

/// Async driver for the ADS1015 and ADS1115.
///
/// This has the same methods as the blocking [`crate::Ads1x15`]. Requests on
/// one driver are serialised by the `&mut self` receivers.
#[derive(Debug)]
pub struct Ads1x15<I2C, D> {
    i2c: I2C,
    delay: D,
    session: Session,
}

impl<I2C, D> Ads1x15<I2C, D> {
    /// Create a driver for the `variant` chip at I2C `address`.
    pub fn new(i2c: I2C, delay: D, address: u8, variant: Variant) -> Self {
        Self {
            i2c,
            delay,
            session: Session::new(address, variant),
        }
    }

    /// Create a driver, selecting the chip by name (`"ads1015"` or `"ads1115"`).
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidVariant`] if the name is not recognised.
    pub fn with_variant_name(
        i2c: I2C,
        delay: D,
        address: u8,
        name: &str,
    ) -> Result<Self, ConfigError> {
        let variant = name.parse()?;
        Ok(Self::new(i2c, delay, address, variant))
    }

    /// Chip variant selected at construction.
    pub fn variant(&self) -> Variant {
        self.session.variant
    }

    /// 7-bit I2C address of the device.
    pub fn address(&self) -> u8 {
        self.session.address
    }

    /// Range of the most recently started conversion.
    pub fn active_gain(&self) -> Gain {
        self.session.active_gain
    }

    /// Destroy the driver and return the bus and delay provider.
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }
}

impl<I2C: I2c, D: DelayNs> Ads1x15<I2C, D> {
    /// Take a single-ended reading of `channel` in millivolts.
    pub async fn read_single_ended(
        &mut self,
        channel: u8,
        gain: u16,
        sample_rate: u16,
    ) -> Result<f32, Error<I2C::Error>> {
        self.read(SingleEndedRead {
            channel,
            gain,
            sample_rate: Some(sample_rate),
        })
        .await
    }

    /// Take a differential reading of `positive` against `negative` in millivolts.
    pub async fn read_differential(
        &mut self,
        positive: u8,
        negative: u8,
        gain: u16,
        sample_rate: u16,
    ) -> Result<f32, Error<I2C::Error>> {
        self.read(DifferentialRead {
            positive,
            negative,
            gain,
            sample_rate: Some(sample_rate),
        })
        .await
    }

    /// Perform a single-shot conversion described by `request`.
    pub async fn read(&mut self, request: impl Into<Request>) -> Result<f32, Error<I2C::Error>> {
        let encoded = self.session.begin(request.into())?;

        let address = self.session.address;
        self.i2c
            .write(address, &encoded.word.to_bytes())
            .await
            .map_err(|e| {
                log::warn!("config write to {address:#04x} failed: {e:?}");
                Error::BusWrite(e)
            })?;

        self.delay
            .delay_us(encoded.sample_rate.settle_time_us())
            .await;

        let raw = self.read_register(POINTER_CONVERSION).await?;
        Ok(self.session.finish(raw))
    }

    /// Read the conversion register again, scaled by the active gain.
    pub async fn read_last_conversion(&mut self) -> Result<f32, Error<I2C::Error>> {
        let raw = self.read_register(POINTER_CONVERSION).await?;
        Ok(self.session.finish(raw))
    }

    /// Check whether the device is still performing a conversion.
    pub async fn conversion_pending(&mut self) -> Result<bool, Error<I2C::Error>> {
        let raw = self.read_register(POINTER_CONFIG).await?;
        let word = ConfigWord::from_bits(u16::from_be_bytes(raw));
        Ok(!word.operational_status())
    }

    async fn read_register(&mut self, pointer: u8) -> Result<[u8; 2], Error<I2C::Error>> {
        let address = self.session.address;
        let mut buf = [0u8; 2];
        self.i2c
            .write_read(address, &[pointer], &mut buf)
            .await
            .map_err(|e| {
                log::warn!("register {pointer} read from {address:#04x} failed: {e:?}");
                Error::BusRead(e)
            })?;
        Ok(buf)
    }
}
