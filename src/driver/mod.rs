use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::config::{ConfigWord, DifferentialRead, Encoded, Gain, Request, SingleEndedRead};
use crate::constants::{POINTER_CONFIG, POINTER_CONVERSION};
use crate::error::{ConfigError, Error};
use crate::variant::Variant;

#[cfg(feature = "async")]
pub mod asynch;

/// Per-device conversion state, shared by the blocking and async drivers.
#[derive(Debug, Clone, Copy)]
struct Session {
    address: u8,
    variant: Variant,
    /// Range the most recently started conversion was configured with.
    ///
    /// Only written once a request has passed validation, so a rejected request
    /// leaves the scaling of the previous result intact.
    active_gain: Gain,
}

impl Session {
    fn new(address: u8, variant: Variant) -> Self {
        Self {
            address,
            variant,
            active_gain: Gain::default(),
        }
    }

    /// Validate `request` and make its range the active gain.
    fn begin(&mut self, request: Request) -> Result<Encoded, ConfigError> {
        let encoded = request.encode(self.variant)?;
        self.active_gain = encoded.gain;
        log::debug!(
            "{} @ {:#04x}: config {:#06x}, settle {}us",
            self.variant,
            self.address,
            encoded.word.bits(),
            encoded.sample_rate.settle_time_us()
        );
        Ok(encoded)
    }

    /// Scale conversion register bytes by the active gain.
    fn finish(&self, raw: [u8; 2]) -> f32 {
        let mv = self.variant.millivolts(raw, self.active_gain);
        log::trace!(
            "{} @ {:#04x}: conversion {:02x?} = {}mV",
            self.variant,
            self.address,
            raw,
            mv
        );
        mv
    }
}

/// Driver for the ADS1015 and ADS1115.
///
/// # Quick start
///
/// Create the driver with an [`I2c`] bus, a [`DelayNs`] provider, the device's
/// 7-bit address and the chip [`Variant`]. Then take readings in millivolts with
/// [`Ads1x15::read_single_ended`] or [`Ads1x15::read_differential`].
///
/// Every reading is a single-shot conversion: the configuration register is
/// written with the start bit set, the driver waits for one sample period (plus
/// [`SETTLE_EPSILON_US`]) using the delay provider, and the conversion register
/// is then read back.
///
/// [`SETTLE_EPSILON_US`]: crate::SETTLE_EPSILON_US
///
/// # Active gain
///
/// The driver remembers the range of the last conversion it started, so that
/// [`Ads1x15::read_last_conversion`] can scale the result correctly. Requests
/// that are rejected before reaching the bus do not change it.
#[derive(Debug)]
pub struct Ads1x15<I2C, D> {
    i2c: I2C,
    delay: D,
    session: Session,
}

impl<I2C, D> Ads1x15<I2C, D> {
    /// Create a driver for the `variant` chip at I2C `address`.
    ///
    /// Nothing is sent to the device until the first reading.
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
    ///
    /// This is [`Gain::Fsr6144`] (the power-on default) until a reading is taken.
    pub fn active_gain(&self) -> Gain {
        self.session.active_gain
    }

    /// Destroy the driver and return the bus and delay provider.
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }
}

impl<I2C: I2c, D: DelayNs> Ads1x15<I2C, D> {
    /// Take a single-ended reading of `channel` (`0..=3`) in millivolts.
    ///
    /// `gain` is the full-scale range in millivolts, one of 6144, 4096, 2048,
    /// 1024, 512 or 256. `sample_rate` must be supported by the chip variant.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] without any bus I/O if an argument is invalid. Otherwise
    /// [`Error::BusWrite`] or [`Error::BusRead`] if the transfer fails.
    pub fn read_single_ended(
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
    }

    /// Take a differential reading of `positive` against `negative` in millivolts.
    ///
    /// The pair must be one of (0, 1), (0, 3), (1, 3) or (2, 3). See
    /// [`Ads1x15::read_single_ended`] for `gain` and `sample_rate`.
    ///
    /// # Errors
    ///
    /// As for [`Ads1x15::read_single_ended`].
    pub fn read_differential(
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
    }

    /// Perform a single-shot conversion described by `request`.
    ///
    /// This accepts [`SingleEndedRead`] and [`DifferentialRead`], so unset options
    /// take their defaults.
    ///
    /// ```
    /// # use ads1x15::{Ads1x15, SingleEndedRead};
    /// # fn reading<I2C: embedded_hal::i2c::I2c, D: embedded_hal::delay::DelayNs>(
    /// #     adc: &mut Ads1x15<I2C, D>,
    /// # ) -> Result<f32, ads1x15::Error<I2C::Error>> {
    /// adc.read(SingleEndedRead::new(3).with_gain(2048))
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// As for [`Ads1x15::read_single_ended`].
    pub fn read(&mut self, request: impl Into<Request>) -> Result<f32, Error<I2C::Error>> {
        let encoded = self.session.begin(request.into())?;

        let address = self.session.address;
        self.i2c
            .write(address, &encoded.word.to_bytes())
            .map_err(|e| {
                log::warn!("config write to {address:#04x} failed: {e:?}");
                Error::BusWrite(e)
            })?;

        self.delay.delay_us(encoded.sample_rate.settle_time_us());

        let raw = self.read_register(POINTER_CONVERSION)?;
        Ok(self.session.finish(raw))
    }

    /// Read the conversion register again, scaled by the active gain.
    ///
    /// In single-shot mode the register holds the result of the last conversion
    /// until another is started.
    ///
    /// # Errors
    ///
    /// [`Error::BusRead`] if the transfer fails.
    pub fn read_last_conversion(&mut self) -> Result<f32, Error<I2C::Error>> {
        let raw = self.read_register(POINTER_CONVERSION)?;
        Ok(self.session.finish(raw))
    }

    /// Check whether the device is still performing a conversion.
    ///
    /// This reads back the configuration register and inspects the OS bit.
    ///
    /// # Errors
    ///
    /// [`Error::BusRead`] if the transfer fails.
    pub fn conversion_pending(&mut self) -> Result<bool, Error<I2C::Error>> {
        let raw = self.read_register(POINTER_CONFIG)?;
        let word = ConfigWord::from_bits(u16::from_be_bytes(raw));
        Ok(!word.operational_status())
    }

    /// Select the register at `pointer` and read its two bytes.
    fn read_register(&mut self, pointer: u8) -> Result<[u8; 2], Error<I2C::Error>> {
        let address = self.session.address;
        let mut buf = [0u8; 2];
        self.i2c
            .write_read(address, &[pointer], &mut buf)
            .map_err(|e| {
                log::warn!("register {pointer} read from {address:#04x} failed: {e:?}");
                Error::BusRead(e)
            })?;
        Ok(buf)
    }
}
