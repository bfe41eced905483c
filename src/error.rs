use core::fmt;

use crate::variant::Variant;

/// A request that cannot be encoded for the ADS1x15.
///
/// These are detected before anything is sent to the device, so a request that
/// fails with a `ConfigError` has performed no bus I/O.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The chip name given at construction is not `ads1015` or `ads1115`.
    InvalidVariant,
    /// The sample rate is not one the chip variant supports.
    InvalidSampleRate {
        /// Chip variant whose rate table was consulted.
        variant: Variant,
        /// Requested samples per second.
        sps: u16,
    },
    /// The full-scale range (in millivolts) is not one of the six PGA settings.
    InvalidGain(u16),
    /// Single-ended channel outside `0..=3`.
    InvalidChannel(u8),
    /// The differential pair is not one of (0, 1), (0, 3), (1, 3) or (2, 3).
    InvalidChannelPair {
        /// Requested positive input.
        positive: u8,
        /// Requested negative input.
        negative: u8,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidVariant => f.write_str("invalid chip variant specified"),
            ConfigError::InvalidSampleRate { variant, sps } => {
                write!(f, "invalid sample rate for {variant}: {sps}")
            }
            ConfigError::InvalidGain(mv) => write!(f, "invalid gain specified: {mv}"),
            ConfigError::InvalidChannel(ch) => write!(f, "invalid channel specified: {ch}"),
            ConfigError::InvalidChannelPair { positive, negative } => {
                write!(f, "invalid channels specified: {positive}, {negative}")
            }
        }
    }
}

impl core::error::Error for ConfigError {}

/// Wrapper for problems when taking a reading from the ADS1x15.
///
/// `E` is the error type of the I2C bus the driver was constructed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<E> {
    /// The request was rejected before any bus I/O. See [`ConfigError`].
    Config(ConfigError),
    /// Writing the configuration register failed.
    ///
    /// No delay or read was attempted afterwards.
    BusWrite(E),
    /// Reading back a register failed.
    BusRead(E),
}

impl<E> From<ConfigError> for Error<E> {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => fmt::Display::fmt(e, f),
            Error::BusWrite(e) => write!(f, "I2C write to the ADS1x15 failed: {e:?}"),
            Error::BusRead(e) => write!(f, "I2C read from the ADS1x15 failed: {e:?}"),
        }
    }
}

impl<E: fmt::Debug> core::error::Error for Error<E> {}
