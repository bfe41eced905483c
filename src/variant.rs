//! The two supported chips and how their conversion results are read.
use core::fmt;
use core::str::FromStr;

use crate::config::{Gain, SampleRate};
use crate::error::ConfigError;

/// ADS1115 sample rates and their DR field codes.
const ADS1115_RATES: &[(u16, u8)] = &[
    (8, 0b000),
    (16, 0b001),
    (32, 0b010),
    (64, 0b011),
    (128, 0b100),
    (250, 0b101),
    (475, 0b110),
    (860, 0b111),
];

/// ADS1015 sample rates and their DR field codes.
///
/// Code 0b111 also selects 3300 SPS on the ADS1015; only 0b110 is ever written.
const ADS1015_RATES: &[(u16, u8)] = &[
    (128, 0b000),
    (250, 0b001),
    (490, 0b010),
    (920, 0b011),
    (1600, 0b100),
    (2400, 0b101),
    (3300, 0b110),
];

// Both chips default to 250 SPS.
const ADS1115_DEFAULT_RATE: usize = 5;
const ADS1015_DEFAULT_RATE: usize = 1;

/// Chip in the ADS1x15 family.
///
/// The variants share a register map and configuration word, but differ in the
/// sample rates they offer and in the resolution of the conversion register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    /// 12-bit ADS1015, 128 to 3300 samples per second.
    #[default]
    Ads1015,
    /// 16-bit ADS1115, 8 to 860 samples per second.
    Ads1115,
}

impl Variant {
    /// Number of significant bits in a conversion result.
    pub fn resolution_bits(&self) -> u8 {
        match self {
            Variant::Ads1015 => 12,
            Variant::Ads1115 => 16,
        }
    }

    /// Sample rate used when a request does not give one.
    pub fn default_sample_rate(&self) -> SampleRate {
        let (sps, code) = match self {
            Variant::Ads1015 => ADS1015_RATES[ADS1015_DEFAULT_RATE],
            Variant::Ads1115 => ADS1115_RATES[ADS1115_DEFAULT_RATE],
        };
        SampleRate::new(sps, code)
    }

    /// Look up the given samples-per-second in this chip's rate table.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidSampleRate`] if the chip has no such rate.
    pub fn sample_rate(&self, sps: u16) -> Result<SampleRate, ConfigError> {
        self.rate_table()
            .iter()
            .find(|&&(rate, _)| rate == sps)
            .map(|&(rate, code)| SampleRate::new(rate, code))
            .ok_or(ConfigError::InvalidSampleRate { variant: *self, sps })
    }

    /// All the sample rates this chip supports, slowest first.
    pub fn sample_rates(&self) -> impl Iterator<Item = SampleRate> {
        self.rate_table()
            .iter()
            .map(|&(rate, code)| SampleRate::new(rate, code))
    }

    /// Signed conversion code contained in the raw conversion register bytes.
    ///
    /// The ADS1015 left-justifies its 12-bit result, so the register is shifted
    /// right by four bits (sign-preserving).
    pub fn raw_value(&self, raw: [u8; 2]) -> i16 {
        let register = i16::from_be_bytes(raw);
        match self {
            Variant::Ads1015 => register >> 4,
            Variant::Ads1115 => register,
        }
    }

    /// Convert raw conversion register bytes into millivolts.
    ///
    /// `gain` must be the full-scale range that was configured for the
    /// conversion that produced `raw`.
    pub fn millivolts(&self, raw: [u8; 2], gain: Gain) -> f32 {
        f32::from(self.raw_value(raw)) * f32::from(gain.millivolts()) / self.full_scale_code()
    }

    /// Code corresponding to a positive full-scale input.
    fn full_scale_code(&self) -> f32 {
        match self {
            Variant::Ads1015 => 2048.0,
            Variant::Ads1115 => 32768.0,
        }
    }

    fn rate_table(&self) -> &'static [(u16, u8)] {
        match self {
            Variant::Ads1015 => ADS1015_RATES,
            Variant::Ads1115 => ADS1115_RATES,
        }
    }
}

impl FromStr for Variant {
    type Err = ConfigError;

    /// Parse a chip name, `"ads1015"` or `"ads1115"`, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("ads1015") {
            Ok(Variant::Ads1015)
        } else if s.eq_ignore_ascii_case("ads1115") {
            Ok(Variant::Ads1115)
        } else {
            Err(ConfigError::InvalidVariant)
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Ads1015 => f.write_str("ADS1015"),
            Variant::Ads1115 => f.write_str("ADS1115"),
        }
    }
}
