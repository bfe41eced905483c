//! Encoding of measurement requests into the ADS1x15 configuration register.
//!
//! A request names an input (a single channel or a differential pair), a
//! full-scale range and a sample rate. Each is looked up in a fixed table and
//! rejected if it is not there; only then are the field codes packed into the
//! 16-bit [`ConfigWord`] alongside the fixed single-shot defaults.
use core::time::Duration;

use bit_field::BitField;

use crate::constants::{
    COMP_LAT_BIT, COMP_MODE_BIT, COMP_POL_BIT, COMP_QUE_BITS, COMP_QUE_DISABLE, DR_BITS,
    MICROS_PER_SECOND, MODE_BIT, MUX_BITS, OS_BIT, PGA_BITS, POINTER_CONFIG, SETTLE_EPSILON_US,
};
use crate::error::ConfigError;
use crate::variant::Variant;

/// Full-scale range of the programmable gain amplifier.
///
/// The variant names give the range in millivolts, so `Fsr4096` measures
/// ±4.096V. Note that an input may never exceed VDD + 0.3V regardless of the
/// range selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gain {
    /// ±6.144V
    #[default]
    Fsr6144,
    /// ±4.096V
    Fsr4096,
    /// ±2.048V
    Fsr2048,
    /// ±1.024V
    Fsr1024,
    /// ±0.512V
    Fsr512,
    /// ±0.256V
    Fsr256,
}

impl Gain {
    /// Full-scale range in millivolts.
    pub fn millivolts(&self) -> u16 {
        match self {
            Gain::Fsr6144 => 6144,
            Gain::Fsr4096 => 4096,
            Gain::Fsr2048 => 2048,
            Gain::Fsr1024 => 1024,
            Gain::Fsr512 => 512,
            Gain::Fsr256 => 256,
        }
    }

    /// PGA field code.
    pub fn code(&self) -> u8 {
        match self {
            Gain::Fsr6144 => 0b000,
            Gain::Fsr4096 => 0b001,
            Gain::Fsr2048 => 0b010,
            Gain::Fsr1024 => 0b011,
            Gain::Fsr512 => 0b100,
            Gain::Fsr256 => 0b101,
        }
    }

    /// Iterate over all six ranges, widest first.
    pub fn all() -> impl Iterator<Item = Self> {
        [
            Self::Fsr6144,
            Self::Fsr4096,
            Self::Fsr2048,
            Self::Fsr1024,
            Self::Fsr512,
            Self::Fsr256,
        ]
        .into_iter()
    }
}

impl TryFrom<u16> for Gain {
    type Error = ConfigError;

    /// Select the range whose full scale is `millivolts`.
    fn try_from(millivolts: u16) -> Result<Self, Self::Error> {
        Gain::all()
            .find(|g| g.millivolts() == millivolts)
            .ok_or(ConfigError::InvalidGain(millivolts))
    }
}

/// A sample rate supported by a particular chip.
///
/// Obtained from [`Variant::sample_rate`], so the DR code always matches the
/// chip the rate was looked up for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleRate {
    sps: u16,
    code: u8,
}

impl SampleRate {
    pub(crate) fn new(sps: u16, code: u8) -> Self {
        Self { sps, code }
    }

    /// Samples per second.
    pub fn sps(&self) -> u16 {
        self.sps
    }

    /// DR field code.
    pub fn code(&self) -> u8 {
        self.code
    }

    /// Minimum wait, in microseconds, between starting a single-shot conversion
    /// and reading its result.
    ///
    /// One sample period rounded up, plus [`SETTLE_EPSILON_US`].
    pub fn settle_time_us(&self) -> u32 {
        MICROS_PER_SECOND.div_ceil(u32::from(self.sps)) + SETTLE_EPSILON_US
    }

    /// [`SampleRate::settle_time_us`] as a [`Duration`].
    pub fn settle_time(&self) -> Duration {
        Duration::from_micros(u64::from(self.settle_time_us()))
    }
}

/// Input multiplexer selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelSelector {
    /// AINx measured against GND, x in `0..=3`.
    SingleEnded(u8),
    /// AINp measured against AINn.
    ///
    /// Only the pairs (0, 1), (0, 3), (1, 3) and (2, 3) are wired in the mux, and
    /// the positive input must come first.
    Differential {
        /// Positive input.
        positive: u8,
        /// Negative input.
        negative: u8,
    },
}

impl ChannelSelector {
    /// MUX field code for this selection.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidChannel`] or [`ConfigError::InvalidChannelPair`] if
    /// the mux has no such input.
    pub fn mux_code(&self) -> Result<u8, ConfigError> {
        match *self {
            ChannelSelector::SingleEnded(channel @ 0..=3) => Ok(0b100 | channel),
            ChannelSelector::SingleEnded(channel) => Err(ConfigError::InvalidChannel(channel)),
            ChannelSelector::Differential { positive, negative } => match (positive, negative) {
                (0, 1) => Ok(0b000),
                (0, 3) => Ok(0b001),
                (1, 3) => Ok(0b010),
                (2, 3) => Ok(0b011),
                _ => Err(ConfigError::InvalidChannelPair { positive, negative }),
            },
        }
    }
}

impl Default for ChannelSelector {
    fn default() -> Self {
        Self::SingleEnded(0)
    }
}

/// Value of the 16-bit configuration register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigWord(u16);

impl ConfigWord {
    /// Comparator disabled, non-latching, active-low, traditional, single-shot.
    ///
    /// Input, range and rate fields are all zero, as is the start bit.
    pub fn defaults() -> Self {
        let mut word = 0u16;
        word.set_bits(COMP_QUE_BITS, COMP_QUE_DISABLE);
        word.set_bit(COMP_LAT_BIT, false);
        word.set_bit(COMP_POL_BIT, false);
        word.set_bit(COMP_MODE_BIT, false);
        word.set_bit(MODE_BIT, true);
        Self(word)
    }

    /// Compose a single-shot conversion request.
    ///
    /// `gain` and `rate` are already table entries; the input is checked here.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidChannel`] or [`ConfigError::InvalidChannelPair`] if
    /// the mux has no such input.
    pub fn single_shot(
        selector: ChannelSelector,
        gain: Gain,
        rate: SampleRate,
    ) -> Result<Self, ConfigError> {
        let mux_code = selector.mux_code()?;
        let mut word = Self::defaults().0;
        word.set_bits(MUX_BITS, u16::from(mux_code));
        word.set_bits(PGA_BITS, u16::from(gain.code()));
        word.set_bits(DR_BITS, u16::from(rate.code()));
        word.set_bit(OS_BIT, true);
        Ok(Self(word))
    }

    /// Wrap a value read back from the configuration register.
    pub fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    /// Raw register value.
    pub fn bits(&self) -> u16 {
        self.0
    }

    /// MUX field code.
    pub fn mux_code(&self) -> u8 {
        self.0.get_bits(MUX_BITS) as u8
    }

    /// PGA field code.
    pub fn gain_code(&self) -> u8 {
        self.0.get_bits(PGA_BITS) as u8
    }

    /// DR field code.
    pub fn rate_code(&self) -> u8 {
        self.0.get_bits(DR_BITS) as u8
    }

    /// State of the OS bit.
    ///
    /// When written, `true` starts a single-shot conversion. When read back,
    /// `false` means a conversion is in progress.
    pub fn operational_status(&self) -> bool {
        self.0.get_bit(OS_BIT)
    }

    /// Bytes to write to the device: the config pointer, then the word MSB first.
    pub fn to_bytes(&self) -> [u8; 3] {
        let [hi, lo] = self.0.to_be_bytes();
        [POINTER_CONFIG, hi, lo]
    }
}

impl From<ConfigWord> for u16 {
    fn from(value: ConfigWord) -> Self {
        value.0
    }
}

/// A single-shot conversion request, before validation.
///
/// Gain is in millivolts of full-scale range. A `sample_rate` of `None` selects
/// the chip's default rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request {
    /// Input to convert.
    pub selector: ChannelSelector,
    /// Full-scale range in millivolts.
    pub gain: u16,
    /// Samples per second.
    pub sample_rate: Option<u16>,
}

/// A request that passed validation for a particular chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Encoded {
    /// Configuration word to write.
    pub word: ConfigWord,
    /// Range the result must be scaled by.
    pub gain: Gain,
    /// Rate the conversion runs at.
    pub sample_rate: SampleRate,
}

impl Request {
    /// Validate every field against `variant`'s tables and build the word.
    ///
    /// # Errors
    ///
    /// The first field found not to be in its table, checked in the order input,
    /// gain, sample rate.
    pub fn encode(&self, variant: Variant) -> Result<Encoded, ConfigError> {
        // Input first, so it is the error reported when several fields are bad.
        self.selector.mux_code()?;
        let gain = Gain::try_from(self.gain)?;
        let sample_rate = match self.sample_rate {
            Some(sps) => variant.sample_rate(sps)?,
            None => variant.default_sample_rate(),
        };
        Ok(Encoded {
            word: ConfigWord::single_shot(self.selector, gain, sample_rate)?,
            gain,
            sample_rate,
        })
    }
}

impl Default for Request {
    fn default() -> Self {
        SingleEndedRead::default().into()
    }
}

/// Options for a single-ended reading.
///
/// ```
/// use ads1x15::SingleEndedRead;
///
/// let request = SingleEndedRead::new(2).with_gain(4096).with_sample_rate(128);
/// assert_eq!(request.channel, 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SingleEndedRead {
    /// Channel in `0..=3`. Defaults to 0.
    pub channel: u8,
    /// Full-scale range in millivolts. Defaults to 6144.
    pub gain: u16,
    /// Samples per second. Defaults to the chip's default rate.
    pub sample_rate: Option<u16>,
}

impl SingleEndedRead {
    /// Read `channel` with the default range and rate.
    pub fn new(channel: u8) -> Self {
        Self {
            channel,
            ..Default::default()
        }
    }

    /// Use the full-scale range of `millivolts`.
    pub fn with_gain(mut self, millivolts: u16) -> Self {
        self.gain = millivolts;
        self
    }

    /// Convert at `sps` samples per second.
    pub fn with_sample_rate(mut self, sps: u16) -> Self {
        self.sample_rate = Some(sps);
        self
    }
}

impl Default for SingleEndedRead {
    fn default() -> Self {
        Self {
            channel: 0,
            gain: Gain::default().millivolts(),
            sample_rate: None,
        }
    }
}

impl From<SingleEndedRead> for Request {
    fn from(value: SingleEndedRead) -> Self {
        Self {
            selector: ChannelSelector::SingleEnded(value.channel),
            gain: value.gain,
            sample_rate: value.sample_rate,
        }
    }
}

/// Options for a differential reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifferentialRead {
    /// Positive input. Defaults to 0.
    pub positive: u8,
    /// Negative input. Defaults to 1.
    pub negative: u8,
    /// Full-scale range in millivolts. Defaults to 6144.
    pub gain: u16,
    /// Samples per second. Defaults to the chip's default rate.
    pub sample_rate: Option<u16>,
}

impl DifferentialRead {
    /// Read AIN`positive` against AIN`negative` with the default range and rate.
    pub fn new(positive: u8, negative: u8) -> Self {
        Self {
            positive,
            negative,
            ..Default::default()
        }
    }

    /// Use the full-scale range of `millivolts`.
    pub fn with_gain(mut self, millivolts: u16) -> Self {
        self.gain = millivolts;
        self
    }

    /// Convert at `sps` samples per second.
    pub fn with_sample_rate(mut self, sps: u16) -> Self {
        self.sample_rate = Some(sps);
        self
    }
}

impl Default for DifferentialRead {
    fn default() -> Self {
        Self {
            positive: 0,
            negative: 1,
            gain: Gain::default().millivolts(),
            sample_rate: None,
        }
    }
}

impl From<DifferentialRead> for Request {
    fn from(value: DifferentialRead) -> Self {
        Self {
            selector: ChannelSelector::Differential {
                positive: value.positive,
                negative: value.negative,
            },
            gain: value.gain,
            sample_rate: value.sample_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Register constants as given in the datasheet, pre-shifted.
    const OS_SINGLE: u16 = 0x8000;
    const MODE_SINGLE: u16 = 0x0100;
    const CQUE_NONE: u16 = 0x0003;
    const SINGLE_ENDED: [u16; 4] = [0x4000, 0x5000, 0x6000, 0x7000];
    const PGA: [(u16, u16); 6] = [
        (6144, 0x0000),
        (4096, 0x0200),
        (2048, 0x0400),
        (1024, 0x0600),
        (512, 0x0800),
        (256, 0x0A00),
    ];

    #[test]
    fn default_word() {
        assert_eq!(ConfigWord::defaults().bits(), CQUE_NONE | MODE_SINGLE);
    }

    #[test]
    fn every_valid_single_ended_request() {
        for variant in [Variant::Ads1015, Variant::Ads1115] {
            for (channel, channel_bits) in SINGLE_ENDED.iter().enumerate() {
                for &(mv, gain_bits) in PGA.iter() {
                    for rate in variant.sample_rates() {
                        let request: Request = SingleEndedRead::new(channel as u8)
                            .with_gain(mv)
                            .with_sample_rate(rate.sps())
                            .into();
                        let encoded = request.encode(variant).unwrap();
                        let rate_bits = u16::from(rate.code()) << 5;
                        assert_eq!(
                            encoded.word.bits(),
                            CQUE_NONE | MODE_SINGLE | channel_bits | gain_bits | rate_bits | OS_SINGLE,
                            "{variant} channel {channel}, {mv}mV, {} SPS",
                            rate.sps()
                        );
                        assert_eq!(encoded.gain.millivolts(), mv);
                        assert_eq!(encoded.sample_rate, rate);
                    }
                }
            }
        }
    }

    #[test]
    fn differential_pairs() {
        let pairs = [((0, 1), 0x0000), ((0, 3), 0x1000), ((1, 3), 0x2000), ((2, 3), 0x3000)];
        for ((positive, negative), mux_bits) in pairs {
            let request: Request = DifferentialRead::new(positive, negative).into();
            let word = request.encode(Variant::Ads1115).unwrap().word;
            // Default range (0x0000) and the ADS1115's 250 SPS (0x00A0).
            assert_eq!(word.bits(), CQUE_NONE | MODE_SINGLE | mux_bits | 0x00A0 | OS_SINGLE);
        }
    }

    #[test]
    fn unlisted_pairs_are_rejected() {
        for (positive, negative) in [(1, 0), (2, 1), (3, 0), (0, 2), (1, 2), (0, 0), (3, 3), (0, 4)] {
            assert_eq!(
                ChannelSelector::Differential { positive, negative }.mux_code(),
                Err(ConfigError::InvalidChannelPair { positive, negative })
            );
        }
    }

    #[test]
    fn out_of_range_channel() {
        assert_eq!(
            ChannelSelector::SingleEnded(4).mux_code(),
            Err(ConfigError::InvalidChannel(4))
        );
    }

    #[test]
    fn invalid_gain() {
        assert_eq!(Gain::try_from(5000u16), Err(ConfigError::InvalidGain(5000)));
        assert_eq!(Gain::try_from(0u16), Err(ConfigError::InvalidGain(0)));
        let request: Request = SingleEndedRead::new(0).with_gain(100).into();
        assert_eq!(request.encode(Variant::Ads1115), Err(ConfigError::InvalidGain(100)));
    }

    #[test]
    fn invalid_rate_depends_on_variant() {
        let request: Request = SingleEndedRead::new(0).with_sample_rate(860).into();
        assert!(request.encode(Variant::Ads1115).is_ok());
        assert_eq!(
            request.encode(Variant::Ads1015),
            Err(ConfigError::InvalidSampleRate {
                variant: Variant::Ads1015,
                sps: 860
            })
        );
    }

    #[test]
    fn single_shot_rejects_unknown_inputs() {
        let rate = Variant::Ads1115.sample_rate(128).unwrap();
        for channel in [4, 8, u8::MAX] {
            assert_eq!(
                ConfigWord::single_shot(ChannelSelector::SingleEnded(channel), Gain::Fsr4096, rate),
                Err(ConfigError::InvalidChannel(channel))
            );
        }
        let pair = ChannelSelector::Differential {
            positive: 3,
            negative: 2,
        };
        assert_eq!(
            ConfigWord::single_shot(pair, Gain::Fsr4096, rate),
            Err(ConfigError::InvalidChannelPair {
                positive: 3,
                negative: 2
            })
        );
    }

    #[test]
    fn field_accessors() {
        let rate = Variant::Ads1115.sample_rate(128).unwrap();
        let word = ConfigWord::single_shot(ChannelSelector::SingleEnded(1), Gain::Fsr4096, rate)
            .unwrap();
        assert_eq!(word.bits(), 0xD383);
        assert_eq!(word.mux_code(), 0b101);
        assert_eq!(word.gain_code(), 0b001);
        assert_eq!(word.rate_code(), 0b100);
        assert!(word.operational_status());
        assert_eq!(word.to_bytes(), [0x01, 0xD3, 0x83]);
    }

    #[test]
    fn settle_time() {
        let rate_250 = Variant::Ads1115.sample_rate(250).unwrap();
        assert_eq!(rate_250.settle_time_us(), 4_000 + SETTLE_EPSILON_US);
        let rate_8 = Variant::Ads1115.sample_rate(8).unwrap();
        assert_eq!(rate_8.settle_time(), Duration::from_micros(125_100));
        // 1/860 s is not a whole number of microseconds, so round up.
        let rate_860 = Variant::Ads1115.sample_rate(860).unwrap();
        assert_eq!(rate_860.settle_time_us(), 1_163 + SETTLE_EPSILON_US);
        for variant in [Variant::Ads1015, Variant::Ads1115] {
            for rate in variant.sample_rates() {
                let period_ns = 1e9 / f64::from(rate.sps());
                assert!(f64::from(rate.settle_time_us()) * 1e3 >= period_ns + 100_000.0);
            }
        }
    }
}
