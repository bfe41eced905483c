#![doc = include_str!("../README.md")]
#![no_std]
#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
mod constants;
mod driver;
mod error;
pub mod variant;

pub use config::{ChannelSelector, ConfigWord, DifferentialRead, Gain, SampleRate, SingleEndedRead};
pub use constants::{DEFAULT_ADDRESS, SETTLE_EPSILON_US};
pub use driver::Ads1x15;
#[cfg(feature = "async")]
pub use driver::asynch;
pub use error::{ConfigError, Error};
pub use variant::Variant;
