use core::ops::Range;

/// Default 7-bit I2C address (ADDR pin tied to GND).
pub const DEFAULT_ADDRESS: u8 = 0x48;

/// Margin added to the nominal conversion time to cover oscillator tolerance.
pub const SETTLE_EPSILON_US: u32 = 100;

pub(crate) const MICROS_PER_SECOND: u32 = 1_000_000;

// Pointer register values.
pub(crate) const POINTER_CONVERSION: u8 = 0x00;
pub(crate) const POINTER_CONFIG: u8 = 0x01;

// Configuration register layout (datasheet table 8).
pub(crate) const OS_BIT: usize = 15;
pub(crate) const MUX_BITS: Range<usize> = 12..15;
pub(crate) const PGA_BITS: Range<usize> = 9..12;
pub(crate) const MODE_BIT: usize = 8;
pub(crate) const DR_BITS: Range<usize> = 5..8;
pub(crate) const COMP_MODE_BIT: usize = 4;
pub(crate) const COMP_POL_BIT: usize = 3;
pub(crate) const COMP_LAT_BIT: usize = 2;
pub(crate) const COMP_QUE_BITS: Range<usize> = 0..2;

/// COMP_QUE value that disables the comparator and leaves ALERT/RDY high.
pub(crate) const COMP_QUE_DISABLE: u16 = 0b11;
