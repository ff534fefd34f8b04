//! Register codec
//!
//! Pure conversions from raw register bytes to engineering values.

use crate::config::accelerometer::OUTPUT_SHIFT;

/// Two register bytes as read from a device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawRegisterPair {
    pub msb: u8,
    pub lsb: u8,
}

impl RawRegisterPair {
    pub const fn new(msb: u8, lsb: u8) -> Self {
        Self { msb, lsb }
    }
}

/// Assemble a 16-bit word from its high and low bytes
pub const fn concatenate_bytes(msb: u8, lsb: u8) -> u16 {
    ((msb as u16) << 8) | lsb as u16
}

/// Si7060 transfer function: `55 + (256 * msb + lsb - 16384) / 160`
///
/// The division truncates toward zero. `msb` is used as given; the register
/// read path is responsible for masking DSPSIGM down to its 7 result bits.
pub const fn convert_temperature(msb: u8, lsb: u8) -> i16 {
    let raw = 256 * msb as i32 + lsb as i32;
    (55 + (raw - 16384) / 160) as i16
}

/// Scale a raw accelerometer output word to the published value
pub const fn scale_acceleration(raw: u16) -> u16 {
    raw >> OUTPUT_SHIFT
}
