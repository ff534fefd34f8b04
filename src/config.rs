//! Hardware configuration constants for the ESP32-S3 sensor peripheral

/// I2C bus shared by both sensors
pub mod i2c {
    pub const SDA: u8 = 4;
    pub const SCL: u8 = 5;
    /// Standard mode (100 kb/s), 7-bit addressing
    pub const FREQUENCY_KHZ: u32 = 100;
}

/// Si7060 temperature sensor
pub mod temperature {
    /// 7-bit I2C address (Si7060-00)
    pub const ADDRESS: u8 = 0x31;

    /// chipID | revID
    pub const REG_ID: u8 = 0xC0;
    /// Most significant bits of the temperature conversion
    pub const REG_DSPSIGM: u8 = 0xC1;
    /// Least significant bits of the temperature conversion
    pub const REG_DSPSIGL: u8 = 0xC2;

    /// Only bits [6:0] of DSPSIGM carry the conversion result
    pub const DSPSIGM_MASK: u8 = 0x7F;

    pub const PERIOD_MS: u64 = 2_000;
}

/// LSM303AH accelerometer
pub mod accelerometer {
    /// 7-bit I2C address of the accelerometer die
    pub const ADDRESS: u8 = 0x1D;

    pub const REG_WHO_AM_I: u8 = 0x0F;
    pub const REG_CTRL1: u8 = 0x20;
    pub const REG_CTRL2: u8 = 0x21;
    pub const REG_STATUS: u8 = 0x27;
    pub const REG_OUTX_L: u8 = 0x28;
    pub const REG_OUTX_H: u8 = 0x29;

    /// Expected WHO_AM_I contents
    pub const DEVICE_ID: u8 = 0x43;

    /// CTRL1: low power, 100 Hz output data rate
    pub const CTRL1_LOW_POWER_100HZ: u8 = 0xC0;
    /// CTRL2: soft reset
    pub const CTRL2_SOFT_RESET: u8 = 0x40;

    /// STATUS data-ready flag
    pub const STATUS_DRDY: u8 = 0x01;

    /// 1/16 approximates the 0.061 mg/LSB sensitivity
    pub const OUTPUT_SHIFT: u32 = 4;

    pub const PERIOD_MS: u64 = 1_000;
}

/// Task notification bit reservation
pub mod notify {
    /// A measurement is overdue
    pub const DO_MEASUREMENT: u32 = 1 << 1;
}

/// BLE advertising and GATT layout
pub mod ble {
    pub const DEVICE_NAME: &str = "Dialog Custom";

    /// Characteristic values are a single 16-bit integer
    pub const VALUE_SIZE: usize = 2;
}
