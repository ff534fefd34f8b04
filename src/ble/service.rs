//! Sensors GATT service definition
//!
//! Two read-only characteristics, each carrying one 16-bit reading:
//! - Service UUID: 00000000-1111-2222-2222-333333333333
//! - Temperature: 11111111-0000-0000-0000-111111111111 (i16, degrees C)
//! - Accelerometer: 22222222-0000-0000-0000-222222222222 (u16, X axis)
//!
//! Values are filled in on each read request from the sensor channels.

use trouble_host::prelude::*;

use crate::config::ble::VALUE_SIZE;

/// Sensors service
#[gatt_service(uuid = "00000000-1111-2222-2222-333333333333")]
pub struct SensorsService {
    /// Latest temperature sample, little-endian
    #[descriptor(uuid = descriptors::CHARACTERISTIC_USER_DESCRIPTION, read, value = "Read temperature values")]
    #[characteristic(uuid = "11111111-0000-0000-0000-111111111111", read, value = [0u8; 2])]
    pub temperature: [u8; VALUE_SIZE],

    /// Latest accelerometer sample, little-endian
    #[descriptor(uuid = descriptors::CHARACTERISTIC_USER_DESCRIPTION, read, value = "Read accelerometer values")]
    #[characteristic(uuid = "22222222-0000-0000-0000-222222222222", read, value = [0u8; 2])]
    pub accelerometer: [u8; VALUE_SIZE],
}
