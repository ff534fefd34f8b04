//! Register transport
//!
//! Sensor drivers reach their device registers through an
//! open/transact/close interface. The I2C adapter maps it onto any
//! `embedded_hal_async` I2C master.

pub mod i2c;
pub mod traits;

pub use i2c::I2cTransport;
pub use traits::{DeviceHandle, DeviceId, RegisterTransport, TransportError};
