//! Sensor drivers
//!
//! Each driver knows its register map and transfer function; the generic
//! sensor task does the scheduling, bus locking and publishing.

pub mod codec;
pub mod lsm303ah;
pub mod si7060;
pub mod traits;

pub use codec::{concatenate_bytes, convert_temperature, scale_acceleration, RawRegisterPair};
pub use lsm303ah::Lsm303ah;
pub use si7060::Si7060;
pub use traits::{Sensor, SensorError};
