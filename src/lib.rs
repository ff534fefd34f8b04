#![cfg_attr(not(test), no_std)]

pub mod channel;
pub mod config;
pub mod notify;
pub mod publisher;
pub mod sensors;
pub mod tasks;
pub mod transport;

// Needs the radio stack only available with embedded feature
#[cfg(feature = "embedded")]
pub mod ble;

pub use channel::{MeasurementRequest, SensorChannel};
pub use publisher::ValuePublisher;
