//! Embassy tasks module
//!
//! Sensor sampling, measurement triggers and (on target) the BLE host.

#[cfg(feature = "embedded")]
pub mod ble;
pub mod sensor;
pub mod trigger;

#[cfg(feature = "embedded")]
pub use ble::ble_task;
pub use sensor::{SampleStats, SensorTask};
pub use trigger::{measurement_trigger, PeriodicTimer};
