//! Bluetooth Low Energy module
//!
//! Exposes the latest sensor readings through a custom GATT service with
//! one read characteristic per sensor.

pub mod service;

pub use service::SensorsService;
