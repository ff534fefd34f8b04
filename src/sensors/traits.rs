//! Sensor driver trait
//!
//! A driver describes one device: how to bring it up, which registers hold
//! a reading and how to turn them into an engineering value.

use core::fmt::Debug;
use core::future::Future;

use super::codec::RawRegisterPair;
use crate::transport::{DeviceHandle, DeviceId, RegisterTransport, TransportError};

/// Errors reported by sensor drivers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// Register transaction failed
    Transport(TransportError),
    /// The device answered with an unexpected identity
    InvalidDeviceIdentity { expected: u8, found: u8 },
}

impl From<TransportError> for SensorError {
    fn from(e: TransportError) -> Self {
        SensorError::Transport(e)
    }
}

/// A sensor reachable through a [`RegisterTransport`]
pub trait Sensor {
    /// Converted reading
    type Value: Copy + Debug;

    /// Short name used in log output
    const NAME: &'static str;

    /// Bus address of the device
    fn device(&self) -> DeviceId;

    /// Verify and configure the device
    ///
    /// Called once, with the device open, before sampling starts.
    fn initialise<T: RegisterTransport>(
        &mut self,
        bus: &mut T,
        handle: &DeviceHandle,
    ) -> impl Future<Output = Result<(), SensorError>> {
        let _ = (bus, handle);
        async { Ok(()) }
    }

    /// Read the registers holding one measurement
    ///
    /// Returns `None` when the device has no new data this cycle.
    fn read_registers<T: RegisterTransport>(
        &mut self,
        bus: &mut T,
        handle: &DeviceHandle,
    ) -> impl Future<Output = Result<Option<RawRegisterPair>, TransportError>>;

    /// Convert raw register contents to the engineering value
    fn convert(&self, raw: RawRegisterPair) -> Self::Value;
}
