//! Register transport trait for abstraction and testability
//!
//! This trait defines the interface a sensor driver uses to read and write
//! device registers, allowing the I2C peripheral to be swapped with a mock
//! for testing.

use core::future::Future;

/// Bus address of a peripheral (7-bit I2C address)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceId(pub u8);

impl DeviceId {
    /// The 7-bit bus address
    pub const fn address(self) -> u8 {
        self.0
    }
}

/// Handle to an open device
///
/// Produced by [`RegisterTransport::open`] and consumed by
/// [`RegisterTransport::close`]. It is neither `Clone` nor `Copy`, so a
/// handle cannot outlive the transaction sequence it was opened for.
#[derive(Debug, PartialEq, Eq)]
pub struct DeviceHandle {
    device: DeviceId,
}

impl DeviceHandle {
    /// Create a handle for `device`
    ///
    /// Only transport implementations should call this, from `open`.
    pub fn new(device: DeviceId) -> Self {
        Self { device }
    }

    /// The device this handle addresses
    pub fn device(&self) -> DeviceId {
        self.device
    }
}

/// Errors that can occur during register transactions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// A device is already open on this transport
    AlreadyOpen,
    /// The handle does not refer to the currently open device
    NotOpen,
    /// The device did not acknowledge its address or data
    NoAcknowledge,
    /// Bus error (misplaced START/STOP)
    Bus,
    /// Lost arbitration to another master
    ArbitrationLoss,
    /// Receive overrun
    Overrun,
    /// Any other peripheral failure
    Other,
}

/// Abstract register transport for testability
///
/// Accesses follow a fixed shape: `open` the device, run one or more
/// `transact` calls, then `close` it.
pub trait RegisterTransport {
    /// Open `device` for a transaction sequence
    fn open(&mut self, device: DeviceId) -> impl Future<Output = Result<DeviceHandle, TransportError>>;

    /// Write `write` (register address, optionally followed by data), then
    /// read back `read.len()` bytes
    ///
    /// An empty `read` buffer performs a plain write.
    fn transact(
        &mut self,
        handle: &DeviceHandle,
        write: &[u8],
        read: &mut [u8],
    ) -> impl Future<Output = Result<(), TransportError>>;

    /// Close the device, releasing the handle
    fn close(&mut self, handle: DeviceHandle) -> impl Future<Output = Result<(), TransportError>>;

    /// Read a single register
    fn read_register(
        &mut self,
        handle: &DeviceHandle,
        register: u8,
    ) -> impl Future<Output = Result<u8, TransportError>> {
        async move {
            let mut value = [0u8];
            self.transact(handle, &[register], &mut value).await?;
            Ok(value[0])
        }
    }

    /// Write a single register
    fn write_register(
        &mut self,
        handle: &DeviceHandle,
        register: u8,
        value: u8,
    ) -> impl Future<Output = Result<(), TransportError>> {
        async move { self.transact(handle, &[register, value], &mut []).await }
    }
}
