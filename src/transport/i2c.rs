//! I2C register transport
//!
//! Adapts any `embedded_hal_async` I2C master to [`RegisterTransport`].

use embedded_hal::i2c::{Error as _, ErrorKind};
use embedded_hal_async::i2c::I2c;

use super::traits::{DeviceHandle, DeviceId, RegisterTransport, TransportError};

impl From<ErrorKind> for TransportError {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Bus => TransportError::Bus,
            ErrorKind::ArbitrationLoss => TransportError::ArbitrationLoss,
            ErrorKind::NoAcknowledge(_) => TransportError::NoAcknowledge,
            ErrorKind::Overrun => TransportError::Overrun,
            _ => TransportError::Other,
        }
    }
}

/// Register transport over an I2C master
///
/// At most one device is open at a time. Bus sharing between sensor tasks
/// is handled by the mutex the transport is placed in, not here.
pub struct I2cTransport<I> {
    i2c: I,
    open: Option<DeviceId>,
}

impl<I: I2c> I2cTransport<I> {
    pub fn new(i2c: I) -> Self {
        Self { i2c, open: None }
    }

    /// Release the underlying I2C master
    pub fn release(self) -> I {
        self.i2c
    }

    fn check(&self, handle: &DeviceHandle) -> Result<(), TransportError> {
        match self.open {
            Some(device) if device == handle.device() => Ok(()),
            _ => Err(TransportError::NotOpen),
        }
    }
}

impl<I: I2c> RegisterTransport for I2cTransport<I> {
    async fn open(&mut self, device: DeviceId) -> Result<DeviceHandle, TransportError> {
        if self.open.is_some() {
            return Err(TransportError::AlreadyOpen);
        }
        self.open = Some(device);
        Ok(DeviceHandle::new(device))
    }

    async fn transact(
        &mut self,
        handle: &DeviceHandle,
        write: &[u8],
        read: &mut [u8],
    ) -> Result<(), TransportError> {
        self.check(handle)?;
        let address = handle.device().address();

        let result = if read.is_empty() {
            self.i2c.write(address, write).await
        } else {
            self.i2c.write_read(address, write, read).await
        };
        result.map_err(|e| TransportError::from(e.kind()))
    }

    async fn close(&mut self, handle: DeviceHandle) -> Result<(), TransportError> {
        self.check(&handle)?;
        self.open = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::{ErrorType, NoAcknowledgeSource, Operation};

    /// Single-device I2C bus with a flat register file
    struct FakeI2c {
        address: u8,
        registers: [u8; 256],
        pointer: u8,
    }

    impl FakeI2c {
        fn new(address: u8) -> Self {
            Self {
                address,
                registers: [0; 256],
                pointer: 0,
            }
        }
    }

    impl ErrorType for FakeI2c {
        type Error = ErrorKind;
    }

    impl I2c for FakeI2c {
        async fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            if address != self.address {
                return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
            }
            for operation in operations {
                match operation {
                    Operation::Write(bytes) => {
                        if let Some((&register, data)) = bytes.split_first() {
                            self.pointer = register;
                            for &byte in data {
                                self.registers[self.pointer as usize] = byte;
                                self.pointer = self.pointer.wrapping_add(1);
                            }
                        }
                    }
                    Operation::Read(buf) => {
                        for slot in buf.iter_mut() {
                            *slot = self.registers[self.pointer as usize];
                            self.pointer = self.pointer.wrapping_add(1);
                        }
                    }
                }
            }
            Ok(())
        }
    }

    #[test]
    fn test_write_then_read_register() {
        let mut transport = I2cTransport::new(FakeI2c::new(0x1D));

        futures::executor::block_on(async {
            let handle = transport.open(DeviceId(0x1D)).await.unwrap();
            transport.write_register(&handle, 0x20, 0xC0).await.unwrap();
            assert_eq!(transport.read_register(&handle, 0x20).await, Ok(0xC0));
            transport.close(handle).await.unwrap();
        });

        assert_eq!(transport.release().registers[0x20], 0xC0);
    }

    #[test]
    fn test_missing_device_maps_to_no_acknowledge() {
        let mut transport = I2cTransport::new(FakeI2c::new(0x1D));

        futures::executor::block_on(async {
            let handle = transport.open(DeviceId(0x31)).await.unwrap();
            assert_eq!(
                transport.read_register(&handle, 0xC1).await,
                Err(TransportError::NoAcknowledge)
            );
            transport.close(handle).await.unwrap();
        });
    }

    #[test]
    fn test_single_open_at_a_time() {
        let mut transport = I2cTransport::new(FakeI2c::new(0x1D));

        futures::executor::block_on(async {
            let handle = transport.open(DeviceId(0x1D)).await.unwrap();
            assert_eq!(
                transport.open(DeviceId(0x31)).await,
                Err(TransportError::AlreadyOpen)
            );
            transport.close(handle).await.unwrap();
            assert!(transport.open(DeviceId(0x31)).await.is_ok());
        });
    }

    #[test]
    fn test_stale_handle_rejected() {
        let mut transport = I2cTransport::new(FakeI2c::new(0x1D));

        futures::executor::block_on(async {
            let handle = transport.open(DeviceId(0x1D)).await.unwrap();
            transport.close(handle).await.unwrap();

            let forged = DeviceHandle::new(DeviceId(0x1D));
            assert_eq!(
                transport.read_register(&forged, 0x0F).await,
                Err(TransportError::NotOpen)
            );
        });
    }

    #[test]
    fn test_error_kind_mapping() {
        assert_eq!(TransportError::from(ErrorKind::Bus), TransportError::Bus);
        assert_eq!(
            TransportError::from(ErrorKind::ArbitrationLoss),
            TransportError::ArbitrationLoss
        );
        assert_eq!(TransportError::from(ErrorKind::Overrun), TransportError::Overrun);
        assert_eq!(TransportError::from(ErrorKind::Other), TransportError::Other);
    }
}
