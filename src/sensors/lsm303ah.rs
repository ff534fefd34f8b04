//! LSM303AH accelerometer (X axis)

use super::codec::{concatenate_bytes, scale_acceleration, RawRegisterPair};
use super::traits::{Sensor, SensorError};
use crate::config::accelerometer::{
    ADDRESS, CTRL1_LOW_POWER_100HZ, CTRL2_SOFT_RESET, DEVICE_ID, REG_CTRL1, REG_CTRL2,
    REG_OUTX_H, REG_OUTX_L, REG_STATUS, REG_WHO_AM_I, STATUS_DRDY,
};
use crate::transport::{DeviceHandle, DeviceId, RegisterTransport, TransportError};

/// LSM303AH accelerometer driver
pub struct Lsm303ah {
    device: DeviceId,
}

impl Lsm303ah {
    pub fn new(device: DeviceId) -> Self {
        Self { device }
    }

    async fn data_ready<T: RegisterTransport>(
        &self,
        bus: &mut T,
        handle: &DeviceHandle,
    ) -> Result<bool, TransportError> {
        let status = bus.read_register(handle, REG_STATUS).await?;
        Ok(status & STATUS_DRDY != 0)
    }
}

impl Default for Lsm303ah {
    fn default() -> Self {
        Self::new(DeviceId(ADDRESS))
    }
}

impl Sensor for Lsm303ah {
    type Value = u16;

    const NAME: &'static str = "accelerometer";

    fn device(&self) -> DeviceId {
        self.device
    }

    async fn initialise<T: RegisterTransport>(
        &mut self,
        bus: &mut T,
        handle: &DeviceHandle,
    ) -> Result<(), SensorError> {
        let found = bus.read_register(handle, REG_WHO_AM_I).await?;
        if found != DEVICE_ID {
            return Err(SensorError::InvalidDeviceIdentity {
                expected: DEVICE_ID,
                found,
            });
        }

        bus.write_register(handle, REG_CTRL2, CTRL2_SOFT_RESET).await?;
        bus.write_register(handle, REG_CTRL1, CTRL1_LOW_POWER_100HZ).await?;
        Ok(())
    }

    async fn read_registers<T: RegisterTransport>(
        &mut self,
        bus: &mut T,
        handle: &DeviceHandle,
    ) -> Result<Option<RawRegisterPair>, TransportError> {
        if !self.data_ready(bus, handle).await? {
            return Ok(None);
        }

        let msb = bus.read_register(handle, REG_OUTX_H).await?;
        let lsb = bus.read_register(handle, REG_OUTX_L).await?;
        Ok(Some(RawRegisterPair::new(msb, lsb)))
    }

    fn convert(&self, raw: RawRegisterPair) -> u16 {
        scale_acceleration(concatenate_bytes(raw.msb, raw.lsb))
    }
}
