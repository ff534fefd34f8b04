//! Si7060 I2C temperature sensor
//!
//! The device powers up converting continuously with its default
//! configuration, so there is nothing to initialise.

use super::codec::{convert_temperature, RawRegisterPair};
use super::traits::Sensor;
use crate::config::temperature::{ADDRESS, DSPSIGM_MASK, REG_DSPSIGL, REG_DSPSIGM};
use crate::transport::{DeviceHandle, DeviceId, RegisterTransport, TransportError};

/// Si7060 driver
pub struct Si7060 {
    device: DeviceId,
}

impl Si7060 {
    pub fn new(device: DeviceId) -> Self {
        Self { device }
    }
}

impl Default for Si7060 {
    fn default() -> Self {
        Self::new(DeviceId(ADDRESS))
    }
}

impl Sensor for Si7060 {
    type Value = i16;

    const NAME: &'static str = "temperature";

    fn device(&self) -> DeviceId {
        self.device
    }

    async fn read_registers<T: RegisterTransport>(
        &mut self,
        bus: &mut T,
        handle: &DeviceHandle,
    ) -> Result<Option<RawRegisterPair>, TransportError> {
        // DSPSIGM[6:0] are the conversion result
        let msb = bus.read_register(handle, REG_DSPSIGM).await? & DSPSIGM_MASK;
        let lsb = bus.read_register(handle, REG_DSPSIGL).await?;
        Ok(Some(RawRegisterPair::new(msb, lsb)))
    }

    fn convert(&self, raw: RawRegisterPair) -> i16 {
        convert_temperature(raw.msb, raw.lsb)
    }
}
