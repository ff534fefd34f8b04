//! Value publisher
//!
//! Answers "what is the current value" for the BLE read handler. Reads never
//! wait for a fresh sample; freshness follows the measurement trigger.

use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::channel::RetainedValue;
use crate::config::ble::VALUE_SIZE;

/// A value that fits the fixed 2-byte characteristic payload
pub trait PayloadValue: Copy {
    /// Little-endian wire encoding
    fn to_payload(self) -> [u8; VALUE_SIZE];
}

impl PayloadValue for i16 {
    fn to_payload(self) -> [u8; VALUE_SIZE] {
        self.to_le_bytes()
    }
}

impl PayloadValue for u16 {
    fn to_payload(self) -> [u8; VALUE_SIZE] {
        self.to_le_bytes()
    }
}

/// Read-only accessor for a sensor's retained value
pub struct ValuePublisher<'a, M: RawMutex, V: Copy> {
    value: &'a RetainedValue<M, V>,
}

impl<M: RawMutex, V: Copy> Clone for ValuePublisher<'_, M, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M: RawMutex, V: Copy> Copy for ValuePublisher<'_, M, V> {}

impl<'a, M: RawMutex, V: Copy> ValuePublisher<'a, M, V> {
    pub(crate) fn new(value: &'a RetainedValue<M, V>) -> Self {
        Self { value }
    }

    /// Value stored by the most recent completed sampling cycle
    ///
    /// Returns the channel's initial value until the first cycle completes.
    pub fn get_current_value(&self) -> V {
        self.value.get()
    }
}

impl<M: RawMutex, V: PayloadValue> ValuePublisher<'_, M, V> {
    /// Current value encoded as a characteristic payload
    pub fn read_payload(&self) -> [u8; VALUE_SIZE] {
        self.get_current_value().to_payload()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::SensorChannel;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    #[test]
    fn test_default_before_first_sample() {
        let channel: SensorChannel<NoopRawMutex, i16> = SensorChannel::new(0);
        assert_eq!(channel.publisher().get_current_value(), 0);
        assert_eq!(channel.publisher().read_payload(), [0x00, 0x00]);
    }

    #[test]
    fn test_negative_temperature_payload() {
        let channel: SensorChannel<NoopRawMutex, i16> = SensorChannel::new(0);
        channel.store(-31);
        // Two's complement, little-endian
        assert_eq!(channel.publisher().read_payload(), [0xE1, 0xFF]);
    }

    #[test]
    fn test_acceleration_payload() {
        let channel: SensorChannel<NoopRawMutex, u16> = SensorChannel::new(0);
        channel.store(0x0DEA);
        assert_eq!(channel.publisher().read_payload(), [0xEA, 0x0D]);
    }
}
