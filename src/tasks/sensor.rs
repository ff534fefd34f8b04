//! Sensor task
//!
//! Spends its life suspended on the channel's notification word. Each
//! measurement request wakes it for exactly one sampling cycle: lock the
//! bus, open the device, read the registers, close the device, convert and
//! publish. A failed cycle leaves the previously published value in place.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::Mutex;
use log::{debug, info, warn};

use crate::channel::SensorChannel;
use crate::config::notify::DO_MEASUREMENT;
use crate::sensors::{RawRegisterPair, Sensor, SensorError};
use crate::transport::{RegisterTransport, TransportError};

/// Sampling cycle counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SampleStats {
    /// Cycles that published a new value
    pub completed: u32,
    /// Cycles abandoned on a transport error
    pub failed: u32,
    /// Cycles where the device had no new data
    pub skipped: u32,
}

/// One sensor's sampling task
///
/// Only obtainable through [`SensorTask::start`], so a sensor that failed
/// initialisation never samples.
pub struct SensorTask<'a, M: RawMutex, T: RegisterTransport, S: Sensor> {
    channel: &'a SensorChannel<M, S::Value>,
    bus: &'a Mutex<M, T>,
    sensor: S,
    stats: SampleStats,
}

impl<'a, M: RawMutex, T: RegisterTransport, S: Sensor> SensorTask<'a, M, T, S> {
    /// Initialise the device and create its task
    ///
    /// Errors here are fatal for this sensor: the caller must not retry
    /// sampling without a successful start.
    pub async fn start(
        channel: &'a SensorChannel<M, S::Value>,
        bus: &'a Mutex<M, T>,
        mut sensor: S,
    ) -> Result<Self, SensorError> {
        {
            let mut bus = bus.lock().await;
            let handle = bus.open(sensor.device()).await?;
            let initialised = sensor.initialise(&mut *bus, &handle).await;
            let closed = bus.close(handle).await;
            initialised?;
            closed?;
        }

        info!("{}: sensor ready", S::NAME);
        Ok(Self {
            channel,
            bus,
            sensor,
            stats: SampleStats::default(),
        })
    }

    pub fn stats(&self) -> SampleStats {
        self.stats
    }

    /// Task body; never returns
    pub async fn run(mut self) {
        loop {
            // Failures are logged and counted by the cycle itself
            let _ = self.service_next().await;
        }
    }

    /// Suspend until a measurement is requested, then sample once
    pub async fn service_next(&mut self) -> Result<Option<S::Value>, TransportError> {
        self.channel.notifier().wait(DO_MEASUREMENT).await;
        self.sample_once().await
    }

    /// Run one sampling cycle and publish the result
    ///
    /// Returns `Ok(None)` when the device had nothing new. On error the
    /// published value is left untouched.
    pub async fn sample_once(&mut self) -> Result<Option<S::Value>, TransportError> {
        match self.read_cycle().await {
            Ok(Some(raw)) => {
                let value = self.sensor.convert(raw);
                self.channel.store(value);
                self.stats.completed += 1;
                debug!("{}: {:?} -> {:?}", S::NAME, raw, value);
                Ok(Some(value))
            }
            Ok(None) => {
                self.stats.skipped += 1;
                debug!("{}: no new data", S::NAME);
                Ok(None)
            }
            Err(e) => {
                self.stats.failed += 1;
                warn!("{}: sampling failed ({:?}), keeping last value", S::NAME, e);
                Err(e)
            }
        }
    }

    /// open -> read -> close, holding the bus for the whole sequence
    async fn read_cycle(&mut self) -> Result<Option<RawRegisterPair>, TransportError> {
        let mut bus = self.bus.lock().await;
        let handle = bus.open(self.sensor.device()).await?;
        let raw = self.sensor.read_registers(&mut *bus, &handle).await;
        // Close even after a failed read so the next cycle can open again
        let closed = bus.close(handle).await;
        let raw = raw?;
        closed?;
        Ok(raw)
    }
}
