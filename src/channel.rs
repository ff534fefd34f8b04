//! Per-sensor shared state
//!
//! A [`SensorChannel`] is the only thing a sensor task shares with the rest
//! of the application: the notification word it waits on and the retained
//! value it publishes. The application declares one `static` channel per
//! sensor.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;

use crate::config::notify::DO_MEASUREMENT;
use crate::notify::TaskNotifier;
use crate::publisher::ValuePublisher;

/// Single-writer / multi-reader cell holding the latest sample
///
/// Stores replace the whole value under the lock, so readers never see a
/// partially updated value.
pub struct RetainedValue<M: RawMutex, V: Copy> {
    inner: Mutex<M, Cell<V>>,
}

impl<M: RawMutex, V: Copy> RetainedValue<M, V> {
    pub const fn new(initial: V) -> Self {
        Self {
            inner: Mutex::new(Cell::new(initial)),
        }
    }

    pub fn get(&self) -> V {
        self.inner.lock(|cell| cell.get())
    }

    pub(crate) fn set(&self, value: V) {
        self.inner.lock(|cell| cell.set(value));
    }
}

/// Anything that can be asked to take a measurement
pub trait MeasurementRequest {
    /// Mark one measurement as overdue
    ///
    /// Callable from any context. Requests made while one is already
    /// pending coalesce into a single sampling cycle.
    fn request_measurement(&self);
}

/// Shared state between a sensor task, its trigger and its readers
pub struct SensorChannel<M: RawMutex, V: Copy> {
    notifier: TaskNotifier<M>,
    value: RetainedValue<M, V>,
}

impl<M: RawMutex, V: Copy> SensorChannel<M, V> {
    /// Create a channel whose published value starts at `initial`
    pub const fn new(initial: V) -> Self {
        Self {
            notifier: TaskNotifier::new(),
            value: RetainedValue::new(initial),
        }
    }

    /// Wait point of the owning sensor task
    ///
    /// Other sources may signal the task through their own bits; the sensor
    /// task only consumes the measurement bit.
    pub fn notifier(&self) -> &TaskNotifier<M> {
        &self.notifier
    }

    /// Read-only view of the latest sample
    pub fn publisher(&self) -> ValuePublisher<'_, M, V> {
        ValuePublisher::new(&self.value)
    }

    pub(crate) fn store(&self, value: V) {
        self.value.set(value);
    }
}

impl<M: RawMutex, V: Copy> MeasurementRequest for SensorChannel<M, V> {
    fn request_measurement(&self) {
        self.notifier.notify(DO_MEASUREMENT);
    }
}
