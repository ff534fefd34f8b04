//! Measurement trigger
//!
//! A free-running periodic timer whose every expiry asks a sensor task for
//! one measurement.

use core::future::Future;

use log::trace;

use crate::channel::MeasurementRequest;

/// Self-rearming periodic timer
pub trait PeriodicTimer {
    /// Wait for the next expiry
    fn next(&mut self) -> impl Future<Output = ()>;
}

#[cfg(feature = "embedded")]
impl PeriodicTimer for embassy_time::Ticker {
    fn next(&mut self) -> impl Future<Output = ()> {
        embassy_time::Ticker::next(self)
    }
}

/// Request a measurement on every timer expiry; never returns
pub async fn measurement_trigger<T: PeriodicTimer, R: MeasurementRequest>(mut timer: T, request: &R) {
    loop {
        timer.next().await;
        trace!("measurement timer expired");
        request.request_measurement();
    }
}

#[cfg(test)]
pub mod mock {
    //! Mock timer for testing

    use super::*;

    /// Timer that expires a fixed number of times, then never again
    pub struct MockTimer {
        remaining: usize,
    }

    impl MockTimer {
        pub fn new(expiries: usize) -> Self {
            Self { remaining: expiries }
        }

        /// Expiries not yet delivered
        pub fn remaining(&self) -> usize {
            self.remaining
        }
    }

    impl PeriodicTimer for MockTimer {
        async fn next(&mut self) {
            if self.remaining == 0 {
                core::future::pending::<()>().await;
            }
            self.remaining -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockTimer;
    use super::*;
    use crate::channel::SensorChannel;
    use crate::config::notify::DO_MEASUREMENT;
    use crate::config::temperature;
    use crate::sensors::Si7060;
    use crate::tasks::sensor::SensorTask;
    use crate::transport::traits::mock::MockTransport;
    use core::cell::Cell;
    use core::pin::pin;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use embassy_sync::mutex::Mutex;
    use futures::executor::block_on;
    use futures::future::{select, Either};
    use futures::FutureExt;

    struct CountingRequest {
        count: Cell<u32>,
    }

    impl MeasurementRequest for CountingRequest {
        fn request_measurement(&self) {
            self.count.set(self.count.get() + 1);
        }
    }

    #[test]
    fn test_requests_on_every_expiry() {
        let request = CountingRequest { count: Cell::new(0) };

        // The trigger never finishes; it stalls once the mock timer runs out
        assert!(measurement_trigger(MockTimer::new(3), &request)
            .now_or_never()
            .is_none());
        assert_eq!(request.count.get(), 3);
    }

    #[test]
    fn test_expiries_coalesce_into_one_request() {
        let channel: SensorChannel<NoopRawMutex, i16> = SensorChannel::new(0);

        assert!(measurement_trigger(MockTimer::new(5), &channel)
            .now_or_never()
            .is_none());
        assert_eq!(channel.notifier().pending(), DO_MEASUREMENT);
    }

    #[test]
    fn test_trigger_to_published_value() {
        let channel: SensorChannel<NoopRawMutex, i16> = SensorChannel::new(0);
        let mut transport = MockTransport::new();
        transport.set_register(temperature::REG_DSPSIGM, 0x7F);
        transport.set_register(temperature::REG_DSPSIGL, 0x80);
        let bus = Mutex::new(transport);
        let mut task = block_on(SensorTask::start(&channel, &bus, Si7060::default())).unwrap();

        let sampled = block_on(async {
            let trigger = pin!(measurement_trigger(MockTimer::new(1), &channel));
            let service = pin!(task.service_next());
            match select(trigger, service).await {
                Either::Left(_) => panic!("trigger returned"),
                Either::Right((sampled, _)) => sampled,
            }
        });

        assert_eq!(sampled, Ok(Some(156)));
        assert_eq!(channel.publisher().get_current_value(), 156);
    }

    #[test]
    fn test_mock_timer_stalls_when_exhausted() {
        let mut timer = MockTimer::new(1);
        assert!(timer.next().now_or_never().is_some());
        assert_eq!(timer.remaining(), 0);
        assert!(timer.next().now_or_never().is_none());
    }
}
