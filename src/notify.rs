//! Task notification word
//!
//! A task suspends on a single wait point that several sources can signal.
//! Each source owns one bit; notifying OR-combines bits, so repeated
//! notifications of the same bit before the task wakes collapse into one.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::signal::Signal;

/// Notification bits plus the wake primitive of one task
pub struct TaskNotifier<M: RawMutex> {
    bits: Mutex<M, Cell<u32>>,
    wake: Signal<M, ()>,
}

impl<M: RawMutex> TaskNotifier<M> {
    pub const fn new() -> Self {
        Self {
            bits: Mutex::new(Cell::new(0)),
            wake: Signal::new(),
        }
    }

    /// Set `bits` and wake the task
    ///
    /// Non-blocking; safe to call from timer callbacks and other tasks.
    pub fn notify(&self, bits: u32) {
        self.bits.lock(|cell| cell.set(cell.get() | bits));
        self.wake.signal(());
    }

    /// Bits currently set, without consuming them
    pub fn pending(&self) -> u32 {
        self.bits.lock(|cell| cell.get())
    }

    /// Consume and return the pending bits covered by `mask`
    ///
    /// Returns 0 if none are set. Bits outside `mask` stay pending.
    pub fn take(&self, mask: u32) -> u32 {
        self.bits.lock(|cell| {
            let taken = cell.get() & mask;
            cell.set(cell.get() & !mask);
            taken
        })
    }

    /// Suspend until any bit of `mask` is set, then consume those bits
    ///
    /// Wake-ups for bits outside `mask` are tolerated and leave those bits
    /// pending for whoever owns them.
    pub async fn wait(&self, mask: u32) -> u32 {
        loop {
            let taken = self.take(mask);
            if taken != 0 {
                return taken;
            }
            self.wake.wait().await;
        }
    }
}

impl<M: RawMutex> Default for TaskNotifier<M> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use futures::FutureExt;

    const BIT_A: u32 = 1 << 1;
    const BIT_B: u32 = 1 << 4;

    #[test]
    fn test_notify_or_combines() {
        let notifier: TaskNotifier<NoopRawMutex> = TaskNotifier::new();
        notifier.notify(BIT_A);
        notifier.notify(BIT_A);
        notifier.notify(BIT_B);

        assert_eq!(notifier.pending(), BIT_A | BIT_B);
    }

    #[test]
    fn test_wait_consumes_only_masked_bits() {
        let notifier: TaskNotifier<NoopRawMutex> = TaskNotifier::new();
        notifier.notify(BIT_A | BIT_B);

        let taken = futures::executor::block_on(notifier.wait(BIT_A));
        assert_eq!(taken, BIT_A);
        assert_eq!(notifier.pending(), BIT_B);
    }

    #[test]
    fn test_wait_blocks_on_unrelated_bits() {
        let notifier: TaskNotifier<NoopRawMutex> = TaskNotifier::new();
        notifier.notify(BIT_B);

        assert!(notifier.wait(BIT_A).now_or_never().is_none());
        assert_eq!(notifier.pending(), BIT_B);
    }

    #[test]
    fn test_repeated_notify_wakes_once() {
        let notifier: TaskNotifier<NoopRawMutex> = TaskNotifier::new();
        notifier.notify(BIT_A);
        notifier.notify(BIT_A);

        assert_eq!(notifier.wait(BIT_A).now_or_never(), Some(BIT_A));
        assert!(notifier.wait(BIT_A).now_or_never().is_none());
    }

    #[test]
    fn test_notify_after_wait_started() {
        let notifier: TaskNotifier<NoopRawMutex> = TaskNotifier::new();

        let taken = futures::executor::block_on(async {
            let waiter = notifier.wait(BIT_A);
            let notify = async {
                notifier.notify(BIT_A);
            };
            let (taken, ()) = futures::future::join(waiter, notify).await;
            taken
        });
        assert_eq!(taken, BIT_A);
    }
}
