//! Shared obligation slot and its one-shot producer handle
//!
//! The payload and the state live in one slot behind a mutex. The producer
//! writes both in a single critical section and then broadcasts on a condvar
//! (blocking readers) and a tokio `Notify` (async readers). A reader only
//! decides it is done while holding the same mutex, so a woken reader always
//! sees the payload that was written.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use functional_common::{ObligationSettings, DEFAULT_SLOW_WAIT_WARN_MS};
use parking_lot::{Condvar, Mutex, MutexGuard};
use tokio::sync::Notify;
use tracing::{debug, warn};

use crate::obligation::Obligation;
use crate::state::State;

static SLOW_WAIT_WARN_MS: AtomicU64 = AtomicU64::new(DEFAULT_SLOW_WAIT_WARN_MS);

/// Apply obligation settings process-wide
pub fn configure(settings: &ObligationSettings) {
    SLOW_WAIT_WARN_MS.store(settings.slow_wait_warn_ms, Ordering::Relaxed);
}

fn slow_wait_threshold() -> Option<Duration> {
    match SLOW_WAIT_WARN_MS.load(Ordering::Relaxed) {
        0 => None,
        ms => Some(Duration::from_millis(ms)),
    }
}

enum Slot<T, E> {
    Pending,
    Fulfilled(T),
    Rejected(E),
}

impl<T, E> Slot<T, E> {
    fn state(&self) -> State {
        match self {
            Slot::Pending => State::Pending,
            Slot::Fulfilled(_) => State::Fulfilled,
            Slot::Rejected(_) => State::Rejected,
        }
    }

    fn is_pending(&self) -> bool {
        matches!(self, Slot::Pending)
    }
}

struct Shared<T, E> {
    slot: Mutex<Slot<T, E>>,
    settled: Condvar,
    notify: Notify,
}

impl<T, E> Shared<T, E> {
    fn new(slot: Slot<T, E>) -> Arc<Self> {
        Arc::new(Self {
            slot: Mutex::new(slot),
            settled: Condvar::new(),
            notify: Notify::new(),
        })
    }

    fn is_pending(&self) -> bool {
        self.slot.lock().is_pending()
    }
}

/// Reader handle to an obligation
///
/// Clones share the same slot; any number of threads or tasks may read.
pub struct ObligationCell<T, E = String> {
    shared: Arc<Shared<T, E>>,
}

impl<T, E> Clone for ObligationCell<T, E> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T, E> ObligationCell<T, E> {
    /// Create a pending obligation and the resolver that settles it
    pub fn pending() -> (Resolver<T, E>, Self) {
        let shared = Shared::new(Slot::Pending);
        let resolver = Resolver {
            shared: Some(Arc::clone(&shared)),
        };
        (resolver, Self { shared })
    }

    /// An obligation already fulfilled with `value`
    pub fn fulfilled(value: T) -> Self {
        Self {
            shared: Shared::new(Slot::Fulfilled(value)),
        }
    }

    /// An obligation already rejected with `reason`
    pub fn rejected(reason: E) -> Self {
        Self {
            shared: Shared::new(Slot::Rejected(reason)),
        }
    }

    fn wait_untimed(&self, slot: &mut MutexGuard<'_, Slot<T, E>>) {
        let started = Instant::now();
        let mut warn_at = slow_wait_threshold().and_then(|t| started.checked_add(t));

        while slot.is_pending() {
            match warn_at {
                Some(deadline) => {
                    if self.shared.settled.wait_until(slot, deadline).timed_out() && slot.is_pending() {
                        warn!(
                            waited_ms = started.elapsed().as_millis() as u64,
                            "Still waiting on pending obligation"
                        );
                        warn_at = None;
                    }
                }
                None => self.shared.settled.wait(slot),
            }
        }
    }

    fn wait_until(&self, slot: &mut MutexGuard<'_, Slot<T, E>>, deadline: Instant) {
        while slot.is_pending() {
            if self.shared.settled.wait_until(slot, deadline).timed_out() {
                break;
            }
        }
    }
}

impl<T: Clone, E: Clone> ObligationCell<T, E> {
    /// [`Obligation::value`] for async readers
    ///
    /// Waits on the runtime instead of blocking the worker thread.
    pub async fn value_async(&self, timeout: Option<Duration>) -> Option<T> {
        let settled = async {
            loop {
                let notified = self.shared.notify.notified();
                tokio::pin!(notified);
                notified.as_mut().enable();
                if !self.shared.is_pending() {
                    return;
                }
                notified.await;
            }
        };

        match timeout {
            None => settled.await,
            Some(limit) => {
                if tokio::time::timeout(limit, settled).await.is_err() {
                    debug!(timeout_ms = limit.as_millis() as u64, "Async wait timed out");
                }
            }
        }

        self.fulfilled_value()
    }

    fn fulfilled_value(&self) -> Option<T> {
        match &*self.shared.slot.lock() {
            Slot::Fulfilled(value) => Some(value.clone()),
            _ => None,
        }
    }
}

impl<T: Clone, E: Clone> Obligation for ObligationCell<T, E> {
    type Value = T;
    type Reason = E;

    fn state(&self) -> State {
        self.shared.slot.lock().state()
    }

    fn value(&self, timeout: Option<Duration>) -> Option<T> {
        let mut slot = self.shared.slot.lock();
        if slot.is_pending() {
            match timeout.map(|limit| Instant::now().checked_add(limit)) {
                None | Some(None) => self.wait_untimed(&mut slot),
                Some(Some(deadline)) => self.wait_until(&mut slot, deadline),
            }
        }

        match &*slot {
            Slot::Fulfilled(value) => Some(value.clone()),
            _ => None,
        }
    }

    fn reason(&self) -> Option<E> {
        match &*self.shared.slot.lock() {
            Slot::Rejected(reason) => Some(reason.clone()),
            _ => None,
        }
    }
}

impl<T, E> fmt::Debug for ObligationCell<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObligationCell")
            .field("state", &self.shared.slot.lock().state())
            .finish()
    }
}

/// The single producer of an obligation
///
/// Settling consumes the resolver, so the transition happens at most once.
/// Dropping it unsettled leaves the obligation pending.
pub struct Resolver<T, E = String> {
    shared: Option<Arc<Shared<T, E>>>,
}

impl<T, E> Resolver<T, E> {
    /// Settle as fulfilled with `value`
    pub fn fulfill(self, value: T) {
        self.settle(Slot::Fulfilled(value));
    }

    /// Settle as rejected with `reason`
    pub fn reject(self, reason: E) {
        self.settle(Slot::Rejected(reason));
    }

    /// Settle from a result
    pub fn complete(self, result: Result<T, E>) {
        match result {
            Ok(value) => self.fulfill(value),
            Err(reason) => self.reject(reason),
        }
    }

    fn settle(mut self, outcome: Slot<T, E>) {
        let Some(shared) = self.shared.take() else {
            return;
        };

        let state = outcome.state();
        {
            let mut slot = shared.slot.lock();
            debug_assert!(slot.is_pending(), "obligation settled twice");
            *slot = outcome;
        }
        shared.settled.notify_all();
        shared.notify.notify_waiters();
        debug!(state = %state, "Obligation settled");
    }
}

impl<T, E> Drop for Resolver<T, E> {
    fn drop(&mut self) {
        if self.shared.is_some() {
            warn!("Resolver dropped without settling its obligation");
        }
    }
}

impl<T, E> fmt::Debug for Resolver<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("settled", &self.shared.is_none())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    // Tests that change the process-wide threshold run one at a time
    static SETTINGS: Mutex<()> = Mutex::new(());

    #[test]
    fn test_fresh_obligation_is_pending() {
        let (_resolver, cell) = ObligationCell::<u32>::pending();
        assert!(cell.is_pending());
        assert!(!cell.is_fulfilled());
        assert!(!cell.is_rejected());
        assert_eq!(cell.state(), State::Pending);
    }

    #[test]
    fn test_fulfill_is_visible_to_every_read() {
        let (resolver, cell) = ObligationCell::<String>::pending();
        resolver.fulfill("done".to_string());

        assert!(cell.is_fulfilled());
        assert!(cell.is_realized());
        assert!(!cell.is_pending());
        assert_eq!(cell.value(None).as_deref(), Some("done"));
        assert_eq!(cell.value(Some(Duration::ZERO)).as_deref(), Some("done"));
        assert_eq!(cell.value(Some(Duration::from_secs(5))).as_deref(), Some("done"));
        assert_eq!(cell.reason(), None);
    }

    #[test]
    fn test_reject_keeps_value_absent() {
        let (resolver, cell) = ObligationCell::<u32, String>::pending();
        resolver.reject("boom".to_string());

        assert!(cell.is_rejected());
        assert!(!cell.is_pending());
        assert_eq!(cell.value(None), None);
        assert_eq!(cell.reason().as_deref(), Some("boom"));
    }

    #[test]
    fn test_timeout_returns_none_without_error() {
        let (_resolver, cell) = ObligationCell::<u32>::pending();
        let started = Instant::now();
        assert_eq!(cell.value(Some(Duration::from_millis(50))), None);
        assert!(started.elapsed() >= Duration::from_millis(50));
        assert!(cell.is_pending());
    }

    #[test]
    fn test_producer_may_settle_after_a_reader_times_out() {
        let (resolver, cell) = ObligationCell::<u32>::pending();
        assert_eq!(cell.value(Some(Duration::from_millis(10))), None);

        resolver.fulfill(7);
        assert_eq!(cell.value(Some(Duration::ZERO)), Some(7));
    }

    #[test]
    fn test_blocked_readers_wake_with_payload() {
        let (resolver, cell) = ObligationCell::<Vec<u8>>::pending();

        let readers: Vec<_> = (0..4)
            .map(|i| {
                let cell = cell.clone();
                thread::spawn(move || {
                    if i % 2 == 0 {
                        cell.value(None)
                    } else {
                        cell.value(Some(Duration::from_secs(10)))
                    }
                })
            })
            .collect();

        thread::sleep(Duration::from_millis(20));
        resolver.fulfill(vec![1, 2, 3]);

        for reader in readers {
            assert_eq!(reader.join().unwrap(), Some(vec![1, 2, 3]));
        }
    }

    #[test]
    fn test_settled_constructors() {
        let ok = ObligationCell::<u8, ()>::fulfilled(1);
        assert_eq!(ok.state(), State::Fulfilled);
        assert_eq!(ok.value(None), Some(1));

        let err = ObligationCell::<u8, &str>::rejected("nope");
        assert_eq!(err.state(), State::Rejected);
        assert_eq!(err.reason(), Some("nope"));
    }

    #[test]
    fn test_complete_from_result() {
        let (resolver, cell) = ObligationCell::<u8, String>::pending();
        resolver.complete(Err("failed".to_string()));
        assert!(cell.is_rejected());
    }

    #[test]
    fn test_dropped_resolver_leaves_pending() {
        let (resolver, cell) = ObligationCell::<u8>::pending();
        drop(resolver);
        assert!(cell.is_pending());
        assert_eq!(cell.value(Some(Duration::from_millis(5))), None);
    }

    #[test]
    fn test_slow_untimed_wait_still_returns_payload() {
        let _guard = SETTINGS.lock();
        configure(&ObligationSettings {
            slow_wait_warn_ms: 5,
        });
        assert_eq!(slow_wait_threshold(), Some(Duration::from_millis(5)));

        let (resolver, cell) = ObligationCell::<u32>::pending();
        let producer = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            resolver.fulfill(9);
        });

        assert_eq!(cell.value(None), Some(9));
        producer.join().unwrap();

        configure(&ObligationSettings::default());
        assert_eq!(
            slow_wait_threshold(),
            Some(Duration::from_millis(DEFAULT_SLOW_WAIT_WARN_MS))
        );
    }

    #[test]
    fn test_zero_threshold_disables_slow_wait_warning() {
        let _guard = SETTINGS.lock();
        configure(&ObligationSettings {
            slow_wait_warn_ms: 0,
        });
        assert_eq!(slow_wait_threshold(), None);

        let (resolver, cell) = ObligationCell::<u32>::pending();
        let producer = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            resolver.fulfill(4);
        });
        assert_eq!(cell.value(None), Some(4));
        producer.join().unwrap();

        configure(&ObligationSettings::default());
    }

    #[tokio::test]
    async fn test_async_reader_wakes() {
        let (resolver, cell) = ObligationCell::<u32>::pending();
        let reader = {
            let cell = cell.clone();
            tokio::spawn(async move { cell.value_async(None).await })
        };

        tokio::task::yield_now().await;
        resolver.fulfill(42);
        assert_eq!(reader.await.unwrap(), Some(42));
    }

    #[tokio::test]
    async fn test_async_timeout() {
        let (_resolver, cell) = ObligationCell::<u32>::pending();
        assert_eq!(cell.value_async(Some(Duration::from_millis(20))).await, None);
    }
}
