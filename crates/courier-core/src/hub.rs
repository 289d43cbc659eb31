//! Broadcast source for decoded events.
//!
//! The [`EventHub`] owns the subscriber registry. The transport layer calls
//! [`publish`](EventHub::publish) once per decoded event; the hub evaluates
//! each subscriber's predicate exactly once and forwards matches over that
//! subscriber's private channel. Subscribers never block each other.
//!
//! # Buffering Policy
//!
//! Each collector gets a bounded channel ([`DEFAULT_COLLECTOR_CAPACITY`]
//! events unless overridden with [`EventHub::with_capacity`]). Delivery uses
//! `try_send`: when a collector's buffer is full the event is **dropped for
//! that collector only** (drop-newest) and a warning is logged. Slow
//! consumers lose events rather than stalling the broadcast loop.
//!
//! # Predicate Failures
//!
//! A predicate that panics counts as a non-match. The panic is caught, logged,
//! and delivery to the remaining subscribers continues. Predicates run while
//! the registry lock is held and must not call back into the hub.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, trace, warn};

use crate::collector::{CancelHandle, Collector};
use crate::event::BoxedEvent;

/// Default per-collector buffer capacity, in events.
pub const DEFAULT_COLLECTOR_CAPACITY: usize = 64;

struct Subscriber {
    id: u64,
    predicate: Box<dyn Fn(&BoxedEvent) -> bool + Send + Sync>,
    tx: mpsc::Sender<BoxedEvent>,
}

pub(crate) struct HubInner {
    subscribers: Mutex<Vec<Subscriber>>,
    next_id: AtomicU64,
    closed: AtomicBool,
    capacity: usize,
}

impl HubInner {
    /// Removes the subscriber with the given id, dropping its send side.
    ///
    /// Safe to call concurrently with `publish`; once this returns, no
    /// further event is delivered to that subscriber.
    pub(crate) fn unsubscribe(&self, id: u64) {
        let mut subscribers = self.subscribers.lock();
        let before = subscribers.len();
        subscribers.retain(|sub| sub.id != id);
        if subscribers.len() < before {
            trace!(collector = id, "collector unsubscribed");
        }
    }
}

/// The broadcast source every inbound event fans out from.
///
/// Constructed once at setup and handed by clone to everything that publishes
/// or subscribes — clones share one registry, and there is no process-wide
/// singleton. Subscribers can be added and removed concurrently with
/// delivery; the registry is guarded by its own mutex.
#[derive(Clone)]
pub struct EventHub {
    inner: Arc<HubInner>,
}

impl EventHub {
    /// Creates a hub with the default per-collector capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_COLLECTOR_CAPACITY)
    }

    /// Creates a hub whose collectors buffer up to `capacity` events each.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "collector capacity must be non-zero");
        Self {
            inner: Arc::new(HubInner {
                subscribers: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(0),
                closed: AtomicBool::new(false),
                capacity,
            }),
        }
    }

    /// Registers `predicate` and returns a collector for the matching events.
    ///
    /// Subscribing to a hub that has already shut down yields a collector
    /// that is immediately at end-of-stream.
    ///
    /// The predicate runs inside [`publish`](Self::publish) while the
    /// registry lock is held; it must not call back into the hub.
    pub fn subscribe<P>(&self, predicate: P) -> Collector
    where
        P: Fn(&BoxedEvent) -> bool + Send + Sync + 'static,
    {
        let (tx, rx) = mpsc::channel(self.inner.capacity);
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let handle = CancelHandle::new(Arc::downgrade(&self.inner), id);

        // `closed` only flips while the registry lock is held, so checking it
        // under the same lock makes the check-and-push atomic with respect to
        // `shutdown`: a subscriber is either drained by shutdown or refused
        // here, never stranded in a registry that is no longer serviced.
        let mut subscribers = self.inner.subscribers.lock();
        if self.inner.closed.load(Ordering::SeqCst) {
            // tx dropped here; the collector observes end-of-stream at once.
            return Collector::new(rx, handle);
        }
        subscribers.push(Subscriber {
            id,
            predicate: Box::new(predicate),
            tx,
        });
        drop(subscribers);

        trace!(collector = id, "collector subscribed");
        Collector::new(rx, handle)
    }

    /// Fans `event` out to every subscriber whose predicate matches.
    ///
    /// Non-blocking: a full buffer drops the event for that subscriber only.
    /// Subscribers whose receiving side has gone away are pruned here.
    pub fn publish(&self, event: &BoxedEvent) {
        if self.inner.closed.load(Ordering::SeqCst) {
            return;
        }

        self.inner.subscribers.lock().retain(|sub| {
            let matched = catch_unwind(AssertUnwindSafe(|| (sub.predicate)(event)))
                .unwrap_or_else(|_| {
                    warn!(collector = sub.id, "collector predicate panicked, treated as non-match");
                    false
                });
            if !matched {
                return true;
            }

            match sub.tx.try_send(event.clone()) {
                Ok(()) => true,
                Err(TrySendError::Full(_)) => {
                    warn!(collector = sub.id, "collector buffer full, dropping event");
                    true
                }
                Err(TrySendError::Closed(_)) => {
                    trace!(collector = sub.id, "collector gone, pruning subscription");
                    false
                }
            }
        });
    }

    /// Shuts the hub down: all collectors observe end-of-stream and later
    /// [`publish`](Self::publish) / [`subscribe`](Self::subscribe) calls
    /// become no-ops.
    pub fn shutdown(&self) {
        let dropped = {
            let mut subscribers = self.inner.subscribers.lock();
            self.inner.closed.store(true, Ordering::SeqCst);
            std::mem::take(&mut *subscribers)
        };
        debug!(collectors = dropped.len(), "event hub shut down");
    }

    /// Returns `true` once [`shutdown`](Self::shutdown) has run.
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    /// Number of currently registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.lock().len()
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventHub")
            .field("subscriber_count", &self.subscriber_count())
            .field("capacity", &self.inner.capacity)
            .field("closed", &self.is_closed())
            .finish()
    }
}
