//! Predicate-filtered event collection.
//!
//! A [`Collector`] is one active subscription on an
//! [`EventHub`](crate::hub::EventHub): a private,
//! ordered, lazily consumed sequence of the events its predicate matched.
//! Cancellation is explicit and idempotent; after [`cancel`](Collector::cancel)
//! the stream is at end-of-stream and reads never block, even when pre-cancel
//! events are still buffered.
//!
//! # Bounded Collection
//!
//! The typical pattern reads in a loop and cancels once an application-defined
//! stop condition is reached:
//!
//! ```rust,ignore
//! let mut replies = hub.subscribe(move |e: &BoxedEvent| {
//!     e.channel_id() == Some(channel) && !e.sender_is_bot()
//! });
//!
//! let mut count = 0;
//! while let Some(event) = replies.next().await {
//!     count += 1;
//!     if count >= 10 {
//!         replies.cancel();
//!     }
//! }
//! ```
//!
//! There are no implicit timeouts. To bound a wait in time, race
//! [`next`](Collector::next) against a timer and cancel on expiry, or hand a
//! [`CancelHandle`] to a supervising task.

use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc;

use crate::event::BoxedEvent;
use crate::hub::HubInner;

/// One active, cancellable subscription on an [`EventHub`](crate::hub::EventHub).
///
/// Owns the receive side of its delivery channel exclusively. Dropping a
/// collector without cancelling is fine; the hub prunes the subscription the
/// next time it tries to deliver.
pub struct Collector {
    rx: mpsc::Receiver<BoxedEvent>,
    handle: CancelHandle,
}

impl Collector {
    pub(crate) fn new(rx: mpsc::Receiver<BoxedEvent>, handle: CancelHandle) -> Self {
        Self { rx, handle }
    }

    /// Waits for the next matching event.
    ///
    /// Returns `None` at end-of-stream: after [`cancel`](Self::cancel), or
    /// once the hub has shut down and the buffer is drained. Never blocks
    /// after cancellation.
    pub async fn next(&mut self) -> Option<BoxedEvent> {
        if self.handle.is_cancelled() {
            self.rx.close();
            return None;
        }
        match self.rx.recv().await {
            // An event may still be buffered when cancel() raced us; honour
            // the cancellation rather than the buffer.
            Some(_) if self.handle.is_cancelled() => None,
            other => other,
        }
    }

    /// Cancels this subscription.
    ///
    /// Idempotent: the first call unsubscribes from the hub, later calls do
    /// nothing. No event published after this returns is ever delivered.
    pub fn cancel(&self) {
        self.handle.cancel();
    }

    /// Returns `true` once the subscription has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.handle.is_cancelled()
    }

    /// Returns a detached handle that can cancel this collector from another
    /// task, e.g. on timeout or shutdown.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.handle.clone()
    }
}

impl Stream for Collector {
    type Item = BoxedEvent;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<BoxedEvent>> {
        let this = self.get_mut();
        if this.handle.is_cancelled() {
            return Poll::Ready(None);
        }
        match this.rx.poll_recv(cx) {
            Poll::Ready(Some(_)) if this.handle.is_cancelled() => Poll::Ready(None),
            other => other,
        }
    }
}

impl std::fmt::Debug for Collector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collector")
            .field("cancelled", &self.is_cancelled())
            .finish_non_exhaustive()
    }
}

/// Cancels a [`Collector`] from outside its consuming task.
///
/// Holds only a weak hub reference, so an outstanding handle never keeps a
/// hub (or its subscriber registry) alive.
#[derive(Clone)]
pub struct CancelHandle {
    inner: Arc<CancelInner>,
}

struct CancelInner {
    hub: Weak<HubInner>,
    id: u64,
    cancelled: AtomicBool,
}

impl CancelHandle {
    pub(crate) fn new(hub: Weak<HubInner>, id: u64) -> Self {
        Self {
            inner: Arc::new(CancelInner {
                hub,
                id,
                cancelled: AtomicBool::new(false),
            }),
        }
    }

    /// Cancels the collector. Idempotent; the unsubscribe runs exactly once.
    pub fn cancel(&self) {
        if self.inner.cancelled.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Some(hub) = self.inner.hub.upgrade() {
            hub.unsubscribe(self.inner.id);
        }
    }

    /// Returns `true` once [`cancel`](Self::cancel) has run.
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for CancelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancelHandle")
            .field("collector", &self.inner.id)
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
