//! Dispatch entry point.
//!
//! The [`Dispatcher`] is what the transport layer calls once per decoded
//! event. Each call fans the event out to two independent targets:
//!
//! 1. every collector registered on the shared [`EventHub`] whose predicate
//!    matches (non-blocking, per-collector FIFO), and
//! 2. the composed middleware chain, whose result is returned unchanged.
//!
//! No ordering is guaranteed between collector delivery and chain invocation
//! for the same event, nor between the chain invocations of different events.
//! Callers wanting per-event concurrency spawn `dispatch` in its own task;
//! handlers may subscribe follow-up collectors on [`hub`](Dispatcher::hub)
//! and await them from independently scheduled work.

use std::sync::Arc;

use tracing::{Instrument, Level, span};

use courier_core::{BoxedEvent, Context, EventHub};

use crate::error::HandlerResult;
use crate::handler::BoxedHandler;
use crate::middleware::{Chain, Middleware};

/// Routes decoded inbound events to the middleware chain and the event hub.
pub struct Dispatcher {
    chain: BoxedHandler,
    hub: EventHub,
}

impl Dispatcher {
    /// Starts building a dispatcher.
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::default()
    }

    /// The broadcast source this dispatcher publishes to.
    ///
    /// Handlers subscribe follow-up collectors here.
    pub fn hub(&self) -> &EventHub {
        &self.hub
    }

    /// Dispatches one decoded event.
    ///
    /// Publishes to the hub's collectors, then invokes the chain and returns
    /// its result unchanged. Reporting a failure (user-visible reply, log
    /// sink) is the caller's responsibility.
    pub async fn dispatch(&self, ctx: Arc<Context>, event: BoxedEvent) -> HandlerResult {
        let span = span!(Level::DEBUG, "dispatch", event_name = %event.event_name());
        async {
            self.hub.publish(&event);
            self.chain.handle(ctx, event).await
        }
        .instrument(span)
        .await
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("hub", &self.hub)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Dispatcher`].
///
/// Middlewares are appended in registration order; the first registered is
/// the outermost wrapper. [`handler`](Self::handler) supplies the terminal
/// handler and finishes the build.
#[derive(Default)]
pub struct DispatcherBuilder {
    chain: Chain,
    hub: Option<EventHub>,
}

impl DispatcherBuilder {
    /// Appends a middleware to the chain.
    pub fn middleware(mut self, middleware: impl Middleware + 'static) -> Self {
        self.chain.push(middleware);
        self
    }

    /// Attaches an existing hub, e.g. one shared with other components.
    ///
    /// A fresh hub with default capacity is created if none is attached.
    pub fn hub(mut self, hub: EventHub) -> Self {
        self.hub = Some(hub);
        self
    }

    /// Sets the terminal handler, composes the chain, and builds.
    pub fn handler(self, terminal: BoxedHandler) -> Dispatcher {
        Dispatcher {
            chain: self.chain.build(terminal),
            hub: self.hub.unwrap_or_else(EventHub::new),
        }
    }
}
