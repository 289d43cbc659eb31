//! Middleware composition.
//!
//! A [`Middleware`] transforms one [`BoxedHandler`] into another. An ordered
//! list of middlewares plus a terminal handler deterministically produces a
//! single composed handler: [`Chain::build`] folds right-to-left, so the
//! first-registered middleware is the outermost wrapper — it runs first on
//! entry and last on exit.
//!
//! Each middleware decides per invocation whether to call its inner handler
//! (continue) or return without delegating (short-circuit), and whether to
//! swap the context or event before delegating. The chain mandates no
//! recovery behaviour: errors flow outward unchanged unless a middleware
//! catches them.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{Instrument, Level, span, warn};

use courier_core::{BoxedEvent, Context};

use crate::error::{Cancelled, HandlerResult};
use crate::handler::{BoxedHandler, Handler};

/// A transformation from handler to handler.
///
/// Implement this for named middlewares; use [`middleware_fn`] to adapt an
/// ad-hoc closure.
pub trait Middleware: Send + Sync {
    /// Wraps `next`, returning the new outer handler.
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler;
}

struct MiddlewareFn<F>(F);

impl<F> Middleware for MiddlewareFn<F>
where
    F: Fn(BoxedHandler) -> BoxedHandler + Send + Sync,
{
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        (self.0)(next)
    }
}

/// Adapts a `Fn(BoxedHandler) -> BoxedHandler` closure into a [`Middleware`].
///
/// ```rust,ignore
/// chain.push(middleware_fn(|next: BoxedHandler| {
///     handler_fn(move |ctx, event| {
///         let next = next.clone();
///         async move {
///             tracing::debug!("before");
///             let res = next.handle(ctx, event).await;
///             tracing::debug!("after");
///             res
///         }
///     })
/// }));
/// ```
pub fn middleware_fn<F>(f: F) -> impl Middleware
where
    F: Fn(BoxedHandler) -> BoxedHandler + Send + Sync,
{
    MiddlewareFn(f)
}

/// An ordered middleware list.
///
/// A chain is a static composition artifact: assembled at setup, folded over
/// a terminal handler with [`build`](Self::build), then invoked repeatedly.
#[derive(Default, Clone)]
pub struct Chain {
    middlewares: Vec<Arc<dyn Middleware>>,
}

impl Chain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a middleware. Registration order is execution order on entry.
    pub fn push(&mut self, middleware: impl Middleware + 'static) {
        self.middlewares.push(Arc::new(middleware));
    }

    /// Appends a middleware (builder pattern).
    pub fn with(mut self, middleware: impl Middleware + 'static) -> Self {
        self.push(middleware);
        self
    }

    /// Returns the number of registered middlewares.
    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    /// Returns `true` if no middleware is registered.
    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }

    /// Folds the chain over `terminal`, right-to-left.
    ///
    /// With middlewares `[a, b]` the result is `a(b(terminal))`: `a` enters
    /// first and exits last.
    pub fn build(&self, terminal: BoxedHandler) -> BoxedHandler {
        self.middlewares
            .iter()
            .rev()
            .fold(terminal, |inner, middleware| middleware.wrap(inner))
    }
}

impl std::fmt::Debug for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chain").field("len", &self.len()).finish()
    }
}

// =============================================================================
// Built-in middlewares
// =============================================================================

/// Middleware that runs the inner handler inside a tracing span and logs
/// failures before propagating them.
pub struct Traced {
    name: &'static str,
}

impl Traced {
    /// Creates a tracing middleware labelled `name`.
    pub fn new(name: &'static str) -> Self {
        Self { name }
    }
}

impl Middleware for Traced {
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        Arc::new(TracedHandler {
            name: self.name,
            inner: next,
        })
    }
}

struct TracedHandler {
    name: &'static str,
    inner: BoxedHandler,
}

#[async_trait]
impl Handler for TracedHandler {
    async fn handle(&self, ctx: Arc<Context>, event: BoxedEvent) -> HandlerResult {
        let span = span!(
            Level::DEBUG,
            "handle",
            handler = self.name,
            event_name = %event.event_name(),
        );
        let result = self.inner.handle(ctx, event).instrument(span).await;
        if let Err(err) = &result {
            warn!(handler = self.name, error = %err, "handler failed");
        }
        result
    }
}

/// Middleware that short-circuits with [`Cancelled`] when the invocation
/// context is already cancelled, sparing the inner links the work.
#[derive(Default, Clone, Copy)]
pub struct CancellationGuard;

impl Middleware for CancellationGuard {
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        Arc::new(CancellationGuardHandler { inner: next })
    }
}

struct CancellationGuardHandler {
    inner: BoxedHandler,
}

#[async_trait]
impl Handler for CancellationGuardHandler {
    async fn handle(&self, ctx: Arc<Context>, event: BoxedEvent) -> HandlerResult {
        if ctx.is_cancelled() {
            return Err(Cancelled.into());
        }
        self.inner.handle(ctx, event).await
    }
}
