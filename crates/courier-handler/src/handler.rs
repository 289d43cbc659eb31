//! The handler abstraction.
//!
//! A [`Handler`] takes the invocation [`Context`] and a decoded event and
//! returns success or a failure. Handlers are constructed once at setup,
//! shared as [`BoxedHandler`]s (so middlewares can hold and delegate to their
//! inner link), and invoked once per matching inbound event.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use courier_core::{BoxedEvent, Context};

use crate::error::HandlerResult;

/// A unit of application logic invoked with one decoded inbound event.
///
/// Implement this directly for stateful handlers, or use [`handler_fn`] to
/// adapt an async closure.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Handles one event.
    ///
    /// Errors propagate unchanged to the dispatch caller unless an outer
    /// middleware explicitly recovers them.
    async fn handle(&self, ctx: Arc<Context>, event: BoxedEvent) -> HandlerResult;
}

/// A shared, type-erased handler.
///
/// `Arc` rather than `Box` because a middleware chain is built once and the
/// links reference each other for the lifetime of the program.
pub type BoxedHandler = Arc<dyn Handler>;

struct FnHandler<F>(F);

#[async_trait]
impl<F, Fut> Handler for FnHandler<F>
where
    F: Fn(Arc<Context>, BoxedEvent) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    async fn handle(&self, ctx: Arc<Context>, event: BoxedEvent) -> HandlerResult {
        (self.0)(ctx, event).await
    }
}

/// Adapts an async closure into a [`BoxedHandler`].
///
/// ```rust,ignore
/// let terminal = handler_fn(|_ctx, event| async move {
///     println!("got {}", event.event_name());
///     Ok(())
/// });
/// ```
pub fn handler_fn<F, Fut>(f: F) -> BoxedHandler
where
    F: Fn(Arc<Context>, BoxedEvent) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    Arc::new(FnHandler(f))
}
