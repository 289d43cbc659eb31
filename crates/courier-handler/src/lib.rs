//! # Courier Handler
//!
//! The middleware chain and dispatch entry point of the Courier client
//! library.
//!
//! A [`Handler`] is one unit of application logic invoked with a decoded
//! inbound event. A [`Middleware`] wraps one handler to produce another;
//! an ordered list of middlewares folded over a terminal handler yields the
//! composed [`Chain`]. The [`Dispatcher`] is what the transport layer calls
//! once per decoded event: it fans the event out to the shared
//! [`EventHub`](courier_core::EventHub) (feeding collectors) and then runs
//! the chain.
//!
//! ```text
//! event ──▶ Dispatcher ──▶ mw[0] ─▶ mw[1] ─▶ ... ─▶ terminal
//!               │
//!               └─────────▶ EventHub ─▶ collectors
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use courier_handler::{Dispatcher, Traced, handler_fn};
//!
//! let dispatcher = Dispatcher::builder()
//!     .middleware(Traced::new("root"))
//!     .handler(handler_fn(|_ctx, event| async move {
//!         println!("handling {}", event.event_name());
//!         Ok(())
//!     }));
//!
//! dispatcher.dispatch(ctx, event).await?;
//! ```

pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod middleware;

pub use dispatcher::{Dispatcher, DispatcherBuilder};
pub use error::{BoxError, Cancelled, HandlerResult};
pub use handler::{BoxedHandler, Handler, handler_fn};
pub use middleware::{CancellationGuard, Chain, Middleware, Traced, middleware_fn};
