//! # Courier Core
//!
//! Foundation types for the Courier client library: the event-dispatch core
//! that sits between a decoded gateway event stream and application code.
//!
//! This crate deliberately knows nothing about the wire protocol, the REST
//! surface, or the full domain model. It provides:
//!
//! - **Cache flags** ([`CacheFlags`]) — a bitset that configures which entity
//!   categories the cache layer retains. The cache itself lives elsewhere;
//!   this crate only supplies the compose/query algebra.
//! - **Events** ([`Event`], [`BoxedEvent`]) — the type-erased decoded event
//!   that flows through dispatch and collection.
//! - **Context** ([`Context`]) — per-invocation advisory cancellation.
//! - **Event hub** ([`EventHub`]) — the broadcast source. Every inbound event
//!   fans out to all registered subscribers.
//! - **Collectors** ([`Collector`]) — predicate-filtered, cancellable
//!   subscriptions yielding a private ordered stream of matching events.
//!
//! ## Event Flow
//!
//! ```text
//! ┌───────────┐     ┌──────────┐     ┌─────────────┐
//! │  Gateway  │────▶│ EventHub │────▶│ Collector 1 │
//! │ (decoded) │     │          │────▶│ Collector 2 │
//! └───────────┘     └──────────┘────▶│     ...     │
//!                                    └─────────────┘
//! ```
//!
//! Handler-chain dispatch lives in the `courier-handler` crate; it shares the
//! same hub so handlers can subscribe follow-up collectors.
//!
//! ## Example
//!
//! ```rust,ignore
//! use courier_core::{BoxedEvent, EventHub, EventType};
//!
//! let hub = EventHub::new();
//! let mut collector = hub.subscribe(|e: &BoxedEvent| {
//!     e.event_type() == EventType::Message && !e.sender_is_bot()
//! });
//!
//! while let Some(event) = collector.next().await {
//!     println!("got {}", event.event_name());
//!     collector.cancel();
//! }
//! ```

pub mod cache;
pub mod collector;
pub mod context;
pub mod event;
pub mod hub;

pub use cache::CacheFlags;
pub use collector::{CancelHandle, Collector};
pub use context::Context;
pub use event::{BoxedEvent, Event, EventType};
pub use hub::{DEFAULT_COLLECTOR_CAPACITY, EventHub};

/// Prelude for common imports.
pub mod prelude {
    pub use super::cache::CacheFlags;
    pub use super::collector::{CancelHandle, Collector};
    pub use super::context::Context;
    pub use super::event::{BoxedEvent, Event, EventType};
    pub use super::hub::EventHub;
}
