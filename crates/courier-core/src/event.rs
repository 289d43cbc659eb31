//! Decoded inbound events.
//!
//! The transport layer decodes raw gateway payloads into concrete event types
//! and hands them to this core as [`BoxedEvent`]s. Dispatch and collection
//! never inspect payloads beyond the accessors on [`Event`]; everything else
//! is recovered by downcasting at the edges.

use std::any::Any;
use std::sync::Arc;

/// High-level event classification.
///
/// Useful for predicates that filter by category without knowing the concrete
/// event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    /// Chat messages.
    Message,
    /// Interaction or command invocations (slash commands, buttons, menus).
    Interaction,
    /// Connection lifecycle events (ready, resume, heartbeat).
    Meta,
    /// Other/unknown event types.
    Other,
}

/// The base trait for decoded inbound events.
///
/// Events are type-erased as [`BoxedEvent`] while flowing through the hub and
/// the handler chain, and downcast back via [`BoxedEvent::downcast_ref`] where
/// application code needs the concrete type.
///
/// The optional accessors exist so collector predicates can filter on the
/// common routing fields without downcasting; event types without a natural
/// value keep the `None`/`false` defaults.
pub trait Event: Any + Send + Sync {
    /// Returns the human-readable name of this event type.
    fn event_name(&self) -> &'static str;

    /// Returns the high-level classification.
    fn event_type(&self) -> EventType {
        EventType::Other
    }

    /// The channel this event originated in, if any.
    fn channel_id(&self) -> Option<&str> {
        None
    }

    /// The user that caused this event, if any.
    fn sender_id(&self) -> Option<&str> {
        None
    }

    /// Whether the sender is a bot account.
    fn sender_is_bot(&self) -> bool {
        false
    }

    /// Returns a reference to self as `Any` for downcasting.
    fn as_any(&self) -> &dyn Any;
}

/// A type-erased, cheaply clonable event.
///
/// Wraps any [`Event`] in an `Arc` so a single decoded event can fan out to
/// the handler chain and every collector without copying the payload.
/// Implements `Deref<Target = dyn Event>`, so trait methods are callable
/// directly:
///
/// ```rust,ignore
/// let event: BoxedEvent = /* ... */;
/// let name = event.event_name();
/// let from_bot = event.sender_is_bot();
/// ```
#[derive(Clone)]
pub struct BoxedEvent {
    inner: Arc<dyn Event>,
}

impl BoxedEvent {
    /// Creates a new `BoxedEvent` from any type implementing [`Event`].
    pub fn new<E: Event + 'static>(event: E) -> Self {
        Self {
            inner: Arc::new(event),
        }
    }

    /// Returns the inner `Arc<dyn Event>`.
    pub fn inner(&self) -> &Arc<dyn Event> {
        &self.inner
    }

    /// Attempts to downcast to a concrete event type.
    pub fn downcast_ref<E: Event + 'static>(&self) -> Option<&E> {
        self.inner.as_any().downcast_ref()
    }
}

impl std::ops::Deref for BoxedEvent {
    type Target = dyn Event;

    fn deref(&self) -> &Self::Target {
        self.inner.as_ref()
    }
}

impl std::fmt::Debug for BoxedEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxedEvent")
            .field("event_name", &self.event_name())
            .field("event_type", &self.event_type())
            .finish()
    }
}
