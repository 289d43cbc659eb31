//! Error types for handler-chain dispatch.
//!
//! Handler failures are ordinary return values, not a separate control
//! channel. The chain never wraps or suppresses them; whatever a middleware
//! or the terminal handler returns reaches the dispatch caller unchanged.

use thiserror::Error;

/// Boxed error type carried through the chain.
///
/// Application handlers return their own error types boxed into this, and the
/// dispatch caller decides how to report them.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type returned by handlers and middlewares.
pub type HandlerResult = Result<(), BoxError>;

/// Returned when a chain link observes that the invocation context was
/// cancelled and declines to do further work.
///
/// Dispatch callers that treat cancellation as routine can match on this and
/// skip error reporting.
#[derive(Debug, Clone, Error)]
#[error("event handling cancelled")]
pub struct Cancelled;
