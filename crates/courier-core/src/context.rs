//! Invocation context.
//!
//! One [`Context`] accompanies each inbound event through the handler chain.
//! It carries advisory cancellation: middlewares and handlers are expected to
//! check it before expensive work, but nothing in the chain enforces it.

use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};

/// Per-invocation context handed to the handler chain.
///
/// Cancellation is cooperative. The transport layer (or a supervising task)
/// calls [`cancel`](Self::cancel); chain links observe it via
/// [`is_cancelled`](Self::is_cancelled) or await [`cancelled`](Self::cancelled).
#[derive(Debug, Default, Clone)]
pub struct Context {
    token: CancellationToken,
}

impl Context {
    /// Creates a fresh, uncancelled context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context driven by an externally owned token.
    ///
    /// Cancelling `token` cancels this context and every child derived from it.
    pub fn from_token(token: CancellationToken) -> Self {
        Self { token }
    }

    /// Requests cancellation of this invocation.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Returns `true` once cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Completes when cancellation is requested.
    pub fn cancelled(&self) -> WaitForCancellationFuture<'_> {
        self.token.cancelled()
    }

    /// Derives a child context that is cancelled when this one is, but can
    /// also be cancelled independently.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
        }
    }

    /// Returns the underlying token, for racing against timers or shutdown.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_uncancelled() {
        let ctx = Context::new();
        assert!(!ctx.is_cancelled());
        ctx.cancel();
        assert!(ctx.is_cancelled());
    }

    #[test]
    fn child_follows_parent() {
        let parent = Context::new();
        let child = parent.child();
        parent.cancel();
        assert!(child.is_cancelled());
    }

    #[test]
    fn child_cancellation_does_not_reach_parent() {
        let parent = Context::new();
        let child = parent.child();
        child.cancel();
        assert!(!parent.is_cancelled());
    }

    #[tokio::test]
    async fn cancelled_future_resolves() {
        let ctx = Context::new();
        let waiter = ctx.clone();
        let task = tokio::spawn(async move { waiter.cancelled().await });
        ctx.cancel();
        task.await.unwrap();
    }
}
