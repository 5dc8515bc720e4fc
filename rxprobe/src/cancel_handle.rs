use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use tokio_util::sync::CancellationToken;

use crate::Subscription;

/// A [`Subscription`] backed by a [`CancellationToken`].
///
/// Clones share the token, so a producer keeps one clone to observe
/// cancellation while the subscriber holds another. Async producers can
/// `select!` on [`cancelled`](Self::cancelled).
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    token: CancellationToken,
    requested: Arc<AtomicU64>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Completes when the subscription is cancelled.
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }

    /// Total demand signalled through [`Subscription::request`].
    pub fn requested(&self) -> u64 {
        self.requested.load(Ordering::Acquire)
    }
}

impl Subscription for CancelHandle {
    fn request(&self, n: u64) {
        // Saturate like reactive-streams demand accounting.
        let _ = self
            .requested
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                Some(current.saturating_add(n))
            });
    }

    fn cancel(&self) {
        self.token.cancel();
    }

    fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}
