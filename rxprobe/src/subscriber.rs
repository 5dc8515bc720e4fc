use std::sync::Arc;

use crate::{Result, Shape, StreamError};

/// The flow-control handle a producer gives its subscriber.
///
/// Cancellation is advisory: a producer checks [`is_cancelled`](Self::is_cancelled)
/// between emissions and stops when it turns true.
pub trait Subscription: Send + Sync {
    /// Signal demand for `n` more values. Producers in this crate do not
    /// apply backpressure, so the default does nothing.
    fn request(&self, n: u64) {
        let _n = n;
    }

    /// Ask the producer to stop emitting.
    fn cancel(&self);

    /// Returns true once [`cancel`](Self::cancel) has been called.
    fn is_cancelled(&self) -> bool;
}

/// Consumer side of the producer contract.
///
/// A producer calls `on_subscribe` exactly once, then `on_next` zero or more
/// times, then at most one of `on_error` / `on_complete`. Each method returns
/// an error when the producer breaks that contract; producers should stop
/// emitting once a signal is rejected.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use rxprobe::{CancelHandle, Probe, Subscriber};
///
/// let probe = Probe::<i32>::new();
/// probe.on_subscribe(Arc::new(CancelHandle::new())).unwrap();
/// probe.on_next(1).unwrap();
/// probe.on_complete().unwrap();
///
/// // The stream is over: further signals are rejected.
/// assert!(probe.on_next(2).is_err());
/// ```
pub trait Subscriber<T>: Send + Sync {
    /// Accept the subscription handle. Must be the first signal.
    fn on_subscribe(&self, subscription: Arc<dyn Subscription>) -> Result;

    /// Deliver one value.
    fn on_next(&self, value: T) -> Result;

    /// Terminate the stream with an error.
    fn on_error(&self, error: StreamError) -> Result;

    /// Terminate the stream normally.
    fn on_complete(&self) -> Result;
}

/// A producer that can be attached to a subscriber.
///
/// The reactive runtime behind a `Publisher` is opaque: it may deliver
/// every signal synchronously inside [`subscribe`](Self::subscribe), or hand
/// the subscriber to another thread or task and return immediately.
pub trait Publisher<T> {
    /// Start delivering signals to `subscriber`.
    fn subscribe(self, subscriber: Arc<dyn Subscriber<T>>);

    /// How many values this producer may emit. Defaults to [`Shape::Flow`].
    fn shape(&self) -> Shape {
        Shape::Flow
    }
}
