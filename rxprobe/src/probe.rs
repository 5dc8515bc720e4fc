use std::{
    fmt,
    sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use tokio::sync::Notify;

use crate::{
    Error, ProbeConfig, ProbeId, Publisher, Result, Shape, Signal, Snapshot, StreamError,
    Subscriber, Subscription,
};

/// A passive consumer that records every signal its producer delivers.
///
/// `Probe` is a cheap handle over shared state: clone it, give one clone to
/// the producer, and keep another for assertions. Recording is safe from any
/// thread; readers always see a consistent snapshot because every signal is
/// written under a single lock.
///
/// ```ignore
/// let probe = rxprobe::attach(sources::from_iter([1, 2, 3]));
///
/// // Later, from any thread:
/// probe.await_terminal(Duration::from_secs(1));
/// assert_eq!(probe.values(), vec![1, 2, 3]);
/// ```
///
/// Contract violations by the producer (double subscription, signals before
/// the handshake or after the terminal signal, more values than the
/// [`Shape`] allows) are rejected, logged and kept; they never alter the
/// recorded stream.
pub struct Probe<T> {
    inner: Arc<ProbeInner<T>>,
}

struct ProbeInner<T> {
    id: ProbeId,
    shape: Shape,
    config: ProbeConfig,
    state: Mutex<ProbeState<T>>,
    terminated: Condvar,
    notify: Notify,
}

pub(crate) struct ProbeState<T> {
    pub(crate) values: Vec<T>,
    pub(crate) error: Option<StreamError>,
    pub(crate) completed: bool,
    pub(crate) subscription: Option<Arc<dyn Subscription>>,
    pub(crate) cancelled: bool,
    pub(crate) violations: Vec<Error>,
}

impl<T> ProbeState<T> {
    pub(crate) fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    pub(crate) fn is_terminated(&self) -> bool {
        self.error.is_some() || self.completed
    }

    fn check_signal(&self, signal: Signal) -> Result {
        if !self.is_subscribed() {
            return Err(Error::SignalBeforeSubscribe { signal });
        }
        if self.is_terminated() {
            return Err(Error::TerminalStateViolation { signal });
        }
        Ok(())
    }
}

impl<T> Clone for Probe<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Default for Probe<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Probe<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("Probe")
            .field("id", &self.inner.id)
            .field("shape", &self.inner.shape)
            .field("values", &state.values.len())
            .field("error", &state.error.is_some())
            .field("completed", &state.completed)
            .field("subscribed", &state.is_subscribed())
            .finish_non_exhaustive()
    }
}

impl<T> Probe<T> {
    /// Create an empty, unsubscribed probe for a multi-value stream.
    pub fn new() -> Self {
        Self::with_config(Shape::Flow, ProbeConfig::default())
    }

    /// Create an empty probe for a producer of the given shape.
    pub fn with_shape(shape: Shape) -> Self {
        Self::with_config(shape, ProbeConfig::default())
    }

    pub fn with_config(shape: Shape, config: ProbeConfig) -> Self {
        Self {
            inner: Arc::new(ProbeInner {
                id: ProbeId::new(),
                shape,
                config,
                state: Mutex::new(ProbeState {
                    values: Vec::new(),
                    error: None,
                    completed: false,
                    subscription: None,
                    cancelled: false,
                    violations: Vec::new(),
                }),
                terminated: Condvar::new(),
                notify: Notify::new(),
            }),
        }
    }

    // A panicking assertion closure must not make the probe unreadable.
    fn lock(&self) -> MutexGuard<'_, ProbeState<T>> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` against the current state while holding the lock.
    pub(crate) fn inspect<R>(&self, f: impl FnOnce(&ProbeState<T>) -> R) -> R {
        f(&self.lock())
    }

    // ==================== Accessors ====================

    pub fn id(&self) -> ProbeId {
        self.inner.id
    }

    pub fn shape(&self) -> Shape {
        self.inner.shape
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.inner.config
    }

    /// Returns true once the producer handed over its subscription.
    pub fn is_subscribed(&self) -> bool {
        self.lock().is_subscribed()
    }

    /// Returns true once an error or completion was recorded.
    pub fn is_terminated(&self) -> bool {
        self.lock().is_terminated()
    }

    /// Returns true once the probe asked its producer to stop.
    pub fn is_cancelled(&self) -> bool {
        self.lock().cancelled
    }

    pub fn value_count(&self) -> usize {
        self.lock().values.len()
    }

    /// The recorded error, if the stream failed.
    pub fn error(&self) -> Option<StreamError> {
        self.lock().error.clone()
    }

    /// Protocol violations committed by the producer, in the order they happened.
    pub fn violations(&self) -> Vec<Error> {
        self.lock().violations.clone()
    }

    // ==================== Waiting ====================

    /// Block the calling thread until the stream terminates or `timeout` elapses.
    ///
    /// Returns true if a terminal signal was recorded. On timeout the
    /// subscription is cancelled (unless disabled in [`ProbeConfig`]) and
    /// false is returned; a timeout is never an error.
    ///
    /// Do not call this from a single-threaded runtime that also drives the
    /// producer; use [`await_terminal_async`](Self::await_terminal_async) there.
    pub fn await_terminal(&self, timeout: Duration) -> bool {
        let guard = self.lock();
        let (guard, _) = self
            .inner
            .terminated
            .wait_timeout_while(guard, timeout, |state| !state.is_terminated())
            .unwrap_or_else(PoisonError::into_inner);
        let terminated = guard.is_terminated();
        drop(guard);

        if !terminated {
            self.timed_out(timeout);
        }
        terminated
    }

    /// Wait cooperatively until the stream terminates or `timeout` elapses.
    ///
    /// Same outcome as [`await_terminal`](Self::await_terminal), without
    /// blocking the executor thread.
    pub async fn await_terminal_async(&self, timeout: Duration) -> bool {
        let wait = async {
            loop {
                let notified = self.inner.notify.notified();
                tokio::pin!(notified);
                // Register before checking so a terminal signal in between is not missed.
                notified.as_mut().enable();
                if self.is_terminated() {
                    return;
                }
                notified.await;
            }
        };

        if tokio::time::timeout(timeout, wait).await.is_ok() {
            return true;
        }
        // The producer may have terminated right at the deadline.
        let terminated = self.is_terminated();
        if !terminated {
            self.timed_out(timeout);
        }
        terminated
    }

    fn timed_out(&self, timeout: Duration) {
        tracing::debug!(probe = %self.inner.id, ?timeout, "no terminal signal before timeout");
        if self.inner.config.cancel_on_timeout() {
            self.cancel();
        }
    }

    /// Ask the producer to stop emitting.
    ///
    /// Best effort: the producer may already be done. A probe cancelled
    /// before it is subscribed cancels the subscription it receives later.
    pub fn cancel(&self) {
        let subscription = {
            let mut state = self.lock();
            state.cancelled = true;
            state.subscription.clone()
        };
        tracing::debug!(probe = %self.inner.id, "cancelling subscription");
        if let Some(subscription) = subscription {
            subscription.cancel();
        }
    }

    // ==================== Recording ====================

    /// Record a single eventual value: `on_next` followed by `on_complete`.
    pub fn on_success(&self, value: T) -> Result {
        self.record_next(value)?;
        self.record_complete()
    }

    fn reject(&self, state: &mut ProbeState<T>, error: Error) -> Result {
        tracing::error!(
            probe = %self.inner.id,
            %error,
            "producer violated the subscriber contract"
        );
        state.violations.push(error.clone());
        Err(error)
    }

    fn record_subscribe(&self, subscription: Arc<dyn Subscription>) -> Result {
        let mut state = self.lock();
        if state.is_subscribed() {
            drop(state);
            subscription.cancel();
            let mut state = self.lock();
            return self.reject(&mut state, Error::DoubleSubscription);
        }
        let cancelled = state.cancelled;
        state.subscription = Some(subscription.clone());
        drop(state);

        tracing::trace!(probe = %self.inner.id, "subscribed");
        if cancelled {
            subscription.cancel();
        }
        Ok(())
    }

    fn record_next(&self, value: T) -> Result {
        let mut state = self.lock();
        if let Err(error) = state.check_signal(Signal::Next) {
            return self.reject(&mut state, error);
        }
        if !self.inner.shape.accepts_value_after(state.values.len()) {
            let error = Error::ShapeViolation {
                shape: self.inner.shape,
                signal: Signal::Next,
            };
            return self.reject(&mut state, error);
        }
        state.values.push(value);
        tracing::trace!(probe = %self.inner.id, index = state.values.len() - 1, "value recorded");
        Ok(())
    }

    fn record_error(&self, error: StreamError) -> Result {
        let mut state = self.lock();
        if let Err(violation) = state.check_signal(Signal::Error) {
            return self.reject(&mut state, violation);
        }
        tracing::debug!(probe = %self.inner.id, %error, "stream failed");
        state.error = Some(error);
        drop(state);
        self.wake_waiters();
        Ok(())
    }

    fn record_complete(&self) -> Result {
        let mut state = self.lock();
        if let Err(violation) = state.check_signal(Signal::Complete) {
            return self.reject(&mut state, violation);
        }
        if self.inner.shape == Shape::Single && state.values.is_empty() {
            let error = Error::ShapeViolation {
                shape: Shape::Single,
                signal: Signal::Complete,
            };
            return self.reject(&mut state, error);
        }
        tracing::debug!(probe = %self.inner.id, values = state.values.len(), "stream completed");
        state.completed = true;
        drop(state);
        self.wake_waiters();
        Ok(())
    }

    // Called after the lock is released; waiters re-check state under the lock.
    fn wake_waiters(&self) {
        self.inner.terminated.notify_all();
        self.inner.notify.notify_waiters();
    }
}

impl<T: Clone> Probe<T> {
    /// Returns a copy of the recorded values, in arrival order.
    pub fn values(&self) -> Vec<T> {
        self.lock().values.clone()
    }

    /// Returns a copy of the whole recorded state.
    pub fn snapshot(&self) -> Snapshot<T> {
        let state = self.lock();
        Snapshot {
            probe: self.inner.id,
            shape: self.inner.shape,
            values: state.values.clone(),
            error: state.error.clone(),
            completed: state.completed,
            subscribed: state.is_subscribed(),
            cancelled: state.cancelled,
            violations: state.violations.len(),
        }
    }
}

impl<T: Send> Subscriber<T> for Probe<T> {
    fn on_subscribe(&self, subscription: Arc<dyn Subscription>) -> Result {
        self.record_subscribe(subscription)
    }

    fn on_next(&self, value: T) -> Result {
        self.record_next(value)
    }

    fn on_error(&self, error: StreamError) -> Result {
        self.record_error(error)
    }

    fn on_complete(&self) -> Result {
        self.record_complete()
    }
}

/// Attach a new probe to `publisher`, shaped after the publisher.
///
/// Depending on the publisher this may deliver every signal before it
/// returns, or start delivering on another thread or task.
pub fn attach<T, P>(publisher: P) -> Probe<T>
where
    T: Send + 'static,
    P: Publisher<T>,
{
    attach_with(publisher, ProbeConfig::default())
}

/// Like [`attach`], with an explicit probe configuration.
pub fn attach_with<T, P>(publisher: P, config: ProbeConfig) -> Probe<T>
where
    T: Send + 'static,
    P: Publisher<T>,
{
    let probe = Probe::with_config(publisher.shape(), config);
    tracing::debug!(probe = %probe.id(), shape = %probe.shape(), "attaching probe");
    publisher.subscribe(Arc::new(probe.clone()));
    probe
}
