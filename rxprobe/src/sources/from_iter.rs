use std::{fmt, sync::Arc};

use crate::{CancelHandle, Publisher, StreamError, Subscriber, Subscription, sources::Executor};

/// How a finite fixture stream ends.
#[derive(Debug, Clone)]
enum Terminal {
    Complete,
    Fail(StreamError),
}

/// Emits every item of an iterator, then completes or fails.
///
/// Built by [`from_iter`](super::from_iter), [`just`](super::just),
/// [`empty`](super::empty) and [`fail`](super::fail).
pub struct FromIter<I> {
    items: I,
    terminal: Terminal,
    executor: Executor,
}

impl<I> fmt::Debug for FromIter<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FromIter")
            .field("terminal", &self.terminal)
            .field("executor", &self.executor)
            .finish_non_exhaustive()
    }
}

impl<I> FromIter<I> {
    pub(crate) fn new(items: I) -> Self {
        Self {
            items,
            terminal: Terminal::Complete,
            executor: Executor::Immediate,
        }
    }

    /// End the stream with `error` instead of completing.
    pub fn then_fail(mut self, error: impl Into<StreamError>) -> Self {
        self.terminal = Terminal::Fail(error.into());
        self
    }

    /// Run the emission loop on `executor`.
    pub fn on(mut self, executor: Executor) -> Self {
        self.executor = executor;
        self
    }
}

impl<T, I> Publisher<T> for FromIter<I>
where
    T: Send + 'static,
    I: Iterator<Item = T> + Send + 'static,
{
    fn subscribe(self, subscriber: Arc<dyn Subscriber<T>>) {
        let handle = CancelHandle::new();
        if subscriber.on_subscribe(Arc::new(handle.clone())).is_err() {
            return;
        }

        let FromIter {
            items,
            terminal,
            executor,
        } = self;
        executor.execute(move || emit(items, terminal, handle, subscriber));
    }
}

fn emit<T, I>(
    items: I,
    terminal: Terminal,
    handle: CancelHandle,
    subscriber: Arc<dyn Subscriber<T>>,
) where
    I: Iterator<Item = T>,
{
    for item in items {
        if handle.is_cancelled() {
            tracing::debug!("fixture stream cancelled before exhausting its items");
            return;
        }
        if subscriber.on_next(item).is_err() {
            return;
        }
    }
    if handle.is_cancelled() {
        return;
    }
    // A rejected terminal signal is already recorded by the subscriber.
    let _ = match terminal {
        Terminal::Complete => subscriber.on_complete(),
        Terminal::Fail(error) => subscriber.on_error(error),
    };
}
