use std::{fmt, sync::Arc};

use tokio::runtime::Handle;
use tokio_stream::{Stream, StreamExt};

use crate::{CancelHandle, Publisher, StreamError, Subscriber};

/// Drives an async stream on a Tokio runtime and forwards its items.
///
/// `Ok` items become values, the first `Err` item becomes the error signal,
/// and the end of the stream becomes completion. The task stops as soon as
/// the subscription is cancelled.
pub struct FromStream<S> {
    stream: S,
    handle: Handle,
}

impl<S> fmt::Debug for FromStream<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FromStream").finish_non_exhaustive()
    }
}

impl<S> FromStream<S> {
    pub(crate) fn new(stream: S, handle: Handle) -> Self {
        Self { stream, handle }
    }
}

impl<T, S> Publisher<T> for FromStream<S>
where
    T: Send + 'static,
    S: Stream<Item = Result<T, StreamError>> + Send + 'static,
{
    fn subscribe(self, subscriber: Arc<dyn Subscriber<T>>) {
        let cancel = CancelHandle::new();
        if subscriber.on_subscribe(Arc::new(cancel.clone())).is_err() {
            return;
        }

        let stream = self.stream;
        self.handle.spawn(async move {
            tokio::pin!(stream);
            loop {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {
                        tracing::debug!("stream publisher cancelled");
                        return;
                    }
                    item = stream.next() => match item {
                        Some(Ok(value)) => {
                            if subscriber.on_next(value).is_err() {
                                return;
                            }
                        }
                        Some(Err(error)) => {
                            let _ = subscriber.on_error(error);
                            return;
                        }
                        None => {
                            let _ = subscriber.on_complete();
                            return;
                        }
                    },
                }
            }
        });
    }
}
