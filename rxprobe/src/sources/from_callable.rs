use std::{fmt, sync::Arc};

use crate::{
    CancelHandle, Publisher, Shape, StreamError, Subscriber, Subscription, sources::Executor,
};

/// Computes one value, then completes; a failed computation becomes the error signal.
pub struct FromCallable<F> {
    callable: F,
    executor: Executor,
}

/// Computes zero or one value, then completes.
pub struct FromOptional<F> {
    callable: F,
    executor: Executor,
}

/// Runs a side effect and completes without values.
pub struct FromAction<F> {
    action: F,
    executor: Executor,
}

macro_rules! executor_builder {
    ($ty:ident, $field:ident) => {
        impl<F> $ty<F> {
            pub(crate) fn new($field: F) -> Self {
                Self {
                    $field,
                    executor: Executor::Immediate,
                }
            }

            /// Run the computation on `executor`.
            pub fn on(mut self, executor: Executor) -> Self {
                self.executor = executor;
                self
            }
        }

        impl<F> fmt::Debug for $ty<F> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($ty))
                    .field("executor", &self.executor)
                    .finish_non_exhaustive()
            }
        }
    };
}

executor_builder!(FromCallable, callable);
executor_builder!(FromOptional, callable);
executor_builder!(FromAction, action);

/// Subscribe synchronously, then run `job` on `executor` unless cancelled meanwhile.
fn run<T, J>(executor: &Executor, subscriber: Arc<dyn Subscriber<T>>, job: J)
where
    T: 'static,
    J: FnOnce(&dyn Subscriber<T>) + Send + 'static,
{
    let handle = CancelHandle::new();
    if subscriber.on_subscribe(Arc::new(handle.clone())).is_err() {
        return;
    }
    executor.execute(move || {
        if handle.is_cancelled() {
            tracing::debug!("fixture computation cancelled before it started");
            return;
        }
        job(subscriber.as_ref());
    });
}

impl<T, F> Publisher<T> for FromCallable<F>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, StreamError> + Send + 'static,
{
    fn subscribe(self, subscriber: Arc<dyn Subscriber<T>>) {
        let callable = self.callable;
        run(&self.executor, subscriber, move |subscriber| {
            let _ = match callable() {
                Ok(value) => subscriber
                    .on_next(value)
                    .and_then(|()| subscriber.on_complete()),
                Err(error) => subscriber.on_error(error),
            };
        });
    }

    fn shape(&self) -> Shape {
        Shape::Single
    }
}

impl<T, F> Publisher<T> for FromOptional<F>
where
    T: Send + 'static,
    F: FnOnce() -> Result<Option<T>, StreamError> + Send + 'static,
{
    fn subscribe(self, subscriber: Arc<dyn Subscriber<T>>) {
        let callable = self.callable;
        run(&self.executor, subscriber, move |subscriber| {
            let _ = match callable() {
                Ok(Some(value)) => subscriber
                    .on_next(value)
                    .and_then(|()| subscriber.on_complete()),
                Ok(None) => subscriber.on_complete(),
                Err(error) => subscriber.on_error(error),
            };
        });
    }

    fn shape(&self) -> Shape {
        Shape::Maybe
    }
}

impl<F> Publisher<()> for FromAction<F>
where
    F: FnOnce() -> Result<(), StreamError> + Send + 'static,
{
    fn subscribe(self, subscriber: Arc<dyn Subscriber<()>>) {
        let action = self.action;
        run(&self.executor, subscriber, move |subscriber| {
            let _ = match action() {
                Ok(()) => subscriber.on_complete(),
                Err(error) => subscriber.on_error(error),
            };
        });
    }

    fn shape(&self) -> Shape {
        Shape::Completable
    }
}
