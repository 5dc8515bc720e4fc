use std::{marker::PhantomData, sync::Arc};

use crate::{CancelHandle, Publisher, Subscriber};

/// Subscribes and then stays silent forever.
#[derive(Debug)]
pub struct Never<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> Never<T> {
    pub(crate) fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Publisher<T> for Never<T> {
    fn subscribe(self, subscriber: Arc<dyn Subscriber<T>>) {
        let _ = subscriber.on_subscribe(Arc::new(CancelHandle::new()));
    }
}
