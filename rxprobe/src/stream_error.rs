use std::{fmt, sync::Arc};

type BoxedError = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// The error payload a producer delivers with `onError`.
///
/// Producers emit arbitrary error types; `StreamError` erases them behind
/// an `Arc` so the probe can store and clone the error while assertions
/// still inspect the concrete type with [`is`](Self::is) and
/// [`downcast_ref`](Self::downcast_ref).
///
/// Equality is true for the same allocation, or for errors whose `Debug`
/// output is identical. Most error types have no meaningful equality, so
/// prefer [`ErrorMatcher::of_type`](crate::ErrorMatcher::of_type) or a
/// predicate over instance comparison.
#[derive(Clone)]
pub struct StreamError {
    inner: BoxedError,
}

impl StreamError {
    pub fn new(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(error),
        }
    }

    /// Returns true if the wrapped error is of type `E`.
    pub fn is<E: std::error::Error + 'static>(&self) -> bool {
        self.inner.is::<E>()
    }

    /// Returns the wrapped error as `E`, if it is one.
    pub fn downcast_ref<E: std::error::Error + 'static>(&self) -> Option<&E> {
        self.inner.downcast_ref::<E>()
    }

    /// The error's `Display` text.
    pub fn message(&self) -> String {
        self.inner.to_string()
    }

    /// Returns the wrapped error.
    pub fn get_ref(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self.inner.as_ref()
    }
}

impl<E> From<E> for StreamError
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn from(error: E) -> Self {
        StreamError::new(error)
    }
}

impl PartialEq for StreamError {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
            || format!("{:?}", self.inner) == format!("{:?}", other.inner)
    }
}

impl fmt::Debug for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for StreamError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.message())
    }
}
