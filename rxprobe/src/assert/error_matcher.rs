//! Error matching for `has_error` / `has_failure`.

use std::fmt;
use std::sync::Arc;

use crate::StreamError;

type MatchFn = Arc<dyn Fn(&StreamError) -> bool + Send + Sync>;

/// Describes which recorded error an assertion accepts.
///
/// `ErrorMatcher` can match errors by:
/// - Instance (equality, see [`StreamError`]'s `PartialEq`)
/// - Type (the concrete error type; there is no subtype relation)
/// - Custom predicate
///
/// # Example
///
/// ```ignore
/// use rxprobe::ErrorMatcher;
///
/// // Match by type
/// let matcher = ErrorMatcher::of_type::<std::io::Error>();
///
/// // Match by predicate
/// let matcher = ErrorMatcher::by_predicate(|e| e.message().contains("timeout"));
///
/// // Match by instance (a StreamError converts directly)
/// let matcher: ErrorMatcher = recorded_error.clone().into();
/// ```
#[derive(Clone)]
pub enum ErrorMatcher {
    Instance(StreamError),
    Type {
        name: &'static str,
        check: fn(&StreamError) -> bool,
    },
    Predicate(MatchFn),
}

impl fmt::Debug for ErrorMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorMatcher::Instance(error) => f.debug_tuple("Instance").field(error).finish(),
            ErrorMatcher::Type { name, .. } => f.debug_struct("Type").field("name", name).finish(),
            ErrorMatcher::Predicate(_) => f.debug_tuple("Predicate").finish_non_exhaustive(),
        }
    }
}

fn is_type<E: std::error::Error + 'static>(error: &StreamError) -> bool {
    error.is::<E>()
}

impl ErrorMatcher {
    /// Match an error equal to `error`.
    pub fn by_instance(error: impl Into<StreamError>) -> Self {
        ErrorMatcher::Instance(error.into())
    }

    /// Match any error whose concrete type is `E`.
    pub fn of_type<E: std::error::Error + 'static>() -> Self {
        ErrorMatcher::Type {
            name: std::any::type_name::<E>(),
            check: is_type::<E>,
        }
    }

    /// Match errors using a custom predicate.
    pub fn by_predicate<F>(predicate: F) -> Self
    where
        F: Fn(&StreamError) -> bool + Send + Sync + 'static,
    {
        ErrorMatcher::Predicate(Arc::new(predicate))
    }

    /// Returns true if `error` is accepted by this matcher.
    pub fn matches(&self, error: &StreamError) -> bool {
        match self {
            ErrorMatcher::Instance(expected) => expected == error,
            ErrorMatcher::Type { check, .. } => check(error),
            ErrorMatcher::Predicate(predicate) => predicate(error),
        }
    }

    /// The expectation as it appears in failure messages.
    pub(crate) fn describe(&self) -> String {
        match self {
            ErrorMatcher::Instance(error) => format!("an error equal to {error:?}"),
            ErrorMatcher::Type { name, .. } => format!("an error of type {name}"),
            ErrorMatcher::Predicate(_) => "an error matching the predicate".to_string(),
        }
    }
}

impl From<StreamError> for ErrorMatcher {
    fn from(error: StreamError) -> Self {
        ErrorMatcher::Instance(error)
    }
}
