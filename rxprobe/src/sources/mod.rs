//! Fixture publishers for exercising probes and assertions.
//!
//! These are test doubles for a real reactive runtime: small, predictable
//! producers that honour the subscriber contract. Each one subscribes
//! synchronously inside [`Publisher::subscribe`](crate::Publisher::subscribe)
//! and runs its emission on an explicit [`Executor`].
//!
//! # Example
//!
//! ```rust
//! use rxprobe::{assert_that_subscriber_to, sources};
//!
//! # fn main() -> rxprobe::Result {
//! assert_that_subscriber_to(sources::from_iter(["Luke", "Yoda", "Obiwan"]))
//!     .has_no_errors()?
//!     .has_value_count(3)?
//!     .is_complete()?;
//! # Ok(())
//! # }
//! ```

mod executor;
mod from_callable;
mod from_iter;
mod from_stream;
mod never;

pub use executor::Executor;
pub use from_callable::{FromAction, FromCallable, FromOptional};
pub use from_iter::FromIter;
pub use from_stream::FromStream;
pub use never::Never;

use tokio::runtime::Handle;
use tokio_stream::Stream;

use crate::StreamError;

/// Emits every item, then completes.
pub fn from_iter<I: IntoIterator>(items: I) -> FromIter<I::IntoIter> {
    FromIter::new(items.into_iter())
}

/// Emits `value`, then completes.
pub fn just<T>(value: T) -> FromIter<std::iter::Once<T>> {
    FromIter::new(std::iter::once(value))
}

/// Completes without emitting.
pub fn empty<T>() -> FromIter<std::iter::Empty<T>> {
    FromIter::new(std::iter::empty())
}

/// Fails immediately with `error`.
pub fn fail<T>(error: impl Into<StreamError>) -> FromIter<std::iter::Empty<T>> {
    empty().then_fail(error)
}

/// Subscribes and never signals again.
pub fn never<T>() -> Never<T> {
    Never::new()
}

/// Computes a single value.
pub fn from_callable<T, F>(callable: F) -> FromCallable<F>
where
    F: FnOnce() -> Result<T, StreamError> + Send + 'static,
{
    FromCallable::new(callable)
}

/// Computes zero or one value.
pub fn from_optional<T, F>(callable: F) -> FromOptional<F>
where
    F: FnOnce() -> Result<Option<T>, StreamError> + Send + 'static,
{
    FromOptional::new(callable)
}

/// Runs `action` and completes without values.
pub fn from_action<F>(action: F) -> FromAction<F>
where
    F: FnOnce() -> Result<(), StreamError> + Send + 'static,
{
    FromAction::new(action)
}

/// Forwards an async stream, driven on `handle`.
pub fn from_stream<T, S>(stream: S, handle: Handle) -> FromStream<S>
where
    S: Stream<Item = Result<T, StreamError>> + Send + 'static,
{
    FromStream::new(stream, handle)
}
