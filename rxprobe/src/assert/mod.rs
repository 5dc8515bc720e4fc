//! Fluent assertions over a [`Probe`](crate::Probe).
//!
//! Start a chain with [`assert_that`] (existing probe) or
//! [`assert_that_subscriber_to`] (attach and assert in one go). Each check
//! returns `Result<&ProbeAssert<T>>`, so a failed expectation ends the
//! chain at the `?`.

mod await_done;
mod error_matcher;
mod probe_assert;
mod quantifier;

pub use await_done::AwaitDone;
pub use error_matcher::ErrorMatcher;
pub use probe_assert::{ProbeAssert, assert_that, assert_that_subscriber_to};
pub use quantifier::Quantifier;
