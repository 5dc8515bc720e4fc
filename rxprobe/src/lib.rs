#![cfg_attr(docsrs, feature(doc_cfg))]
//! # rxprobe
//!
//! Recording probes and fluent assertions for reactive-stream tests.
//!
//! Attach a [`Probe`] to a producer under test. The probe records every
//! signal it receives (subscription, values, error, completion) and turns
//! contract violations into errors instead of silently corrupting the
//! recording. Then assert on what was recorded with a chain of checks.
//!
//! ## Quick Start
//!
//! ```rust
//! use rxprobe::{ErrorMatcher, assert_that_subscriber_to, sources};
//!
//! #[derive(Debug, thiserror::Error)]
//! #[error("{0}")]
//! struct IllegalState(&'static str);
//!
//! fn main() -> rxprobe::Result {
//!     assert_that_subscriber_to(sources::just(1))
//!         .has_no_errors()?
//!         .has_value_count(1)?
//!         .has_value(&1)?
//!         .is_complete()?;
//!
//!     assert_that_subscriber_to(sources::from_iter([1, 2, 3]).then_fail(IllegalState("boom")))
//!         .has_failure_and_message(ErrorMatcher::of_type::<IllegalState>(), "boom", &[1, 2, 3])?;
//!     Ok(())
//! }
//! ```
//!
//! ## Core Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Probe`] | Thread-safe recorder implementing [`Subscriber`] |
//! | [`ProbeAssert`] | Fluent checks over a probe's recorded state |
//! | [`ErrorMatcher`] | Matches a recorded error by instance, type or predicate |
//! | [`Quantifier`] | Threshold for counting checks (`are_at_least` and friends) |
//! | [`Shape`] | How many values a producer may emit |
//! | [`StreamError`] | Type-erased, cloneable error payload |
//! | [`Snapshot`] | Owned copy of everything a probe recorded |
//!
//! ## Waiting for asynchronous producers
//!
//! Checks never wait. When the producer runs on another thread or task, wait
//! for the terminal signal first:
//!
//! ```rust,ignore
//! // Blocking
//! assert_that(&probe).await_done(Duration::from_secs(1))?.is_complete()?;
//!
//! // Inside a Tokio runtime
//! assert_that(&probe).settle().await?.is_complete()?;
//! ```
//!
//! A wait that times out is not an error. The probe cancels its
//! subscription (see [`ProbeConfig`]) and the following check reports the
//! unfinished stream.
//!
//! ## Features
//!
//! - **`serde`** - Serialization for [`ProbeConfig`] and [`Snapshot::to_json()`]

mod cancel_handle;
mod error;
mod probe;
mod probe_config;
mod probe_id;
mod shape;
mod snapshot;
mod stream_error;
mod subscriber;

pub mod assert;
pub mod sources;

pub use assert::{
    AwaitDone, ErrorMatcher, ProbeAssert, Quantifier, assert_that, assert_that_subscriber_to,
};
pub use cancel_handle::CancelHandle;
pub use error::{Error, Signal};
pub use probe::{Probe, attach, attach_with};
pub use probe_config::{DEFAULT_AWAIT_TIMEOUT, ProbeConfig};
pub use probe_id::ProbeId;
pub use shape::Shape;
pub use snapshot::Snapshot;
pub use stream_error::StreamError;
pub use subscriber::{Publisher, Subscriber, Subscription};

/// Convenience alias for `Result<T, rxprobe::Error>`.
pub type Result<T = ()> = std::result::Result<T, Error>;
