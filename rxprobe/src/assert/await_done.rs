use std::{fmt, future::IntoFuture, time::Duration};

use crate::{ProbeAssert, Result};

/// An async wait-for-termination builder.
///
/// Created by [`ProbeAssert::settle`]. Awaiting it yields the assertion
/// handle again once the stream terminated or the timeout elapsed; the
/// timeout defaults to the probe's [`ProbeConfig`](crate::ProbeConfig).
/// A timeout is not a failure: follow up with an assertion such as
/// [`is_terminated`](ProbeAssert::is_terminated) to make it one.
///
/// # Example
///
/// ```ignore
/// assert_that(&probe).settle().await?.has_value_count(3)?;
///
/// // With a custom timeout
/// assert_that(&probe)
///     .settle()
///     .within(Duration::from_secs(3))
///     .await?
///     .is_complete()?;
/// ```
pub struct AwaitDone<'a, T> {
    assert: &'a ProbeAssert<T>,
    timeout: Duration,
}

impl<'a, T> AwaitDone<'a, T> {
    pub(crate) fn new(assert: &'a ProbeAssert<T>) -> Self {
        Self {
            assert,
            timeout: assert.probe().config().await_timeout(),
        }
    }

    /// Override the configured timeout.
    pub fn within(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn run(self) -> Result<&'a ProbeAssert<T>> {
        self.assert
            .probe()
            .await_terminal_async(self.timeout)
            .await;
        Ok(self.assert)
    }
}

impl<'a, T> IntoFuture for AwaitDone<'a, T> {
    type Output = Result<&'a ProbeAssert<T>>;
    type IntoFuture = std::pin::Pin<Box<dyn std::future::Future<Output = Self::Output> + 'a>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.run())
    }
}

impl<T> fmt::Debug for AwaitDone<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwaitDone")
            .field("probe", &self.assert.probe().id())
            .field("timeout", &self.timeout)
            .finish()
    }
}
