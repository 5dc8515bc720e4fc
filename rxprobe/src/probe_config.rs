use std::time::Duration;

/// Default timeout for [`settle`](crate::ProbeAssert::settle) when no
/// explicit `within` is given.
pub const DEFAULT_AWAIT_TIMEOUT: Duration = Duration::from_secs(1);

/// Behaviour of a probe while waiting for its producer to terminate.
///
/// Use the builder pattern to customize, or use [`Default`] for sensible
/// defaults.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use rxprobe::ProbeConfig;
///
/// let config = ProbeConfig::default()
///     .with_await_timeout(Duration::from_millis(250))  // Shorter settle window
///     .with_cancel_on_timeout(false);                  // Leave slow producers running
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProbeConfig {
    /// How long `settle()` waits for a terminal signal.
    /// Default: 1s
    await_timeout: Duration,

    /// Whether a wait that times out cancels the probe's subscription.
    /// Default: true
    cancel_on_timeout: bool,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        ProbeConfig {
            await_timeout: DEFAULT_AWAIT_TIMEOUT,
            cancel_on_timeout: true,
        }
    }
}

impl ProbeConfig {
    /// Set how long `settle()` waits for a terminal signal.
    pub fn with_await_timeout(mut self, timeout: Duration) -> Self {
        self.await_timeout = timeout;
        self
    }

    /// Returns how long `settle()` waits for a terminal signal.
    pub fn await_timeout(&self) -> Duration {
        self.await_timeout
    }

    /// Set whether a timed-out wait cancels the subscription.
    ///
    /// Cancellation is advisory: a producer that already finished, or one
    /// that never checks its subscription, is unaffected.
    pub fn with_cancel_on_timeout(mut self, cancel: bool) -> Self {
        self.cancel_on_timeout = cancel;
        self
    }

    /// Returns whether a timed-out wait cancels the subscription.
    pub fn cancel_on_timeout(&self) -> bool {
        self.cancel_on_timeout
    }
}
