use crate::{ProbeId, Shape};

/// The single error type for all rxprobe operations.
///
/// Every fallible API returns `rxprobe::Result<T>` (alias for
/// `Result<T, rxprobe::Error>`). Two families share this enum:
///
/// - **Protocol violations** (`DoubleSubscription`, `SignalBeforeSubscribe`,
///   `TerminalStateViolation`, `ShapeViolation`) are returned to the producer
///   that delivered a malformed signal. They point at the system under test.
/// - **Assertion failures** (`AssertionFailed`, `IndexOutOfRange`) are returned
///   by [`ProbeAssert`](crate::ProbeAssert) checks and end the current chain.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("onSubscribe called on a probe that already holds a subscription")]
    DoubleSubscription,

    #[error("{signal} delivered before onSubscribe")]
    SignalBeforeSubscribe { signal: Signal },

    #[error("{signal} delivered after the stream already terminated")]
    TerminalStateViolation { signal: Signal },

    #[error("{signal} exceeds what a {shape} producer may emit")]
    ShapeViolation { shape: Shape, signal: Signal },

    #[error("[probe {probe}] expected {expected}, but {actual}")]
    AssertionFailed {
        probe: ProbeId,
        expected: String,
        actual: String,
    },

    #[error("[probe {probe}] index {index} is out of range for {len} recorded values")]
    IndexOutOfRange {
        probe: ProbeId,
        index: usize,
        len: usize,
    },
}

impl Error {
    pub(crate) fn assertion(
        probe: ProbeId,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Error::AssertionFailed {
            probe,
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Returns true if this error reports a malformed producer rather than a
    /// failed expectation.
    pub fn is_protocol_violation(&self) -> bool {
        matches!(
            self,
            Error::DoubleSubscription
                | Error::SignalBeforeSubscribe { .. }
                | Error::TerminalStateViolation { .. }
                | Error::ShapeViolation { .. }
        )
    }
}

/// The kind of signal a producer delivered to a probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    Next,
    Error,
    Complete,
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Signal::Next => "onNext",
            Signal::Error => "onError",
            Signal::Complete => "onComplete",
        };
        f.write_str(name)
    }
}
