use crate::{ProbeId, Shape, StreamError};

/// A copy of everything a probe recorded at one instant.
///
/// Obtained from [`Probe::snapshot`](crate::Probe::snapshot). Unlike the
/// probe itself, a snapshot never changes, so it can be inspected or
/// serialized after the producer moved on.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Snapshot<T> {
    pub(crate) probe: ProbeId,
    pub(crate) shape: Shape,
    pub(crate) values: Vec<T>,
    pub(crate) error: Option<StreamError>,
    pub(crate) completed: bool,
    pub(crate) subscribed: bool,
    pub(crate) cancelled: bool,
    pub(crate) violations: usize,
}

impl<T> Snapshot<T> {
    /// Returns the ID of the probe this snapshot was taken from.
    #[inline]
    pub fn probe(&self) -> ProbeId {
        self.probe
    }

    #[inline]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Returns the recorded values in arrival order.
    #[inline]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Consumes the snapshot, returning the recorded values.
    pub fn into_values(self) -> Vec<T> {
        self.values
    }

    #[inline]
    pub fn error(&self) -> Option<&StreamError> {
        self.error.as_ref()
    }

    #[inline]
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Returns true if either an error or a completion was recorded.
    #[inline]
    pub fn is_terminated(&self) -> bool {
        self.completed || self.error.is_some()
    }

    #[inline]
    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Number of protocol violations the producer committed.
    #[inline]
    pub fn violation_count(&self) -> usize {
        self.violations
    }
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
impl<T: serde::Serialize> Snapshot<T> {
    /// Serialize the snapshot as pretty-printed JSON.
    ///
    /// The error, if any, is written as its message.
    ///
    /// # Errors
    ///
    /// Returns any serialization error produced by `serde_json`.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
