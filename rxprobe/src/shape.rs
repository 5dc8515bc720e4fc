use std::fmt;

/// The kind of producer a probe is attached to.
///
/// One probe type records every producer; the shape only decides how many
/// values are legal before the terminal signal.
///
/// | Shape | Values | Terminal |
/// |-------|--------|----------|
/// | [`Flow`](Self::Flow) | any number | error or completion |
/// | [`Single`](Self::Single) | exactly one on success | error or completion |
/// | [`Maybe`](Self::Maybe) | zero or one | error or completion |
/// | [`Completable`](Self::Completable) | none | error or completion |
///
/// A value beyond the shape's capacity is rejected with
/// [`Error::ShapeViolation`](crate::Error::ShapeViolation).
///
/// # Example
///
/// ```rust
/// use rxprobe::{Probe, Shape};
///
/// let probe = Probe::<u64>::with_shape(Shape::Maybe);
/// assert_eq!(probe.shape(), Shape::Maybe);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Shape {
    /// A multi-value stream.
    #[default]
    Flow,

    /// One eventual value.
    Single,

    /// Zero or one value.
    Maybe,

    /// Completion without values.
    Completable,
}

impl Shape {
    /// Maximum number of values a producer of this shape may emit.
    pub fn capacity(&self) -> Option<usize> {
        match self {
            Shape::Flow => None,
            Shape::Single | Shape::Maybe => Some(1),
            Shape::Completable => Some(0),
        }
    }

    /// Returns true if a producer that already emitted `count` values may emit another.
    pub(crate) fn accepts_value_after(&self, count: usize) -> bool {
        self.capacity().is_none_or(|cap| count < cap)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Flow => write!(f, "Flow"),
            Shape::Single => write!(f, "Single"),
            Shape::Maybe => write!(f, "Maybe"),
            Shape::Completable => write!(f, "Completable"),
        }
    }
}
