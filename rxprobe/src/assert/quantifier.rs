use std::fmt;

/// How many recorded values must satisfy a condition.
///
/// Every quantified check counts the matching values `c` out of `total`
/// and compares once:
///
/// | Quantifier | Holds when |
/// |------------|------------|
/// | [`All`](Self::All) | `c == total` |
/// | [`NoneMatch`](Self::NoneMatch) | `c == 0` |
/// | [`AtLeastOne`](Self::AtLeastOne) | `c >= 1` |
/// | [`AtLeast(n)`](Self::AtLeast) | `c >= n` |
/// | [`AtMost(n)`](Self::AtMost) | `c <= n` |
/// | [`Exactly(n)`](Self::Exactly) | `c == n` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantifier {
    All,
    NoneMatch,
    AtLeastOne,
    AtLeast(usize),
    AtMost(usize),
    Exactly(usize),
}

impl Quantifier {
    /// Returns true if `matched` out of `total` values satisfies the quantifier.
    pub fn holds(&self, matched: usize, total: usize) -> bool {
        match *self {
            Quantifier::All => matched == total,
            Quantifier::NoneMatch => matched == 0,
            Quantifier::AtLeastOne => matched >= 1,
            Quantifier::AtLeast(n) => matched >= n,
            Quantifier::AtMost(n) => matched <= n,
            Quantifier::Exactly(n) => matched == n,
        }
    }
}

impl fmt::Display for Quantifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantifier::All => write!(f, "every value"),
            Quantifier::NoneMatch => write!(f, "no value"),
            Quantifier::AtLeastOne => write!(f, "at least one value"),
            Quantifier::AtLeast(n) => write!(f, "at least {n} value(s)"),
            Quantifier::AtMost(n) => write!(f, "at most {n} value(s)"),
            Quantifier::Exactly(n) => write!(f, "exactly {n} value(s)"),
        }
    }
}
