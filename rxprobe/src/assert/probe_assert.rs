use std::{collections::HashSet, fmt, hash::Hash, time::Duration};

use crate::{
    Error, ErrorMatcher, Probe, Publisher, Quantifier, Result, Snapshot, StreamError,
    assert::AwaitDone,
    probe::ProbeState,
};

/// Start an assertion chain over `probe`.
///
/// ```rust
/// use rxprobe::{assert_that, attach, sources};
///
/// # fn main() -> rxprobe::Result {
/// let probe = attach(sources::from_iter([1, 2, 3]));
/// assert_that(&probe).has_result(&[1, 2, 3])?;
/// # Ok(())
/// # }
/// ```
pub fn assert_that<T>(probe: &Probe<T>) -> ProbeAssert<T> {
    ProbeAssert::new(probe.clone())
}

/// Attach a fresh probe to `publisher` and start an assertion chain over it.
pub fn assert_that_subscriber_to<T, P>(publisher: P) -> ProbeAssert<T>
where
    T: Send + 'static,
    P: Publisher<T>,
{
    ProbeAssert::new(crate::attach(publisher))
}

/// Fluent checks over a [`Probe`]'s recorded state.
///
/// Every check looks at one consistent view of the recording and returns
/// `Ok(&self)` on success, so checks chain with `?`:
///
/// ```ignore
/// assert_that(&probe)
///     .has_no_errors()?
///     .has_value_count(1)?
///     .has_value(&1)?
///     .is_complete()?;
/// ```
///
/// Checks that take a predicate or an iterator copy the recording first
/// ([`Probe::snapshot`]) and call into user code with the probe unlocked,
/// so the predicate may read the probe and the producer keeps recording
/// meanwhile. Those checks need `T: Clone`.
///
/// A failed check returns [`Error::AssertionFailed`] naming the expectation
/// and describing the observed state. Checks never wait; only
/// [`await_done`](Self::await_done) and [`settle`](Self::settle) do.
pub struct ProbeAssert<T> {
    probe: Probe<T>,
}

impl<T> Clone for ProbeAssert<T> {
    fn clone(&self) -> Self {
        Self {
            probe: self.probe.clone(),
        }
    }
}

impl<T> fmt::Debug for ProbeAssert<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProbeAssert")
            .field("probe", &self.probe)
            .finish()
    }
}

/// The state a check looks at: the live probe under its lock, or a copy.
struct Recorded<'a, T> {
    values: &'a [T],
    error: Option<&'a StreamError>,
    completed: bool,
    subscribed: bool,
    cancelled: bool,
    violations: usize,
}

impl<'a, T> Recorded<'a, T> {
    fn live(state: &'a ProbeState<T>) -> Self {
        Self {
            values: &state.values,
            error: state.error.as_ref(),
            completed: state.completed,
            subscribed: state.is_subscribed(),
            cancelled: state.cancelled,
            violations: state.violations.len(),
        }
    }

    fn copied(snapshot: &'a Snapshot<T>) -> Self {
        Self {
            values: &snapshot.values,
            error: snapshot.error.as_ref(),
            completed: snapshot.completed,
            subscribed: snapshot.subscribed,
            cancelled: snapshot.cancelled,
            violations: snapshot.violations,
        }
    }

    fn is_terminated(&self) -> bool {
        self.error.is_some() || self.completed
    }
}

impl<T: fmt::Debug> Recorded<'_, T> {
    /// One-line description used as the "actual" side of a failure.
    fn summary(&self) -> String {
        let subscribed = if self.subscribed {
            "subscribed"
        } else {
            "not subscribed"
        };
        let terminal = match (self.error, self.completed) {
            (Some(error), _) => format!("failed with {error:?}"),
            (None, true) => "completed".to_string(),
            (None, false) => "not terminated".to_string(),
        };
        format!(
            "the probe was {subscribed}, received {} value(s) {:?} and {terminal}",
            self.values.len(),
            self.values
        )
    }
}

enum Miss {
    Expected(String),
    Index { index: usize, len: usize },
}

type Check = std::result::Result<(), Miss>;

fn expect(holds: bool, expected: impl FnOnce() -> String) -> Check {
    if holds {
        Ok(())
    } else {
        Err(Miss::Expected(expected()))
    }
}

// ==================== Checks ====================

fn subscribed<T>(recorded: &Recorded<'_, T>, yes: bool) -> Check {
    let expected = if yes { "a subscription" } else { "no subscription" };
    expect(recorded.subscribed == yes, || expected.to_string())
}

fn no_error<T>(recorded: &Recorded<'_, T>) -> Check {
    expect(recorded.error.is_none(), || "no errors".to_string())
}

fn error_message<T>(recorded: &Recorded<'_, T>, message: &str) -> Check {
    let holds = recorded.error.is_some_and(|e| e.message() == message);
    expect(holds, || format!("an error with message {message:?}"))
}

fn completed<T>(recorded: &Recorded<'_, T>, yes: bool) -> Check {
    let expected = if yes { "completion" } else { "no completion" };
    expect(recorded.completed == yes, || expected.to_string())
}

fn exact_values<T: PartialEq + fmt::Debug>(recorded: &Recorded<'_, T>, expected: &[T]) -> Check {
    expect(recorded.values == expected, || {
        format!("exactly the values {expected:?}")
    })
}

fn value_count<T>(recorded: &Recorded<'_, T>, count: usize) -> Check {
    expect(recorded.values.len() == count, || format!("{count} value(s)"))
}

impl<T> ProbeAssert<T> {
    pub fn new(probe: Probe<T>) -> Self {
        Self { probe }
    }

    /// The probe under assertion.
    pub fn probe(&self) -> &Probe<T> {
        &self.probe
    }

    /// Block until the stream terminates or `timeout` elapses.
    ///
    /// Always succeeds; a timed out wait surfaces through a following
    /// terminal-state check.
    pub fn await_done(&self, timeout: Duration) -> Result<&Self> {
        self.probe.await_terminal(timeout);
        Ok(self)
    }

    /// Wait cooperatively for termination. See [`AwaitDone`].
    pub fn settle(&self) -> AwaitDone<'_, T> {
        AwaitDone::new(self)
    }
}

impl<T: fmt::Debug> ProbeAssert<T> {
    fn judge(
        &self,
        recorded: &Recorded<'_, T>,
        check: impl FnOnce(&Recorded<'_, T>) -> Check,
    ) -> Result {
        let probe = self.probe.id();
        match check(recorded) {
            Ok(()) => Ok(()),
            Err(Miss::Expected(expected)) => {
                Err(Error::assertion(probe, expected, recorded.summary()))
            }
            Err(Miss::Index { index, len }) => Err(Error::IndexOutOfRange { probe, index, len }),
        }
    }

    /// Runs `check` against the live state. `check` must not call user code.
    fn verify(&self, check: impl FnOnce(&Recorded<'_, T>) -> Check) -> Result<&Self> {
        self.probe
            .inspect(|state| self.judge(&Recorded::live(state), check))?;
        Ok(self)
    }

    /// Runs `check` against a copy taken under the lock, with the lock released.
    fn verify_copy(&self, check: impl FnOnce(&Recorded<'_, T>) -> Check) -> Result<&Self>
    where
        T: Clone,
    {
        let snapshot = self.probe.snapshot();
        self.judge(&Recorded::copied(&snapshot), check)?;
        Ok(self)
    }

    /// Runs `check` against the live state, then `matcher` against the
    /// recorded error with the lock released.
    fn verify_error(
        &self,
        matcher: &ErrorMatcher,
        check: impl FnOnce(&Recorded<'_, T>) -> Check,
    ) -> Result<&Self> {
        let error = self.probe.inspect(|state| -> Result<Option<StreamError>> {
            self.judge(&Recorded::live(state), |recorded| {
                check(recorded)?;
                expect(recorded.error.is_some(), || matcher.describe())
            })?;
            Ok(state.error.clone())
        })?;
        if error.is_some_and(|e| matcher.matches(&e)) {
            return Ok(self);
        }
        // The error is terminal, so the state is still the one checked above.
        Err(self.probe.inspect(|state| {
            Error::assertion(
                self.probe.id(),
                matcher.describe(),
                Recorded::live(state).summary(),
            )
        }))
    }

    // ==================== Subscription ====================

    pub fn is_subscribed(&self) -> Result<&Self> {
        self.verify(|r| subscribed(r, true))
    }

    pub fn is_not_subscribed(&self) -> Result<&Self> {
        self.verify(|r| subscribed(r, false))
    }

    /// Succeeds if the probe asked its producer to stop.
    pub fn is_cancelled(&self) -> Result<&Self> {
        self.verify(|r| expect(r.cancelled, || "a cancelled subscription".to_string()))
    }

    pub fn is_not_cancelled(&self) -> Result<&Self> {
        self.verify(|r| expect(!r.cancelled, || "an active subscription".to_string()))
    }

    /// Succeeds if the producer never broke the subscriber contract.
    ///
    /// The violations themselves are available from [`Probe::violations`].
    pub fn has_no_violations(&self) -> Result<&Self> {
        self.verify(|r| {
            expect(r.violations == 0, || {
                format!("no protocol violations, found {}", r.violations)
            })
        })
    }

    // ==================== Errors ====================

    pub fn has_no_errors(&self) -> Result<&Self> {
        self.verify(no_error)
    }

    /// Alias for [`has_no_errors`](Self::has_no_errors).
    pub fn without_errors(&self) -> Result<&Self> {
        self.has_no_errors()
    }

    /// Succeeds if an error was recorded and `matcher` accepts it.
    ///
    /// A [`StreamError`] converts into an instance matcher; use
    /// [`ErrorMatcher::of_type`] or [`ErrorMatcher::by_predicate`] for the
    /// other forms.
    pub fn has_error(&self, matcher: impl Into<ErrorMatcher>) -> Result<&Self> {
        self.verify_error(&matcher.into(), |_| Ok(()))
    }

    /// Succeeds if an error was recorded and its message equals `message`.
    pub fn has_error_message(&self, message: &str) -> Result<&Self> {
        self.verify(|r| error_message(r, message))
    }

    // ==================== Terminal state ====================

    /// Succeeds only on completion; an error does not count.
    pub fn is_complete(&self) -> Result<&Self> {
        self.verify(|r| completed(r, true))
    }

    /// Alias for [`is_complete`](Self::is_complete).
    pub fn completes(&self) -> Result<&Self> {
        self.is_complete()
    }

    pub fn is_not_complete(&self) -> Result<&Self> {
        self.verify(|r| completed(r, false))
    }

    /// Succeeds once the stream ended, by error or by completion.
    pub fn is_terminated(&self) -> Result<&Self> {
        self.verify(|r| expect(r.is_terminated(), || "a terminal signal".to_string()))
    }

    pub fn is_not_terminated(&self) -> Result<&Self> {
        self.verify(|r| expect(!r.is_terminated(), || "no terminal signal".to_string()))
    }

    // ==================== Values ====================

    pub fn has_value_count(&self, count: usize) -> Result<&Self> {
        self.verify(|r| value_count(r, count))
    }

    /// Alias for [`has_value_count`](Self::has_value_count).
    pub fn has_received_count(&self, count: usize) -> Result<&Self> {
        self.has_value_count(count)
    }

    pub fn has_no_values(&self) -> Result<&Self> {
        self.has_value_count(0)
    }

    /// Alias for [`has_no_values`](Self::has_no_values).
    pub fn emits_nothing(&self) -> Result<&Self> {
        self.has_no_values()
    }

    /// Alias for [`has_no_values`](Self::has_no_values).
    pub fn received_nothing(&self) -> Result<&Self> {
        self.has_no_values()
    }

    /// Print the recorded state to stdout.
    pub fn dump(&self) {
        self.probe.inspect(|state| {
            println!(
                "Probe {} ({}), {}:",
                self.probe.id(),
                self.probe.shape(),
                if state.is_subscribed() {
                    "subscribed"
                } else {
                    "not subscribed"
                }
            );
            if state.values.is_empty() {
                println!("  (no values recorded)");
            }
            for (i, value) in state.values.iter().enumerate() {
                println!("  {i}: {value:?}");
            }
            match (&state.error, state.completed) {
                (Some(error), _) => println!("  failed: {error:?}"),
                (None, true) => println!("  completed"),
                (None, false) => println!("  (not terminated)"),
            }
            if state.cancelled {
                println!("  cancelled");
            }
            for violation in &state.violations {
                println!("  violation: {violation}");
            }
        });
    }
}

impl<T: fmt::Debug + Clone> ProbeAssert<T> {
    // ==================== Predicates ====================

    /// Succeeds if exactly one value was recorded and it satisfies `predicate`.
    pub fn has_value_matching(&self, predicate: impl FnOnce(&T) -> bool) -> Result<&Self> {
        self.verify_copy(|r| match r.values {
            [value] => expect(predicate(value), || {
                "a single value matching the condition".to_string()
            }),
            _ => Err(Miss::Expected(
                "a single value matching the condition".to_string(),
            )),
        })
    }

    /// Succeeds if `values[index]` satisfies `predicate`.
    ///
    /// Returns [`Error::IndexOutOfRange`] if fewer than `index + 1` values
    /// were recorded.
    pub fn has_value_at(&self, index: usize, predicate: impl FnOnce(&T) -> bool) -> Result<&Self> {
        self.verify_copy(|r| match r.values.get(index) {
            Some(value) => expect(predicate(value), || {
                format!("the value at index {index} to match the condition")
            }),
            None => Err(Miss::Index {
                index,
                len: r.values.len(),
            }),
        })
    }

    /// Counts the values satisfying `predicate` and checks the count against
    /// `quantifier`.
    pub fn are(&self, quantifier: Quantifier, predicate: impl Fn(&T) -> bool) -> Result<&Self> {
        self.verify_copy(|r| {
            let total = r.values.len();
            let matched = r.values.iter().filter(|v| predicate(v)).count();
            expect(quantifier.holds(matched, total), || {
                format!("{quantifier} to match the condition ({matched} of {total} did)")
            })
        })
    }

    pub fn each_item_matches(&self, predicate: impl Fn(&T) -> bool) -> Result<&Self> {
        self.are(Quantifier::All, predicate)
    }

    pub fn no_item_matches(&self, predicate: impl Fn(&T) -> bool) -> Result<&Self> {
        self.are(Quantifier::NoneMatch, predicate)
    }

    pub fn at_least_one_item_matches(&self, predicate: impl Fn(&T) -> bool) -> Result<&Self> {
        self.are(Quantifier::AtLeastOne, predicate)
    }

    pub fn are_at_least(&self, n: usize, predicate: impl Fn(&T) -> bool) -> Result<&Self> {
        self.are(Quantifier::AtLeast(n), predicate)
    }

    pub fn are_at_most(&self, n: usize, predicate: impl Fn(&T) -> bool) -> Result<&Self> {
        self.are(Quantifier::AtMost(n), predicate)
    }

    pub fn are_exactly(&self, n: usize, predicate: impl Fn(&T) -> bool) -> Result<&Self> {
        self.are(Quantifier::Exactly(n), predicate)
    }

    /// Alias for [`are_at_least`](Self::are_at_least).
    pub fn have_at_least(&self, n: usize, predicate: impl Fn(&T) -> bool) -> Result<&Self> {
        self.are_at_least(n, predicate)
    }

    /// Alias for [`are_at_most`](Self::are_at_most).
    pub fn have_at_most(&self, n: usize, predicate: impl Fn(&T) -> bool) -> Result<&Self> {
        self.are_at_most(n, predicate)
    }

    /// Alias for [`are_exactly`](Self::are_exactly).
    pub fn have_exactly(&self, n: usize, predicate: impl Fn(&T) -> bool) -> Result<&Self> {
        self.are_exactly(n, predicate)
    }
}

impl<T: fmt::Debug + PartialEq> ProbeAssert<T> {
    /// Succeeds if exactly one value was recorded and it equals `expected`.
    pub fn has_value(&self, expected: &T) -> Result<&Self> {
        self.verify(|r| {
            expect(r.values.len() == 1 && r.values[0] == *expected, || {
                format!("the single value {expected:?}")
            })
        })
    }

    /// Alias for [`has_value`](Self::has_value).
    pub fn has_single_value(&self, expected: &T) -> Result<&Self> {
        self.has_value(expected)
    }

    /// Succeeds if the recorded values equal `expected`, in order.
    pub fn has_values(&self, expected: &[T]) -> Result<&Self> {
        self.verify(|r| exact_values(r, expected))
    }

    /// Alias for [`has_values`](Self::has_values).
    pub fn has_received(&self, expected: &[T]) -> Result<&Self> {
        self.has_values(expected)
    }

    /// Like [`has_values`](Self::has_values), comparing element by element
    /// and stopping at the first difference.
    ///
    /// The iterator is driven with the probe unlocked.
    pub fn has_value_sequence(&self, expected: impl IntoIterator<Item = T>) -> Result<&Self>
    where
        T: Clone,
    {
        let mut expected = expected.into_iter();
        self.verify_copy(|r| {
            let mut recorded = r.values.iter();
            let mut index = 0;
            loop {
                match (recorded.next(), expected.next()) {
                    (None, None) => return Ok(()),
                    (Some(actual), Some(item)) if *actual == item => index += 1,
                    (_, Some(item)) => {
                        return Err(Miss::Expected(format!(
                            "the value {item:?} at index {index} of the sequence"
                        )));
                    }
                    (Some(_), None) => {
                        return Err(Miss::Expected(format!(
                            "the sequence to end after {index} value(s)"
                        )));
                    }
                }
            }
        })
    }

    /// Succeeds if every one of `items` was recorded, in any order.
    pub fn contains(&self, items: &[T]) -> Result<&Self> {
        self.verify(|r| match items.iter().find(|item| !r.values.contains(item)) {
            Some(missing) => Err(Miss::Expected(format!("the value {missing:?} to be recorded"))),
            None => Ok(()),
        })
    }

    /// Succeeds if none of `items` was recorded.
    pub fn does_not_contain(&self, items: &[T]) -> Result<&Self> {
        self.verify(|r| match items.iter().find(|item| r.values.contains(item)) {
            Some(found) => Err(Miss::Expected(format!(
                "the value {found:?} not to be recorded"
            ))),
            None => Ok(()),
        })
    }

    // ==================== Composite ====================

    /// Subscribed, exactly `values` in order, no error and completed, all in
    /// the same snapshot.
    pub fn has_result(&self, values: &[T]) -> Result<&Self> {
        self.verify(|r| {
            subscribed(r, true)?;
            exact_values(r, values)?;
            no_error(r)?;
            completed(r, true)
        })
    }

    /// Subscribed, exactly `values` in order, then an error accepted by
    /// `matcher`, and no completion.
    pub fn has_failure(&self, matcher: impl Into<ErrorMatcher>, values: &[T]) -> Result<&Self> {
        self.verify_error(&matcher.into(), |r| {
            subscribed(r, true)?;
            exact_values(r, values)?;
            completed(r, false)
        })
    }

    /// Like [`has_failure`](Self::has_failure), also requiring the error
    /// message to equal `message`.
    pub fn has_failure_and_message(
        &self,
        matcher: impl Into<ErrorMatcher>,
        message: &str,
        values: &[T],
    ) -> Result<&Self> {
        self.verify_error(&matcher.into(), |r| {
            subscribed(r, true)?;
            exact_values(r, values)?;
            error_message(r, message)?;
            completed(r, false)
        })
    }

    /// Subscribed, with no values, no error and no completion.
    pub fn has_empty(&self) -> Result<&Self> {
        self.verify(|r| {
            subscribed(r, true)?;
            value_count(r, 0)?;
            no_error(r)?;
            completed(r, false)
        })
    }
}

impl<T: fmt::Debug + Eq + Hash> ProbeAssert<T> {
    /// Succeeds if the recorded values, as a set, equal `expected`.
    ///
    /// Order and duplicates are ignored on both sides.
    pub fn has_value_set(&self, expected: impl IntoIterator<Item = T>) -> Result<&Self> {
        let expected: HashSet<T> = expected.into_iter().collect();
        self.verify(|r| {
            let recorded: HashSet<&T> = r.values.iter().collect();
            let holds = recorded.len() == expected.len()
                && expected.iter().all(|v| recorded.contains(v));
            expect(holds, || format!("the value set {expected:?}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{Arc, mpsc},
        thread,
        time::Instant,
    };

    use super::*;
    use crate::{CancelHandle, ProbeConfig, Shape, StreamError, Subscriber, sources};

    #[derive(Debug, thiserror::Error)]
    #[error("{0}")]
    struct IllegalState(&'static str);

    #[derive(Debug, thiserror::Error)]
    #[error("file doesn't exist")]
    struct FileMissing;

    fn completed_with(values: &[i32]) -> Probe<i32> {
        crate::attach(sources::from_iter(values.to_vec()))
    }

    fn failed_with(values: &[i32], error: &'static str) -> Probe<i32> {
        crate::attach(sources::from_iter(values.to_vec()).then_fail(IllegalState(error)))
    }

    fn running() -> Probe<i32> {
        let probe = Probe::new();
        probe.on_subscribe(Arc::new(CancelHandle::new())).unwrap();
        probe
    }

    // ==================== State checks ====================

    #[test]
    fn subscription_checks() {
        let fresh = Probe::<i32>::new();
        assert_that(&fresh).is_not_subscribed().unwrap();
        assert!(assert_that(&fresh).is_subscribed().is_err());

        let probe = running();
        assert_that(&probe).is_subscribed().unwrap();
        assert!(assert_that(&probe).is_not_subscribed().is_err());
    }

    #[test]
    fn complete_is_not_terminated_in_general() {
        let probe = failed_with(&[], "boom");
        assert_that(&probe).is_terminated().unwrap().is_not_complete().unwrap();
        assert!(assert_that(&probe).is_complete().is_err());

        let probe = completed_with(&[]);
        assert_that(&probe).is_terminated().unwrap().completes().unwrap();
        assert!(assert_that(&probe).is_not_terminated().is_err());
    }

    #[test]
    fn error_checks_by_type_instance_and_predicate() {
        let probe = failed_with(&[1], "boom");
        let recorded = probe.error().unwrap();

        assert_that(&probe)
            .has_error(ErrorMatcher::of_type::<IllegalState>())
            .unwrap()
            .has_error(recorded)
            .unwrap()
            .has_error(ErrorMatcher::by_predicate(|e| e.message() == "boom"))
            .unwrap()
            .has_error_message("boom")
            .unwrap();

        assert!(
            assert_that(&probe)
                .has_error(ErrorMatcher::of_type::<FileMissing>())
                .is_err()
        );
        assert!(assert_that(&probe).has_error_message("other").is_err());
        assert!(assert_that(&probe).has_no_errors().is_err());
        assert!(assert_that(&probe).without_errors().is_err());
    }

    #[test]
    fn has_error_fails_without_error() {
        let probe = completed_with(&[1]);
        let err = assert_that(&probe)
            .has_error(ErrorMatcher::of_type::<IllegalState>())
            .unwrap_err();
        assert!(matches!(err, Error::AssertionFailed { .. }));
    }

    #[test]
    fn instance_matcher_accepts_stream_error() {
        let error: StreamError = IllegalState("boom").into();
        let probe = crate::attach(sources::fail::<i32>(error.clone()));
        assert_that(&probe).has_error(error).unwrap();
    }

    #[test]
    fn cancellation_checks() {
        let probe = running();
        assert_that(&probe).is_not_cancelled().unwrap();
        probe.cancel();
        assert_that(&probe).is_cancelled().unwrap();
        assert!(assert_that(&probe).is_not_cancelled().is_err());
    }

    #[test]
    fn violations_are_reported() {
        let probe = completed_with(&[1]);
        assert_that(&probe).has_no_violations().unwrap();

        assert!(probe.on_next(2).is_err());
        assert!(assert_that(&probe).has_no_violations().is_err());
        // The rejected value did not change the stream.
        assert_that(&probe).has_result(&[1]).unwrap();
    }

    // ==================== Value checks ====================

    #[test]
    fn single_value_checks() {
        let probe = completed_with(&[7]);
        assert_that(&probe)
            .has_value(&7)
            .unwrap()
            .has_single_value(&7)
            .unwrap()
            .has_value_matching(|v| *v > 5)
            .unwrap();

        assert!(assert_that(&probe).has_value(&8).is_err());
        assert!(assert_that(&probe).has_value_matching(|v| *v < 5).is_err());

        let two = completed_with(&[7, 7]);
        assert!(assert_that(&two).has_value(&7).is_err());
        assert!(assert_that(&two).has_value_matching(|_| true).is_err());
    }

    #[test]
    fn has_values_requires_order_and_length() {
        let probe = completed_with(&[1, 2, 3]);
        assert_that(&probe).has_values(&[1, 2, 3]).unwrap();
        assert!(assert_that(&probe).has_values(&[3, 2, 1]).is_err());
        assert!(assert_that(&probe).has_values(&[1, 2]).is_err());
        assert!(assert_that(&probe).has_values(&[1, 2, 3, 4]).is_err());
    }

    #[test]
    fn value_count_checks() {
        let probe = completed_with(&[1, 2]);
        assert_that(&probe).has_value_count(2).unwrap();
        assert!(assert_that(&probe).has_value_count(3).is_err());
        assert!(assert_that(&probe).has_no_values().is_err());

        let empty = completed_with(&[]);
        assert_that(&empty).has_no_values().unwrap().emits_nothing().unwrap();
    }

    #[test]
    fn has_value_at_checks_index() {
        let probe = completed_with(&[10, 20, 30]);
        assert_that(&probe).has_value_at(1, |v| *v == 20).unwrap();
        assert!(assert_that(&probe).has_value_at(1, |v| *v == 10).is_err());

        let err = assert_that(&probe).has_value_at(3, |_| true).unwrap_err();
        assert_eq!(
            err,
            Error::IndexOutOfRange {
                probe: probe.id(),
                index: 3,
                len: 3
            }
        );
    }

    #[test]
    fn has_value_set_ignores_order_and_duplicates() {
        let probe = completed_with(&[3, 1, 2, 1]);
        assert_that(&probe).has_value_set([1, 2, 3]).unwrap();
        assert_that(&probe).has_value_set([2, 2, 3, 1]).unwrap();
        assert!(assert_that(&probe).has_value_set([1, 2]).is_err());
        assert!(assert_that(&probe).has_value_set([1, 2, 3, 4]).is_err());
    }

    #[test]
    fn has_value_sequence_is_elementwise() {
        let probe = completed_with(&[1, 2, 3]);
        assert_that(&probe).has_value_sequence(1..=3).unwrap();
        assert!(assert_that(&probe).has_value_sequence(1..=2).is_err());
        assert!(assert_that(&probe).has_value_sequence(1..=4).is_err());
        assert!(assert_that(&probe).has_value_sequence([1, 3, 2]).is_err());
    }

    #[test]
    fn has_value_sequence_accepts_recorded_values() {
        let probe = crate::attach(sources::from_iter((0..50).map(|i| i * 3)));
        assert_that(&probe).has_value_sequence(probe.values()).unwrap();
    }

    #[test]
    fn has_value_sequence_stops_at_first_difference() {
        let probe = completed_with(&[1, 2, 3]);
        // An unbounded expectation is never exhausted past the mismatch.
        assert!(assert_that(&probe).has_value_sequence(5..).is_err());
    }

    #[test]
    fn membership_checks() {
        let probe = completed_with(&[1, 2, 3]);
        assert_that(&probe)
            .contains(&[3, 1])
            .unwrap()
            .does_not_contain(&[4, 5])
            .unwrap();
        assert!(assert_that(&probe).contains(&[1, 4]).is_err());
        assert!(assert_that(&probe).does_not_contain(&[5, 2]).is_err());
    }

    // ==================== Composite checks ====================

    #[test]
    fn completed_stream_has_result_not_failure() {
        let probe = completed_with(&[1, 2, 3]);
        assert_that(&probe)
            .has_result(&[1, 2, 3])
            .unwrap()
            .is_complete()
            .unwrap();
        assert!(
            assert_that(&probe)
                .has_failure(ErrorMatcher::of_type::<IllegalState>(), &[1, 2, 3])
                .is_err()
        );
        assert!(assert_that(&probe).is_not_complete().is_err());
    }

    #[test]
    fn failed_stream_has_failure_not_result() {
        let probe = failed_with(&[1, 2, 3], "boom");
        assert_that(&probe)
            .has_failure(ErrorMatcher::of_type::<IllegalState>(), &[1, 2, 3])
            .unwrap();
        assert!(assert_that(&probe).has_result(&[1, 2, 3]).is_err());
        assert!(assert_that(&probe).is_complete().is_err());
        assert!(
            assert_that(&probe)
                .has_failure(ErrorMatcher::of_type::<IllegalState>(), &[1, 2])
                .is_err()
        );
    }

    #[test]
    fn has_result_requires_subscription() {
        let probe = Probe::<i32>::new();
        let err = assert_that(&probe).has_result(&[]).unwrap_err();
        match err {
            Error::AssertionFailed { expected, .. } => assert_eq!(expected, "a subscription"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn has_empty_matches_silent_stream() {
        let probe = crate::attach::<i32, _>(sources::never());
        assert_that(&probe).has_empty().unwrap();
        assert!(assert_that(&completed_with(&[])).has_empty().is_err());
        assert!(assert_that(&Probe::<i32>::new()).has_empty().is_err());
    }

    // ==================== Quantified checks ====================

    #[test]
    fn quantified_checks() {
        let probe = completed_with(&[1, 2, 3, 4, 5]);
        let even = |v: &i32| v % 2 == 0;

        assert_that(&probe)
            .each_item_matches(|v| *v > 0)
            .unwrap()
            .no_item_matches(|v| *v > 5)
            .unwrap()
            .at_least_one_item_matches(even)
            .unwrap();

        assert!(assert_that(&probe).each_item_matches(even).is_err());
        assert!(assert_that(&probe).no_item_matches(even).is_err());
        assert!(
            assert_that(&probe)
                .at_least_one_item_matches(|v| *v > 5)
                .is_err()
        );
    }

    #[test]
    fn quantifier_laws_hold_for_every_threshold() {
        let probe = completed_with(&[1, 2, 3, 4, 5, 6, 7]);
        let even = |v: &i32| v % 2 == 0;
        let c = 3;

        for k in 0..=8 {
            let check = assert_that(&probe);
            assert_eq!(check.are_exactly(k, even).is_ok(), k == c, "exactly {k}");
            assert_eq!(check.are_at_least(k, even).is_ok(), k <= c, "at least {k}");
            assert_eq!(check.are_at_most(k, even).is_ok(), k >= c, "at most {k}");
        }
    }

    #[test]
    fn each_item_matches_on_empty_stream() {
        let probe = completed_with(&[]);
        assert_that(&probe)
            .each_item_matches(|_| false)
            .unwrap()
            .no_item_matches(|_| true)
            .unwrap();
        assert!(assert_that(&probe).at_least_one_item_matches(|_| true).is_err());
    }

    #[test]
    fn rx1_style_aliases() {
        let recorder = completed_with(&[1, 2, 3, 4]);
        let even = |v: &i32| v % 2 == 0;
        assert_that(&recorder)
            .has_received(&[1, 2, 3, 4])
            .unwrap()
            .has_received_count(4)
            .unwrap()
            .have_at_least(2, even)
            .unwrap()
            .have_at_most(2, even)
            .unwrap()
            .have_exactly(2, even)
            .unwrap();
        assert!(assert_that(&recorder).received_nothing().is_err());
        assert!(assert_that(&recorder).have_exactly(1, even).is_err());
        assert_that(&completed_with(&[])).received_nothing().unwrap();
    }

    // ==================== Callbacks reading back ====================

    #[test]
    fn item_predicate_may_read_the_recording() {
        let recorder = completed_with(&[1, 2, 3]);
        let source = recorder.clone();
        assert_that(&recorder)
            .each_item_matches(move |v| *v as usize <= source.value_count())
            .unwrap();

        let source = recorder.clone();
        assert_that(&recorder)
            .has_value_at(2, move |v| source.values().contains(v))
            .unwrap();
    }

    #[test]
    fn error_predicate_may_read_the_recording() {
        let recorder = failed_with(&[1], "boom");
        let source = recorder.clone();
        assert_that(&recorder)
            .has_error(ErrorMatcher::by_predicate(move |_| source.is_terminated()))
            .unwrap()
            .has_failure(
                ErrorMatcher::by_predicate({
                    let source = recorder.clone();
                    move |e| source.error().is_some_and(|own| own.message() == e.message())
                }),
                &[1],
            )
            .unwrap();
    }

    #[test]
    fn sequence_iterator_may_read_the_recording() {
        let recorder = completed_with(&[1, 2]);
        let source = recorder.clone();
        let expected = (1..).take_while(move |v| *v as usize <= source.value_count());
        assert_that(&recorder).has_value_sequence(expected).unwrap();
    }

    #[test]
    fn slow_predicate_does_not_hold_up_the_producer() {
        let recorder = running();
        recorder.on_next(1).unwrap();

        let (started, wait) = mpsc::channel();
        let checked = recorder.clone();
        let checker = thread::spawn(move || {
            assert_that(&checked)
                .each_item_matches(move |_| {
                    let _ = started.send(());
                    thread::sleep(Duration::from_millis(300));
                    true
                })
                .is_ok()
        });

        wait.recv().unwrap();
        let start = Instant::now();
        recorder.on_next(2).unwrap();
        assert!(start.elapsed() < Duration::from_millis(200));

        assert!(checker.join().unwrap());
        assert_eq!(recorder.values(), vec![1, 2]);
    }

    // ==================== Failure reporting ====================

    #[test]
    fn failure_describes_expected_and_actual() {
        let probe = completed_with(&[1, 2]);
        let err = assert_that(&probe).has_value_count(3).unwrap_err();
        match &err {
            Error::AssertionFailed {
                probe: id,
                expected,
                actual,
            } => {
                assert_eq!(*id, probe.id());
                assert_eq!(expected, "3 value(s)");
                assert!(actual.contains("received 2 value(s) [1, 2]"));
                assert!(actual.contains("completed"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("expected 3 value(s), but the probe was"));
        assert!(!err.is_protocol_violation());
    }

    #[test]
    fn failure_summary_names_the_error() {
        let recorder = failed_with(&[1], "boom");
        let err = assert_that(&recorder).is_complete().unwrap_err();
        let text = err.to_string();
        assert!(text.contains("was subscribed"));
        assert!(text.contains("1 value(s) [1]"));
        assert!(text.contains("failed with"));
        assert!(text.contains("boom"));
    }

    #[test]
    fn violation_failure_reports_the_count() {
        let recorder = running();
        recorder.on_complete().unwrap();
        assert!(recorder.on_next(1).is_err());
        assert!(recorder.on_complete().is_err());

        let err = assert_that(&recorder).has_no_violations().unwrap_err();
        assert!(err.to_string().contains("no protocol violations, found 2"));
    }

    #[test]
    fn checks_are_idempotent() {
        let probe = failed_with(&[1, 2], "boom");
        let check = assert_that(&probe);
        for _ in 0..5 {
            assert!(check.has_values(&[1, 2]).is_ok());
            assert!(check.is_complete().is_err());
            assert_eq!(
                check.has_value_count(1).unwrap_err(),
                check.has_value_count(1).unwrap_err()
            );
        }
    }

    // ==================== Waiting ====================

    #[test]
    fn await_done_waits_for_threaded_producer() {
        let probe = crate::attach(sources::from_iter(0..100).on(sources::Executor::Thread));
        assert_that(&probe)
            .await_done(Duration::from_secs(5))
            .unwrap()
            .has_value_count(100)
            .unwrap()
            .is_complete()
            .unwrap();
    }

    #[test]
    fn await_done_timeout_is_not_an_error() {
        let probe = running();
        let check = assert_that(&probe);
        assert!(check.await_done(Duration::from_millis(20)).is_ok());
        assert!(check.is_complete().is_err());
        check.is_cancelled().unwrap();
    }

    #[test]
    fn await_done_sees_values_written_before_completion() {
        let probe = Probe::<u64>::with_config(Shape::Flow, ProbeConfig::default());
        probe.on_subscribe(Arc::new(CancelHandle::new())).unwrap();
        let producer = probe.clone();
        let worker = thread::spawn(move || {
            for v in 0..1000 {
                producer.on_next(v).unwrap();
            }
            producer.on_complete().unwrap();
        });

        assert_that(&probe)
            .await_done(Duration::from_secs(5))
            .unwrap()
            .has_value_sequence(0..1000)
            .unwrap();
        worker.join().unwrap();
    }

    #[test]
    fn assert_that_subscriber_to_attaches() {
        assert_that_subscriber_to(sources::from_iter(["Luke", "Yoda"]))
            .is_subscribed()
            .unwrap()
            .has_values(&["Luke", "Yoda"])
            .unwrap();
    }

    #[test]
    fn dump_does_not_panic() {
        assert_that(&failed_with(&[1], "boom")).dump();
        assert_that(&Probe::<i32>::new()).dump();
    }
}
