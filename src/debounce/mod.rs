//! Debounce primitives.
//!
//! Everything here is clock-driven rather than timer-driven: callers pass
//! the current [`Instant`] to every operation and ask for the next
//! [`deadline`](Trailing::deadline) to know when to come back. A runtime
//! (see [`SessionDriver`](crate::SessionDriver)) sleeps until that
//! deadline; tests simply pass synthetic instants.
//!
//! Because no timer is ever registered, cancelling is just dropping the
//! pending slot: nothing can fire after [`cancel`](Trailing::cancel) or
//! after the owner is dropped.
//!
//! # Types
//!
//! - [`Trailing`] - a single pending value with a deadline (the shared core)
//! - [`Debounced`] - a value plus its trailing, settled projection
//! - [`DebouncedFn`] - a side-effecting function whose calls collapse to the
//!   last one, fired once after the idle window

use std::time::Duration;

use tokio::time::Instant;

/// A pending value that becomes due after an idle window.
///
/// Every [`push`](Self::push) replaces the pending value and restarts the
/// window; [`poll`](Self::poll) hands the value out once the window has
/// elapsed with no further push.
#[derive(Clone, Debug)]
pub struct Trailing<A> {
    delay: Duration,
    pending: Option<(A, Instant)>,
}

impl<A> Trailing<A> {
    /// Creates an empty slot with the given idle window.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Replaces the pending value and restarts the window at `now`.
    pub fn push(&mut self, value: A, now: Instant) {
        self.pending = Some((value, now + self.delay));
    }

    /// Takes the pending value if its window has elapsed at `now`.
    pub fn poll(&mut self, now: Instant) -> Option<A> {
        match self.pending {
            Some((_, due)) if due <= now => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }

    /// Takes the pending value immediately, regardless of its deadline.
    pub fn flush(&mut self) -> Option<A> {
        self.pending.take().map(|(value, _)| value)
    }

    /// Drops the pending value, returning it.
    pub fn cancel(&mut self) -> Option<A> {
        self.flush()
    }

    /// Returns the pending value, if any.
    pub fn pending(&self) -> Option<&A> {
        self.pending.as_ref().map(|(value, _)| value)
    }

    /// Returns true while a value is waiting for its window to elapse.
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Returns when the pending value becomes due.
    #[inline]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, due)| *due)
    }

    /// Returns the idle window.
    #[inline]
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

/// A rapidly changing value and its debounced projection.
///
/// `stable` catches up with the latest value only after `delay` has
/// elapsed with no further change; [`is_settling`](Self::is_settling) is
/// true from the moment the value changes until then.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use tokio::time::Instant;
/// use byrdocs::debounce::Debounced;
///
/// let t0 = Instant::now();
/// let mut keyword = Debounced::new(String::new(), Duration::from_millis(500));
///
/// keyword.set("a".to_string(), t0);
/// keyword.set("ab".to_string(), t0 + Duration::from_millis(100));
/// assert!(keyword.is_settling());
///
/// assert!(!keyword.poll(t0 + Duration::from_millis(599)));
/// assert!(keyword.poll(t0 + Duration::from_millis(600)));
/// assert_eq!(keyword.stable(), "ab");
/// ```
#[derive(Clone, Debug)]
pub struct Debounced<T> {
    stable: T,
    trailing: Trailing<T>,
}

impl<T: Clone + PartialEq> Debounced<T> {
    /// Creates a settled value.
    pub fn new(initial: T, delay: Duration) -> Self {
        Self {
            stable: initial,
            trailing: Trailing::new(delay),
        }
    }

    /// Records a new value at `now`.
    ///
    /// Setting the value it is already heading for is a no-op and does not
    /// restart the window.
    pub fn set(&mut self, value: T, now: Instant) {
        if *self.latest() == value {
            return;
        }
        self.trailing.push(value, now);
    }

    /// Promotes the pending value if its window has elapsed.
    ///
    /// Returns true if `stable` changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.trailing.poll(now) {
            Some(value) => {
                let changed = value != self.stable;
                self.stable = value;
                changed
            }
            None => false,
        }
    }

    /// Sets both the value and its projection immediately.
    ///
    /// Used when the value is restored rather than typed (URL load,
    /// reset), where no settling period applies.
    pub fn reset(&mut self, value: T) {
        self.trailing.cancel();
        self.stable = value;
    }

    /// Drops any pending change; `stable` keeps its current value.
    pub fn cancel(&mut self) {
        self.trailing.cancel();
    }

    /// Returns the settled value.
    #[inline]
    pub fn stable(&self) -> &T {
        &self.stable
    }

    /// Returns the most recent value, settled or not.
    #[inline]
    pub fn latest(&self) -> &T {
        self.trailing.pending().unwrap_or(&self.stable)
    }

    /// Returns true while the settled value lags behind the latest one.
    #[inline]
    pub fn is_settling(&self) -> bool {
        self.trailing.is_pending()
    }

    /// Returns when the pending value settles.
    #[inline]
    pub fn deadline(&self) -> Option<Instant> {
        self.trailing.deadline()
    }
}

/// Wraps a side-effecting function so bursts of calls collapse.
///
/// Repeated [`call`](Self::call)s within the window keep only the last
/// argument; the function runs once, with that argument, when
/// [`poll`](Self::poll) observes the window has elapsed.
///
/// ```rust
/// use std::time::Duration;
/// use tokio::time::Instant;
/// use byrdocs::debounce::DebouncedFn;
///
/// let t0 = Instant::now();
/// let mut writes = Vec::new();
/// let mut write = DebouncedFn::new(Duration::from_millis(500), |q: &str| writes.push(q.to_string()));
///
/// write.call("l", t0);
/// write.call("li", t0 + Duration::from_millis(50));
/// write.poll(t0 + Duration::from_millis(550));
/// drop(write);
///
/// assert_eq!(writes, vec!["li"]);
/// ```
///
/// The session's URL write is one of these, built on the same [`Trailing`]
/// core as [`Debounced`] so both settle on the same deadline.
#[derive(Clone)]
pub struct DebouncedFn<A, F> {
    trailing: Trailing<A>,
    f: F,
}

impl<A, R, F> DebouncedFn<A, F>
where
    F: FnMut(A) -> R,
{
    /// Wraps `f` with the given idle window.
    pub fn new(delay: Duration, f: F) -> Self {
        Self {
            trailing: Trailing::new(delay),
            f,
        }
    }

    /// Schedules `f(arg)`, replacing any call still waiting.
    pub fn call(&mut self, arg: A, now: Instant) {
        self.trailing.push(arg, now);
    }

    /// Runs the waiting call if its window has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<R> {
        self.trailing.poll(now).map(&mut self.f)
    }

    /// Runs the waiting call immediately.
    pub fn flush(&mut self) -> Option<R> {
        self.trailing.flush().map(&mut self.f)
    }

    /// Drops the waiting call without running it.
    pub fn cancel(&mut self) {
        self.trailing.cancel();
    }

    /// Returns true while a call is waiting.
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.trailing.is_pending()
    }

    /// Returns when the waiting call runs.
    #[inline]
    pub fn deadline(&self) -> Option<Instant> {
        self.trailing.deadline()
    }
}

impl<A: std::fmt::Debug, F> std::fmt::Debug for DebouncedFn<A, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DebouncedFn")
            .field("trailing", &self.trailing)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(500);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_rapid_changes_settle_to_last() {
        let t0 = Instant::now();
        let mut value = Debounced::new(String::new(), WINDOW);

        value.set("a".into(), t0);
        value.set("ab".into(), t0 + ms(100));
        value.set("abc".into(), t0 + ms(200));

        // Never promotes an intermediate value
        for step in [0, 100, 200, 500, 600, 699] {
            assert!(!value.poll(t0 + ms(step)));
            assert_eq!(value.stable(), "");
            assert!(value.is_settling());
        }

        assert!(value.poll(t0 + ms(700)));
        assert_eq!(value.stable(), "abc");
        assert!(!value.is_settling());
    }

    #[test]
    fn test_deadline_tracks_last_change() {
        let t0 = Instant::now();
        let mut value = Debounced::new(0u32, WINDOW);
        assert!(value.deadline().is_none());

        value.set(1, t0);
        assert_eq!(value.deadline(), Some(t0 + WINDOW));

        value.set(2, t0 + ms(300));
        assert_eq!(value.deadline(), Some(t0 + ms(800)));
    }

    #[test]
    fn test_setting_same_value_does_not_restart() {
        let t0 = Instant::now();
        let mut value = Debounced::new(0u32, WINDOW);

        value.set(1, t0);
        value.set(1, t0 + ms(400));
        assert_eq!(value.deadline(), Some(t0 + WINDOW));

        // Setting the stable value with nothing pending is a no-op
        let mut idle = Debounced::new(7u32, WINDOW);
        idle.set(7, t0);
        assert!(!idle.is_settling());
    }

    #[test]
    fn test_change_back_still_settles() {
        let t0 = Instant::now();
        let mut value = Debounced::new(String::new(), WINDOW);

        value.set("x".into(), t0);
        value.set(String::new(), t0 + ms(100));
        assert!(value.is_settling());

        // Settles without a visible change
        assert!(!value.poll(t0 + ms(600)));
        assert!(!value.is_settling());
        assert_eq!(value.stable(), "");
    }

    #[test]
    fn test_cancel_prevents_update() {
        let t0 = Instant::now();
        let mut value = Debounced::new(String::new(), WINDOW);

        value.set("abc".into(), t0);
        value.cancel();

        assert!(!value.poll(t0 + ms(10_000)));
        assert_eq!(value.stable(), "");
        assert!(value.deadline().is_none());
    }

    #[test]
    fn test_reset_is_immediate() {
        let t0 = Instant::now();
        let mut value = Debounced::new(String::new(), WINDOW);

        value.set("typed".into(), t0);
        value.reset("restored".into());

        assert_eq!(value.stable(), "restored");
        assert!(!value.is_settling());
        assert!(!value.poll(t0 + ms(10_000)));
    }

    #[test]
    fn test_debounced_fn_collapses_calls() {
        let t0 = Instant::now();
        let mut calls = Vec::new();
        {
            let mut f = DebouncedFn::new(WINDOW, |arg: u32| calls.push(arg));
            f.call(1, t0);
            f.call(2, t0 + ms(100));
            f.call(3, t0 + ms(200));

            assert!(f.poll(t0 + ms(699)).is_none());
            assert!(f.poll(t0 + ms(700)).is_some());
            assert!(f.poll(t0 + ms(2_000)).is_none());
        }
        assert_eq!(calls, vec![3]);
    }

    #[test]
    fn test_debounced_fn_returns_result() {
        let t0 = Instant::now();
        let mut f = DebouncedFn::new(WINDOW, |arg: u32| arg * 2);
        f.call(21, t0);
        assert_eq!(f.flush(), Some(42));
        assert!(!f.is_pending());
    }

    #[test]
    fn test_debounced_fn_cancel() {
        let t0 = Instant::now();
        let mut fired = false;
        {
            let mut f = DebouncedFn::new(WINDOW, |_: ()| fired = true);
            f.call((), t0);
            f.cancel();
            assert!(f.poll(t0 + ms(10_000)).is_none());
        }
        assert!(!fired);
    }
}
