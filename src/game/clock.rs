//! Time sources and periodic deadlines used to schedule game ticks
use std::time::{Duration, Instant};

/// A source of the current time
pub(crate) trait Clock {
    fn now(&self) -> Instant;
}

/// The real, monotonic system clock
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.  Clones share the same time.
#[cfg(test)]
#[derive(Clone, Debug)]
pub(crate) struct ManualClock(std::rc::Rc<std::cell::Cell<Instant>>);

#[cfg(test)]
impl ManualClock {
    pub(crate) fn new() -> ManualClock {
        ManualClock(std::rc::Rc::new(std::cell::Cell::new(Instant::now())))
    }

    pub(crate) fn advance(&self, by: Duration) {
        self.0.set(self.0.get() + by);
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.0.get()
    }
}

/// A repeating deadline.  An interval is inactive until started, and
/// cancelling it guarantees that it will not fire again until restarted.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Interval {
    period: Duration,
    next: Option<Instant>,
}

impl Interval {
    /// # Panics
    ///
    /// Panics if `period` is zero.
    pub(crate) fn new(period: Duration) -> Interval {
        assert!(!period.is_zero(), "Interval period must be nonzero");
        Interval { period, next: None }
    }

    /// Schedule the first deadline one period after `now`, replacing any
    /// existing schedule
    pub(crate) fn start(&mut self, now: Instant) {
        self.next = Some(now + self.period);
    }

    pub(crate) fn cancel(&mut self) {
        self.next = None;
    }

    pub(crate) fn deadline(&self) -> Option<Instant> {
        self.next
    }

    /// Return the number of deadlines that have passed as of `now` and move
    /// the next deadline past `now`.  Inactive intervals never fire.
    pub(crate) fn fire(&mut self, now: Instant) -> u32 {
        let Some(mut next) = self.next else {
            return 0;
        };
        let mut fired = 0u32;
        while next <= now {
            next += self.period;
            fired = fired.saturating_add(1);
        }
        self.next = Some(next);
        fired
    }
}
