//!  src/util/scheduler.rs
//!  ===================================================================
//!  Virtual-time task scheduler.
//!
//!  • Every pending task is keyed by purpose; scheduling under a key that
//!    is already pending replaces it (this is how search debouncing works).
//!  • Time comes from a [`Clock`], so tests step a [`ManualClock`] instead
//!    of sleeping.
//!  • The scheduler never runs anything itself: the owner drains due
//!    tasks with [`Scheduler::pop_due`] and executes them.

use std::{
    cell::Cell,
    collections::BTreeMap,
    fmt::Debug,
    rc::Rc,
    time::{Duration, Instant},
};

use tracing::trace;

/* ============================== Clock ============================== */

/// Monotonic time source, measured from an arbitrary origin.
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Wall-clock backed time for the running application.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Hand-stepped clock. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/* ============================ Scheduler ============================ */

#[derive(Debug)]
struct Entry<T> {
    deadline: Duration,
    seq: u64,
    task: T,
}

/// Pending tasks keyed by purpose.
#[derive(Debug)]
pub struct Scheduler<K: Ord, T> {
    entries: BTreeMap<K, Entry<T>>,
    seq: u64,
}

impl<K: Ord, T> Default for Scheduler<K, T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
            seq: 0,
        }
    }
}

impl<K: Ord + Clone + Debug, T> Scheduler<K, T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `task` to become due at `now + delay`, cancelling whatever
    /// was pending under the same key. Returns the replaced task.
    pub fn schedule(&mut self, key: K, now: Duration, delay: Duration, task: T) -> Option<T> {
        self.seq += 1;
        trace!(?key, ?delay, "task scheduled");
        self.entries
            .insert(
                key,
                Entry {
                    deadline: now + delay,
                    seq: self.seq,
                    task,
                },
            )
            .map(|old| old.task)
    }

    pub fn cancel(&mut self, key: &K) -> Option<T> {
        let removed = self.entries.remove(key).map(|e| e.task);
        if removed.is_some() {
            trace!(?key, "task cancelled");
        }
        removed
    }

    pub fn is_pending(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Earliest deadline among pending tasks.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.entries.values().map(|e| e.deadline).min()
    }

    /// Removes and returns the earliest task due at `now`. Ties resolve in
    /// scheduling order. Call repeatedly: executing a task may schedule more.
    pub fn pop_due(&mut self, now: Duration) -> Option<(K, T)> {
        let key = self
            .entries
            .iter()
            .filter(|(_, e)| e.deadline <= now)
            .min_by_key(|(_, e)| (e.deadline, e.seq))
            .map(|(k, _)| k.clone())?;
        self.entries.remove(&key).map(|e| (key, e.task))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
    enum Key {
        Debounce,
        Revert,
        Banner(u64),
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn same_key_keeps_only_latest() {
        let clock = ManualClock::new();
        let mut sched: Scheduler<Key, &str> = Scheduler::new();

        for (i, q) in ["a", "at", "ato", "atom", "atomi"].into_iter().enumerate() {
            if i > 0 {
                clock.advance_ms(50);
            }
            sched.schedule(Key::Debounce, clock.now(), ms(300), q);
        }

        clock.advance_ms(299);
        assert!(sched.pop_due(clock.now()).is_none());

        clock.advance_ms(1);
        assert_eq!(sched.pop_due(clock.now()), Some((Key::Debounce, "atomi")));
        assert!(sched.pop_due(clock.now()).is_none());
    }

    #[test]
    fn due_tasks_come_out_in_deadline_order() {
        let mut sched: Scheduler<Key, u8> = Scheduler::new();
        sched.schedule(Key::Revert, ms(0), ms(200), 2);
        sched.schedule(Key::Banner(1), ms(0), ms(100), 1);
        sched.schedule(Key::Banner(2), ms(0), ms(100), 3);

        assert_eq!(sched.next_deadline(), Some(ms(100)));

        let order: Vec<u8> = std::iter::from_fn(|| sched.pop_due(ms(500)).map(|(_, t)| t)).collect();
        assert_eq!(order, vec![1, 3, 2]);
        assert!(sched.is_empty());
    }

    #[test]
    fn cancel_removes_pending() {
        let mut sched: Scheduler<Key, ()> = Scheduler::new();
        sched.schedule(Key::Revert, ms(0), ms(10), ());

        assert!(sched.is_pending(&Key::Revert));
        assert!(sched.cancel(&Key::Revert).is_some());
        assert!(sched.cancel(&Key::Revert).is_none());
        assert!(sched.pop_due(ms(100)).is_none());
    }

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new();
        let other = clock.clone();
        clock.advance_ms(1500);
        assert_eq!(other.now(), ms(1500));
    }
}
