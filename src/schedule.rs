//! Virtual-clock timer queue.
//!
//! Widgets never sleep: they register timeouts here and the host advances the
//! clock. A zero-delay timeout runs on the next tick, after the current
//! render, which is how "measure after the next layout pass" is expressed.

use std::time::Duration;

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle returned by [`Scheduler::set_timeout`].
    pub struct TimerId;
}

#[derive(Debug)]
struct Timer<T> {
    deadline: Duration,
    seq: u64,
    task: T,
}

/// Pending timeouts carrying a task value of type `T`.
#[derive(Debug)]
pub struct Scheduler<T> {
    now: Duration,
    seq: u64,
    timers: SlotMap<TimerId, Timer<T>>,
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            seq: 0,
            timers: SlotMap::with_key(),
        }
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Run `task` once `delay` has elapsed from now.
    pub fn set_timeout(&mut self, delay: Duration, task: T) -> TimerId {
        self.seq += 1;
        self.timers.insert(Timer {
            deadline: self.now + delay,
            seq: self.seq,
            task,
        })
    }

    /// Cancel a timeout. Returns the task if it was still pending.
    pub fn clear_timeout(&mut self, id: TimerId) -> Option<T> {
        self.timers.remove(id).map(|t| t.task)
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.contains_key(id)
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.values().map(|t| t.deadline).min()
    }

    /// Pop the next timer due at or before `until`, advancing the clock to its
    /// deadline. Earlier deadlines first; equal deadlines in insertion order.
    ///
    /// When nothing is due the clock moves to `until` and `None` is returned.
    pub fn pop_due(&mut self, until: Duration) -> Option<(TimerId, T)> {
        let next = self
            .timers
            .iter()
            .filter(|(_, t)| t.deadline <= until)
            .min_by_key(|(_, t)| (t.deadline, t.seq))
            .map(|(id, _)| id);
        match next {
            Some(id) => {
                let timer = self.timers.remove(id)?;
                self.now = self.now.max(timer.deadline);
                Some((id, timer.task))
            }
            None => {
                self.now = self.now.max(until);
                None
            }
        }
    }

    /// Pop every timer due by `until`, in order, and leave the clock at `until`.
    ///
    /// Timers added while draining are not included; use [`pop_due`](Self::pop_due)
    /// in a loop when tasks schedule follow-ups.
    pub fn settle(&mut self, until: Duration) -> Vec<T> {
        let mut due = Vec::new();
        let limit = self.seq;
        while let Some(id) = self
            .timers
            .iter()
            .filter(|(_, t)| t.deadline <= until && t.seq <= limit)
            .min_by_key(|(_, t)| (t.deadline, t.seq))
            .map(|(id, _)| id)
        {
            if let Some(timer) = self.timers.remove(id) {
                self.now = self.now.max(timer.deadline);
                due.push(timer.task);
            }
        }
        self.now = self.now.max(until);
        due
    }

    /// Drop every pending timer.
    pub fn clear(&mut self) {
        self.timers.clear();
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn pops_in_deadline_order() {
        let mut s = Scheduler::new();
        s.set_timeout(ms(30), "c");
        s.set_timeout(ms(10), "a");
        s.set_timeout(ms(20), "b");
        assert_eq!(s.next_deadline(), Some(ms(10)));
        assert_eq!(s.settle(ms(25)), vec!["a", "b"]);
        assert_eq!(s.now(), ms(25));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn equal_deadlines_are_fifo() {
        let mut s = Scheduler::new();
        s.set_timeout(Duration::ZERO, 1);
        s.set_timeout(Duration::ZERO, 2);
        s.set_timeout(Duration::ZERO, 3);
        assert_eq!(s.settle(Duration::ZERO), vec![1, 2, 3]);
    }

    #[test]
    fn cleared_timer_never_fires() {
        let mut s = Scheduler::new();
        let id = s.set_timeout(ms(2000), "hide");
        assert!(s.is_pending(id));
        assert_eq!(s.clear_timeout(id), Some("hide"));
        assert!(!s.is_pending(id));
        assert_eq!(s.clear_timeout(id), None);
        assert!(s.settle(ms(5000)).is_empty());
    }

    #[test]
    fn delays_are_relative_to_now() {
        let mut s = Scheduler::new();
        assert!(s.pop_due(ms(500)).is_none());
        assert_eq!(s.now(), ms(500));
        s.set_timeout(ms(2000), "hide");
        assert_eq!(s.next_deadline(), Some(ms(2500)));
        assert!(s.pop_due(ms(2499)).is_none());
        let (_, task) = s.pop_due(ms(3000)).unwrap();
        assert_eq!(task, "hide");
        assert_eq!(s.now(), ms(2500));
    }

    #[test]
    fn settle_skips_follow_ups() {
        let mut s = Scheduler::new();
        s.set_timeout(Duration::ZERO, 1);
        let due = s.settle(Duration::ZERO);
        s.set_timeout(Duration::ZERO, 2);
        assert_eq!(due, vec![1]);
        assert_eq!(s.len(), 1);
        s.clear();
        assert!(s.is_empty());
    }
}
