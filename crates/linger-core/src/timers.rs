//! Host timer facility.
//!
//! `TimerQueue` is the deferred-callback service the hooks arm against. It does
//! not spawn threads or sleep: the host loop calls `run_due` whenever it wakes
//! up, and can use `next_deadline` to decide how long to wait.

use slotmap::{SlotMap, new_key_type};
use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::rc::Rc;
use web_time::{Duration, Instant};

use crate::clock::{Clock, SystemClock};

const COMPACT_SLACK: usize = 32;

new_key_type! {
    /// Identifies one scheduled fire on a `TimerQueue`.
    pub struct TimerId;
}

/// Clones share the same queue.
#[derive(Clone)]
pub struct TimerQueue {
    inner: Rc<QueueInner>,
}

struct QueueInner {
    clock: Box<dyn Clock>,
    state: RefCell<QueueState>,
}

#[derive(Default)]
struct QueueState {
    timers: SlotMap<TimerId, Entry>,
    order: BinaryHeap<Scheduled>,
    next_seq: u64,
}

struct Entry {
    deadline: Instant,
    callback: Box<dyn FnOnce()>,
}

// Min-heap on (deadline, seq). Cancelled ids stay in the heap until they
// surface or `compact` sweeps them.
#[derive(PartialEq, Eq)]
struct Scheduled {
    deadline: Instant,
    seq: u64,
    id: TimerId,
}

impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .deadline
            .cmp(&self.deadline)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl QueueState {
    fn drop_stale_head(&mut self) {
        while let Some(head) = self.order.peek() {
            if self.timers.contains_key(head.id) {
                break;
            }
            self.order.pop();
        }
    }

    // Keeps the heap within twice the live count plus some slack.
    fn compact(&mut self) {
        if self.order.len() <= 2 * self.timers.len() + COMPACT_SLACK {
            return;
        }
        let before = self.order.len();
        let timers = &self.timers;
        self.order.retain(|s| timers.contains_key(s.id));
        log::trace!("timers: compacted {before} -> {} heap entries", self.order.len());
    }
}

impl TimerQueue {
    pub fn new(clock: impl Clock) -> Self {
        Self {
            inner: Rc::new(QueueInner {
                clock: Box::new(clock),
                state: RefCell::new(QueueState::default()),
            }),
        }
    }

    /// Queue driven by the real wall clock.
    pub fn system() -> Self {
        Self::new(SystemClock)
    }

    pub fn now(&self) -> Instant {
        self.inner.clock.now()
    }

    /// Schedules `f` to run once `delay` has elapsed. Returns immediately.
    pub fn schedule(&self, delay: Duration, f: impl FnOnce() + 'static) -> TimerId {
        let now = self.now();
        // A deadline past what `Instant` can represent is as good as never.
        let deadline = now.checked_add(delay).unwrap_or_else(|| {
            log::warn!("timers: delay {delay:?} overflows the clock; clamping");
            now + Duration::from_secs(u32::MAX as u64)
        });

        let mut st = self.inner.state.borrow_mut();
        let seq = st.next_seq;
        st.next_seq += 1;
        let id = st.timers.insert(Entry {
            deadline,
            callback: Box::new(f),
        });
        st.order.push(Scheduled { deadline, seq, id });
        log::trace!("timers: scheduled {id:?} in {delay:?}");
        id
    }

    /// Cancels a timer that has not started firing. Returns `false` if it
    /// already fired, is firing right now, or was cancelled before.
    pub fn cancel(&self, id: TimerId) -> bool {
        let removed = {
            let mut st = self.inner.state.borrow_mut();
            let removed = st.timers.remove(id);
            if removed.is_some() {
                st.compact();
            }
            removed
        };
        match removed {
            Some(entry) => {
                log::trace!("timers: cancelled {id:?}");
                // Dropped outside the borrow; the callback may own other handles.
                drop(entry);
                true
            }
            None => false,
        }
    }

    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.inner.state.borrow().timers.contains_key(id)
    }

    pub fn deadline(&self, id: TimerId) -> Option<Instant> {
        self.inner.state.borrow().timers.get(id).map(|e| e.deadline)
    }

    pub fn len(&self) -> usize {
        self.inner.state.borrow().timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        let mut st = self.inner.state.borrow_mut();
        st.drop_stale_head();
        st.order.peek().map(|s| s.deadline)
    }

    /// How long the host may sleep before the next timer is due.
    pub fn time_until_next(&self) -> Option<Duration> {
        let next = self.next_deadline()?;
        Some(next.saturating_duration_since(self.now()))
    }

    /// Fires every timer that is due, in deadline order (ties in scheduling
    /// order). Timers scheduled by a callback during this pass wait for the
    /// next pass. Returns the number of callbacks run.
    ///
    /// A panicking callback unwinds out of here; the queue stays usable.
    pub fn run_due(&self) -> usize {
        let now = self.now();
        let horizon = self.inner.state.borrow().next_seq;
        let mut fired = 0;

        loop {
            let entry = {
                let mut st = self.inner.state.borrow_mut();
                st.drop_stale_head();
                match st.order.peek() {
                    Some(head) if head.deadline <= now && head.seq < horizon => {}
                    _ => break,
                }
                let Some(head) = st.order.pop() else { break };
                let id = head.id;
                st.timers.remove(id).map(|e| (id, e))
            };

            if let Some((id, entry)) = entry {
                log::trace!("timers: firing {id:?}");
                (entry.callback)();
                fired += 1;
            }
        }

        fired
    }

    /// Drops every pending timer without running it.
    pub fn clear(&self) {
        let taken = {
            let mut st = self.inner.state.borrow_mut();
            st.order.clear();
            std::mem::take(&mut st.timers)
        };
        log::trace!("timers: cleared {} pending timer(s)", taken.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::TestClock;
    use std::cell::Cell;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn queue() -> (TestClock, TimerQueue) {
        let clock = TestClock::new();
        (clock.clone(), TimerQueue::new(clock))
    }

    #[test]
    fn fires_in_deadline_order() {
        let (clock, timers) = queue();
        let log = Rc::new(RefCell::new(Vec::new()));
        for (name, delay) in [("c", 30), ("a", 10), ("b", 20), ("a2", 10)] {
            let log = log.clone();
            timers.schedule(ms(delay), move || log.borrow_mut().push(name));
        }

        clock.advance(ms(15));
        assert_eq!(timers.run_due(), 2);
        assert_eq!(*log.borrow(), vec!["a", "a2"]);

        clock.advance(ms(15));
        assert_eq!(timers.run_due(), 2);
        assert_eq!(*log.borrow(), vec!["a", "a2", "b", "c"]);
        assert!(timers.is_empty());
    }

    #[test]
    fn nothing_fires_early() {
        let (clock, timers) = queue();
        let hit = Rc::new(Cell::new(false));
        let h = hit.clone();
        timers.schedule(ms(100), move || h.set(true));

        clock.advance(ms(99));
        assert_eq!(timers.run_due(), 0);
        assert!(!hit.get());

        clock.advance(ms(1));
        assert_eq!(timers.run_due(), 1);
        assert!(hit.get());
    }

    #[test]
    fn cancel_prevents_fire() {
        let (clock, timers) = queue();
        let hit = Rc::new(Cell::new(false));
        let h = hit.clone();
        let id = timers.schedule(ms(10), move || h.set(true));

        assert!(timers.cancel(id));
        assert!(!timers.cancel(id));
        clock.advance(ms(10));
        assert_eq!(timers.run_due(), 0);
        assert!(!hit.get());
        assert_eq!(timers.next_deadline(), None);
    }

    #[test]
    fn zero_delay_from_callback_waits_for_next_pass() {
        let (_clock, timers) = queue();
        let hits = Rc::new(Cell::new(0));

        let t2 = timers.clone();
        let h = hits.clone();
        timers.schedule(Duration::ZERO, move || {
            h.set(h.get() + 1);
            let h = h.clone();
            t2.schedule(Duration::ZERO, move || h.set(h.get() + 1));
        });

        assert_eq!(timers.run_due(), 1);
        assert_eq!(hits.get(), 1);
        assert_eq!(timers.run_due(), 1);
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn callback_can_cancel_a_sibling() {
        let (clock, timers) = queue();
        let hit = Rc::new(Cell::new(false));
        let h = hit.clone();
        let victim = Rc::new(Cell::new(None));

        let t2 = timers.clone();
        let v = victim.clone();
        timers.schedule(ms(5), move || {
            if let Some(id) = v.get() {
                t2.cancel(id);
            }
        });
        victim.set(Some(timers.schedule(ms(5), move || h.set(true))));

        clock.advance(ms(5));
        assert_eq!(timers.run_due(), 1);
        assert!(!hit.get());
    }

    #[test]
    fn time_until_next_tracks_the_head() {
        let (clock, timers) = queue();
        assert_eq!(timers.time_until_next(), None);
        let id = timers.schedule(ms(40), || {});
        timers.schedule(ms(70), || {});
        clock.advance(ms(10));
        assert_eq!(timers.time_until_next(), Some(ms(30)));
        timers.cancel(id);
        assert_eq!(timers.time_until_next(), Some(ms(60)));
    }

    #[test]
    fn cancelled_entries_behind_a_live_head_are_swept() {
        let (clock, timers) = queue();
        let hit = Rc::new(Cell::new(false));
        let h = hit.clone();
        timers.schedule(ms(10), move || h.set(true));

        for _ in 0..1000 {
            let id = timers.schedule(ms(500), || {});
            assert!(timers.cancel(id));
        }
        assert_eq!(timers.len(), 1);
        let heap = timers.inner.state.borrow().order.len();
        assert!(heap <= 2 + COMPACT_SLACK, "heap kept {heap} entries");

        clock.advance(ms(10));
        assert_eq!(timers.run_due(), 1);
        assert!(hit.get());
        assert_eq!(timers.next_deadline(), None);
    }

    #[test]
    fn queue_survives_a_panicking_callback() {
        let (clock, timers) = queue();
        let hit = Rc::new(Cell::new(false));
        timers.schedule(ms(1), || panic!("boom"));
        let h = hit.clone();
        timers.schedule(ms(2), move || h.set(true));

        clock.advance(ms(5));
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| timers.run_due()));
        assert!(result.is_err());
        assert_eq!(timers.run_due(), 1);
        assert!(hit.get());
    }
}
