use linger_core::{Dispose, TimerQueue, disposable_effect, remember};
use std::cell::RefCell;
use std::rc::Rc;

use crate::{Delay, DelayError, TimerHandle};

/// Fires the callback once the triggers have gone quiet for `delay`.
#[derive(Clone, Debug)]
pub struct Debounce {
    handle: TimerHandle,
}

impl Debounce {
    pub fn new<D>(
        timers: &TimerQueue,
        delay: D,
        callback: impl Fn() + 'static,
    ) -> Result<Self, DelayError>
    where
        D: TryInto<Delay>,
        DelayError: From<D::Error>,
    {
        let delay: Delay = delay.try_into()?;
        Ok(Self::with_delay(timers, delay, callback))
    }

    fn with_delay(timers: &TimerQueue, delay: Delay, callback: impl Fn() + 'static) -> Self {
        Self {
            handle: TimerHandle::with_delay(timers, delay, callback),
        }
    }

    /// Records a triggering event: any pending fire is dropped and a new
    /// delay window starts.
    pub fn trigger(&self) {
        self.handle.rearm();
    }

    pub fn cancel(&self) {
        self.handle.disarm();
    }

    pub fn set_callback(&self, callback: impl Fn() + 'static) {
        self.handle.set_callback(callback);
    }

    pub fn is_pending(&self) -> bool {
        self.handle.is_pending()
    }

    pub fn delay(&self) -> Delay {
        self.handle.delay()
    }

    pub fn handle(&self) -> &TimerHandle {
        &self.handle
    }
}

/// Debounces `callback` against changes of `key` within the current composition.
///
/// The first composition counts as a trigger, as does every pass where `key`
/// differs from the previous one. The callback is refreshed on every pass.
/// A pending fire is cancelled when the composition is disposed.
///
/// A pass with an invalid `delay` still takes its slots, cancels any pending
/// fire and returns the error. The next valid pass counts as a trigger.
pub fn debounced_effect<K, D>(
    timers: &TimerQueue,
    key: K,
    delay: D,
    callback: impl Fn() + 'static,
) -> Result<Debounce, DelayError>
where
    K: PartialEq + Clone + 'static,
    D: TryInto<Delay>,
    DelayError: From<D::Error>,
{
    let slot: Rc<RefCell<Option<Debounce>>> = remember(|| RefCell::new(None));
    let delay: Result<Delay, DelayError> = delay.try_into().map_err(DelayError::from);

    let debounce = delay.map(|delay| {
        let current = slot.borrow().clone();
        match current {
            Some(d) if d.delay() == delay => {
                d.set_callback(callback);
                d
            }
            previous => {
                let d = Debounce::with_delay(timers, delay, callback);
                if let Some(old) = previous {
                    // Carry a pending window over to the new delay.
                    let was_pending = old.is_pending();
                    old.cancel();
                    if was_pending {
                        d.trigger();
                    }
                }
                *slot.borrow_mut() = Some(d.clone());
                d
            }
        }
    });

    let armed = debounce.is_ok();
    let effect_slot = slot.clone();
    disposable_effect(armed.then_some(key), move || {
        let current = effect_slot.borrow().clone();
        if let Some(d) = current.filter(|_| armed) {
            d.trigger();
        }
        Dispose::new(move || {
            let current = effect_slot.borrow().clone();
            if let Some(d) = current {
                d.cancel();
            }
        })
    });

    debounce
}

#[cfg(test)]
mod tests {
    use super::*;
    use linger_core::{Composition, TestClock};
    use std::cell::Cell;
    use web_time::Duration;

    struct Env {
        clock: TestClock,
        timers: TimerQueue,
        hits: Rc<Cell<u32>>,
    }

    fn env() -> Env {
        let clock = TestClock::new();
        Env {
            timers: TimerQueue::new(clock.clone()),
            clock,
            hits: Rc::new(Cell::new(0)),
        }
    }

    impl Env {
        fn tick(&self, ms: u64) {
            self.clock.advance(Duration::from_millis(ms));
            self.timers.run_due();
        }

        fn compose(&self, comp: &Composition, query: &'static str) {
            let hits = self.hits.clone();
            let timers = self.timers.clone();
            comp.compose(move || {
                debounced_effect(&timers, query, 100, move || hits.set(hits.get() + 1))
                    .unwrap()
            });
        }
    }

    #[test]
    fn trigger_burst_fires_once_after_quiet_period() {
        let e = env();
        let hits = e.hits.clone();
        let d = Debounce::new(&e.timers, 100, move || hits.set(hits.get() + 1)).unwrap();

        d.trigger();
        e.tick(30);
        d.trigger();
        e.tick(30);
        d.trigger();

        e.tick(99);
        assert_eq!(e.hits.get(), 0);
        e.tick(1);
        assert_eq!(e.hits.get(), 1);
        assert!(!d.is_pending());
    }

    #[test]
    fn continuous_triggers_never_fire() {
        let e = env();
        let hits = e.hits.clone();
        let d = Debounce::new(&e.timers, 50, move || hits.set(hits.get() + 1)).unwrap();
        for _ in 0..20 {
            d.trigger();
            e.tick(49);
        }
        assert_eq!(e.hits.get(), 0);
        e.tick(1);
        assert_eq!(e.hits.get(), 1);
    }

    #[test]
    fn cancel_drops_pending_fire() {
        let e = env();
        let hits = e.hits.clone();
        let d = Debounce::new(&e.timers, 50, move || hits.set(hits.get() + 1)).unwrap();
        d.trigger();
        d.cancel();
        d.cancel();
        e.tick(100);
        assert_eq!(e.hits.get(), 0);
    }

    #[test]
    fn effect_fires_once_after_key_stops_changing() {
        let e = env();
        let comp = Composition::new();

        e.compose(&comp, "l");
        e.tick(30);
        e.compose(&comp, "li");
        e.tick(30);
        e.compose(&comp, "lin");
        e.tick(99);
        assert_eq!(e.hits.get(), 0);
        e.tick(1);
        assert_eq!(e.hits.get(), 1);
    }

    #[test]
    fn unchanged_key_does_not_restart_window() {
        let e = env();
        let comp = Composition::new();
        e.compose(&comp, "q");
        e.tick(60);
        e.compose(&comp, "q");
        e.tick(40);
        assert_eq!(e.hits.get(), 1);
    }

    #[test]
    fn dispose_cancels_pending_fire() {
        let e = env();
        let comp = Composition::new();
        e.compose(&comp, "q");
        e.tick(50);
        comp.dispose();
        e.tick(500);
        assert_eq!(e.hits.get(), 0);
        assert!(e.timers.is_empty());
    }

    #[test]
    fn delay_change_keeps_pending_window() {
        let e = env();
        let comp = Composition::new();
        for delay in [100i64, 20] {
            let hits = e.hits.clone();
            let timers = e.timers.clone();
            comp.compose(move || {
                debounced_effect(&timers, "same", delay, move || hits.set(hits.get() + 1))
                    .unwrap()
            });
        }
        e.tick(20);
        assert_eq!(e.hits.get(), 1);
        e.tick(200);
        assert_eq!(e.hits.get(), 1);
    }

    #[test]
    fn invalid_delay_pass_keeps_sibling_state() {
        let e = env();
        let comp = Composition::new();
        let pass = |query: &'static str, delay: i64| {
            let hits = e.hits.clone();
            let timers = e.timers.clone();
            comp.compose(move || {
                let debounce =
                    debounced_effect(&timers, query, delay, move || hits.set(hits.get() + 1));
                let passes = remember(|| Cell::new(0));
                passes.set(passes.get() + 1);
                (debounce.is_ok(), passes.get())
            })
        };

        assert_eq!(pass("q", -5), (false, 1));
        assert!(e.timers.is_empty());
        assert_eq!(pass("q", 100), (true, 2));
        assert_eq!(pass("q", 100), (true, 3));
        e.tick(100);
        assert_eq!(e.hits.get(), 1);

        // A bad pass mid-window drops the pending fire.
        assert_eq!(pass("qu", 100), (true, 4));
        e.tick(50);
        assert_eq!(pass("qu", -1), (false, 5));
        assert!(e.timers.is_empty());
        e.tick(100);
        assert_eq!(e.hits.get(), 1);
    }
}
