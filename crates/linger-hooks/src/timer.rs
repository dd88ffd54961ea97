//! The timer lifecycle shared by `Timeout` and `Debounce`.
//!
//! A `TimerHandle` owns one callback cell, one validated delay and at most one
//! pending fire on a `TimerQueue`. The callback is looked up when the timer
//! fires, not when it is armed, so replacing it in between is safe.

use linger_core::{TimerId, TimerQueue};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::{Delay, DelayError};

pub type Callback = Rc<dyn Fn()>;

/// What `arm` does when a fire is already pending.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ArmPolicy {
    /// Schedule another, independent fire. The handle tracks the newest one;
    /// the older fire still runs and can no longer be disarmed.
    #[default]
    Overlap,
    /// Keep the pending fire and do nothing.
    Coalesce,
}

/// Clones share the same timer.
#[derive(Clone)]
pub struct TimerHandle {
    inner: Rc<HandleInner>,
}

struct HandleInner {
    timers: TimerQueue,
    delay: Delay,
    policy: Cell<ArmPolicy>,
    callback: RefCell<Callback>,
    pending: Cell<Option<Pending>>,
    arms: Cell<u64>,
}

#[derive(Clone, Copy, Debug)]
struct Pending {
    id: TimerId,
    arm: u64,
}

impl TimerHandle {
    /// Creates an idle handle; nothing is scheduled until `arm`.
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

    pub(crate) fn with_delay(
        timers: &TimerQueue,
        delay: Delay,
        callback: impl Fn() + 'static,
    ) -> Self {
        Self {
            inner: Rc::new(HandleInner {
                timers: timers.clone(),
                delay,
                policy: Cell::new(ArmPolicy::default()),
                callback: RefCell::new(Rc::new(callback)),
                pending: Cell::new(None),
                arms: Cell::new(0),
            }),
        }
    }

    pub fn with_policy(self, policy: ArmPolicy) -> Self {
        self.inner.policy.set(policy);
        self
    }

    pub fn policy(&self) -> ArmPolicy {
        self.inner.policy.get()
    }

    pub fn set_policy(&self, policy: ArmPolicy) {
        self.inner.policy.set(policy);
    }

    pub fn delay(&self) -> Delay {
        self.inner.delay
    }

    pub fn is_pending(&self) -> bool {
        self.inner.pending.get().is_some()
    }

    /// Replaces the callback. A pending fire will call the new one.
    pub fn set_callback(&self, callback: impl Fn() + 'static) {
        let old = self.inner.callback.replace(Rc::new(callback));
        drop(old);
    }

    /// Schedules a fire after `delay`. See [`ArmPolicy`] for what happens when
    /// one is already pending.
    pub fn arm(&self) {
        let inner = &self.inner;
        if inner.policy.get() == ArmPolicy::Coalesce && self.is_pending() {
            log::trace!("timer: already pending; coalesced");
            return;
        }

        let arm = inner.arms.get();
        inner.arms.set(arm + 1);

        let weak: Weak<HandleInner> = Rc::downgrade(inner);
        let id = inner.timers.schedule(inner.delay.as_duration(), move || {
            if let Some(inner) = weak.upgrade() {
                inner.fire(arm);
            }
        });

        if let Some(prev) = inner.pending.replace(Some(Pending { id, arm })) {
            log::debug!("timer: armed {id:?} while {:?} is still in flight", prev.id);
        } else {
            log::debug!("timer: armed {id:?} for {} ms", inner.delay.as_millis());
        }
    }

    /// Cancels the pending fire, if any. Safe to call at any time.
    pub fn disarm(&self) {
        if let Some(p) = self.inner.pending.take() {
            let cancelled = self.inner.timers.cancel(p.id);
            log::debug!("timer: disarmed {:?} (cancelled: {cancelled})", p.id);
        }
    }

    /// Cancels any pending fire and starts a fresh delay window.
    pub fn rearm(&self) {
        self.disarm();
        self.arm();
    }
}

impl HandleInner {
    fn fire(&self, arm: u64) {
        // Free the slot first so the callback may re-arm.
        if self.pending.get().is_some_and(|p| p.arm == arm) {
            self.pending.set(None);
        }
        let callback = self.callback.borrow().clone();
        callback();
    }
}

impl Drop for HandleInner {
    fn drop(&mut self) {
        if let Some(p) = self.pending.take() {
            self.timers.cancel(p.id);
        }
    }
}

impl fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerHandle")
            .field("delay", &self.inner.delay)
            .field("policy", &self.inner.policy.get())
            .field("pending", &self.inner.pending.get().map(|p| p.id))
            .finish()
    }
}
