use linger_core::{TimerQueue, on_unmount, remember, scoped_effect};
use std::cell::RefCell;

use crate::{Delay, DelayError, TimerHandle};

/// Runs a callback once after a delay, with manual `reset` and `clear`.
///
/// Clones share the same timer; it is cleared when the last clone drops.
#[derive(Clone, Debug)]
pub struct Timeout {
    handle: TimerHandle,
}

impl Timeout {
    /// Creates an idle timeout. Call `reset` to start it.
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

    /// Creates the timeout and starts it right away.
    pub fn start<D>(
        timers: &TimerQueue,
        delay: D,
        callback: impl Fn() + 'static,
    ) -> Result<Self, DelayError>
    where
        D: TryInto<Delay>,
        DelayError: From<D::Error>,
    {
        let timeout = Self::new(timers, delay, callback)?;
        timeout.handle.arm();
        Ok(timeout)
    }

    /// Restarts the delay window, dropping any pending fire.
    pub fn reset(&self) {
        self.handle.rearm();
    }

    pub fn clear(&self) {
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

/// A timeout owned by the current composition.
///
/// Starts on the first composition and is cleared when the composition is
/// disposed. The callback is refreshed on every pass, so the fire always sees
/// the latest closure. A changed `delay` clears the old timer and starts a new
/// one. The `TimerQueue` of the first pass is kept for the composition's life.
///
/// A pass with an invalid `delay` still takes its slot and leaves the current
/// timeout running.
pub fn remember_timeout<D>(
    timers: &TimerQueue,
    delay: D,
    callback: impl Fn() + 'static,
) -> Result<Timeout, DelayError>
where
    D: TryInto<Delay>,
    DelayError: From<D::Error>,
{
    let slot = remember(|| RefCell::new(None::<Timeout>));
    let delay: Delay = delay.try_into()?;

    let current = slot.borrow().clone();
    match current {
        Some(timeout) if timeout.delay() == delay => {
            timeout.set_callback(callback);
            Ok(timeout)
        }
        Some(stale) => {
            log::debug!(
                "remember_timeout: delay changed {} -> {} ms; restarting",
                stale.delay().as_millis(),
                delay.as_millis()
            );
            stale.clear();
            let timeout = Timeout::with_delay(timers, delay, callback);
            timeout.reset();
            *slot.borrow_mut() = Some(timeout.clone());
            Ok(timeout)
        }
        None => {
            let timeout = Timeout::with_delay(timers, delay, callback);
            timeout.reset();
            *slot.borrow_mut() = Some(timeout.clone());

            let slot = slot.clone();
            scoped_effect(move || {
                on_unmount(move || {
                    let timeout = slot.borrow_mut().take();
                    if let Some(t) = timeout {
                        t.clear();
                    }
                })
            });
            Ok(timeout)
        }
    }
}
