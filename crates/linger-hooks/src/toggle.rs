use linger_core::{Signal, SubId, remember, signal};

/// `explicit` if given, otherwise the flip of `current`.
pub fn toggle(current: bool, explicit: Option<bool>) -> bool {
    explicit.unwrap_or(!current)
}

/// A boolean state cell with toggle semantics. Clones share the same state.
#[derive(Clone, Debug)]
pub struct ToggleState {
    value: Signal<bool>,
}

impl ToggleState {
    pub fn new(initial: bool) -> Self {
        Self {
            value: signal(initial),
        }
    }

    pub fn get(&self) -> bool {
        self.value.get()
    }

    /// Flips the value and returns the new one.
    pub fn toggle(&self) -> bool {
        self.apply(None)
    }

    pub fn set(&self, value: bool) {
        self.apply(Some(value));
    }

    /// Applies [`toggle`] to the current value and returns the result.
    pub fn apply(&self, explicit: Option<bool>) -> bool {
        let next = toggle(self.get(), explicit);
        self.value.set(next);
        next
    }

    pub fn subscribe(&self, f: impl Fn(bool) + 'static) -> SubId {
        self.value.subscribe(move |v| f(*v))
    }

    pub fn unsubscribe(&self, id: SubId) -> bool {
        self.value.unsubscribe(id)
    }

    pub fn signal(&self) -> &Signal<bool> {
        &self.value
    }
}

/// A `ToggleState` kept across passes of the current composition.
pub fn remember_toggle(initial: bool) -> ToggleState {
    (*remember(|| ToggleState::new(initial))).clone()
}
