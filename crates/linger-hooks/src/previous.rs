use linger_core::remember;
use std::cell::RefCell;

/// Remembers the value from the previous `observe` call.
#[derive(Clone, Debug, Default)]
pub struct Previous<T> {
    last: Option<T>,
}

impl<T> Previous<T> {
    pub fn new() -> Self {
        Self { last: None }
    }

    /// Stores `value` and returns the one stored before it (`None` the first time).
    pub fn observe(&mut self, value: T) -> Option<T> {
        self.last.replace(value)
    }

    pub fn peek(&self) -> Option<&T> {
        self.last.as_ref()
    }
}

/// Lazily maps a sequence to "the item before this one".
///
/// ```rust
/// use linger_hooks::previous;
///
/// let prev: Vec<_> = previous([1, 2, 3]).collect();
/// assert_eq!(prev, vec![None, Some(1), Some(2)]);
/// ```
pub fn previous<I>(values: I) -> impl Iterator<Item = Option<I::Item>>
where
    I: IntoIterator,
{
    values
        .into_iter()
        .scan(Previous::new(), |tracker, v| Some(tracker.observe(v)))
}

/// Returns the value passed on the previous composition pass, or `None` on mount.
pub fn remember_previous<T: 'static>(value: T) -> Option<T> {
    let tracker = remember(|| RefCell::new(Previous::<T>::new()));
    tracker.borrow_mut().observe(value)
}
