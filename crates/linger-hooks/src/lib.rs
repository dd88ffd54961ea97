//! # Hooks
//!
//! Small state helpers for `linger-core` compositions:
//!
//! - `Timeout` / `remember_timeout` — run a callback once after a delay.
//! - `Debounce` / `debounced_effect` — run a callback once triggers go quiet.
//! - `ToggleState` / `remember_toggle` — a boolean with toggle semantics.
//! - `remember_previous` — the value from the previous composition pass.
//! - `update_effect` — an effect that skips the mount pass.
//! - `capitalize` — upper-case the first character.
//!
//! ## Timers
//!
//! Both `Timeout` and `Debounce` sit on a `TimerHandle`: one callback cell,
//! one validated [`Delay`] and at most one pending fire on an injected
//! `TimerQueue`. Invalid delays are refused up front:
//!
//! ```rust
//! use linger_core::TimerQueue;
//! use linger_hooks::*;
//!
//! let timers = TimerQueue::system();
//! assert_eq!(
//!     Timeout::start(&timers, -10i64, || {}).unwrap_err(),
//!     DelayError::Negative(-10.0),
//! );
//! ```
//!
//! A debounced search field, driven by a test clock:
//!
//! ```rust
//! use linger_core::{Composition, TestClock, TimerQueue};
//! use linger_hooks::*;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use web_time::Duration;
//!
//! let clock = TestClock::new();
//! let timers = TimerQueue::new(clock.clone());
//! let searched = Rc::new(RefCell::new(Vec::new()));
//! let field = Composition::new();
//!
//! for query in ["r", "ru", "rus", "rust"] {
//!     let searched = searched.clone();
//!     field.compose(|| {
//!         debounced_effect(&timers, query, 300, move || {
//!             searched.borrow_mut().push(capitalize(query))
//!         })
//!     })?;
//!     clock.advance(Duration::from_millis(100));
//!     timers.run_due();
//! }
//! clock.advance(Duration::from_millis(300));
//! timers.run_due();
//! assert_eq!(*searched.borrow(), vec!["Rust"]);
//! # Ok::<(), DelayError>(())
//! ```

pub mod debounce;
pub mod delay;
pub mod error;
pub mod prelude;
pub mod previous;
pub mod text;
pub mod timeout;
pub mod timer;
pub mod toggle;

pub use debounce::*;
pub use delay::*;
pub use error::*;
pub use previous::*;
pub use text::*;
pub use timeout::*;
pub use timer::*;
pub use toggle::*;

pub use linger_core::update_effect;
