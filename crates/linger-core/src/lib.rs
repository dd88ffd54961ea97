//! # Scopes, Effects, and Timers
//!
//! `linger-core` is the small composition runtime the `linger-hooks` helpers
//! are built on. There are four main pieces:
//!
//! - `Composition` — one component instance: remembered slots plus a `Scope`.
//! - `remember*` — lifecycle‑aware storage bound to the current composition.
//! - `effect` / `scoped_effect` / `disposable_effect` — side‑effects with cleanup.
//! - `TimerQueue` — the host's deferred-callback facility, driven by a `Clock`.
//!
//! ## Remembered state
//!
//! ```rust
//! use linger_core::*;
//! use std::cell::Cell;
//!
//! let counter = Composition::new();
//! for _ in 0..3 {
//!     counter.compose(|| {
//!         let clicks = remember(|| Cell::new(0));
//!         clicks.set(clicks.get() + 1);
//!     });
//! }
//! let clicks = counter.compose(|| remember(|| Cell::new(0)));
//! assert_eq!(clicks.get(), 3);
//! ```
//!
//! - `remember` and `remember_state` are order‑based: the Nth call in a
//!   composition pass always refers to the Nth stored value.
//! - `remember_with_key` and `remember_state_with_key` are key‑based and more
//!   stable across conditional branches.
//!
//! ## Effects and cleanup
//!
//! ```rust
//! use linger_core::*;
//!
//! let view = Composition::new();
//! view.compose(|| {
//!     scoped_effect(|| {
//!         log::info!("mounted");
//!         on_unmount(|| log::info!("unmounted"))
//!     });
//! });
//! view.dispose(); // runs the cleanup
//! ```
//!
//! - `effect` runs once and returns a `Dispose` guard that also runs when the
//!   current scope is torn down.
//! - `disposable_effect(key, ..)` re-runs when `key` changes, cleaning up first.
//! - `update_effect(deps, ..)` is the same, minus the run on mount.
//!
//! ## Timers
//!
//! `TimerQueue` never sleeps on its own. The host loop calls `run_due` and
//! uses `time_until_next` to pick its next wake-up. Tests use `TestClock` to
//! move time by hand:
//!
//! ```rust
//! use linger_core::*;
//! use web_time::Duration;
//!
//! let clock = TestClock::new();
//! let timers = TimerQueue::new(clock.clone());
//! timers.schedule(Duration::from_millis(50), || log::info!("tick"));
//! clock.advance(Duration::from_millis(50));
//! assert_eq!(timers.run_due(), 1);
//! ```

pub mod clock;
pub mod composition;
pub mod effects;
pub mod effects_ext;
pub mod prelude;
pub mod scope;
pub mod signal;
pub mod timers;

pub use clock::*;
pub use composition::*;
pub use effects::*;
pub use effects_ext::*;
pub use scope::*;
pub use signal::*;
pub use timers::*;
