pub use crate::clock::{Clock, SystemClock, TestClock};
pub use crate::composition::{
    ComposeGuard, Composition, current_composition, remember, remember_state,
    remember_state_with_key, remember_with_key,
};
pub use crate::effects::{Dispose, effect, on_unmount};
pub use crate::effects_ext::{disposable_effect, update_effect};
pub use crate::scope::{Scope, current_scope, scoped_effect};
pub use crate::signal::{Signal, SubId, signal};
pub use crate::timers::{TimerId, TimerQueue};
