pub use crate::debounce::{Debounce, debounced_effect};
pub use crate::delay::Delay;
pub use crate::error::DelayError;
pub use crate::previous::{Previous, previous, remember_previous};
pub use crate::text::{capitalize, capitalizer};
pub use crate::timeout::{Timeout, remember_timeout};
pub use crate::timer::{ArmPolicy, Callback, TimerHandle};
pub use crate::toggle::{ToggleState, remember_toggle, toggle};
pub use linger_core::update_effect;
