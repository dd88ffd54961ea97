use std::convert::Infallible;
use thiserror::Error;

/// Why a requested delay was refused.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum DelayError {
    #[error("delay must not be negative (got {0} ms)")]
    Negative(f64),
    #[error("delay must be a whole number of milliseconds (got {0} ms)")]
    Fractional(f64),
    #[error("delay must be a finite number (got {0})")]
    NotFinite(f64),
    #[error("delay of {0} ms exceeds the {max} ms limit", max = crate::Delay::MAX.as_millis())]
    OutOfRange(f64),
}

impl From<Infallible> for DelayError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}
