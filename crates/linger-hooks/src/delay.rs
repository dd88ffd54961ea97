use web_time::Duration;

use crate::DelayError;

/// A timer delay: a whole, non-negative number of milliseconds, at most
/// [`Delay::MAX`] (the same ceiling browsers put on `setTimeout`).
///
/// Conversions from signed, floating-point or `Duration` values are checked
/// and fail with a [`DelayError`] instead of being coerced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u64", into = "u64"))]
pub struct Delay(u64);

impl Delay {
    pub const ZERO: Delay = Delay(0);
    pub const MAX: Delay = Delay(i32::MAX as u64);

    /// Clamps to [`Delay::MAX`]. Use `Delay::try_from` to reject instead.
    pub const fn from_millis(ms: u64) -> Self {
        if ms > Self::MAX.0 {
            Self::MAX
        } else {
            Delay(ms)
        }
    }

    pub const fn as_millis(self) -> u64 {
        self.0
    }

    pub const fn as_duration(self) -> Duration {
        Duration::from_millis(self.0)
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl From<Delay> for Duration {
    fn from(d: Delay) -> Self {
        d.as_duration()
    }
}

impl From<Delay> for u64 {
    fn from(d: Delay) -> Self {
        d.0
    }
}

impl TryFrom<u64> for Delay {
    type Error = DelayError;

    fn try_from(ms: u64) -> Result<Self, Self::Error> {
        if ms > Self::MAX.0 {
            return Err(DelayError::OutOfRange(ms as f64));
        }
        Ok(Delay(ms))
    }
}

impl TryFrom<u32> for Delay {
    type Error = DelayError;

    fn try_from(ms: u32) -> Result<Self, Self::Error> {
        Delay::try_from(ms as u64)
    }
}

impl TryFrom<i64> for Delay {
    type Error = DelayError;

    fn try_from(ms: i64) -> Result<Self, Self::Error> {
        let ms = u64::try_from(ms).map_err(|_| DelayError::Negative(ms as f64))?;
        Delay::try_from(ms)
    }
}

impl TryFrom<i32> for Delay {
    type Error = DelayError;

    fn try_from(ms: i32) -> Result<Self, Self::Error> {
        Delay::try_from(ms as i64)
    }
}

impl TryFrom<f64> for Delay {
    type Error = DelayError;

    fn try_from(ms: f64) -> Result<Self, Self::Error> {
        if !ms.is_finite() {
            return Err(DelayError::NotFinite(ms));
        }
        if ms < 0.0 {
            return Err(DelayError::Negative(ms));
        }
        if ms.fract() != 0.0 {
            return Err(DelayError::Fractional(ms));
        }
        if ms > Self::MAX.0 as f64 {
            return Err(DelayError::OutOfRange(ms));
        }
        Ok(Delay(ms as u64))
    }
}

impl TryFrom<Duration> for Delay {
    type Error = DelayError;

    fn try_from(d: Duration) -> Result<Self, Self::Error> {
        let millis = d.as_secs_f64() * 1000.0;
        if d.subsec_nanos() % 1_000_000 != 0 {
            return Err(DelayError::Fractional(millis));
        }
        let ms = u64::try_from(d.as_millis()).map_err(|_| DelayError::OutOfRange(millis))?;
        Delay::try_from(ms)
    }
}
