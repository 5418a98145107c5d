use core::fmt;

/// A result type defaulting to this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Which half of a producer location a value was supplied for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Location {
    Worker,
    Datacenter,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Worker => f.write_str("worker id"),
            Self::Datacenter => f.write_str("datacenter id"),
        }
    }
}

/// All error variants that `idutils` can emit.
///
/// Only generator construction and [`SnowflakeGenerator::next_id`] are
/// fallible; the decode and range helpers are total.
///
/// [`SnowflakeGenerator::next_id`]: crate::SnowflakeGenerator::next_id
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A worker or datacenter ID was outside `0..=max`. Raised at
    /// construction only; retrying with the same configuration will fail the
    /// same way.
    #[error("{field} cannot be greater than {max} or less than 0, got {value}")]
    InvalidLocation {
        field: Location,
        value: i64,
        max: i64,
    },

    /// The time source reported an earlier millisecond than the last issued
    /// ID. The generator state is left untouched; the caller may wait out the
    /// regression and retry, or treat it as fatal.
    #[error("clock moved backwards, refusing to generate id for {millis} milliseconds")]
    ClockMovedBackward { millis: i64 },

    /// The time source reported a time that the 41-bit timestamp field cannot
    /// hold: before the custom epoch, or past its end.
    #[error("timestamp {millis} cannot be encoded relative to the custom epoch")]
    TimestampOutOfRange { millis: i64 },

    /// The operation failed because the lock was **poisoned**.
    ///
    /// This occurs when a thread panics while holding the lock. When the
    /// `parking-lot` feature is enabled, mutexes do **not** poison, so this
    /// variant is not available.
    #[cfg(not(feature = "parking-lot"))]
    #[error("generator lock poisoned")]
    LockPoisoned,
}

#[cfg(not(feature = "parking-lot"))]
use crate::generator::mutex::{MutexGuard, PoisonError};

#[cfg(not(feature = "parking-lot"))]
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_value() {
        let err = Error::InvalidLocation {
            field: Location::Datacenter,
            value: 32,
            max: 31,
        };
        assert_eq!(
            err.to_string(),
            "datacenter id cannot be greater than 31 or less than 0, got 32"
        );

        let err = Error::ClockMovedBackward { millis: 1000 };
        assert_eq!(
            err.to_string(),
            "clock moved backwards, refusing to generate id for 1000 milliseconds"
        );
    }
}
