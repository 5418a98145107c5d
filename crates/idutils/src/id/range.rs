//! Conversions between raw IDs and points in time.
//!
//! These are pure functions over raw `i64` IDs, safe to call from any thread.
//! The `start`/`end` helpers produce the smallest and largest ID a given
//! millisecond can hold, which makes them the natural bounds for range queries
//! over a column of IDs:
//!
//! ```
//! use chrono::{DateTime, TimeDelta};
//! use idutils::{id_end_of_time, id_start_of_time};
//!
//! let until = DateTime::from_timestamp_millis(1_541_883_369_255).unwrap();
//! let since = until - TimeDelta::hours(1);
//! let (lo, hi) = (id_start_of_time(&since), id_end_of_time(&until));
//! assert!(lo < hi);
//! ```
//!
//! The encodable domain starts at [`CUSTOM_EPOCH`]. Earlier timestamps follow
//! the same two's-complement arithmetic and yield negative IDs, which no
//! generator ever issues.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};

use crate::{CUSTOM_EPOCH, SnowflakeId};

/// Location and sequence bits, all set.
const LOW_BITS_MASK: i64 = (1 << SnowflakeId::TIMESTAMP_SHIFT) - 1;

/// Returns the Unix millisecond timestamp an ID was minted at. Location and
/// sequence bits are ignored.
pub const fn id_to_timestamp(id: i64) -> i64 {
    (id >> SnowflakeId::TIMESTAMP_SHIFT) + CUSTOM_EPOCH
}

/// Returns the UTC instant an ID was minted at, to millisecond precision.
pub fn id_to_time(id: i64) -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH + TimeDelta::milliseconds(id_to_timestamp(id))
}

/// Returns the smallest ID whose timestamp equals `ts` (Unix milliseconds).
pub const fn id_start_of_timestamp(ts: i64) -> i64 {
    ts.wrapping_sub(CUSTOM_EPOCH) << SnowflakeId::TIMESTAMP_SHIFT
}

/// Returns the smallest ID minted at `t`.
pub fn id_start_of_time<Tz: TimeZone>(t: &DateTime<Tz>) -> i64 {
    id_start_of_timestamp(t.timestamp_millis())
}

/// Returns the largest ID whose timestamp equals `ts` (Unix milliseconds).
pub const fn id_end_of_timestamp(ts: i64) -> i64 {
    id_start_of_timestamp(ts) | LOW_BITS_MASK
}

/// Returns the largest ID minted at `t`.
pub fn id_end_of_time<Tz: TimeZone>(t: &DateTime<Tz>) -> i64 {
    id_end_of_timestamp(t.timestamp_millis())
}

/// Moves an ID by `duration`, landing on the start of the target millisecond.
///
/// The result is a range boundary, not a producer-issued ID: its location
/// and sequence bits are always zero.
///
/// ```
/// use chrono::TimeDelta;
/// use idutils::id_add_duration;
///
/// assert_eq!(
///     id_add_duration(1_061_361_893_655_969_792, TimeDelta::hours(1)),
///     1_061_376_993_150_369_792,
/// );
/// ```
pub fn id_add_duration(id: i64, duration: TimeDelta) -> i64 {
    id_start_of_time(&(id_to_time(id) + duration))
}
