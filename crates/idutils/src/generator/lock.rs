use core::{cmp::Ordering, fmt};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    CUSTOM_EPOCH, SnowflakeId, SystemClock, TimeSource,
    generator::{Error, Location, Result, mutex::Mutex},
};

/// Mutable generation state, only ever touched under the generator's lock.
#[derive(Debug)]
pub(crate) struct GeneratorState {
    /// Unix millis of the most recently issued ID, `-1` before the first.
    pub(crate) last_timestamp: i64,
    pub(crate) sequence: i64,
}

/// A lock-based Snowflake ID generator for one producer location.
///
/// The generator packs the current millisecond, its `(datacenter_id,
/// worker_id)` pair and a per-millisecond sequence into a [`SnowflakeId`].
/// All state lives behind a single mutex held for the whole of
/// [`next_id`](Self::next_id), so the generator can be shared between threads
/// (for example in an `Arc`) and every call observes the previous one
/// completely.
///
/// IDs are unique across generators only if no two running generators share
/// a location pair. Assigning locations is up to the caller.
///
/// # Example
///
/// ```
/// use idutils::SnowflakeGenerator;
///
/// let generator = SnowflakeGenerator::new(1, 2)?;
///
/// let a = generator.next_id()?;
/// let b = generator.next_id()?;
/// assert!(a < b);
/// assert_eq!((b.worker_id(), b.datacenter_id()), (1, 2));
/// # Ok::<(), idutils::Error>(())
/// ```
pub struct SnowflakeGenerator<T = SystemClock>
where
    T: TimeSource,
{
    worker_id: i64,
    datacenter_id: i64,
    pub(crate) state: Mutex<GeneratorState>,
    time: T,
}

impl SnowflakeGenerator<SystemClock> {
    /// Creates a generator for the given location, reading the system clock.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLocation`] if either ID is outside `0..=31`.
    pub fn new(worker_id: i64, datacenter_id: i64) -> Result<Self> {
        Self::with_time(worker_id, datacenter_id, SystemClock)
    }
}

impl<T> SnowflakeGenerator<T>
where
    T: TimeSource,
{
    /// Creates a generator for the given location that reads time from
    /// `time`. Nothing has been issued yet, so the first call to
    /// [`next_id`](Self::next_id) starts at sequence zero.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLocation`] if either ID is outside `0..=31`.
    /// The worker ID is checked first.
    ///
    /// # Example
    ///
    /// ```
    /// use idutils::{MonotonicClock, SnowflakeGenerator};
    ///
    /// let generator = SnowflakeGenerator::with_time(3, 4, MonotonicClock::new())?;
    /// let id = generator.next_id()?;
    /// assert_eq!(id.sequence(), 0);
    /// # Ok::<(), idutils::Error>(())
    /// ```
    pub fn with_time(worker_id: i64, datacenter_id: i64, time: T) -> Result<Self> {
        Self::from_components(worker_id, datacenter_id, -1, 0, time)
    }

    /// Creates a generator preloaded with explicit state.
    ///
    /// This is primarily useful for tests and for controlling the starting
    /// point of the generator manually. `last_timestamp` is in Unix
    /// milliseconds; `sequence` is masked to 12 bits.
    ///
    /// # ⚠️ Note
    /// In typical use cases, you should prefer [`Self::with_time`]. Resuming
    /// from a stale `last_timestamp` gives no uniqueness guarantee against
    /// IDs issued by a previous process.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLocation`] if either ID is outside `0..=31`.
    pub fn from_components(
        worker_id: i64,
        datacenter_id: i64,
        last_timestamp: i64,
        sequence: i64,
        time: T,
    ) -> Result<Self> {
        check_location(Location::Worker, worker_id, SnowflakeId::max_worker_id())?;
        check_location(
            Location::Datacenter,
            datacenter_id,
            SnowflakeId::max_datacenter_id(),
        )?;

        Ok(Self {
            worker_id,
            datacenter_id,
            state: Mutex::new(GeneratorState {
                last_timestamp,
                sequence: sequence & SnowflakeId::SEQUENCE_MASK,
            }),
            time,
        })
    }

    pub fn worker_id(&self) -> i64 {
        self.worker_id
    }

    pub fn datacenter_id(&self) -> i64 {
        self.datacenter_id
    }

    /// Generates the next ID.
    ///
    /// Within one millisecond the sequence counts up from zero. When all 4096
    /// sequence values of the current millisecond are used, the call spins on
    /// the time source, still holding the lock, until the clock moves to a
    /// later millisecond. There is no timeout.
    ///
    /// # Errors
    ///
    /// - [`Error::ClockMovedBackward`] if the time source reads earlier than
    ///   the last issued ID. Nothing is retried and the state is unchanged.
    /// - [`Error::TimestampOutOfRange`] if the current time is before
    ///   [`CUSTOM_EPOCH`] or beyond what 41 bits can hold.
    /// - `Error::LockPoisoned` if another thread panicked while generating
    ///   (only without the `parking-lot` feature).
    ///
    /// # Example
    ///
    /// ```
    /// use idutils::{Error, SnowflakeGenerator};
    ///
    /// let generator = SnowflakeGenerator::from_components(
    ///     7,
    ///     7,
    ///     1_450_772_535_000,
    ///     2794,
    ///     || 1_450_772_535_000_i64,
    /// )?;
    /// assert_eq!(generator.next_id()?.to_raw(), 679_215_357_097_835_243);
    ///
    /// let behind = SnowflakeGenerator::from_components(7, 7, 1_450_772_535_000, 0, || {
    ///     1_450_772_534_000_i64
    /// })?;
    /// assert_eq!(
    ///     behind.next_id(),
    ///     Err(Error::ClockMovedBackward { millis: 1000 })
    /// );
    /// # Ok::<(), idutils::Error>(())
    /// ```
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next_id(&self) -> Result<SnowflakeId> {
        let mut state = {
            #[cfg(feature = "parking-lot")]
            {
                self.state.lock()
            }
            #[cfg(not(feature = "parking-lot"))]
            {
                self.state.lock()?
            }
        };

        let last_timestamp = state.last_timestamp;
        let mut now = self.time.current_millis();

        let sequence = match now.cmp(&last_timestamp) {
            Ordering::Less => return Err(Self::cold_clock_behind(now, last_timestamp)),
            Ordering::Equal => {
                let sequence = (state.sequence + 1) & SnowflakeId::SEQUENCE_MASK;
                if sequence == 0 {
                    now = self.til_next_millis(last_timestamp);
                }
                sequence
            }
            Ordering::Greater => 0,
        };

        let timestamp = now.wrapping_sub(CUSTOM_EPOCH);
        if !(0..=SnowflakeId::max_timestamp()).contains(&timestamp) {
            return Err(Error::TimestampOutOfRange { millis: now });
        }

        state.last_timestamp = now;
        state.sequence = sequence;

        Ok(SnowflakeId::from_components(
            timestamp,
            self.datacenter_id,
            self.worker_id,
            sequence,
        ))
    }

    /// Busy-polls the time source until it passes `last_timestamp`.
    #[cold]
    #[inline(never)]
    fn til_next_millis(&self, last_timestamp: i64) -> i64 {
        #[cfg(feature = "tracing")]
        tracing::debug!(last_timestamp, "sequence exhausted, waiting for next millisecond");

        let mut now = self.time.current_millis();
        while now <= last_timestamp {
            core::hint::spin_loop();
            now = self.time.current_millis();
        }
        now
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind(now: i64, last_timestamp: i64) -> Error {
        let millis = last_timestamp - now;
        debug_assert!(millis > 0);

        #[cfg(feature = "tracing")]
        tracing::warn!(
            now,
            last_timestamp,
            millis,
            "clock moved backwards, refusing to generate id"
        );

        Error::ClockMovedBackward { millis }
    }
}

impl<T> fmt::Debug for SnowflakeGenerator<T>
where
    T: TimeSource,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnowflakeGenerator")
            .field("worker_id", &self.worker_id)
            .field("datacenter_id", &self.datacenter_id)
            .finish_non_exhaustive()
    }
}

fn check_location(field: Location, value: i64, max: i64) -> Result<()> {
    if (0..=max).contains(&value) {
        Ok(())
    } else {
        Err(Error::InvalidLocation { field, value, max })
    }
}
