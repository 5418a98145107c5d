/// Custom epoch: Thursday, November 4, 2010 1:42:54.657 UTC
///
/// Every timestamp packed into a [`SnowflakeId`] is measured in milliseconds
/// from this instant.
///
/// [`SnowflakeId`]: crate::SnowflakeId
pub const CUSTOM_EPOCH: i64 = 1_288_834_974_657;

/// A trait for time sources that return a wall-clock timestamp.
///
/// This abstraction allows you to plug in the system clock, a ticking
/// monotonic clock, or a mocked time source in tests. The unit is
/// **milliseconds since the Unix epoch**; the generator subtracts
/// [`CUSTOM_EPOCH`] itself.
///
/// Any `Fn() -> i64` closure is a time source, which keeps test doubles
/// short.
///
/// # Example
///
/// ```
/// use idutils::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> i64 {
///         1_450_772_535_000
///     }
/// }
///
/// assert_eq!(FixedTime.current_millis(), 1_450_772_535_000);
///
/// let closure = || 42_i64;
/// assert_eq!(closure.current_millis(), 42);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since the Unix epoch.
    fn current_millis(&self) -> i64;
}

impl<F> TimeSource for F
where
    F: Fn() -> i64,
{
    fn current_millis(&self) -> i64 {
        self()
    }
}
