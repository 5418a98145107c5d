use std::time::{SystemTime, UNIX_EPOCH};

use crate::TimeSource;

/// The default time source: reads `SystemTime::now()` on every call.
///
/// Wall-clock time can be stepped backwards by NTP or an operator. The
/// generator detects that and refuses to issue IDs until the clock catches up
/// again, see [`Error::ClockMovedBackward`].
///
/// [`Error::ClockMovedBackward`]: crate::Error::ClockMovedBackward
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn current_millis(&self) -> i64 {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(elapsed) => elapsed.as_millis() as i64,
            // clock set before 1970
            Err(err) => -(err.duration().as_millis() as i64),
        }
    }
}
