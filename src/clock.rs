use chrono::{NaiveDateTime, Utc};
use chrono_tz::Tz;

/// Source of "now" for every time computation in the service.
///
/// Handlers read the clock once per request and pass the instant down to
/// the pure resolvers, so tests can pin time by constructing state with
/// [`Clock::Fixed`] instead of mocking a timer.
#[derive(Debug, Clone, Copy)]
pub enum Clock {
    /// Wall clock, read in the gym's local timezone.
    System(Tz),
    /// Frozen instant, for tests.
    Fixed(NaiveDateTime),
}

impl Clock {
    pub fn now(&self) -> NaiveDateTime {
        match self {
            Clock::System(tz) => Utc::now().with_timezone(tz).naive_local(),
            Clock::Fixed(instant) => *instant,
        }
    }
}
