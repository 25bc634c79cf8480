use chrono::{Duration, NaiveDateTime};
use serde::Serialize;
use utoipa::ToSchema;

/// Where a booking sits relative to its cancellation deadline.
///
/// Purely a projection of the clock: as `now` advances the state moves
/// `Cancellable` → `Closed` → `Finished` and never back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CancellationState {
    Cancellable,
    Closed,
    Finished,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CancellationStatus {
    pub state: CancellationState,
    pub can_cancel: bool,
    /// Set while cancellable and within the configured warning threshold
    /// of the deadline.
    pub closing_soon: bool,
    pub status_text: String,
}

/// Evaluates the cancellation window of a booked class.
///
/// `lead` is the gym's no-penalty cancellation lead time; the deadline
/// sits that far before `class_time`. The optional `warning` threshold
/// flags bookings whose deadline is close enough to deserve a nudge.
pub fn cancellation_status(
    class_time: NaiveDateTime,
    now: NaiveDateTime,
    lead: Duration,
    warning: Option<Duration>,
) -> CancellationStatus {
    let deadline = class_time - lead;

    if now > class_time {
        return CancellationStatus {
            state: CancellationState::Finished,
            can_cancel: false,
            closing_soon: false,
            status_text: "Class Finished".to_string(),
        };
    }

    if now > deadline {
        return CancellationStatus {
            state: CancellationState::Closed,
            can_cancel: false,
            closing_soon: false,
            status_text: "Cancellation closed".to_string(),
        };
    }

    let remaining = deadline - now;
    let hours = remaining.num_hours();
    let minutes = remaining.num_minutes() % 60;

    CancellationStatus {
        state: CancellationState::Cancellable,
        can_cancel: true,
        closing_soon: warning.is_some_and(|threshold| remaining <= threshold),
        status_text: format!("Cancel within: {hours}h {minutes}m"),
    }
}
