use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::cancellation::CancellationState;

/// Row of the backend's `/auto_bookings` listing: a standing weekly
/// instruction to book one class.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct AutoBookingRecord {
    pub id: i64,
    pub class_name: String,
    /// Weekday name, e.g. `"Monday"`.
    pub day_of_week: String,
    /// Class start time, `"HH:MM"`.
    pub target_time: String,
    pub instructor: String,
    /// Backend-owned status, `"pending"` while the rule is active.
    pub status: String,
    /// Calendar date of the last successful booking attempt, if any.
    #[serde(default)]
    #[schema(value_type = Option<String>, format = "date", example = "2024-01-08")]
    pub last_booked_date: Option<NaiveDate>,
}

/// Row of the backend's `/bookings` listing: a reservation that already
/// exists on the gym site. The date is a human-formatted string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct BookingRecord {
    pub name: String,
    /// Human date string, `"Monday 1st January"` or `"dd/mm/yyyy"`.
    pub date: String,
    /// Class start time, `"HH:MM"`.
    pub time: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// An auto-booking rule enriched with its resolved next occurrence.
#[derive(Debug, Clone, Serialize, PartialEq, ToSchema)]
pub struct AutoBookingView {
    pub id: i64,
    pub class_name: String,
    pub day_of_week: String,
    pub target_time: String,
    pub instructor: String,
    pub status: String,
    #[schema(value_type = String, format = "date-time", example = "2024-01-08T18:00:00")]
    pub next_occurrence: NaiveDateTime,
    #[schema(value_type = String, format = "date-time", example = "2024-01-06T18:00:00")]
    pub window_opens_at: NaiveDateTime,
    pub countdown: String,
}

/// A concrete booking enriched with its cancellation deadline state.
///
/// `class_time` and `state` are absent when the backend's date string
/// could not be parsed; such rows keep an empty `status_text` and are
/// never cancellable through this service.
#[derive(Debug, Clone, Serialize, PartialEq, ToSchema)]
pub struct BookingView {
    pub class_name: String,
    pub date: String,
    pub time: String,
    #[schema(value_type = Option<String>, format = "date-time", example = "2024-01-01T10:00:00")]
    pub class_time: Option<NaiveDateTime>,
    pub can_cancel: bool,
    pub closing_soon: bool,
    pub state: Option<CancellationState>,
    pub status_text: String,
}

/// Both listings in one payload, for dashboard-style consumers.
#[derive(Debug, Clone, Serialize, PartialEq, ToSchema)]
pub struct OverviewResponse {
    pub auto_bookings: Vec<AutoBookingView>,
    pub bookings: Vec<BookingView>,
}
