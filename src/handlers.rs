use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::TypedHeader;
use axum_extra::headers::{Authorization, authorization::Bearer};
use chrono::{Duration, NaiveDateTime, NaiveTime, Weekday};
use tracing::warn;

use crate::{
    AppState,
    auth::verify_token,
    cancellation::cancellation_status,
    client::CancelRequest,
    dates::parse_booking_date,
    error::ApiError,
    models::{AutoBookingRecord, AutoBookingView, BookingRecord, BookingView, OverviewResponse},
    schedule::{format_countdown, next_occurrence},
    validation::validate_lead_hours,
};

#[derive(Debug, serde::Deserialize)]
pub struct AuthQuery {
    pub token: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
pub struct BookingsQuery {
    pub token: Option<String>,
    /// Per-request override of the cancellation lead time.
    pub lead_hours: Option<i64>,
}

#[derive(Debug, serde::Deserialize, utoipa::ToSchema)]
pub struct CancelBookingRequest {
    pub class_name: String,
    /// Human date string as shown in the bookings listing.
    pub date: String,
    pub time: String,
}

#[utoipa::path(get, path = "/", tag = "assistant")]
pub async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "Gym Booking Assistant API",
        "endpoints": {
            "/auto-bookings": "Auto-booking rules with next occurrence and countdown",
            "/auto-bookings.ical": "Upcoming occurrences as an iCal feed",
            "/bookings": "Bookings with cancellation deadline status",
            "/bookings/cancel": "Cancel a booking while its window is open",
            "/overview": "Both listings in one payload"
        }
    }))
}

#[utoipa::path(get, path = "/healthz/live", tag = "assistant")]
pub async fn healthz_live() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

#[utoipa::path(get, path = "/healthz/ready", tag = "assistant")]
pub async fn healthz_ready() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

/// Enriches raw auto-booking rules with their next occurrence, the
/// window-open instant and a countdown line. Rules whose weekday or time
/// the backend mangled are logged and left out of the listing.
pub(crate) fn project_auto_bookings(
    records: Vec<AutoBookingRecord>,
    now: NaiveDateTime,
    window: Duration,
) -> Vec<AutoBookingView> {
    records
        .into_iter()
        .filter_map(|record| {
            let Ok(day) = record.day_of_week.parse::<Weekday>() else {
                warn!(id = record.id, day = %record.day_of_week, "skipping rule with unknown weekday");
                return None;
            };
            let Ok(time) = NaiveTime::parse_from_str(&record.target_time, "%H:%M") else {
                warn!(id = record.id, time = %record.target_time, "skipping rule with invalid target time");
                return None;
            };

            let occurrence = next_occurrence(day, time, record.last_booked_date, now, window);
            let window_opens_at = occurrence - window;
            Some(AutoBookingView {
                id: record.id,
                class_name: record.class_name,
                day_of_week: record.day_of_week,
                target_time: record.target_time,
                instructor: record.instructor,
                status: record.status,
                next_occurrence: occurrence,
                window_opens_at,
                countdown: format_countdown(window_opens_at, now),
            })
        })
        .collect()
}

/// Enriches raw bookings with their cancellation deadline state. Rows
/// with an unparseable date stay in the listing but carry no state and
/// are never cancellable.
pub(crate) fn project_bookings(
    records: Vec<BookingRecord>,
    now: NaiveDateTime,
    lead: Duration,
    warning: Option<Duration>,
) -> Vec<BookingView> {
    records
        .into_iter()
        .map(|record| {
            let class_time = parse_booking_date(&record.date, now)
                .zip(NaiveTime::parse_from_str(&record.time, "%H:%M").ok())
                .map(|(date, time)| date.and_time(time));

            match class_time {
                Some(class_time) => {
                    let status = cancellation_status(class_time, now, lead, warning);
                    BookingView {
                        class_name: record.name,
                        date: record.date,
                        time: record.time,
                        class_time: Some(class_time),
                        can_cancel: status.can_cancel,
                        closing_soon: status.closing_soon,
                        state: Some(status.state),
                        status_text: status.status_text,
                    }
                }
                None => {
                    warn!(date = %record.date, time = %record.time, "booking date not parseable, deadline unknown");
                    BookingView {
                        class_name: record.name,
                        date: record.date,
                        time: record.time,
                        class_time: None,
                        can_cancel: false,
                        closing_soon: false,
                        state: None,
                        status_text: String::new(),
                    }
                }
            }
        })
        .collect()
}

#[utoipa::path(
    get,
    path = "/auto-bookings",
    params(
        ("token" = Option<String>, Query, description = "Authentication token (alternative to Bearer header)")
    ),
    responses(
        (status = 200, description = "Auto-booking rules with resolved occurrences", body = [AutoBookingView]),
        (status = 401, description = "Invalid authentication token")
    ),
    security(("bearer_auth" = []), ("query_token" = [])),
    tag = "assistant"
)]
pub async fn get_auto_bookings(
    State(state): State<AppState>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    Query(query): Query<AuthQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let auth_header = auth.map(|TypedHeader(a)| a);
    verify_token(&state.settings, auth_header, query.token.as_deref())?;

    let records = state.client.fetch_auto_bookings().await?;
    let now = state.clock.now();
    let views = project_auto_bookings(records, now, state.settings.booking_window());
    Ok(Json(views))
}

#[utoipa::path(
    get,
    path = "/auto-bookings.ical",
    params(
        ("token" = Option<String>, Query, description = "Authentication token (alternative to Bearer header)")
    ),
    responses(
        (status = 200, description = "iCal feed of upcoming occurrences", content_type = "text/calendar"),
        (status = 401, description = "Invalid authentication token"),
        (status = 404, description = "No auto-booking rules found")
    ),
    security(("bearer_auth" = []), ("query_token" = [])),
    tag = "assistant"
)]
pub async fn get_auto_bookings_ical(
    State(state): State<AppState>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    Query(query): Query<AuthQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let auth_header = auth.map(|TypedHeader(a)| a);
    verify_token(&state.settings, auth_header, query.token.as_deref())?;

    let records = state.client.fetch_auto_bookings().await?;
    let now = state.clock.now();
    let views = project_auto_bookings(records, now, state.settings.booking_window());
    if views.is_empty() {
        return Err(ApiError::NotFound("No auto-booking rules found".into()));
    }

    let body = state.exporter.generate(&views);
    Ok((
        StatusCode::OK,
        [
            ("content-type", "text/calendar"),
            (
                "content-disposition",
                "attachment; filename=auto_bookings.ics",
            ),
        ],
        body,
    ))
}

#[utoipa::path(
    get,
    path = "/bookings",
    params(
        ("token" = Option<String>, Query, description = "Authentication token (alternative to Bearer header)"),
        ("lead_hours" = Option<i64>, Query, description = "Cancellation lead time override in hours (1-24)")
    ),
    responses(
        (status = 200, description = "Bookings with cancellation status", body = [BookingView]),
        (status = 400, description = "Invalid lead_hours value"),
        (status = 401, description = "Invalid authentication token")
    ),
    security(("bearer_auth" = []), ("query_token" = [])),
    tag = "assistant"
)]
pub async fn get_bookings(
    State(state): State<AppState>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    Query(query): Query<BookingsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let auth_header = auth.map(|TypedHeader(a)| a);
    verify_token(&state.settings, auth_header, query.token.as_deref())?;

    let lead_hours = match query.lead_hours {
        Some(value) => validate_lead_hours(value)?,
        None => state.settings.cancellation_lead_hours,
    };

    let records = state.client.fetch_bookings().await?;
    let now = state.clock.now();
    let views = project_bookings(
        records,
        now,
        Duration::hours(lead_hours),
        state.settings.cancellation_warning(),
    );
    Ok(Json(views))
}

#[utoipa::path(
    post,
    path = "/bookings/cancel",
    request_body = CancelBookingRequest,
    params(
        ("token" = Option<String>, Query, description = "Authentication token (alternative to Bearer header)")
    ),
    responses(
        (status = 200, description = "Cancellation forwarded to the backend"),
        (status = 400, description = "Cancellation window closed or malformed booking"),
        (status = 401, description = "Invalid authentication token")
    ),
    security(("bearer_auth" = []), ("query_token" = [])),
    tag = "assistant"
)]
pub async fn cancel_booking(
    State(state): State<AppState>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    Query(query): Query<AuthQuery>,
    Json(payload): Json<CancelBookingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let auth_header = auth.map(|TypedHeader(a)| a);
    verify_token(&state.settings, auth_header, query.token.as_deref())?;

    let now = state.clock.now();
    let date = parse_booking_date(&payload.date, now)
        .ok_or_else(|| ApiError::BadRequest("Unrecognised booking date".into()))?;
    let time = NaiveTime::parse_from_str(&payload.time, "%H:%M")
        .map_err(|_| ApiError::BadRequest("Time must be HH:MM".into()))?;

    let status = cancellation_status(
        date.and_time(time),
        now,
        state.settings.cancellation_lead(),
        state.settings.cancellation_warning(),
    );
    if !status.can_cancel {
        return Err(ApiError::BadRequest(status.status_text));
    }

    let request = CancelRequest {
        class_name: payload.class_name,
        date: date.format("%Y-%m-%d").to_string(),
        time: payload.time,
    };
    let message = state.client.cancel_booking(&request).await?;
    Ok(Json(message))
}

#[utoipa::path(
    get,
    path = "/overview",
    params(
        ("token" = Option<String>, Query, description = "Authentication token (alternative to Bearer header)")
    ),
    responses(
        (status = 200, description = "Auto-bookings and bookings together", body = OverviewResponse),
        (status = 401, description = "Invalid authentication token")
    ),
    security(("bearer_auth" = []), ("query_token" = [])),
    tag = "assistant"
)]
pub async fn get_overview(
    State(state): State<AppState>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    Query(query): Query<AuthQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let auth_header = auth.map(|TypedHeader(a)| a);
    verify_token(&state.settings, auth_header, query.token.as_deref())?;

    let (auto_records, booking_records) = futures::try_join!(
        state.client.fetch_auto_bookings(),
        state.client.fetch_bookings()
    )?;

    let now = state.clock.now();
    let response = OverviewResponse {
        auto_bookings: project_auto_bookings(auto_records, now, state.settings.booking_window()),
        bookings: project_bookings(
            booking_records,
            now,
            state.settings.cancellation_lead(),
            state.settings.cancellation_warning(),
        ),
    };
    Ok(Json(response))
}
