use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

/// Shown instead of a countdown once the booking window has opened.
pub const COUNTDOWN_IMMINENT: &str = "Booking attempt imminent or in progress.";

/// Resolves the next concrete occurrence of a weekly auto-booking rule.
///
/// The candidate starts at the nearest `day_of_week` on or after `now`,
/// at `target_time`. From there it advances in whole weeks while either
/// condition holds:
///
/// - the candidate falls on `last_booked` (the backend already acted on
///   that occurrence, show the one after), or
/// - the booking window (`candidate - booking_window`) has already
///   opened, meaning the attempt for that occurrence is behind us.
///
/// The returned occurrence therefore always has its window-open instant
/// strictly after `now` and never collides with `last_booked`, even when
/// the backend hands us a stale `last_booked` date.
pub fn next_occurrence(
    day_of_week: Weekday,
    target_time: NaiveTime,
    last_booked: Option<NaiveDate>,
    now: NaiveDateTime,
    booking_window: Duration,
) -> NaiveDateTime {
    let days_until = (day_of_week.num_days_from_sunday() as i64 + 7
        - now.weekday().num_days_from_sunday() as i64)
        % 7;
    let mut candidate = (now.date() + Duration::days(days_until)).and_time(target_time);

    if days_until == 0 && now > candidate {
        candidate = candidate + Duration::days(7);
    }

    while last_booked == Some(candidate.date()) || candidate - booking_window <= now {
        candidate = candidate + Duration::days(7);
    }

    candidate
}

/// Formats the time remaining until `target` as a countdown line.
///
/// The days component is dropped when zero; hours, minutes and seconds
/// are always zero-padded. Once `target` is reached the fixed
/// [`COUNTDOWN_IMMINENT`] sentinel is returned, never a negative
/// duration.
pub fn format_countdown(target: NaiveDateTime, now: NaiveDateTime) -> String {
    let diff = target - now;
    if diff <= Duration::zero() {
        return COUNTDOWN_IMMINENT.to_string();
    }

    let total_secs = diff.num_seconds();
    let days = total_secs / 86_400;
    let hours = (total_secs % 86_400) / 3_600;
    let minutes = (total_secs % 3_600) / 60;
    let seconds = total_secs % 60;

    if days > 0 {
        format!("Booking opens in: {days}d {hours:02}h {minutes:02}m {seconds:02}s")
    } else {
        format!("Booking opens in: {hours:02}h {minutes:02}m {seconds:02}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> Duration {
        Duration::hours(48)
    }

    fn at(y: i32, m: u32, d: u32, hh: u32, mm: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(hh, mm, 0)
            .unwrap()
    }

    fn six_pm() -> NaiveTime {
        NaiveTime::from_hms_opt(18, 0, 0).unwrap()
    }

    #[test]
    fn test_midweek_resolves_to_next_monday() {
        // Wednesday morning, rule fires Mondays at 18:00.
        let now = at(2024, 1, 3, 9, 0);
        let occurrence = next_occurrence(Weekday::Mon, six_pm(), None, now, window());
        assert_eq!(occurrence, at(2024, 1, 8, 18, 0));
    }

    #[test]
    fn test_class_already_passed_today_rolls_a_week() {
        let now = at(2024, 1, 8, 19, 0);
        let occurrence = next_occurrence(Weekday::Mon, six_pm(), None, now, window());
        assert_eq!(occurrence, at(2024, 1, 15, 18, 0));
    }

    #[test]
    fn test_window_already_open_reports_following_week() {
        // Monday 10:00, class at 18:00 the same day. The 48h window for
        // today's class opened on Saturday, so that attempt is already
        // behind us and the resolver reports next week's occurrence.
        let now = at(2024, 1, 8, 10, 0);
        let occurrence = next_occurrence(Weekday::Mon, six_pm(), None, now, window());
        assert_eq!(occurrence, at(2024, 1, 15, 18, 0));
    }

    #[test]
    fn test_last_booked_occurrence_is_skipped() {
        let now = at(2024, 1, 3, 9, 0);
        let last_booked = NaiveDate::from_ymd_opt(2024, 1, 8);
        let occurrence = next_occurrence(Weekday::Mon, six_pm(), last_booked, now, window());
        assert_eq!(occurrence, at(2024, 1, 15, 18, 0));
    }

    #[test]
    fn test_stale_last_booked_is_ignored() {
        let now = at(2024, 1, 3, 9, 0);
        let last_booked = NaiveDate::from_ymd_opt(2023, 12, 25);
        let occurrence = next_occurrence(Weekday::Mon, six_pm(), last_booked, now, window());
        assert_eq!(occurrence, at(2024, 1, 8, 18, 0));
    }

    #[test]
    fn test_booked_ahead_skips_past_both_rules() {
        // Sunday evening: Monday's window is open *and* the backend has
        // already booked Monday. Both rules push to the week after.
        let now = at(2024, 1, 7, 20, 0);
        let last_booked = NaiveDate::from_ymd_opt(2024, 1, 8);
        let occurrence = next_occurrence(Weekday::Mon, six_pm(), last_booked, now, window());
        assert_eq!(occurrence, at(2024, 1, 15, 18, 0));
    }

    #[test]
    fn test_window_open_is_always_in_the_future() {
        let times = [
            at(2024, 1, 3, 9, 0),
            at(2024, 1, 8, 10, 0),
            at(2024, 1, 8, 17, 59),
            at(2024, 1, 8, 18, 0),
            at(2024, 2, 29, 23, 59),
        ];
        for now in times {
            for day in [Weekday::Sun, Weekday::Mon, Weekday::Thu, Weekday::Sat] {
                let occurrence = next_occurrence(day, six_pm(), None, now, window());
                assert!(occurrence - window() > now, "window not future for {now} / {day}");
                assert_eq!(occurrence.weekday(), day);
            }
        }
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let now = at(2024, 1, 3, 9, 0);
        let last_booked = NaiveDate::from_ymd_opt(2024, 1, 8);
        let first = next_occurrence(Weekday::Mon, six_pm(), last_booked, now, window());
        let second = next_occurrence(Weekday::Mon, six_pm(), last_booked, now, window());
        assert_eq!(first, second);
    }

    #[test]
    fn test_countdown_with_days() {
        let now = at(2024, 1, 3, 9, 0);
        let target = at(2024, 1, 6, 18, 0);
        assert_eq!(format_countdown(target, now), "Booking opens in: 3d 09h 00m 00s");
    }

    #[test]
    fn test_countdown_omits_zero_days() {
        let now = at(2024, 1, 6, 14, 55);
        let target = at(2024, 1, 6, 18, 0);
        assert_eq!(format_countdown(target, now), "Booking opens in: 03h 05m 00s");
    }

    #[test]
    fn test_countdown_zero_pads_components() {
        let now = at(2024, 1, 6, 17, 58);
        let target = at(2024, 1, 6, 18, 0);
        assert_eq!(format_countdown(target, now), "Booking opens in: 00h 02m 00s");
    }

    #[test]
    fn test_countdown_sentinel_at_and_past_target() {
        let target = at(2024, 1, 6, 18, 0);
        assert_eq!(format_countdown(target, target), COUNTDOWN_IMMINENT);
        assert_eq!(format_countdown(target, at(2024, 1, 6, 18, 1)), COUNTDOWN_IMMINENT);
    }

    #[test]
    fn test_countdown_shrinks_tick_by_tick() {
        let target = at(2024, 1, 6, 18, 0);
        let mut now = NaiveDate::from_ymd_opt(2024, 1, 6)
            .unwrap()
            .and_hms_opt(17, 59, 57)
            .unwrap();
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(format_countdown(target, now));
            now = now + Duration::seconds(1);
        }
        assert_eq!(
            seen,
            vec![
                "Booking opens in: 00h 00m 03s",
                "Booking opens in: 00h 00m 02s",
                "Booking opens in: 00h 00m 01s",
                COUNTDOWN_IMMINENT,
            ]
        );
    }
}
