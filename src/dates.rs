use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};
use once_cell::sync::Lazy;
use regex::Regex;

static ORDINAL_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)(st|nd|rd|th)\b").expect("regex compiles"));

/// Parses a human booking date as the backend renders it.
///
/// Two shapes exist in the wild: `"dd/mm/yyyy"` and `"Monday 1st January"`
/// (ordinal suffix, no year). For the year-less shape the current year is
/// assumed, rolling forward one year when the result lands more than a
/// day behind `now` — a date string near New Year almost always means the
/// upcoming instance, not last January's.
///
/// Anything unparseable yields `None`; callers leave the row without
/// deadline information rather than failing the whole listing.
pub fn parse_booking_date(raw: &str, now: NaiveDateTime) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%d/%m/%Y") {
        return Some(date);
    }

    let clean = ORDINAL_SUFFIX.replace(trimmed, "$1");
    let mut tokens = clean.split_whitespace().peekable();
    // Drop a leading weekday name; the day-of-month and month determine
    // the date and the weekday would pin the parse to one specific year.
    if tokens.peek().is_some_and(|t| t.parse::<Weekday>().is_ok()) {
        tokens.next();
    }
    let parts: Vec<&str> = tokens.collect();
    let [day, month] = parts.as_slice() else {
        return None;
    };

    let year = now.year();
    let date = NaiveDate::parse_from_str(&format!("{day} {month} {year}"), "%d %B %Y").ok()?;

    if date < now.date() - Duration::days(1) {
        return date.with_year(year + 1);
    }
    Some(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noon(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_parses_weekday_ordinal_shape() {
        let now = noon(2024, 1, 1);
        assert_eq!(
            parse_booking_date("Monday 15th January", now),
            NaiveDate::from_ymd_opt(2024, 1, 15)
        );
    }

    #[test]
    fn test_all_ordinal_suffixes() {
        let now = noon(2024, 3, 1);
        for (raw, day) in [
            ("Friday 1st March", 1),
            ("Saturday 2nd March", 2),
            ("Sunday 3rd March", 3),
            ("Monday 4th March", 4),
            ("Thursday 21st March", 21),
        ] {
            assert_eq!(
                parse_booking_date(raw, now),
                NaiveDate::from_ymd_opt(2024, 3, day),
                "failed for {raw}"
            );
        }
    }

    #[test]
    fn test_parses_slash_shape() {
        let now = noon(2024, 1, 1);
        assert_eq!(
            parse_booking_date("06/10/2025", now),
            NaiveDate::from_ymd_opt(2025, 10, 6)
        );
    }

    #[test]
    fn test_slash_shape_keeps_explicit_year() {
        // An explicit year is taken as-is, even when it lies in the past.
        let now = noon(2024, 6, 1);
        assert_eq!(
            parse_booking_date("01/01/2024", now),
            NaiveDate::from_ymd_opt(2024, 1, 1)
        );
    }

    #[test]
    fn test_year_rolls_over_for_past_dates() {
        let now = noon(2024, 6, 1);
        let parsed = parse_booking_date("Monday 1st January", now).unwrap();
        assert_eq!(parsed.year(), 2025);
    }

    #[test]
    fn test_yesterday_does_not_roll_over() {
        // One day behind is tolerated (late-night checks, timezone skew).
        let now = noon(2024, 1, 16);
        assert_eq!(
            parse_booking_date("Monday 15th January", now),
            NaiveDate::from_ymd_opt(2024, 1, 15)
        );
    }

    #[test]
    fn test_unparseable_strings_yield_none() {
        let now = noon(2024, 1, 1);
        for raw in ["Invalid Date String", "", "  ", "32nd January", "15th", "31/02/2024"] {
            assert_eq!(parse_booking_date(raw, now), None, "expected None for {raw:?}");
        }
    }

    #[test]
    fn test_without_weekday_token() {
        let now = noon(2024, 1, 1);
        assert_eq!(
            parse_booking_date("15th January", now),
            NaiveDate::from_ymd_opt(2024, 1, 15)
        );
    }
}
