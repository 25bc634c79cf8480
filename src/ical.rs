use chrono::Duration;
use icalendar::{Calendar, Component, Event, EventLike};

use crate::models::AutoBookingView;

/// Renders resolved auto-booking occurrences as an iCal feed so users
/// can subscribe to their upcoming classes from a calendar app.
#[derive(Clone)]
pub struct OccurrenceExporter {
    class_duration_min: u32,
}

impl OccurrenceExporter {
    pub fn new(class_duration_min: u32) -> Self {
        Self { class_duration_min }
    }

    pub fn generate(&self, rules: &[AutoBookingView]) -> Vec<u8> {
        if rules.is_empty() {
            return Vec::new();
        }

        let mut calendar = Calendar::new();
        calendar.name("Gym auto-booking schedule");

        for rule in rules {
            let start = rule.next_occurrence;
            let end = start + Duration::minutes(self.class_duration_min as i64);

            let mut event = Event::new();
            event.summary(&format!("Gym: {}", rule.class_name));
            event.starts(start);
            event.ends(end);
            event.description(&format!(
                "Recurring booking every {}\nInstructor: {}\nBooking window opens: {}",
                rule.day_of_week,
                rule.instructor,
                rule.window_opens_at.format("%Y-%m-%d %H:%M")
            ));
            event.uid(&format!(
                "{}-{}-{}-auto-booking",
                start.format("%Y%m%dT%H%M%S"),
                rule.class_name.replace(' ', "-"),
                rule.id
            ));
            calendar.push(event);
        }

        calendar.to_string().into_bytes()
    }
}
