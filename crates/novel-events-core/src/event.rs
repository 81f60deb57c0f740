use chrono::{DateTime, Datelike, TimeZone, Timelike, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// A single calendar event instance as delivered by the event source.
///
/// Every field is optional: sources routinely hand back untitled events,
/// events without dates, or events whose calendar was deleted. The engine
/// degrades on missing fields instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub calendar: Option<String>,
}

impl CalendarEvent {
    pub fn new(
        title: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        calendar: impl Into<String>,
    ) -> Self {
        Self {
            title: Some(title.into()),
            start: Some(start),
            end: Some(end),
            calendar: Some(calendar.into()),
        }
    }

    /// Borrow the fields the matcher needs, or `None` if any is missing.
    pub fn essentials(&self) -> Option<EventEssentials<'_>> {
        Some(EventEssentials {
            title: self.title.as_deref()?,
            start: self.start?,
            calendar: self.calendar.as_deref()?,
        })
    }
}

/// The complete subset of a [`CalendarEvent`] used for grouping and matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventEssentials<'a> {
    pub title: &'a str,
    pub start: DateTime<Utc>,
    pub calendar: &'a str,
}

impl EventEssentials<'_> {
    /// Weekday and wall-clock time of the start, seen from `tz`.
    pub fn slot_in<Tz: TimeZone>(&self, tz: &Tz) -> TimeSlot {
        TimeSlot::of(&self.start.with_timezone(tz))
    }
}

/// Weekday plus hour/minute of an instant in some time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeSlot {
    pub weekday: Weekday,
    pub hour: u32,
    pub minute: u32,
}

impl TimeSlot {
    pub fn of<Tz: TimeZone>(at: &DateTime<Tz>) -> Self {
        Self {
            weekday: at.weekday(),
            hour: at.hour(),
            minute: at.minute(),
        }
    }

    pub fn minutes_since_midnight(&self) -> i64 {
        i64::from(self.hour) * 60 + i64::from(self.minute)
    }
}

/// Day number in the 1=Sunday..7=Saturday convention.
pub fn day_number(weekday: Weekday) -> u32 {
    weekday.number_from_sunday()
}
