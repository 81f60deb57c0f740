//! EventStore trait: the mock-injectable seam between the app and a calendar
//! backend.

use chrono::{DateTime, Utc};
use novel_events_core::CalendarEvent;
use serde::{Deserialize, Serialize};

use crate::error::CalendarError;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarKind {
    #[default]
    Local,
    Subscription,
    Other,
}

/// A calendar known to the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CalendarInfo {
    pub title: String,
    #[serde(default)]
    pub kind: CalendarKind,
}

impl CalendarInfo {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            kind: CalendarKind::Local,
        }
    }
}

/// Half-open time window: `start` inclusive, `end` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at < self.end
    }
}

/// Calendar backend. Enables mock injection for testing.
pub trait EventStore {
    /// Ask for read access. `Ok(false)` means the user refused.
    fn request_access(&self) -> Result<bool, CalendarError>;

    fn calendars(&self) -> Result<Vec<CalendarInfo>, CalendarError>;

    /// Events in `range` belonging to any of `calendars`, in store order.
    fn events(
        &self,
        range: &DateRange,
        calendars: &[CalendarInfo],
    ) -> Result<Vec<CalendarEvent>, CalendarError>;
}

impl<T: EventStore + ?Sized> EventStore for &T {
    fn request_access(&self) -> Result<bool, CalendarError> {
        (**self).request_access()
    }

    fn calendars(&self) -> Result<Vec<CalendarInfo>, CalendarError> {
        (**self).calendars()
    }

    fn events(
        &self,
        range: &DateRange,
        calendars: &[CalendarInfo],
    ) -> Result<Vec<CalendarEvent>, CalendarError> {
        (**self).events(range, calendars)
    }
}
