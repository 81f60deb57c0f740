//! Event store backed by a JSON calendar export.
//!
//! ```json
//! {
//!   "calendars": [{ "title": "Work" }, { "title": "Holidays", "kind": "subscription" }],
//!   "events": [
//!     { "title": "Team Sync", "start": "2025-01-14T10:00:00Z",
//!       "end": "2025-01-14T11:00:00Z", "calendar": "Work" }
//!   ]
//! }
//! ```

use std::path::{Path, PathBuf};

use novel_events_core::CalendarEvent;
use serde::{Deserialize, Serialize};

use crate::error::CalendarError;
use crate::store::{CalendarInfo, DateRange, EventStore};

/// On-disk layout of a calendar export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreFile {
    #[serde(default)]
    pub calendars: Vec<CalendarInfo>,
    #[serde(default)]
    pub events: Vec<CalendarEvent>,
}

/// In-memory store loaded once from a [`StoreFile`].
#[derive(Debug, Clone, Default)]
pub struct JsonEventStore {
    source: Option<PathBuf>,
    data: StoreFile,
}

impl JsonEventStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CalendarError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| CalendarError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let data = serde_json::from_str(&text).map_err(|source| CalendarError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "calendar export loaded");
        Ok(Self {
            source: Some(path.to_path_buf()),
            data,
        })
    }

    pub fn from_data(data: StoreFile) -> Self {
        Self { source: None, data }
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

impl EventStore for JsonEventStore {
    fn request_access(&self) -> Result<bool, CalendarError> {
        Ok(true)
    }

    /// Declared calendars, then any calendar only referenced by an event.
    fn calendars(&self) -> Result<Vec<CalendarInfo>, CalendarError> {
        let mut calendars = self.data.calendars.clone();
        for name in self.data.events.iter().filter_map(|e| e.calendar.as_deref()) {
            if !calendars.iter().any(|c| c.title == name) {
                calendars.push(CalendarInfo::new(name));
            }
        }
        Ok(calendars)
    }

    /// Undated or calendar-less events cannot be placed in a window or
    /// attributed to a calendar, so every query returns them.
    fn events(
        &self,
        range: &DateRange,
        calendars: &[CalendarInfo],
    ) -> Result<Vec<CalendarEvent>, CalendarError> {
        let events = self
            .data
            .events
            .iter()
            .filter(|event| match event.calendar.as_deref() {
                Some(name) => calendars.iter().any(|c| c.title == name),
                None => true,
            })
            .filter(|event| event.start.is_none_or(|start| range.contains(start)))
            .cloned()
            .collect();
        Ok(events)
    }
}
