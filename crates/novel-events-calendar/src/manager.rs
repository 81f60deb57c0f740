//! CalendarManager: access check, calendar filtering and window fetches.

use chrono::{DateTime, Duration, Months, Utc};
use novel_events_core::CalendarEvent;

use crate::error::CalendarError;
use crate::filter::{CalendarFilter, CalendarStatus};
use crate::store::{CalendarInfo, DateRange, EventStore};

pub const DEFAULT_DAYS_TO_LOOK_AHEAD: u32 = 14;

/// How far back the historical window reaches.
const LOOK_BACK_MONTHS: u32 = 12;

pub struct CalendarManager<S: EventStore> {
    store: S,
    filter: CalendarFilter,
    days_to_look_ahead: u32,
}

impl<S: EventStore> CalendarManager<S> {
    pub fn new(store: S, filter: CalendarFilter) -> Self {
        Self {
            store,
            filter,
            days_to_look_ahead: DEFAULT_DAYS_TO_LOOK_AHEAD,
        }
    }

    /// Rejects zero and negative day counts.
    pub fn with_days_to_look_ahead(mut self, days: i64) -> Result<Self, CalendarError> {
        self.days_to_look_ahead = u32::try_from(days)
            .ok()
            .filter(|d| *d > 0)
            .ok_or(CalendarError::InvalidLookAhead(days))?;
        Ok(self)
    }

    pub fn days_to_look_ahead(&self) -> u32 {
        self.days_to_look_ahead
    }

    pub fn filter(&self) -> &CalendarFilter {
        &self.filter
    }

    /// Request read access and report every calendar with its filter status.
    pub fn request_access(&self) -> Result<Vec<(CalendarInfo, CalendarStatus)>, CalendarError> {
        if !self.store.request_access()? {
            return Err(CalendarError::AccessDenied);
        }

        let statuses: Vec<_> = self
            .store
            .calendars()?
            .into_iter()
            .map(|calendar| {
                let status = self.filter.status(&calendar.title);
                (calendar, status)
            })
            .collect();
        for (calendar, status) in &statuses {
            tracing::debug!(calendar = %calendar.title, %status, "calendar");
        }
        Ok(statuses)
    }

    /// `[now - 12 months, now)`.
    pub fn historical_range(&self, now: DateTime<Utc>) -> DateRange {
        let start = now
            .checked_sub_months(Months::new(LOOK_BACK_MONTHS))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        DateRange::new(start, now)
    }

    /// `[now, now + days_to_look_ahead)`.
    pub fn upcoming_range(&self, now: DateTime<Utc>) -> DateRange {
        let end = now
            .checked_add_signed(Duration::days(i64::from(self.days_to_look_ahead)))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        DateRange::new(now, end)
    }

    pub fn fetch_historical(&self, now: DateTime<Utc>) -> Result<Vec<CalendarEvent>, CalendarError> {
        self.fetch_events(&self.historical_range(now))
    }

    pub fn fetch_upcoming(&self, now: DateTime<Utc>) -> Result<Vec<CalendarEvent>, CalendarError> {
        self.fetch_events(&self.upcoming_range(now))
    }

    /// Events in `range` from calendars the filter admits.
    pub fn fetch_events(&self, range: &DateRange) -> Result<Vec<CalendarEvent>, CalendarError> {
        let admitted: Vec<CalendarInfo> = self
            .store
            .calendars()?
            .into_iter()
            .filter(|calendar| self.filter.admits(&calendar.title))
            .collect();
        tracing::debug!(
            calendars = admitted.len(),
            start = %range.start,
            end = %range.end,
            "fetching events"
        );

        let mut events = self.store.events(range, &admitted)?;
        events.retain(|event| self.filter.admits_event(event.calendar.as_deref()));
        tracing::debug!(count = events.len(), "events fetched");
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json_store::{JsonEventStore, StoreFile};
    use chrono::TimeZone;
    use std::cell::RefCell;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 10, 12, 0, 0).unwrap()
    }

    #[derive(Default)]
    struct MockStore {
        deny: bool,
        calendars: Vec<CalendarInfo>,
        events: Vec<CalendarEvent>,
        requested: RefCell<Vec<(DateRange, Vec<String>)>>,
    }

    impl EventStore for MockStore {
        fn request_access(&self) -> Result<bool, CalendarError> {
            Ok(!self.deny)
        }

        fn calendars(&self) -> Result<Vec<CalendarInfo>, CalendarError> {
            Ok(self.calendars.clone())
        }

        fn events(
            &self,
            range: &DateRange,
            calendars: &[CalendarInfo],
        ) -> Result<Vec<CalendarEvent>, CalendarError> {
            self.requested.borrow_mut().push((
                *range,
                calendars.iter().map(|c| c.title.clone()).collect(),
            ));
            Ok(self.events.clone())
        }
    }

    #[test]
    fn denied_access_is_an_error() {
        let store = MockStore {
            deny: true,
            ..MockStore::default()
        };
        let manager = CalendarManager::new(store, CalendarFilter::new());
        assert!(matches!(
            manager.request_access(),
            Err(CalendarError::AccessDenied)
        ));
    }

    #[test]
    fn access_reports_statuses() {
        let store = MockStore {
            calendars: vec![
                CalendarInfo::new("Work"),
                CalendarInfo::new("Birthdays"),
                CalendarInfo::new("Gym"),
            ],
            ..MockStore::default()
        };
        let mut filter = CalendarFilter::new();
        filter.add_blacklist_csv("Birthdays");
        filter.add_whitelist_csv("Work");
        let manager = CalendarManager::new(store, filter);

        let statuses: Vec<_> = manager
            .request_access()
            .expect("granted")
            .into_iter()
            .map(|(c, s)| (c.title, s))
            .collect();
        assert_eq!(
            statuses,
            vec![
                ("Work".to_string(), CalendarStatus::Whitelisted),
                ("Birthdays".to_string(), CalendarStatus::Blacklisted),
                ("Gym".to_string(), CalendarStatus::Excluded),
            ]
        );
    }

    #[test]
    fn only_admitted_calendars_are_queried() {
        let store = MockStore {
            calendars: vec![CalendarInfo::new("Work"), CalendarInfo::new("Birthdays")],
            ..MockStore::default()
        };
        let mut filter = CalendarFilter::new();
        filter.add_blacklist_csv("Birthdays");
        let manager = CalendarManager::new(&store, filter);
        manager.fetch_upcoming(now()).expect("fetch");

        let requested = store.requested.borrow();
        assert_eq!(requested.len(), 1);
        assert_eq!(requested[0].1, vec!["Work".to_string()]);
    }

    fn mixed_store() -> JsonEventStore {
        let hour = Duration::hours(1);
        let start = now() + hour;
        JsonEventStore::from_data(StoreFile {
            calendars: vec![CalendarInfo::new("Work"), CalendarInfo::new("Personal")],
            events: vec![
                CalendarEvent::new("Standup", start, start + hour, "Work"),
                CalendarEvent::new("Doctor", start, start + hour, "Personal"),
                CalendarEvent {
                    title: Some("Orphan".into()),
                    start: Some(start),
                    end: Some(start + hour),
                    calendar: None,
                },
            ],
        })
    }

    fn upcoming_titles(manager: &CalendarManager<JsonEventStore>) -> Vec<String> {
        manager
            .fetch_upcoming(now())
            .expect("upcoming")
            .into_iter()
            .filter_map(|e| e.title)
            .collect()
    }

    #[test]
    fn whitelist_drops_calendar_less_events() {
        let mut filter = CalendarFilter::new();
        filter.add_whitelist_csv("Work");
        let manager = CalendarManager::new(mixed_store(), filter);
        assert_eq!(upcoming_titles(&manager), vec!["Standup"]);
    }

    #[test]
    fn calendar_less_events_pass_without_whitelist() {
        let mut filter = CalendarFilter::new();
        filter.add_blacklist_csv("Personal");
        let manager = CalendarManager::new(mixed_store(), filter);
        assert_eq!(upcoming_titles(&manager), vec!["Standup", "Orphan"]);
    }

    #[test]
    fn windows_cover_a_year_back_and_n_days_ahead() {
        let manager = CalendarManager::new(MockStore::default(), CalendarFilter::new())
            .with_days_to_look_ahead(7)
            .expect("valid");
        let past = manager.historical_range(now());
        assert_eq!(past.start, Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap());
        assert_eq!(past.end, now());

        let ahead = manager.upcoming_range(now());
        assert_eq!(ahead.start, now());
        assert_eq!(ahead.end, Utc.with_ymd_and_hms(2025, 1, 17, 12, 0, 0).unwrap());
    }

    #[test]
    fn look_ahead_must_be_positive() {
        for days in [0, -3] {
            let result = CalendarManager::new(MockStore::default(), CalendarFilter::new())
                .with_days_to_look_ahead(days);
            assert!(matches!(result, Err(CalendarError::InvalidLookAhead(d)) if d == days));
        }
    }

    #[test]
    fn default_look_ahead_is_two_weeks() {
        let manager = CalendarManager::new(MockStore::default(), CalendarFilter::new());
        assert_eq!(manager.days_to_look_ahead(), 14);
    }

    #[test]
    fn boundary_events_with_json_store() {
        let history_start = Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap();
        let upcoming_end = Utc.with_ymd_and_hms(2025, 1, 24, 12, 0, 0).unwrap();
        let one_sec = Duration::seconds(1);
        let hour = Duration::hours(1);
        let data = StoreFile {
            calendars: vec![CalendarInfo::new("Test Calendar")],
            events: vec![
                CalendarEvent::new("Too Old", history_start - one_sec, history_start, "Test Calendar"),
                CalendarEvent::new("Historical Boundary Event", history_start + one_sec, history_start + hour, "Test Calendar"),
                CalendarEvent::new("Now", now(), now() + hour, "Test Calendar"),
                CalendarEvent::new("Future Boundary Event", upcoming_end - one_sec, upcoming_end + hour, "Test Calendar"),
                CalendarEvent::new("Too Far", upcoming_end, upcoming_end + hour, "Test Calendar"),
            ],
        };
        let manager = CalendarManager::new(JsonEventStore::from_data(data), CalendarFilter::new());

        let titles = |events: Vec<CalendarEvent>| -> Vec<String> {
            events.into_iter().filter_map(|e| e.title).collect()
        };
        assert_eq!(
            titles(manager.fetch_historical(now()).expect("historical")),
            vec!["Historical Boundary Event"]
        );
        assert_eq!(
            titles(manager.fetch_upcoming(now()).expect("upcoming")),
            vec!["Now", "Future Boundary Event"]
        );
    }
}
