//! novel-events-calendar: calendar IO boundary.
//! Provides the event store seam, a JSON export store, allow/deny list
//! filtering, and the historical/upcoming window fetches. No scoring logic.

pub mod error;
pub mod filter;
pub mod json_store;
pub mod manager;
pub mod store;

pub use error::CalendarError;
pub use filter::{CalendarFilter, CalendarStatus};
pub use json_store::{JsonEventStore, StoreFile};
pub use manager::{CalendarManager, DEFAULT_DAYS_TO_LOOK_AHEAD};
pub use store::{CalendarInfo, CalendarKind, DateRange, EventStore};
