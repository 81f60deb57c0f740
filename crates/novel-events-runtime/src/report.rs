//! Plain-text rendering of the novel-event report.

use std::fmt;

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use novel_events_core::{CalendarEvent, NovelEvent, chronological};

const DATE_FORMAT: &str = "%a %b %d";
const TIME_FORMAT: &str = "%H%M";
const GENERATED_FORMAT: &str = "%a %Y-%m-%d %H:%M:%S %Z";
const UNTITLED: &str = "[Untitled Event]";

/// Renders novel events in a fixed display time zone.
#[derive(Debug, Clone)]
pub struct ReportFormatter<Tz: TimeZone> {
    tz: Tz,
    debug: bool,
}

impl<Tz> ReportFormatter<Tz>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    pub fn new(tz: Tz, debug: bool) -> Self {
        Self { tz, debug }
    }

    /// Full report text. `debug_log` is prepended only in debug mode.
    pub fn format(
        &self,
        novel: &[NovelEvent<'_>],
        look_ahead_days: u32,
        generated_at: DateTime<Utc>,
        debug_log: &[String],
    ) -> String {
        let mut out = String::new();
        if self.debug {
            for line in debug_log {
                out.push_str(line);
                out.push('\n');
            }
            out.push('\n');
        }

        out.push_str(&format!(
            "Novel events found in next {look_ahead_days} days:\n\n"
        ));
        out.push_str(&format!(
            "Generated: {}\n\n",
            generated_at.with_timezone(&self.tz).format(GENERATED_FORMAT)
        ));

        if novel.is_empty() {
            out.push_str("No events found\n");
            return out;
        }

        let mut sorted: Vec<&NovelEvent<'_>> = novel.iter().collect();
        sorted.sort_by(|a, b| chronological(a.event, b.event));

        for row in sorted {
            let event = row.event;
            let title = match event.title.as_deref() {
                Some(t) if !t.is_empty() => t,
                _ => UNTITLED,
            };
            let calendar = event.calendar.as_deref().unwrap_or_default();
            let when = self.when(event);
            out.push_str(&format!("{when} {title} [{calendar}]\n"));
            if self.debug {
                out.push_str(&format!("  Reason: {}\n", row.reason));
            }
        }
        out
    }

    /// Date/time column for one event. Needs both start and end.
    pub fn when(&self, event: &CalendarEvent) -> String {
        let (Some(start), Some(end)) = (event.start, event.end) else {
            return "(No Date)".to_string();
        };
        let start = start.with_timezone(&self.tz);
        let end = end.with_timezone(&self.tz);
        let start_date = start.format(DATE_FORMAT).to_string();
        let start_time = start.format(TIME_FORMAT).to_string();

        let duration = end.clone().signed_duration_since(start.clone());
        let all_day = start.time() == NaiveTime::MIN
            && end.time() == NaiveTime::MIN
            && duration > Duration::zero()
            && duration.num_hours() % 24 == 0;

        if all_day {
            // All-day ends are exclusive: the last covered day is the one before.
            let last_day = end - Duration::days(1);
            if last_day.date_naive() == start.date_naive() {
                return format!("{start_date} (All Day)");
            }
            return format!(
                "{start_date} (All Day) - {} (All Day)",
                last_day.format(DATE_FORMAT)
            );
        }

        if end.date_naive() != start.date_naive() {
            return format!(
                "{start_date} {start_time} - {} {}",
                end.format(DATE_FORMAT),
                end.format(TIME_FORMAT)
            );
        }

        format!("{start_date} {start_time}")
    }
}
