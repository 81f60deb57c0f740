//! novel-events-core: pattern learning and novelty scoring for calendar events.
//!
//! Learns recurring (title, weekday, time, calendar) groups from a historical
//! window and flags upcoming events that match no strong group. Pure and
//! synchronous; calendar access, CLI and report rendering live elsewhere.

pub mod config;
pub mod detector;
pub mod diagnostics;
pub mod event;
pub mod novelty;
pub mod pattern;

use chrono::TimeZone;

pub use config::{DEFAULT_NOVELTY_THRESHOLD, MatchRules, NOVELTY_REASON};
pub use detector::PatternDetector;
pub use diagnostics::{Diagnostic, DiagnosticSink, NoopSink, Stage, TracingSink};
pub use event::{CalendarEvent, EventEssentials, TimeSlot};
pub use novelty::{NovelEvent, NoveltyAnalyzer, chronological};
pub use pattern::{DaySlot, Pattern, PatternKey, PatternSet};

/// Build the pattern model from historical events with default rules.
pub fn build_patterns<Tz: TimeZone>(
    historical: &[CalendarEvent],
    tz: Tz,
    sink: &mut dyn DiagnosticSink,
) -> PatternSet {
    PatternDetector::new(tz).build(historical, sink)
}

/// Best similar-pattern score for one event with default rules, 0.0 if none.
pub fn score_event<Tz: TimeZone>(
    event: &CalendarEvent,
    patterns: &PatternSet,
    tz: Tz,
    sink: &mut dyn DiagnosticSink,
) -> f64 {
    PatternDetector::new(tz).score(event, patterns, sink)
}

/// Classify upcoming events against `patterns` with default rules.
pub fn find_novel_events<'a, Tz: TimeZone>(
    upcoming: &'a [CalendarEvent],
    patterns: &PatternSet,
    threshold: f64,
    tz: Tz,
    sink: &mut dyn DiagnosticSink,
) -> Vec<NovelEvent<'a>> {
    NoveltyAnalyzer::new(PatternDetector::new(tz))
        .with_threshold(threshold)
        .find_novel_events(upcoming, patterns, sink)
}
