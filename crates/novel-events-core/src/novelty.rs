//! Classification and ordering of upcoming events.

use std::cmp::Ordering;

use chrono::TimeZone;
use serde::Serialize;

use crate::config::{DEFAULT_NOVELTY_THRESHOLD, NOVELTY_REASON};
use crate::detector::PatternDetector;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::event::CalendarEvent;
use crate::pattern::PatternSet;

/// A report row: an upcoming event that matched no strong pattern.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NovelEvent<'a> {
    pub event: &'a CalendarEvent,
    /// `1 - best pattern score`; 1.0 when nothing matched.
    pub novelty_score: f64,
    pub reason: &'static str,
}

/// Applies a [`PatternDetector`] to upcoming events with a fixed threshold.
#[derive(Debug, Clone)]
pub struct NoveltyAnalyzer<Tz: TimeZone> {
    detector: PatternDetector<Tz>,
    threshold: f64,
}

impl<Tz: TimeZone> NoveltyAnalyzer<Tz> {
    pub fn new(detector: PatternDetector<Tz>) -> Self {
        Self {
            detector,
            threshold: DEFAULT_NOVELTY_THRESHOLD,
        }
    }

    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn detector(&self) -> &PatternDetector<Tz> {
        &self.detector
    }

    /// Events whose best pattern score is strictly below the threshold,
    /// ordered by start time with undated events last in input order.
    pub fn find_novel_events<'a>(
        &self,
        events: &'a [CalendarEvent],
        patterns: &PatternSet,
        sink: &mut dyn DiagnosticSink,
    ) -> Vec<NovelEvent<'a>> {
        let mut novel: Vec<NovelEvent<'a>> = events
            .iter()
            .filter_map(|event| {
                let score = self.detector.score(event, patterns, sink);
                (score < self.threshold).then_some(NovelEvent {
                    event,
                    novelty_score: 1.0 - score,
                    reason: NOVELTY_REASON,
                })
            })
            .collect();

        // `sort_by` is stable: undated events keep their input order.
        novel.sort_by(|a, b| chronological(a.event, b.event));
        sink.emit(&Diagnostic::NovelEventsFound { count: novel.len() });
        novel
    }
}

/// Ascending by start; events without a start compare after every dated one
/// and equal to each other.
pub fn chronological(a: &CalendarEvent, b: &CalendarEvent) -> Ordering {
    match (a.start, b.start) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
