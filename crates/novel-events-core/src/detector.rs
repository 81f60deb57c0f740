//! Pattern model builder and per-event scorer.

use std::collections::HashMap;

use chrono::TimeZone;

use crate::config::MatchRules;
use crate::diagnostics::{Diagnostic, DiagnosticSink, Stage};
use crate::event::CalendarEvent;
use crate::pattern::{Pattern, PatternKey, PatternSet};

/// Learns recurrence patterns from history and scores events against them.
///
/// Holds no state between calls: every [`build`](Self::build) returns a
/// fresh [`PatternSet`] and scoring only reads the set it is given.
#[derive(Debug, Clone)]
pub struct PatternDetector<Tz: TimeZone> {
    tz: Tz,
    rules: MatchRules,
}

impl<Tz: TimeZone> PatternDetector<Tz> {
    pub fn new(tz: Tz) -> Self {
        Self {
            tz,
            rules: MatchRules::default(),
        }
    }

    #[must_use]
    pub fn with_rules(mut self, rules: MatchRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn rules(&self) -> &MatchRules {
        &self.rules
    }

    pub fn time_zone(&self) -> &Tz {
        &self.tz
    }

    /// Group historical events by exact key and count each group.
    ///
    /// Events missing a title, start or calendar are skipped.
    pub fn build(&self, events: &[CalendarEvent], sink: &mut dyn DiagnosticSink) -> PatternSet {
        let mut counts: HashMap<PatternKey, u32> = HashMap::new();

        for event in events {
            let Some(essentials) = event.essentials() else {
                sink.emit(&Diagnostic::SkippedIncomplete {
                    stage: Stage::Build,
                    title: event.title.as_deref(),
                });
                continue;
            };

            if self.rules.is_wildcard_title(essentials.title) {
                sink.emit(&Diagnostic::TeachingEvent {
                    title: essentials.title,
                });
            }

            let slot = essentials.slot_in(&self.tz);
            let key = PatternKey::for_event(&essentials, slot, &self.rules);
            let count = counts.entry(key.clone()).or_insert(0);
            *count += 1;
            sink.emit(&Diagnostic::PatternCounted {
                key: &key,
                count: *count,
            });
        }

        let set = PatternSet::new(
            counts
                .into_iter()
                .map(|(key, frequency)| Pattern::from_key(key, frequency))
                .collect(),
        );
        sink.emit(&Diagnostic::PatternsBuilt {
            patterns: set.as_slice(),
        });
        set
    }

    /// Best score among patterns similar to `event`, or 0.0.
    pub fn score(
        &self,
        event: &CalendarEvent,
        patterns: &PatternSet,
        sink: &mut dyn DiagnosticSink,
    ) -> f64 {
        let Some(essentials) = event.essentials() else {
            sink.emit(&Diagnostic::SkippedIncomplete {
                stage: Stage::Score,
                title: event.title.as_deref(),
            });
            return 0.0;
        };

        sink.emit(&Diagnostic::Scoring {
            title: essentials.title,
            calendar: essentials.calendar,
            start: essentials.start,
        });

        let mut best: Option<f64> = None;
        for pattern in patterns {
            if !pattern.is_similar(&essentials, &self.tz, &self.rules) {
                continue;
            }
            let score = pattern.score(&self.rules);
            sink.emit(&Diagnostic::PatternMatched { pattern, score });
            best = Some(best.map_or(score, |b| b.max(score)));
        }

        match best {
            Some(score) => {
                sink.emit(&Diagnostic::FinalScore { score });
                score
            }
            None => {
                sink.emit(&Diagnostic::NoMatch);
                0.0
            }
        }
    }
}
