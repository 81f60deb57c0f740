use std::fmt;

use chrono::{TimeZone, Weekday};
use serde::{Deserialize, Serialize};

use crate::config::MatchRules;
use crate::event::{EventEssentials, TimeSlot, day_number};

// ─── Day slot ─────────────────────────────────────────────────────

/// Weekday constraint of a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DaySlot {
    /// Weekday-independent (titles containing the wildcard keyword).
    Any,
    On(Weekday),
}

impl DaySlot {
    pub fn admits(self, weekday: Weekday) -> bool {
        match self {
            Self::Any => true,
            Self::On(day) => day == weekday,
        }
    }

    /// 1=Sunday..7=Saturday, `None` for the wildcard.
    pub fn number(self) -> Option<u32> {
        match self {
            Self::Any => None,
            Self::On(day) => Some(day_number(day)),
        }
    }
}

// ─── Grouping key ─────────────────────────────────────────────────

/// Exact grouping key for historical events. No fuzziness here: two events
/// share a key only if title, calendar, start time and (unless wildcard)
/// weekday are identical.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PatternKey {
    pub day: DaySlot,
    pub hour: u32,
    pub minute: u32,
    pub title: String,
    pub calendar: String,
}

impl PatternKey {
    pub fn for_event(event: &EventEssentials<'_>, slot: TimeSlot, rules: &MatchRules) -> Self {
        let day = if rules.is_wildcard_title(event.title) {
            DaySlot::Any
        } else {
            DaySlot::On(slot.weekday)
        };
        Self {
            day,
            hour: slot.hour,
            minute: slot.minute,
            title: event.title.to_string(),
            calendar: event.calendar.to_string(),
        }
    }
}

impl fmt::Display for PatternKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.day.number() {
            None => write!(
                f,
                "teaching|{}:{:02}|{}|{}",
                self.hour, self.minute, self.title, self.calendar
            ),
            Some(day) => write!(
                f,
                "regular|{day}|{}:{:02}|{}|{}",
                self.hour, self.minute, self.title, self.calendar
            ),
        }
    }
}

// ─── Pattern ──────────────────────────────────────────────────────

/// One inferred recurrence group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    pub title: String,
    pub day: DaySlot,
    pub hour: u32,
    pub minute: u32,
    pub calendar: String,
    pub frequency: u32,
}

impl Pattern {
    pub fn from_key(key: PatternKey, frequency: u32) -> Self {
        Self {
            title: key.title,
            day: key.day,
            hour: key.hour,
            minute: key.minute,
            calendar: key.calendar,
            frequency,
        }
    }

    /// `min(frequency / 12, 1)` under default rules.
    pub fn score(&self, rules: &MatchRules) -> f64 {
        rules.score_for(self.frequency)
    }

    pub fn is_wildcard(&self) -> bool {
        self.day == DaySlot::Any
    }

    pub fn minutes_since_midnight(&self) -> i64 {
        i64::from(self.hour) * 60 + i64::from(self.minute)
    }

    /// Whether `event` plausibly belongs to this recurrence group.
    ///
    /// Checks, in order: exact calendar, weekday (skipped for wildcard
    /// patterns), start time within the window, then title. Minute distance
    /// is taken on the raw clock, so 23:45 and 00:15 are 1410 minutes apart.
    pub fn is_similar<Tz: TimeZone>(
        &self,
        event: &EventEssentials<'_>,
        tz: &Tz,
        rules: &MatchRules,
    ) -> bool {
        if event.calendar != self.calendar {
            return false;
        }

        let slot = event.slot_in(tz);
        if !self.day.admits(slot.weekday) {
            return false;
        }

        let distance = (slot.minutes_since_midnight() - self.minutes_since_midnight()).abs();
        if distance > rules.time_window_minutes {
            return false;
        }

        self.title_matches(event.title, rules)
    }

    /// Frequency-dependent title comparison, case-insensitive.
    ///
    /// Below the saturation frequency titles must be equal. At or above it
    /// either title may contain the other, as long as both are longer than
    /// `min_partial_title_chars`.
    pub fn title_matches(&self, candidate: &str, rules: &MatchRules) -> bool {
        let ours = self.title.to_lowercase();
        let theirs = candidate.to_lowercase();
        if ours == theirs {
            return true;
        }
        if self.frequency < rules.saturation_frequency {
            return false;
        }
        let min = rules.min_partial_title_chars;
        if ours.chars().count() <= min || theirs.chars().count() <= min {
            return false;
        }
        ours.contains(&theirs) || theirs.contains(&ours)
    }
}

// ─── Pattern set ──────────────────────────────────────────────────

/// The learned model: every pattern from one historical batch, in a
/// canonical order independent of input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternSet {
    patterns: Vec<Pattern>,
}

impl PatternSet {
    pub fn new(mut patterns: Vec<Pattern>) -> Self {
        patterns.sort_by(|a, b| {
            a.calendar
                .cmp(&b.calendar)
                .then_with(|| a.title.cmp(&b.title))
                .then_with(|| a.day.number().cmp(&b.day.number()))
                .then_with(|| (a.hour, a.minute).cmp(&(b.hour, b.minute)))
        });
        Self { patterns }
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Pattern> {
        self.patterns.iter()
    }

    pub fn as_slice(&self) -> &[Pattern] {
        &self.patterns
    }

    /// Total historical events folded into the set.
    pub fn total_frequency(&self) -> u64 {
        self.patterns.iter().map(|p| u64::from(p.frequency)).sum()
    }
}

impl<'a> IntoIterator for &'a PatternSet {
    type Item = &'a Pattern;
    type IntoIter = std::slice::Iter<'a, Pattern>;

    fn into_iter(self) -> Self::IntoIter {
        self.patterns.iter()
    }
}

// ─── Tests ────────────────────────────────────────────────────────
