use serde::{Deserialize, Serialize};

/// Patterns scoring below this are reported as novel.
pub const DEFAULT_NOVELTY_THRESHOLD: f64 = 0.2;

/// Fixed reason attached to every novel event.
pub const NOVELTY_REASON: &str = "Event occurs infrequently in your calendar";

/// Tunables for pattern scoring and fuzzy matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchRules {
    /// Occurrences at which a pattern's score saturates at 1.0 and partial
    /// title matching is allowed (12 = roughly monthly over a year).
    pub saturation_frequency: u32,
    /// Maximum start-time distance, in minutes, between an event and a pattern.
    pub time_window_minutes: i64,
    /// Titles of this many characters or fewer never match by containment.
    pub min_partial_title_chars: usize,
    /// Lowercase keyword that makes a title's pattern weekday-independent.
    pub wildcard_keyword: String,
}

impl Default for MatchRules {
    fn default() -> Self {
        Self {
            saturation_frequency: 12,
            time_window_minutes: 60,
            min_partial_title_chars: 5,
            wildcard_keyword: "teaching".to_string(),
        }
    }
}

impl MatchRules {
    /// Whether `title` groups without regard to weekday.
    pub fn is_wildcard_title(&self, title: &str) -> bool {
        title.to_lowercase().contains(&self.wildcard_keyword)
    }

    /// Confidence for a pattern seen `frequency` times, in [0, 1].
    pub fn score_for(&self, frequency: u32) -> f64 {
        if self.saturation_frequency == 0 {
            return 1.0;
        }
        (f64::from(frequency) / f64::from(self.saturation_frequency)).min(1.0)
    }
}
