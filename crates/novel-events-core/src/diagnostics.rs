//! Structured trace records emitted while building and scoring.
//!
//! Every operation takes a `&mut dyn DiagnosticSink` argument. Results never
//! depend on what the sink does with the records.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::pattern::{Pattern, PatternKey};

/// Which operation dropped an incomplete event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Build,
    Score,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic<'a> {
    SkippedIncomplete {
        stage: Stage,
        title: Option<&'a str>,
    },
    TeachingEvent {
        title: &'a str,
    },
    PatternCounted {
        key: &'a PatternKey,
        count: u32,
    },
    PatternsBuilt {
        patterns: &'a [Pattern],
    },
    Scoring {
        title: &'a str,
        calendar: &'a str,
        start: DateTime<Utc>,
    },
    PatternMatched {
        pattern: &'a Pattern,
        score: f64,
    },
    NoMatch,
    FinalScore {
        score: f64,
    },
    NovelEventsFound {
        count: usize,
    },
}

impl fmt::Display for Diagnostic<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SkippedIncomplete { stage, title } => {
                let what = match stage {
                    Stage::Build => "pattern building",
                    Stage::Score => "scoring",
                };
                write!(
                    f,
                    "Skipping event {:?} in {what}: missing required properties",
                    title.unwrap_or("")
                )
            }
            Self::TeachingEvent { title } => write!(f, "Found teaching event: {title}"),
            Self::PatternCounted { key, count } => {
                write!(f, "Created pattern: {key} (count: {count})")
            }
            Self::PatternsBuilt { patterns } => {
                write!(f, "Created {} patterns:", patterns.len())?;
                for pattern in patterns.iter() {
                    write!(
                        f,
                        "\n- {} ({} occurrences)",
                        pattern.title, pattern.frequency
                    )?;
                }
                Ok(())
            }
            Self::Scoring {
                title,
                calendar,
                start,
            } => write!(f, "Scoring event: {title} [{calendar}] at {start}"),
            Self::PatternMatched { pattern, score } => write!(
                f,
                "- {} (frequency: {}, score: {score:.3})",
                pattern.title, pattern.frequency
            ),
            Self::NoMatch => f.write_str("No matching patterns found"),
            Self::FinalScore { score } => write!(f, "Final score: {score:.3}"),
            Self::NovelEventsFound { count } => write!(f, "Found {count} novel events"),
        }
    }
}

/// Receiver for [`Diagnostic`] records.
pub trait DiagnosticSink {
    fn emit(&mut self, diagnostic: &Diagnostic<'_>);
}

impl<F> DiagnosticSink for F
where
    F: FnMut(&Diagnostic<'_>),
{
    fn emit(&mut self, diagnostic: &Diagnostic<'_>) {
        self(diagnostic)
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn emit(&mut self, _diagnostic: &Diagnostic<'_>) {}
}

/// Forwards every record to `tracing` at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&mut self, diagnostic: &Diagnostic<'_>) {
        tracing::debug!(target: "novel_events::diagnostics", "{diagnostic}");
    }
}
