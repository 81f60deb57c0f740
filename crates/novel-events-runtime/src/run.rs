//! One end-to-end run: access, history, patterns, upcoming, novelty, report.

use std::path::PathBuf;

use anyhow::Context;
use chrono::{DateTime, TimeZone, Utc};
use novel_events_calendar::{CalendarManager, EventStore};
use novel_events_core::{
    Diagnostic, DiagnosticSink, NoveltyAnalyzer, PatternDetector, TracingSink,
};

use crate::config::RunConfig;
use crate::report::ReportFormatter;

/// Diagnostic sink for the binary: always forwards to `tracing`, and keeps
/// the rendered lines for the report when debug output is on.
#[derive(Debug, Default)]
pub struct DebugLog {
    enabled: bool,
    lines: Vec<String>,
}

impl DebugLog {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            lines: Vec::new(),
        }
    }

    pub fn note(&mut self, line: impl Into<String>) {
        let line = line.into();
        tracing::debug!("{line}");
        if self.enabled {
            self.lines.push(line);
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl DiagnosticSink for DebugLog {
    fn emit(&mut self, diagnostic: &Diagnostic<'_>) {
        TracingSink.emit(diagnostic);
        if self.enabled {
            self.lines.push(diagnostic.to_string());
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub output: PathBuf,
    pub historical_events: usize,
    pub patterns: usize,
    pub upcoming_events: usize,
    pub novel_events: usize,
}

/// Execute the pipeline against `store`, writing the report to
/// `config.output`. The first failing step aborts the run.
pub fn run<S, Tz>(
    config: &RunConfig,
    store: S,
    tz: Tz,
    now: DateTime<Utc>,
) -> anyhow::Result<RunSummary>
where
    S: EventStore,
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let mut log = DebugLog::new(config.debug);
    let manager = CalendarManager::new(store, config.filter.clone())
        .with_days_to_look_ahead(i64::from(config.days_to_look_ahead))
        .context("invalid look-ahead window")?;

    let statuses = manager
        .request_access()
        .context("calendar access failed")?;
    log.note("Available calendars:");
    for (calendar, status) in &statuses {
        log.note(format!("- {} ({status})", calendar.title));
    }

    let historical = manager
        .fetch_historical(now)
        .context("failed to fetch historical events")?;
    log.note(format!("Fetched {} historical events", historical.len()));

    let analyzer =
        NoveltyAnalyzer::new(PatternDetector::new(tz.clone())).with_threshold(config.threshold);
    let patterns = analyzer.detector().build(&historical, &mut log);

    let upcoming = manager
        .fetch_upcoming(now)
        .context("failed to fetch upcoming events")?;
    log.note(format!("Fetched {} upcoming events", upcoming.len()));

    let novel = analyzer.find_novel_events(&upcoming, &patterns, &mut log);

    let report = ReportFormatter::new(tz, config.debug).format(
        &novel,
        manager.days_to_look_ahead(),
        now,
        log.lines(),
    );
    std::fs::write(&config.output, report)
        .with_context(|| format!("failed to write report to {}", config.output.display()))?;

    Ok(RunSummary {
        output: config.output.clone(),
        historical_events: historical.len(),
        patterns: patterns.len(),
        upcoming_events: upcoming.len(),
        novel_events: novel.len(),
    })
}
