//! novel-events: report upcoming calendar events that break your routine.
//! Single synchronous binary: load config, read the calendar export, analyze,
//! write the report.

use anyhow::Context;
use clap::Parser;
use novel_events_calendar::JsonEventStore;

mod cli;
mod config;
mod report;
mod run;

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    let default_level = if args.debug { "debug" } else { "info" };
    let filter = std::env::var("NOVEL_EVENTS_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| default_level.to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    let config = config::RunConfig::resolve(&args).context("invalid configuration")?;
    tracing::info!(
        events_file = %config.events_file.display(),
        days = config.days_to_look_ahead,
        threshold = config.threshold,
        "novel-events starting"
    );

    let store = JsonEventStore::open(&config.events_file)
        .context("failed to load calendar export")?;
    let summary = run::run(&config, store, chrono::Local, chrono::Utc::now())?;

    tracing::info!(
        historical = summary.historical_events,
        patterns = summary.patterns,
        upcoming = summary.upcoming_events,
        novel = summary.novel_events,
        "analysis complete"
    );
    println!("Results written to: {}", summary.output.display());
    Ok(())
}
