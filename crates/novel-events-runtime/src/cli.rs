//! CLI definition using clap derive.

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "novel-events",
    version,
    about = "Extract novel events from your calendar.",
    long_about = "Analyzes your calendar events to identify novel or unusual events based on patterns.\n\
                  Events that don't match regular patterns are considered novel."
)]
pub struct Cli {
    /// Number of days to look ahead for events (default: 14)
    #[arg(short = 'd', long, value_parser = parse_days, allow_negative_numbers = true)]
    pub days_to_look_ahead: Option<u32>,

    /// Path to file containing blacklisted calendar names
    #[arg(short = 'B', long)]
    pub blacklist_file: Option<PathBuf>,

    /// Comma-separated list of blacklisted calendar names
    #[arg(short = 'b', long)]
    pub blacklist: Option<String>,

    /// Path to file containing whitelisted calendar names
    #[arg(short = 'W', long)]
    pub whitelist_file: Option<PathBuf>,

    /// Calendar names to whitelist (comma-separated)
    #[arg(short = 'w', long)]
    pub whitelist: Option<String>,

    /// Enable debug output
    #[arg(short = 'D', long)]
    pub debug: bool,

    /// JSON calendar export to read events from
    #[arg(short = 'e', long, env = "NOVEL_EVENTS_FILE")]
    pub events_file: Option<PathBuf>,

    /// Where to write the report (default: novel_events.txt)
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Pattern score below which an event counts as novel (default: 0.2)
    #[arg(short = 't', long, value_parser = parse_threshold)]
    pub threshold: Option<f64>,

    /// TOML config file; explicit flags take precedence
    #[arg(short = 'c', long, env = "NOVEL_EVENTS_CONFIG")]
    pub config: Option<PathBuf>,
}

fn parse_days(value: &str) -> Result<u32, String> {
    let days: i64 = value
        .trim()
        .parse()
        .map_err(|_| "Days to look ahead must be a valid number".to_string())?;
    if days <= 0 {
        return Err("Days to look ahead must be greater than 0".to_string());
    }
    u32::try_from(days).map_err(|_| "Days to look ahead is too large".to_string())
}

fn parse_threshold(value: &str) -> Result<f64, String> {
    let threshold: f64 = value
        .trim()
        .parse()
        .map_err(|_| "Threshold must be a number".to_string())?;
    if !(0.0..=1.0).contains(&threshold) {
        return Err("Threshold must be between 0 and 1".to_string());
    }
    Ok(threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("novel-events").chain(args.iter().copied()))
    }

    #[test]
    fn defaults_are_unset() {
        let cli = parse(&[]).expect("parse");
        assert!(cli.days_to_look_ahead.is_none());
        assert!(cli.threshold.is_none());
        assert!(cli.output.is_none());
        assert!(!cli.debug);
    }

    #[test]
    fn short_flags() {
        let cli = parse(&[
            "-d", "7", "-b", "Birthdays", "-B", "deny.txt", "-w", "Work", "-W", "allow.txt", "-D",
            "-o", "out.txt", "-t", "0.5",
        ])
        .expect("parse");
        assert_eq!(cli.days_to_look_ahead, Some(7));
        assert_eq!(cli.blacklist.as_deref(), Some("Birthdays"));
        assert_eq!(cli.blacklist_file, Some(PathBuf::from("deny.txt")));
        assert_eq!(cli.whitelist.as_deref(), Some("Work"));
        assert_eq!(cli.whitelist_file, Some(PathBuf::from("allow.txt")));
        assert!(cli.debug);
        assert_eq!(cli.output, Some(PathBuf::from("out.txt")));
        assert_eq!(cli.threshold, Some(0.5));
    }

    #[test]
    fn long_flags() {
        let cli = parse(&["--days-to-look-ahead", "30", "--debug"]).expect("parse");
        assert_eq!(cli.days_to_look_ahead, Some(30));
        assert!(cli.debug);
    }

    #[test]
    fn rejects_non_positive_days() {
        let err = parse(&["-d", "0"]).expect_err("zero days");
        assert!(err.to_string().contains("greater than 0"));
        let err = parse(&["-d", "-5"]).expect_err("negative days");
        assert!(err.to_string().contains("greater than 0"));
    }

    #[test]
    fn rejects_non_numeric_days() {
        let err = parse(&["-d", "soon"]).expect_err("not a number");
        assert!(err.to_string().contains("valid number"));
    }

    #[test]
    fn threshold_must_be_a_fraction() {
        assert!(parse(&["-t", "1.5"]).is_err());
        assert!(parse(&["-t", "abc"]).is_err());
        assert_eq!(parse(&["-t", "0"]).expect("zero").threshold, Some(0.0));
        assert_eq!(parse(&["-t", "1"]).expect("one").threshold, Some(1.0));
    }
}
