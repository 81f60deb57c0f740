//! Run configuration: CLI flags layered over an optional TOML file.
//!
//! Precedence is flag > file > default. Calendar lists from every source
//! are unioned rather than overridden.

use std::path::{Path, PathBuf};

use novel_events_calendar::{CalendarError, CalendarFilter, DEFAULT_DAYS_TO_LOOK_AHEAD};
use novel_events_core::DEFAULT_NOVELTY_THRESHOLD;
use serde::Deserialize;
use thiserror::Error;

use crate::cli::Cli;

pub const DEFAULT_OUTPUT_PATH: &str = "novel_events.txt";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Days to look ahead must be greater than 0, got {0}")]
    InvalidLookAhead(i64),

    #[error("novelty threshold must be between 0 and 1, got {0}")]
    InvalidThreshold(f64),

    #[error("no calendar export given: pass --events-file, set NOVEL_EVENTS_FILE, or set events_file in the config")]
    MissingEventsFile,

    #[error(transparent)]
    Calendar(#[from] CalendarError),
}

/// Contents of the TOML config file. Every key is optional.
///
/// ```toml
/// events_file = "calendar.json"
/// days_to_look_ahead = 21
/// novelty_threshold = 0.25
/// blacklist = ["Birthdays", "US Holidays"]
/// whitelist_file = "calendars.txt"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub events_file: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub days_to_look_ahead: Option<i64>,
    pub novelty_threshold: Option<f64>,
    pub debug: Option<bool>,
    pub blacklist: Vec<String>,
    pub blacklist_file: Option<PathBuf>,
    pub whitelist: Option<Vec<String>>,
    pub whitelist_file: Option<PathBuf>,
}

impl FileConfig {
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub events_file: PathBuf,
    pub output: PathBuf,
    pub days_to_look_ahead: u32,
    pub threshold: f64,
    pub debug: bool,
    pub filter: CalendarFilter,
}

impl RunConfig {
    /// Load the config file named by `cli` (if any) and merge.
    pub fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Self::merge(cli, file)
    }

    pub fn merge(cli: &Cli, file: FileConfig) -> Result<Self, ConfigError> {
        let days = match (cli.days_to_look_ahead, file.days_to_look_ahead) {
            (Some(days), _) => days,
            (None, Some(days)) => u32::try_from(days)
                .ok()
                .filter(|d| *d > 0)
                .ok_or(ConfigError::InvalidLookAhead(days))?,
            (None, None) => DEFAULT_DAYS_TO_LOOK_AHEAD,
        };

        let threshold = cli
            .threshold
            .or(file.novelty_threshold)
            .unwrap_or(DEFAULT_NOVELTY_THRESHOLD);
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::InvalidThreshold(threshold));
        }

        let events_file = cli
            .events_file
            .clone()
            .or(file.events_file)
            .ok_or(ConfigError::MissingEventsFile)?;

        let mut filter = CalendarFilter::new();
        filter.add_blacklisted(file.blacklist);
        if let Some(path) = &file.blacklist_file {
            filter.add_blacklist_file(path)?;
        }
        if let Some(path) = &cli.blacklist_file {
            filter.add_blacklist_file(path)?;
        }
        if let Some(csv) = &cli.blacklist {
            filter.add_blacklist_csv(csv);
        }
        if let Some(names) = file.whitelist {
            filter.add_whitelisted(names);
        }
        if let Some(path) = &file.whitelist_file {
            filter.add_whitelist_file(path)?;
        }
        if let Some(path) = &cli.whitelist_file {
            filter.add_whitelist_file(path)?;
        }
        if let Some(csv) = &cli.whitelist {
            filter.add_whitelist_csv(csv);
        }

        Ok(Self {
            events_file,
            output: cli
                .output
                .clone()
                .or(file.output)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH)),
            days_to_look_ahead: days,
            threshold,
            debug: cli.debug || file.debug.unwrap_or(false),
            filter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(
            ["novel-events", "--events-file", "cal.json"]
                .into_iter()
                .chain(args.iter().copied()),
        )
        .expect("parse")
    }

    #[test]
    fn defaults_without_file() {
        let config = RunConfig::merge(&cli(&[]), FileConfig::default()).expect("merge");
        assert_eq!(config.days_to_look_ahead, 14);
        assert_eq!(config.threshold, 0.2);
        assert_eq!(config.output, PathBuf::from("novel_events.txt"));
        assert_eq!(config.events_file, PathBuf::from("cal.json"));
        assert!(!config.debug);
        assert!(config.filter.whitelist().is_none());
    }

    #[test]
    fn flags_override_file() {
        let file = FileConfig::from_toml(
            r#"
            events_file = "other.json"
            days_to_look_ahead = 30
            novelty_threshold = 0.5
            output = "file-report.txt"
            "#,
        )
        .expect("toml");
        let config = RunConfig::merge(&cli(&["-d", "7", "-o", "flag-report.txt"]), file)
            .expect("merge");
        assert_eq!(config.days_to_look_ahead, 7);
        assert_eq!(config.threshold, 0.5);
        assert_eq!(config.output, PathBuf::from("flag-report.txt"));
        assert_eq!(config.events_file, PathBuf::from("cal.json"));
    }

    #[test]
    fn lists_are_unioned() {
        let file = FileConfig::from_toml(
            r#"
            blacklist = ["Birthdays"]
            whitelist = ["Work"]
            "#,
        )
        .expect("toml");
        let config =
            RunConfig::merge(&cli(&["-b", "Holidays", "-w", "Personal"]), file).expect("merge");
        assert!(!config.filter.admits("Birthdays"));
        assert!(!config.filter.admits("Holidays"));
        assert!(config.filter.admits("Work"));
        assert!(config.filter.admits("Personal"));
        assert!(!config.filter.admits("Gym"));
    }

    #[test]
    fn file_values_are_validated() {
        let bad_days = FileConfig {
            days_to_look_ahead: Some(0),
            ..FileConfig::default()
        };
        assert!(matches!(
            RunConfig::merge(&cli(&[]), bad_days),
            Err(ConfigError::InvalidLookAhead(0))
        ));

        let bad_threshold = FileConfig {
            novelty_threshold: Some(2.0),
            ..FileConfig::default()
        };
        assert!(matches!(
            RunConfig::merge(&cli(&[]), bad_threshold),
            Err(ConfigError::InvalidThreshold(_))
        ));
    }

    #[test]
    fn events_file_is_required() {
        let bare = Cli {
            days_to_look_ahead: None,
            blacklist_file: None,
            blacklist: None,
            whitelist_file: None,
            whitelist: None,
            debug: false,
            events_file: None,
            output: None,
            threshold: None,
            config: None,
        };
        assert!(matches!(
            RunConfig::merge(&bare, FileConfig::default()),
            Err(ConfigError::MissingEventsFile)
        ));

        let from_file = FileConfig {
            events_file: Some(PathBuf::from("exported.json")),
            ..FileConfig::default()
        };
        let config = RunConfig::merge(&bare, from_file).expect("merge");
        assert_eq!(config.events_file, PathBuf::from("exported.json"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(FileConfig::from_toml("lookahead = 3").is_err());
    }

    #[test]
    fn resolve_reads_config_file() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "debug = true").expect("write");
        writeln!(file, "novelty_threshold = 0.3").expect("write");
        let path = file.path().to_string_lossy().into_owned();

        let config = RunConfig::resolve(&cli(&["-c", path.as_str()])).expect("resolve");
        assert!(config.debug);
        assert_eq!(config.threshold, 0.3);
    }

    #[test]
    fn missing_config_file_is_read_error() {
        let err = RunConfig::resolve(&cli(&["-c", "/nonexistent/novel-events.toml"]))
            .expect_err("should fail");
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
