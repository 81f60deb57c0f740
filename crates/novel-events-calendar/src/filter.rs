//! Calendar allow/deny lists.

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use crate::error::CalendarError;

/// How a calendar fares against the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarStatus {
    Blacklisted,
    Whitelisted,
    Excluded,
    Included,
}

impl CalendarStatus {
    pub fn admits(self) -> bool {
        matches!(self, Self::Whitelisted | Self::Included)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Blacklisted => "blacklisted",
            Self::Whitelisted => "whitelisted",
            Self::Excluded => "excluded",
            Self::Included => "included",
        }
    }
}

impl fmt::Display for CalendarStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Blacklist always wins. A whitelist, once any entry is added, admits only
/// its own names; without one every non-blacklisted calendar is admitted.
/// Names compare exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalendarFilter {
    blacklist: BTreeSet<String>,
    whitelist: Option<BTreeSet<String>>,
}

impl CalendarFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blacklist(&self) -> &BTreeSet<String> {
        &self.blacklist
    }

    pub fn whitelist(&self) -> Option<&BTreeSet<String>> {
        self.whitelist.as_ref()
    }

    pub fn add_blacklisted<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.blacklist.extend(names.into_iter().map(Into::into));
    }

    /// Adding an empty iterator still switches the filter to whitelist mode.
    pub fn add_whitelisted<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.whitelist
            .get_or_insert_with(BTreeSet::new)
            .extend(names.into_iter().map(Into::into));
    }

    /// `"Work, Family"` style list.
    pub fn add_blacklist_csv(&mut self, csv: &str) {
        self.add_blacklisted(parse_csv(csv));
    }

    pub fn add_whitelist_csv(&mut self, csv: &str) {
        self.add_whitelisted(parse_csv(csv));
    }

    /// One calendar name per line; empty lines are ignored.
    pub fn add_blacklist_file(&mut self, path: &Path) -> Result<(), CalendarError> {
        let names = read_list_file(path)?;
        self.add_blacklisted(names);
        Ok(())
    }

    pub fn add_whitelist_file(&mut self, path: &Path) -> Result<(), CalendarError> {
        let names = read_list_file(path)?;
        self.add_whitelisted(names);
        Ok(())
    }

    pub fn status(&self, calendar: &str) -> CalendarStatus {
        if self.blacklist.contains(calendar) {
            return CalendarStatus::Blacklisted;
        }
        match &self.whitelist {
            Some(allowed) if allowed.contains(calendar) => CalendarStatus::Whitelisted,
            Some(_) => CalendarStatus::Excluded,
            None => CalendarStatus::Included,
        }
    }

    pub fn admits(&self, calendar: &str) -> bool {
        self.status(calendar).admits()
    }

    /// Whether an event from `calendar` belongs in a query. Events with no
    /// calendar only pass when no whitelist is active.
    pub fn admits_event(&self, calendar: Option<&str>) -> bool {
        match calendar {
            Some(name) => self.admits(name),
            None => self.whitelist.is_none(),
        }
    }
}

/// Split on commas, trim whitespace, drop empties.
pub fn parse_csv(csv: &str) -> Vec<String> {
    csv.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split on newlines, drop empty lines. Names are otherwise kept verbatim.
pub fn parse_lines(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn read_list_file(path: &Path) -> Result<Vec<String>, CalendarError> {
    let text = std::fs::read_to_string(path).map_err(|source| CalendarError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_lines(&text))
}
