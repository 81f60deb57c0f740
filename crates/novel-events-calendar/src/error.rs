//! Error types for the calendar boundary.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("calendar access denied")]
    AccessDenied,

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse calendar export {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("days to look ahead must be greater than 0, got {0}")]
    InvalidLookAhead(i64),
}
