//! Timestamp identifiers for new notes
//!
//! A `TimestampId` is the local wall time formatted as `YYYYMMDDHHMMSS`. It is
//! both the file stem of the new note and the target of the back-link. Two
//! extractions in the same second produce the same id; nothing here retries.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::traits::Clock;

const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Width of an id for years 0000..=9999
pub const TIMESTAMP_ID_LEN: usize = 14;

/// Sortable, second-resolution note identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimestampId(String);

impl TimestampId {
    /// Format a local wall-clock reading
    pub fn from_datetime(at: &NaiveDateTime) -> Self {
        Self(at.format(TIMESTAMP_FORMAT).to_string())
    }

    /// Read the clock and format the result
    pub fn now(clock: &dyn Clock) -> Self {
        Self::from_datetime(&clock.now())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name for this id, e.g. `20240131093005.md`
    pub fn file_name(&self, extension: &str) -> String {
        let extension = extension.trim_start_matches('.');
        if extension.is_empty() {
            self.0.clone()
        } else {
            format!("{}.{}", self.0, extension)
        }
    }
}

impl fmt::Display for TimestampId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TimestampId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Clock backed by the system's local time zone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}
