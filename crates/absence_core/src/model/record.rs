//! Absence record model and its persisted shape.
//!
//! # Responsibility
//! - Define the in-memory absence record keyed by calendar day.
//! - Map records to and from the JSON shape stored under the records key.
//!
//! # Invariants
//! - `date` is authoritative when decoding; `month`/`year` are written for
//!   external readers and ignored on read.
//! - Legacy date-time values are read in the local calendar, the same one
//!   `month`/`year` were derived from when they were written.
//! - Decoding rejects unparseable dates instead of masking them.

use crate::calendar::CalendarDay;
use serde::{Deserialize, Serialize};

/// One day marked as absent, with the reason label it was saved under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbsenceRecord {
    pub day: CalendarDay,
    /// Label text at creation time. May outlive the category it came from.
    pub reason: String,
}

impl AbsenceRecord {
    pub fn new(day: CalendarDay, reason: impl Into<String>) -> Self {
        Self {
            day,
            reason: reason.into(),
        }
    }

    /// Zero-based month of `day`.
    pub fn month0(&self) -> u32 {
        self.day.month0()
    }

    pub fn year(&self) -> i32 {
        self.day.year()
    }

    pub(crate) fn to_stored(&self) -> StoredRecord {
        StoredRecord {
            date: self.day.to_iso_string(),
            reason: self.reason.clone(),
            month: Some(self.month0()),
            year: Some(self.year()),
        }
    }

    pub(crate) fn from_stored(stored: StoredRecord) -> Result<Self, String> {
        let day = CalendarDay::parse(&stored.date)
            .map_err(|err| format!("record date `{}`: {err}", stored.date))?;
        Ok(Self {
            day,
            reason: stored.reason,
        })
    }
}

/// Persisted JSON form of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct StoredRecord {
    pub date: String,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}
