//! Day-keyed absence record store.
//!
//! # Responsibility
//! - Own the absence record collection and its one-record-per-day rule.
//! - Persist the full collection through the port after every mutation.
//!
//! # Invariants
//! - No two records share a calendar day.
//! - Validation failures leave the collection untouched.
//! - A persistence failure is reported after the in-memory change applied.

use crate::calendar::CalendarDay;
use crate::model::record::{AbsenceRecord, StoredRecord};
use crate::persist::{PersistError, PersistencePort, RECORDS_KEY};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Absence store errors.
#[derive(Debug)]
pub enum StoreError {
    /// Reason label was empty; nothing was changed.
    InvalidReason,
    /// Persisted records could not be decoded.
    InvalidData(String),
    /// In-memory change applied, but the write-through failed.
    Persistence(PersistError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidReason => write!(f, "absence reason must not be empty"),
            Self::InvalidData(message) => write!(f, "invalid persisted absence data: {message}"),
            Self::Persistence(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Persistence(err) => Some(err),
            Self::InvalidReason | Self::InvalidData(_) => None,
        }
    }
}

impl From<PersistError> for StoreError {
    fn from(value: PersistError) -> Self {
        Self::Persistence(value)
    }
}

/// Absence records for one person, at most one per calendar day.
pub struct AbsenceStore<P: PersistencePort> {
    port: P,
    records: Vec<AbsenceRecord>,
}

impl<P: PersistencePort> AbsenceStore<P> {
    /// Creates an empty store that writes through `port` without reading it.
    pub fn new(port: P) -> Self {
        Self {
            port,
            records: Vec::new(),
        }
    }

    /// Loads the record collection from `port`.
    ///
    /// A missing blob yields an empty store. Duplicate days in the blob are
    /// collapsed, keeping the later entry.
    pub fn load(port: P) -> StoreResult<Self> {
        let blob = port.get(RECORDS_KEY)?;
        let mut store = Self::new(port);

        let Some(blob) = blob else {
            info!("event=absences_load module=store status=ok source=empty count=0");
            return Ok(store);
        };

        let stored: Vec<StoredRecord> = serde_json::from_str(&blob)
            .map_err(|err| StoreError::InvalidData(format!("records blob: {err}")))?;
        let loaded = stored.len();
        for entry in stored {
            let record = AbsenceRecord::from_stored(entry).map_err(StoreError::InvalidData)?;
            store.replace_day(record);
        }

        if store.records.len() != loaded {
            warn!(
                "event=absences_load module=store status=collapsed loaded={} kept={}",
                loaded,
                store.records.len()
            );
        }
        info!(
            "event=absences_load module=store status=ok source=port count={}",
            store.records.len()
        );
        Ok(store)
    }

    /// Saves an absence for `day`, replacing any record already on that day.
    ///
    /// # Errors
    /// - `InvalidReason` when `reason` is empty; the store is unchanged.
    /// - `Persistence` when the write fails; the new record is kept in memory.
    pub fn upsert(&mut self, day: CalendarDay, reason: impl Into<String>) -> StoreResult<()> {
        let reason = reason.into();
        if reason.is_empty() {
            warn!("event=absence_upsert module=store status=rejected day={day} error_code=invalid_reason");
            return Err(StoreError::InvalidReason);
        }

        let replaced = self.replace_day(AbsenceRecord::new(day, reason));
        info!("event=absence_upsert module=store status=ok day={day} replaced={replaced}");
        self.persist("absence_upsert")
    }

    /// Deletes the absence on `day`. Missing days are not an error.
    pub fn remove(&mut self, day: CalendarDay) -> StoreResult<()> {
        let before = self.records.len();
        self.records.retain(|record| record.day != day);
        let removed = before != self.records.len();
        info!("event=absence_remove module=store status=ok day={day} removed={removed}");
        self.persist("absence_remove")
    }

    /// Looks up the record for `day`.
    pub fn find(&self, day: CalendarDay) -> Option<&AbsenceRecord> {
        self.records.iter().find(|record| record.day == day)
    }

    /// Snapshot of all records. Order carries no meaning.
    pub fn all(&self) -> &[AbsenceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Writes the full collection to the port.
    pub fn save(&self) -> StoreResult<()> {
        let stored: Vec<StoredRecord> = self.records.iter().map(AbsenceRecord::to_stored).collect();
        let blob = serde_json::to_string(&stored).map_err(PersistError::from)?;
        self.port.set(RECORDS_KEY, &blob)?;
        Ok(())
    }

    fn persist(&self, event: &str) -> StoreResult<()> {
        self.save().inspect_err(|err| {
            error!(
                "event={event} module=store status=persist_failed count={} error={err}",
                self.records.len()
            );
        })
    }

    fn replace_day(&mut self, record: AbsenceRecord) -> bool {
        let before = self.records.len();
        self.records.retain(|existing| existing.day != record.day);
        let replaced = before != self.records.len();
        self.records.push(record);
        replaced
    }
}
