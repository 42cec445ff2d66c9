//! Absence tracking use-case service.
//!
//! # Responsibility
//! - Combine the category registry and absence store into day-level actions.
//! - Check that new records reference a category that exists right now.
//!
//! # Invariants
//! - Category membership is checked only when a record is created.
//! - Service APIs never bypass store/registry persistence.

use crate::calendar::{CalendarDay, Clock};
use crate::model::record::AbsenceRecord;
use crate::persist::PersistencePort;
use crate::stats::{summarize, StatsSummary};
use crate::store::absence_store::{AbsenceStore, StoreError};
use crate::store::category_registry::{CategoryRegistry, RegistryError};
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type TrackerResult<T> = Result<T, TrackerError>;

/// Use-case level errors.
#[derive(Debug)]
pub enum TrackerError {
    Store(StoreError),
    Registry(RegistryError),
    /// Reason is not a current category.
    UnknownReason(String),
    /// Category list is empty, so there is no default reason.
    NoCategorySelected,
}

impl Display for TrackerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Registry(err) => write!(f, "{err}"),
            Self::UnknownReason(reason) => write!(f, "unknown absence category `{reason}`"),
            Self::NoCategorySelected => write!(f, "no absence category selected"),
        }
    }
}

impl Error for TrackerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Registry(err) => Some(err),
            Self::UnknownReason(_) | Self::NoCategorySelected => None,
        }
    }
}

impl From<StoreError> for TrackerError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<RegistryError> for TrackerError {
    fn from(value: RegistryError) -> Self {
        Self::Registry(value)
    }
}

/// Category registry and absence store loaded from one port.
pub struct AbsenceTracker<P: PersistencePort + Clone> {
    registry: CategoryRegistry<P>,
    store: AbsenceStore<P>,
}

impl<P: PersistencePort + Clone> AbsenceTracker<P> {
    /// Loads categories and records from `port`.
    pub fn open(port: P) -> TrackerResult<Self> {
        let registry = CategoryRegistry::load(port.clone())?;
        let store = AbsenceStore::load(port)?;
        Ok(Self { registry, store })
    }

    /// Saves an absence on `day` using the selected category.
    pub fn record_selected(&mut self, day: CalendarDay) -> TrackerResult<()> {
        let reason = self
            .registry
            .current()
            .filter(|label| !label.is_empty())
            .map(str::to_string)
            .ok_or(TrackerError::NoCategorySelected)?;
        self.store.upsert(day, reason)?;
        Ok(())
    }

    /// Saves an absence on `day` with an explicit category.
    ///
    /// # Errors
    /// - `UnknownReason` when `reason` is not a current category.
    pub fn record(&mut self, day: CalendarDay, reason: &str) -> TrackerResult<()> {
        if !reason.is_empty() && !self.registry.contains(reason) {
            warn!("event=absence_record module=service status=rejected day={day} error_code=unknown_reason");
            return Err(TrackerError::UnknownReason(reason.to_string()));
        }
        self.store.upsert(day, reason)?;
        Ok(())
    }

    /// Clears any absence on `day`.
    pub fn clear(&mut self, day: CalendarDay) -> TrackerResult<()> {
        self.store.remove(day)?;
        Ok(())
    }

    /// Absence on `day`, or `None` when the day was a presence day.
    pub fn status(&self, day: CalendarDay) -> Option<&AbsenceRecord> {
        self.store.find(day)
    }

    pub fn summary(&self, year: i32) -> StatsSummary {
        summarize(self.store.all(), year)
    }

    pub fn summary_for_current_year(&self, clock: &impl Clock) -> StatsSummary {
        self.summary(clock.current_year())
    }

    pub fn registry(&self) -> &CategoryRegistry<P> {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut CategoryRegistry<P> {
        &mut self.registry
    }

    pub fn store(&self) -> &AbsenceStore<P> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut AbsenceStore<P> {
        &mut self.store
    }
}
