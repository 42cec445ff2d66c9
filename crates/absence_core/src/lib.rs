//! Core domain logic for the absence tracker.
//! This crate is the single source of truth for business invariants.

pub mod calendar;
pub mod db;
pub mod logging;
pub mod model;
pub mod persist;
pub mod service;
pub mod stats;
pub mod store;

pub use calendar::{CalendarDay, CalendarError, Clock, FixedClock, SystemClock};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::category::DEFAULT_CATEGORIES;
pub use model::record::AbsenceRecord;
pub use persist::{
    MemoryPort, PersistError, PersistResult, PersistencePort, SqliteKvPort, CATEGORIES_KEY,
    RECORDS_KEY, SELECTED_CATEGORY_KEY,
};
pub use service::tracker_service::{AbsenceTracker, TrackerError, TrackerResult};
pub use stats::{
    monthly_counts, reason_frequency, summarize, top_reason, total_days, ReasonCount,
    StatsSummary,
};
pub use store::absence_store::{AbsenceStore, StoreError, StoreResult};
pub use store::category_registry::{CategoryRegistry, RegistryError, RegistryResult};
