//! Key-value persistence port and its adapters.
//!
//! # Responsibility
//! - Define the blob-level contract the store and registry persist through.
//! - Provide an in-process adapter and a SQLite-backed adapter.
//!
//! # Invariants
//! - A `set` either replaces the whole blob for a key or leaves the previous
//!   blob untouched.
//! - Adapters never interpret blob contents.

mod memory_port;
mod sqlite_port;

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub use memory_port::MemoryPort;
pub use sqlite_port::SqliteKvPort;

/// Key holding the JSON array of absence records.
pub const RECORDS_KEY: &str = "work_absences";
/// Key holding the JSON array of category labels.
pub const CATEGORIES_KEY: &str = "work_reasons";
/// Key holding the JSON string (or `null`) of the selected category.
pub const SELECTED_CATEGORY_KEY: &str = "work_selected_reason";

pub type PersistResult<T> = Result<T, PersistError>;

/// Blob read/write failures.
#[derive(Debug)]
pub enum PersistError {
    Db(DbError),
    Serialize(serde_json::Error),
    /// Adapter-specific failure with no richer source.
    Backend(String),
}

impl Display for PersistError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "persistence write failed: {err}"),
            Self::Serialize(err) => write!(f, "failed to serialize blob: {err}"),
            Self::Backend(message) => write!(f, "persistence write failed: {message}"),
        }
    }
}

impl Error for PersistError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialize(err) => Some(err),
            Self::Backend(_) => None,
        }
    }
}

impl From<DbError> for PersistError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for PersistError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// Opaque blob storage used by `AbsenceStore` and `CategoryRegistry`.
pub trait PersistencePort {
    fn get(&self, key: &str) -> PersistResult<Option<String>>;
    fn set(&self, key: &str, blob: &str) -> PersistResult<()>;
}

impl<P: PersistencePort + ?Sized> PersistencePort for &P {
    fn get(&self, key: &str) -> PersistResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, blob: &str) -> PersistResult<()> {
        (**self).set(key, blob)
    }
}
