//! SQLite-backed blob storage over the `kv_entries` table.
//!
//! # Invariants
//! - Each `set` is a single upsert statement, so a failed write leaves the
//!   previous row intact.
//! - The connection must come from `db::open_db*` (migrations applied).

use super::{PersistResult, PersistencePort};
use rusqlite::{params, Connection, OptionalExtension};

/// Port writing blobs as rows keyed by blob key.
#[derive(Clone, Copy)]
pub struct SqliteKvPort<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKvPort<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl PersistencePort for SqliteKvPort<'_> {
    fn get(&self, key: &str) -> PersistResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, blob: &str) -> PersistResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, blob],
        )?;
        Ok(())
    }
}
