//! Key-value backends for the snapshot.

use super::{PersistError, PersistResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// String key-value store holding serialized snapshots.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> PersistResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> PersistResult<()>;
}

/// SQLite-backed store over the `kv_entries` table.
///
/// The connection must come from [`crate::db::open_db`] or
/// [`crate::db::open_db_in_memory`] so the table exists.
pub struct SqliteKeyValueStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKeyValueStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl KeyValueStore for SqliteKeyValueStore<'_> {
    fn get(&self, key: &str) -> PersistResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> PersistResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }
}

/// In-memory store. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStore {
    inner: Rc<RefCell<MemoryInner>>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    entries: HashMap<String, String>,
    reject_writes: bool,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `set` fail, simulating an exhausted quota.
    pub fn reject_writes(&self, reject: bool) {
        self.inner.borrow_mut().reject_writes = reject;
    }

    /// Writes a raw value, bypassing write rejection.
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.inner
            .borrow_mut()
            .entries
            .insert(key.to_string(), value.to_string());
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner.borrow().entries.get(key).cloned()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> PersistResult<Option<String>> {
        Ok(self.raw(key))
    }

    fn set(&self, key: &str, value: &str) -> PersistResult<()> {
        let mut inner = self.inner.borrow_mut();
        if inner.reject_writes {
            return Err(PersistError::WriteRejected(format!(
                "memory store is read-only, key `{key}`"
            )));
        }
        inner.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
