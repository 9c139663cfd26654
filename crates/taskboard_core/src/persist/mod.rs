//! Persistence bridge between the task store and a key-value backend.
//!
//! # Responsibility
//! - Define the key-value contract the snapshot is written through.
//! - Encode/decode the `{ tasks, priorities }` snapshot.
//! - Recover locally from storage failures: defaults on load, dropped writes on save.
//!
//! # Invariants
//! - The whole snapshot is rewritten on every save; there are no partial diffs.
//! - Load never fails from the caller's point of view.
//! - The derived filtered view is never persisted.

mod bridge;
mod kv;
mod snapshot;

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub use bridge::{Persistence, SnapshotBridge, DEFAULT_STORAGE_KEY};
pub use kv::{KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore};
pub use snapshot::Snapshot;

pub type PersistResult<T> = Result<T, PersistError>;

/// Failure while reading or writing the persisted snapshot.
#[derive(Debug)]
pub enum PersistError {
    /// Backend storage is unavailable or rejected the operation.
    Storage(DbError),
    /// Stored payload could not be decoded, or the snapshot could not be encoded.
    Codec(serde_json::Error),
    /// Backend refused the write (e.g. quota, read-only store).
    WriteRejected(String),
}

impl Display for PersistError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "{err}"),
            Self::Codec(err) => write!(f, "invalid snapshot payload: {err}"),
            Self::WriteRejected(reason) => write!(f, "write rejected: {reason}"),
        }
    }
}

impl Error for PersistError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::Codec(err) => Some(err),
            Self::WriteRejected(_) => None,
        }
    }
}

impl From<DbError> for PersistError {
    fn from(value: DbError) -> Self {
        Self::Storage(value)
    }
}

impl From<rusqlite::Error> for PersistError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Storage(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(value: serde_json::Error) -> Self {
        Self::Codec(value)
    }
}
