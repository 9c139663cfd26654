//! Schema migrations for the snapshot key-value table.
//!
//! # Responsibility
//! - Create and evolve `kv_entries`, the only table the persistence bridge reads.
//! - Refuse databases whose schema is newer than this binary understands.
//!
//! # Invariants
//! - `kv_entries.key` is the primary key, so one storage key maps to exactly one
//!   serialized snapshot and saves upsert in place.
//! - `kv_entries.value` is opaque text; decoding belongs to `persist::snapshot`.
//! - Migration versions increase by one and are mirrored to `PRAGMA user_version`.
//! - All pending migrations run in one transaction.

use crate::db::{DbError, DbResult};
use log::debug;
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "kv_entries",
    sql: include_str!("0001_kv_entries.sql"),
}];

/// Schema version written by the newest migration in this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Brings `conn` up to [`latest_version`].
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let db_version = user_version(conn)?;
    let latest_supported = latest_version();
    if db_version > latest_supported {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        });
    }

    let pending = MIGRATIONS
        .iter()
        .filter(|migration| migration.version > db_version);
    let tx = conn.transaction()?;
    for migration in pending {
        tx.execute_batch(migration.sql)?;
        tx.pragma_update(None, "user_version", migration.version)?;
        debug!(
            "event=db_migrate module=db status=ok version={} name={}",
            migration.version, migration.name
        );
    }
    tx.commit()?;
    Ok(())
}

fn user_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}
