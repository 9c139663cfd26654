//! Snapshot load/save through a key-value store under one fixed key.

use super::{KeyValueStore, PersistResult, Snapshot};
use log::{info, warn};
use std::time::Instant;

/// Key used when no other is configured.
pub const DEFAULT_STORAGE_KEY: &str = "todo-app-react-data";

/// What the task store needs from persistence.
pub trait Persistence {
    /// Returns the last saved snapshot, or defaults when none is usable.
    fn load(&self) -> Snapshot;
    /// Rewrites the whole snapshot.
    fn save(&self, snapshot: &Snapshot) -> PersistResult<()>;
}

/// Reads and writes the snapshot as JSON under one key.
pub struct SnapshotBridge<S: KeyValueStore> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> SnapshotBridge<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Strict load: `Ok(None)` when nothing was ever saved.
    pub fn try_load(&self) -> PersistResult<Option<Snapshot>> {
        match self.store.get(&self.key)? {
            Some(payload) => Ok(Some(Snapshot::decode(&payload)?)),
            None => Ok(None),
        }
    }
}

impl<S: KeyValueStore> Persistence for SnapshotBridge<S> {
    fn load(&self) -> Snapshot {
        match self.try_load() {
            Ok(Some(snapshot)) => {
                info!(
                    "event=snapshot_load module=persist status=ok tasks={} priorities={}",
                    snapshot.tasks.len(),
                    snapshot.priorities.len()
                );
                snapshot
            }
            Ok(None) => {
                info!("event=snapshot_load module=persist status=empty fallback=defaults");
                Snapshot::default()
            }
            Err(err) => {
                warn!(
                    "event=snapshot_load module=persist status=error fallback=defaults error={err}"
                );
                Snapshot::default()
            }
        }
    }

    fn save(&self, snapshot: &Snapshot) -> PersistResult<()> {
        let started_at = Instant::now();
        let payload = snapshot.encode()?;
        self.store.set(&self.key, &payload)?;
        info!(
            "event=snapshot_save module=persist status=ok bytes={} duration_ms={}",
            payload.len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }
}
