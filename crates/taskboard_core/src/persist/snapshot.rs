//! Persisted `{ tasks, priorities }` value.

use super::PersistResult;
use crate::model::{default_priorities, Priority, Task};
use serde::{Deserialize, Serialize};

/// Task and priority lists as written to storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub tasks: Vec<Task>,
    pub priorities: Vec<Priority>,
}

impl Default for Snapshot {
    /// Empty task list with the default priorities.
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            priorities: default_priorities(),
        }
    }
}

/// Lenient read shape: either list may be missing or `null`.
#[derive(Deserialize)]
struct StoredSnapshot {
    #[serde(default)]
    tasks: Option<Vec<Task>>,
    #[serde(default)]
    priorities: Option<Vec<Priority>>,
}

impl Snapshot {
    pub fn encode(&self) -> PersistResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decodes a stored payload.
    ///
    /// A missing `tasks` list becomes empty; a missing `priorities` list
    /// becomes the defaults. An explicitly empty priority list stays empty.
    pub fn decode(payload: &str) -> PersistResult<Self> {
        let stored: StoredSnapshot = serde_json::from_str(payload)?;
        Ok(Self {
            tasks: stored.tasks.unwrap_or_default(),
            priorities: stored.priorities.unwrap_or_else(default_priorities),
        })
    }
}
