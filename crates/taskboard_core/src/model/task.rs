//! Task record and its edit payloads.
//!
//! # Invariants
//! - `id` is generated once and never reused for another task.
//! - `created_at` is fixed at creation; edits never touch it.
//! - `title` is non-empty after trimming.

use super::priority::PriorityId;
use super::ValidationError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable task identifier.
///
/// Kept as a string because persisted snapshots may carry ids that are not
/// UUIDs (for example ids written by older clients).
pub type TaskId = String;

/// User-created to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub completed: bool,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_id: Option<PriorityId>,
}

impl Task {
    /// Builds a task with a generated UUID v4 id.
    pub fn create(new_task: NewTask, created_at: i64) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), new_task, created_at)
    }

    /// Builds a task with a caller-provided id.
    pub fn with_id(id: impl Into<TaskId>, new_task: NewTask, created_at: i64) -> Self {
        Self {
            id: id.into(),
            title: new_task.title.trim().to_string(),
            completed: new_task.completed,
            created_at,
            priority_id: new_task.priority_id,
        }
    }

    /// Validates record-level invariants.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        Ok(())
    }

    /// Merges the set fields of `patch` into this task.
    ///
    /// Returns `true` when any field actually changed.
    pub fn apply_patch(&mut self, patch: &TaskPatch) -> bool {
        let before = self.clone();
        if let Some(title) = &patch.title {
            self.title = title.trim().to_string();
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        if let Some(priority_id) = &patch.priority_id {
            self.priority_id = priority_id.clone();
        }
        *self != before
    }
}

/// Input for the add-task operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub completed: bool,
    pub priority_id: Option<PriorityId>,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    pub fn priority(mut self, priority_id: impl Into<PriorityId>) -> Self {
        self.priority_id = Some(priority_id.into());
        self
    }
}

/// Partial task update. `None` leaves a field untouched.
///
/// `priority_id: Some(None)` clears the priority reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub completed: Option<bool>,
    pub priority_id: Option<Option<PriorityId>>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.completed.is_none() && self.priority_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::{NewTask, Task, TaskPatch};

    #[test]
    fn create_trims_title_and_generates_id() {
        let task = Task::create(NewTask::new("  write report  "), 42);
        assert_eq!(task.title, "write report");
        assert_eq!(task.created_at, 42);
        assert!(!task.id.is_empty());
    }

    #[test]
    fn apply_patch_reports_changes_only_when_fields_differ() {
        let mut task = Task::with_id("t1", NewTask::new("draft"), 1);

        assert!(!task.apply_patch(&TaskPatch {
            title: Some("draft".to_string()),
            ..TaskPatch::default()
        }));
        assert!(task.apply_patch(&TaskPatch {
            completed: Some(true),
            priority_id: Some(Some("high".to_string())),
            ..TaskPatch::default()
        }));
        assert!(task.completed);
        assert_eq!(task.priority_id.as_deref(), Some("high"));

        assert!(task.apply_patch(&TaskPatch {
            priority_id: Some(None),
            ..TaskPatch::default()
        }));
        assert_eq!(task.priority_id, None);
    }
}
