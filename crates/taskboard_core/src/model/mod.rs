//! Task and priority domain model.
//!
//! # Responsibility
//! - Define the records owned by the task store.
//! - Provide field-level validation shared by store transitions and load paths.
//!
//! # Invariants
//! - Task ids and priority ids are unique within their lists.
//! - A task never references a priority id missing from the priority list.
//!
//! # See also
//! - crate::store::reducer

pub mod priority;
pub mod task;

use std::error::Error;
use std::fmt::{Display, Formatter};

pub use priority::{
    default_priorities, slugify_priority_id, sort_priorities, Priority, PriorityId, PriorityPatch,
};
pub use task::{NewTask, Task, TaskId, TaskPatch};

/// Field-level validation failures for tasks and priorities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Task title is empty after trimming.
    EmptyTitle,
    /// Priority id is empty after trimming.
    EmptyPriorityId,
    /// Priority label is empty after trimming.
    EmptyPriorityLabel,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "task title cannot be empty"),
            Self::EmptyPriorityId => write!(f, "priority id cannot be empty"),
            Self::EmptyPriorityLabel => write!(f, "priority label cannot be empty"),
        }
    }
}

impl Error for ValidationError {}
