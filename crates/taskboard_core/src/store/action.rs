use crate::filter::DateFilter;
use crate::model::{Priority, PriorityId, PriorityPatch, Task, TaskId, TaskPatch};

/// One state mutation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskAction {
    /// Prepends a fully built task (id and timestamp already assigned).
    AddTask(Task),
    ToggleTask(TaskId),
    DeleteTask(TaskId),
    UpdateTask { id: TaskId, patch: TaskPatch },
    SetDateFilter(DateFilter),
    AddPriority(Priority),
    UpdatePriority {
        id: PriorityId,
        patch: PriorityPatch,
    },
    DeletePriority(PriorityId),
    /// Replaces tasks and priorities wholesale.
    Load {
        tasks: Vec<Task>,
        priorities: Vec<Priority>,
    },
}

impl TaskAction {
    /// Short stable name used in log events.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AddTask(_) => "add_task",
            Self::ToggleTask(_) => "toggle_task",
            Self::DeleteTask(_) => "delete_task",
            Self::UpdateTask { .. } => "update_task",
            Self::SetDateFilter(_) => "set_date_filter",
            Self::AddPriority(_) => "add_priority",
            Self::UpdatePriority { .. } => "update_priority",
            Self::DeletePriority(_) => "delete_priority",
            Self::Load { .. } => "load",
        }
    }
}

/// What a [`super::reduce`] call changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Transition {
    /// Tasks or priorities changed; the snapshot needs saving.
    pub data_changed: bool,
    /// The active date filter changed.
    pub filter_changed: bool,
}

impl Transition {
    pub(crate) const NOOP: Self = Self {
        data_changed: false,
        filter_changed: false,
    };

    pub(crate) const DATA: Self = Self {
        data_changed: true,
        filter_changed: false,
    };

    pub(crate) const FILTER: Self = Self {
        data_changed: false,
        filter_changed: true,
    };

    pub fn is_noop(&self) -> bool {
        !self.data_changed && !self.filter_changed
    }
}
