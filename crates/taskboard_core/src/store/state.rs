use crate::filter::{filter_tasks, DateFilter, WeekStart};
use crate::model::{default_priorities, Priority, Task};
use chrono::{DateTime, TimeZone};

/// Completion counts for the filtered view.
///
/// `total`, `completed` and `remaining` describe only the visible tasks;
/// `stored` counts every task regardless of the active filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskSummary {
    pub total: usize,
    pub completed: usize,
    pub remaining: usize,
    pub stored: usize,
}

impl TaskSummary {
    fn of(visible: &[Task], stored: usize) -> Self {
        let completed = visible.iter().filter(|task| task.completed).count();
        Self {
            total: visible.len(),
            completed,
            remaining: visible.len() - completed,
            stored,
        }
    }
}

/// Store contents plus the views derived from them.
///
/// Only the reducer mutates the source fields; `filtered_tasks` and
/// `summary` are rebuilt by [`TaskState::derive`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskState {
    pub(crate) tasks: Vec<Task>,
    pub(crate) priorities: Vec<Priority>,
    pub(crate) date_filter: DateFilter,
    filtered_tasks: Vec<Task>,
    summary: TaskSummary,
}

impl Default for TaskState {
    /// No tasks, default priorities, `All` filter.
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            priorities: default_priorities(),
            date_filter: DateFilter::All,
            filtered_tasks: Vec::new(),
            summary: TaskSummary::default(),
        }
    }
}

impl TaskState {
    /// Tasks in display order (newest first unless loaded otherwise).
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Priorities sorted by `order` ascending.
    pub fn priorities(&self) -> &[Priority] {
        &self.priorities
    }

    pub fn date_filter(&self) -> &DateFilter {
        &self.date_filter
    }

    /// Tasks visible under the active date filter.
    pub fn filtered_tasks(&self) -> &[Task] {
        &self.filtered_tasks
    }

    pub fn summary(&self) -> TaskSummary {
        self.summary
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn priority_by_id(&self, id: &str) -> Option<&Priority> {
        self.priorities.iter().find(|priority| priority.id == id)
    }

    /// Rebuilds the filtered view and summary against `now`.
    pub fn derive<Tz: TimeZone>(&mut self, now: &DateTime<Tz>, week_start: WeekStart) {
        self.filtered_tasks = filter_tasks(&self.tasks, &self.date_filter, now, week_start);
        self.summary = TaskSummary::of(&self.filtered_tasks, self.tasks.len());
    }
}
