//! Store owner: reducer + derivation + persistence + observers.

use super::action::{TaskAction, Transition};
use super::clock::Clock;
use super::reducer::reduce;
use super::state::{TaskState, TaskSummary};
use crate::filter::{DateFilter, WeekStart};
use crate::model::{NewTask, Priority, PriorityId, PriorityPatch, Task, TaskId, TaskPatch};
use crate::persist::{Persistence, Snapshot};
use log::{info, warn};

/// Callback invoked with the fresh state after every dispatch.
pub type StateObserver = Box<dyn FnMut(&TaskState)>;

/// Single owner of task state for one running instance.
///
/// # Invariants
/// - State is loaded from persistence exactly once, in [`TaskStore::open`].
/// - Every dispatch re-derives the filtered view before observers run.
/// - A save follows every change to tasks or priorities; a failed save is
///   logged and dropped, leaving in-memory state authoritative.
pub struct TaskStore<C: Clock, P: Persistence> {
    state: TaskState,
    clock: C,
    persistence: P,
    week_start: WeekStart,
    observers: Vec<StateObserver>,
}

impl<C: Clock, P: Persistence> TaskStore<C, P> {
    /// Builds a store and loads the last saved snapshot (or defaults).
    pub fn open(clock: C, persistence: P, week_start: WeekStart) -> Self {
        let snapshot = persistence.load();
        let mut store = Self {
            state: TaskState::default(),
            clock,
            persistence,
            week_start,
            observers: Vec::new(),
        };
        reduce(
            &mut store.state,
            TaskAction::Load {
                tasks: snapshot.tasks,
                priorities: snapshot.priorities,
            },
        );
        store.refresh_view();
        info!(
            "event=store_open module=store status=ok tasks={} priorities={} week_start={:?}",
            store.state.tasks.len(),
            store.state.priorities.len(),
            week_start
        );
        store
    }

    pub fn state(&self) -> &TaskState {
        &self.state
    }

    pub fn filtered_tasks(&self) -> &[Task] {
        self.state.filtered_tasks()
    }

    pub fn summary(&self) -> TaskSummary {
        self.state.summary()
    }

    pub fn priority_by_id(&self, id: &str) -> Option<&Priority> {
        self.state.priority_by_id(id)
    }

    /// Registers an observer; it first runs on the next dispatch.
    pub fn subscribe(&mut self, observer: impl FnMut(&TaskState) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Applies one action, re-derives views, saves if needed, notifies observers.
    pub fn dispatch(&mut self, action: TaskAction) -> Transition {
        let transition = reduce(&mut self.state, action);
        self.refresh_view();
        if transition.data_changed {
            self.save();
        }
        for observer in &mut self.observers {
            observer(&self.state);
        }
        transition
    }

    /// Re-derives the filtered view against the current clock.
    ///
    /// Useful when time passes without a mutation (e.g. across midnight).
    pub fn refresh_view(&mut self) {
        let now = self.clock.now();
        self.state.derive(&now, self.week_start);
    }

    /// Adds a task stamped with the current clock time.
    ///
    /// Returns the new task id, or `None` when the input was rejected.
    pub fn add_task(&mut self, new_task: NewTask) -> Option<TaskId> {
        let created_at = self.clock.now().timestamp_millis();
        let mut task = Task::create(new_task.clone(), created_at);
        while self.state.task(&task.id).is_some() {
            task = Task::create(new_task.clone(), created_at);
        }
        let id = task.id.clone();
        self.dispatch(TaskAction::AddTask(task))
            .data_changed
            .then_some(id)
    }

    pub fn toggle_task(&mut self, id: impl Into<TaskId>) -> Transition {
        self.dispatch(TaskAction::ToggleTask(id.into()))
    }

    pub fn delete_task(&mut self, id: impl Into<TaskId>) -> Transition {
        self.dispatch(TaskAction::DeleteTask(id.into()))
    }

    pub fn update_task(&mut self, id: impl Into<TaskId>, patch: TaskPatch) -> Transition {
        self.dispatch(TaskAction::UpdateTask {
            id: id.into(),
            patch,
        })
    }

    pub fn set_date_filter(&mut self, filter: DateFilter) -> Transition {
        self.dispatch(TaskAction::SetDateFilter(filter))
    }

    pub fn add_priority(&mut self, priority: Priority) -> Transition {
        self.dispatch(TaskAction::AddPriority(priority))
    }

    pub fn update_priority(
        &mut self,
        id: impl Into<PriorityId>,
        patch: PriorityPatch,
    ) -> Transition {
        self.dispatch(TaskAction::UpdatePriority {
            id: id.into(),
            patch,
        })
    }

    pub fn delete_priority(&mut self, id: impl Into<PriorityId>) -> Transition {
        self.dispatch(TaskAction::DeletePriority(id.into()))
    }

    /// Replaces tasks and priorities wholesale.
    pub fn load(&mut self, tasks: Vec<Task>, priorities: Vec<Priority>) -> Transition {
        self.dispatch(TaskAction::Load { tasks, priorities })
    }

    /// Current persisted shape of the state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tasks: self.state.tasks.clone(),
            priorities: self.state.priorities.clone(),
        }
    }

    fn save(&self) {
        if let Err(err) = self.persistence.save(&self.snapshot()) {
            warn!("event=snapshot_save module=store status=dropped error={err}");
        }
    }
}
