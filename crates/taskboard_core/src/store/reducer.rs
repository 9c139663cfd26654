//! Pure state transitions, one handler per action.
//!
//! # Invariants
//! - No I/O and no clock access; ids and timestamps arrive inside actions.
//! - Rejected actions leave the state untouched and return `Transition::NOOP`.
//! - Derived views are not touched here; callers re-derive afterwards.

use super::action::{TaskAction, Transition};
use super::state::TaskState;
use crate::filter::DateFilter;
use crate::model::{sort_priorities, Priority, PriorityPatch, Task, TaskPatch};
use log::debug;
use std::collections::HashSet;

/// Applies `action` to `state` and reports what changed.
pub fn reduce(state: &mut TaskState, action: TaskAction) -> Transition {
    let name = action.name();
    let transition = match action {
        TaskAction::AddTask(task) => add_task(state, task),
        TaskAction::ToggleTask(id) => toggle_task(state, &id),
        TaskAction::DeleteTask(id) => delete_task(state, &id),
        TaskAction::UpdateTask { id, patch } => update_task(state, &id, &patch),
        TaskAction::SetDateFilter(filter) => set_date_filter(state, filter),
        TaskAction::AddPriority(priority) => add_priority(state, priority),
        TaskAction::UpdatePriority { id, patch } => update_priority(state, &id, &patch),
        TaskAction::DeletePriority(id) => delete_priority(state, &id),
        TaskAction::Load { tasks, priorities } => load(state, tasks, priorities),
    };

    if transition.is_noop() {
        debug!("event=reduce module=store status=noop action={name}");
    }
    transition
}

fn add_task(state: &mut TaskState, task: Task) -> Transition {
    if let Err(err) = task.validate() {
        debug!("event=add_task module=store status=rejected reason=\"{err}\"");
        return Transition::NOOP;
    }
    if !priority_ref_exists(state, task.priority_id.as_deref()) {
        return Transition::NOOP;
    }
    if state.task(&task.id).is_some() {
        debug!("event=add_task module=store status=rejected reason=duplicate_id");
        return Transition::NOOP;
    }

    state.tasks.insert(0, task);
    Transition::DATA
}

fn toggle_task(state: &mut TaskState, id: &str) -> Transition {
    match state.tasks.iter_mut().find(|task| task.id == id) {
        Some(task) => {
            task.completed = !task.completed;
            Transition::DATA
        }
        None => Transition::NOOP,
    }
}

fn delete_task(state: &mut TaskState, id: &str) -> Transition {
    let before = state.tasks.len();
    state.tasks.retain(|task| task.id != id);
    if state.tasks.len() == before {
        Transition::NOOP
    } else {
        Transition::DATA
    }
}

fn update_task(state: &mut TaskState, id: &str, patch: &TaskPatch) -> Transition {
    if let Some(Some(priority_id)) = &patch.priority_id {
        if !priority_ref_exists(state, Some(priority_id.as_str())) {
            return Transition::NOOP;
        }
    }
    let Some(task) = state.tasks.iter_mut().find(|task| task.id == id) else {
        return Transition::NOOP;
    };

    let mut updated = task.clone();
    if !updated.apply_patch(patch) {
        return Transition::NOOP;
    }
    if let Err(err) = updated.validate() {
        debug!("event=update_task module=store status=rejected reason=\"{err}\"");
        return Transition::NOOP;
    }

    *task = updated;
    Transition::DATA
}

fn set_date_filter(state: &mut TaskState, filter: DateFilter) -> Transition {
    if let DateFilter::Custom(Some(range)) = &filter {
        if !range.is_valid() {
            debug!(
                "event=set_date_filter module=store status=rejected reason=inverted_range start={} end={}",
                range.start, range.end
            );
            return Transition::NOOP;
        }
    }
    if state.date_filter == filter {
        return Transition::NOOP;
    }

    state.date_filter = filter;
    Transition::FILTER
}

fn add_priority(state: &mut TaskState, priority: Priority) -> Transition {
    if let Err(err) = priority.validate() {
        debug!("event=add_priority module=store status=rejected reason=\"{err}\"");
        return Transition::NOOP;
    }
    if state.priority_by_id(&priority.id).is_some() {
        debug!("event=add_priority module=store status=rejected reason=duplicate_id");
        return Transition::NOOP;
    }

    state.priorities.push(priority);
    sort_priorities(&mut state.priorities);
    Transition::DATA
}

fn update_priority(state: &mut TaskState, id: &str, patch: &PriorityPatch) -> Transition {
    let Some(priority) = state.priorities.iter_mut().find(|p| p.id == id) else {
        return Transition::NOOP;
    };

    let mut updated = priority.clone();
    if !updated.apply_patch(patch) {
        return Transition::NOOP;
    }
    if let Err(err) = updated.validate() {
        debug!("event=update_priority module=store status=rejected reason=\"{err}\"");
        return Transition::NOOP;
    }

    *priority = updated;
    sort_priorities(&mut state.priorities);
    Transition::DATA
}

fn delete_priority(state: &mut TaskState, id: &str) -> Transition {
    let Some(index) = state.priorities.iter().position(|p| p.id == id) else {
        return Transition::NOOP;
    };

    state.priorities.remove(index);
    for task in &mut state.tasks {
        if task.priority_id.as_deref() == Some(id) {
            task.priority_id = None;
        }
    }
    Transition::DATA
}

fn load(state: &mut TaskState, tasks: Vec<Task>, priorities: Vec<Priority>) -> Transition {
    let mut seen = HashSet::new();
    let mut priorities = priorities
        .into_iter()
        .filter(|priority| seen.insert(priority.id.clone()))
        .collect::<Vec<_>>();
    sort_priorities(&mut priorities);

    let known = priorities
        .iter()
        .map(|priority| priority.id.clone())
        .collect::<HashSet<_>>();
    let mut seen = HashSet::new();
    let mut dropped_duplicates = 0usize;
    let mut cleared_refs = 0usize;
    let tasks = tasks
        .into_iter()
        .filter(|task| {
            let fresh = seen.insert(task.id.clone());
            if !fresh {
                dropped_duplicates += 1;
            }
            fresh
        })
        .map(|mut task| {
            if task
                .priority_id
                .as_deref()
                .is_some_and(|priority_id| !known.contains(priority_id))
            {
                task.priority_id = None;
                cleared_refs += 1;
            }
            task
        })
        .collect::<Vec<_>>();

    if dropped_duplicates > 0 || cleared_refs > 0 {
        debug!(
            "event=load module=store status=repaired dropped_duplicates={dropped_duplicates} cleared_refs={cleared_refs}"
        );
    }

    state.tasks = tasks;
    state.priorities = priorities;
    Transition::DATA
}

fn priority_ref_exists(state: &TaskState, priority_id: Option<&str>) -> bool {
    match priority_id {
        None => true,
        Some(id) if state.priority_by_id(id).is_some() => true,
        Some(id) => {
            debug!(
                "event=priority_ref module=store status=rejected reason=unknown_priority id={id}"
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::reduce;
    use crate::filter::{DateFilter, DateRange};
    use crate::model::{default_priorities, NewTask, Priority, PriorityPatch, Task, TaskPatch};
    use crate::store::{TaskAction, TaskState, Transition};
    use chrono::NaiveDate;

    fn task(id: &str, title: &str) -> Task {
        Task::with_id(id, NewTask::new(title), 0)
    }

    fn state_with(tasks: Vec<Task>) -> TaskState {
        let mut state = TaskState::default();
        reduce(
            &mut state,
            TaskAction::Load {
                tasks,
                priorities: default_priorities(),
            },
        );
        state
    }

    fn update_task(id: &str, patch: TaskPatch) -> TaskAction {
        TaskAction::UpdateTask {
            id: id.into(),
            patch,
        }
    }

    fn update_priority(id: &str, patch: PriorityPatch) -> TaskAction {
        TaskAction::UpdatePriority {
            id: id.into(),
            patch,
        }
    }

    fn ids(state: &TaskState) -> Vec<&str> {
        state.tasks().iter().map(|t| t.id.as_str()).collect()
    }

    fn priority_ids(state: &TaskState) -> Vec<&str> {
        state.priorities().iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn add_prepends_and_rejects_blank_or_dangling() {
        let mut state = TaskState::default();
        let added = reduce(&mut state, TaskAction::AddTask(task("a", "first")));
        assert_eq!(added, Transition::DATA);
        reduce(&mut state, TaskAction::AddTask(task("b", "second")));
        assert_eq!(ids(&state), vec!["b", "a"]);

        let blank = reduce(&mut state, TaskAction::AddTask(task("c", "   ")));
        assert!(blank.is_noop());
        let dangling = Task::with_id("d", NewTask::new("x").priority("nope"), 0);
        assert!(reduce(&mut state, TaskAction::AddTask(dangling)).is_noop());
        let duplicate = reduce(&mut state, TaskAction::AddTask(task("a", "dup")));
        assert!(duplicate.is_noop());
        assert_eq!(ids(&state), vec!["b", "a"]);
    }

    #[test]
    fn toggle_and_delete_ignore_unknown_ids() {
        let mut state = state_with(vec![task("a", "one")]);
        let before = state.clone();
        assert!(reduce(&mut state, TaskAction::ToggleTask("zz".into())).is_noop());
        assert!(reduce(&mut state, TaskAction::DeleteTask("zz".into())).is_noop());
        assert_eq!(state, before);
    }

    #[test]
    fn update_merges_fields_and_keeps_identity() {
        let mut state = state_with(vec![task("a", "one")]);
        let patch = TaskPatch {
            title: Some("renamed".into()),
            priority_id: Some(Some("high".into())),
            ..TaskPatch::default()
        };
        reduce(&mut state, update_task("a", patch));

        let updated = state.task("a").unwrap();
        assert_eq!(updated.title, "renamed");
        assert_eq!(updated.priority_id.as_deref(), Some("high"));
        assert_eq!(updated.created_at, 0);
        assert!(!updated.completed);
    }

    #[test]
    fn update_rejects_blank_title_and_unknown_priority() {
        let mut state = state_with(vec![task("a", "one")]);
        let blank = TaskPatch {
            title: Some(" ".into()),
            completed: Some(true),
            ..TaskPatch::default()
        };
        assert!(reduce(&mut state, update_task("a", blank)).is_noop());

        let dangling = TaskPatch {
            priority_id: Some(Some("nope".into())),
            ..TaskPatch::default()
        };
        assert!(reduce(&mut state, update_task("a", dangling)).is_noop());
        assert_eq!(state.task("a").unwrap(), &task("a", "one"));
    }

    #[test]
    fn inverted_custom_range_is_rejected() {
        let mut state = TaskState::default();
        let inverted = DateRange {
            start: NaiveDate::from_ymd_opt(2024, 1, 20).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
        };
        let filter = DateFilter::Custom(Some(inverted));
        assert!(reduce(&mut state, TaskAction::SetDateFilter(filter)).is_noop());
        assert_eq!(state.date_filter(), &DateFilter::All);

        let empty = TaskAction::SetDateFilter(DateFilter::Custom(None));
        assert_eq!(reduce(&mut state, empty), Transition::FILTER);
    }

    #[test]
    fn priorities_stay_sorted_with_stable_ties() {
        let mut state = TaskState::default();
        let low = Priority::new("low", "Low", "#22c55e", 4);
        reduce(&mut state, TaskAction::AddPriority(low));
        let urgent = Priority::new("urgent", "Urgent", "#000", 1);
        reduce(&mut state, TaskAction::AddPriority(urgent));
        assert_eq!(
            priority_ids(&state),
            vec!["critical", "urgent", "high", "medium", "low"]
        );

        let patch = PriorityPatch {
            order: Some(0),
            ..PriorityPatch::default()
        };
        reduce(&mut state, update_priority("low", patch));
        assert_eq!(state.priorities()[0].id, "low");

        let again = Priority::new("low", "Again", "#fff", 9);
        assert!(reduce(&mut state, TaskAction::AddPriority(again)).is_noop());
        let blank_label = PriorityPatch {
            label: Some("".into()),
            ..PriorityPatch::default()
        };
        assert!(reduce(&mut state, update_priority("low", blank_label)).is_noop());
    }

    #[test]
    fn delete_priority_clears_references_only() {
        let mut state = TaskState::default();
        let first = Task::with_id("a", NewTask::new("one").priority("high"), 5);
        reduce(&mut state, TaskAction::AddTask(first));
        let second = Task::with_id("b", NewTask::new("two").priority("medium"), 6);
        reduce(&mut state, TaskAction::AddTask(second));

        reduce(&mut state, TaskAction::DeletePriority("high".into()));

        assert!(state.priority_by_id("high").is_none());
        assert_eq!(state.task("a").unwrap().priority_id, None);
        assert_eq!(state.task("a").unwrap().title, "one");
        let kept = state.task("b").unwrap().priority_id.as_deref();
        assert_eq!(kept, Some("medium"));
        let again = reduce(&mut state, TaskAction::DeletePriority("high".into()));
        assert!(again.is_noop());
    }

    #[test]
    fn load_repairs_duplicates_and_dangling_references() {
        let mut state = TaskState::default();
        reduce(
            &mut state,
            TaskAction::Load {
                tasks: vec![
                    Task::with_id("a", NewTask::new("kept").priority("gone"), 1),
                    Task::with_id("a", NewTask::new("duplicate"), 2),
                    Task::with_id("b", NewTask::new("other").priority("p"), 3),
                ],
                priorities: vec![
                    Priority::new("p", "P", "#111", 2),
                    Priority::new("q", "Q", "#222", 1),
                    Priority::new("p", "P again", "#333", 0),
                ],
            },
        );

        assert_eq!(ids(&state), vec!["a", "b"]);
        assert_eq!(state.task("a").unwrap().title, "kept");
        assert_eq!(state.task("a").unwrap().priority_id, None);
        let kept = state.task("b").unwrap().priority_id.as_deref();
        assert_eq!(kept, Some("p"));
        assert_eq!(priority_ids(&state), vec!["q", "p"]);
    }
}
