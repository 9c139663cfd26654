//! Plain-text rendering of store state.

use chrono::{Local, TimeZone};
use taskboard_core::{format_date, Task, TaskState, TaskSummary};

const SHORT_ID_LEN: usize = 8;

pub fn short_id(id: &str) -> &str {
    id.char_indices()
        .nth(SHORT_ID_LEN)
        .map_or(id, |(end, _)| &id[..end])
}

pub fn task_line(state: &TaskState, task: &Task) -> String {
    let mark = if task.completed { "x" } else { " " };
    let created = Local
        .timestamp_millis_opt(task.created_at)
        .single()
        .map(|at| format_date(at.date_naive()))
        .unwrap_or_else(|| "-".to_string());
    let priority = task
        .priority_id
        .as_deref()
        .and_then(|id| state.priority_by_id(id))
        .map(|priority| format!("  ({})", priority.label))
        .unwrap_or_default();
    format!(
        "[{mark}] {:<8}  {}{priority}  {created}",
        short_id(&task.id),
        task.title
    )
}

pub fn print_tasks(state: &TaskState) {
    println!("{}", state.date_filter().label());
    for task in state.filtered_tasks() {
        println!("{}", task_line(state, task));
    }
    println!("{}", summary_line(state.summary()));
}

pub fn summary_line(summary: TaskSummary) -> String {
    format!(
        "{} shown ({} remaining, {} completed), {} stored",
        summary.total, summary.remaining, summary.completed, summary.stored
    )
}

pub fn print_priorities(state: &TaskState) {
    for priority in state.priorities() {
        println!(
            "{:>3}  {:<12} {:<16} {}",
            priority.order, priority.id, priority.label, priority.color
        );
    }
}
