//! Task state store.
//!
//! # Responsibility
//! - Own tasks, priorities and the active date filter.
//! - Apply user intents as tagged actions through one pure transition function.
//! - Keep the filtered view and summary derived from the latest state.
//!
//! # Invariants
//! - The filtered view is re-derived after every dispatched action.
//! - No task references a priority id missing from the priority list.
//! - Unknown ids and invalid inputs are no-ops, never errors.
//!
//! # See also
//! - crate::filter
//! - crate::persist

mod action;
mod clock;
mod reducer;
mod state;
mod task_store;

pub use action::{TaskAction, Transition};
pub use clock::{Clock, ManualClock, SystemClock};
pub use reducer::reduce;
pub use state::{TaskState, TaskSummary};
pub use task_store::{StateObserver, TaskStore};
