//! Core domain logic for Taskboard.
//! This crate is the single source of truth for task, priority and filter invariants.

pub mod config;
pub mod db;
pub mod filter;
pub mod logging;
pub mod model;
pub mod persist;
pub mod store;

pub use config::{ConfigError, CoreConfig};
pub use filter::{filter_tasks, format_date, DateFilter, DateRange, InvalidRangeError, WeekStart};
pub use logging::{init_from_config, init_logging, logging_status, LoggingError};
pub use model::{
    default_priorities, NewTask, Priority, PriorityId, PriorityPatch, Task, TaskId, TaskPatch,
    ValidationError,
};
pub use persist::{
    KeyValueStore, MemoryKeyValueStore, PersistError, PersistResult, Persistence, Snapshot,
    SnapshotBridge, SqliteKeyValueStore, DEFAULT_STORAGE_KEY,
};
pub use store::{
    Clock, ManualClock, SystemClock, TaskAction, TaskState, TaskStore, TaskSummary, Transition,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
