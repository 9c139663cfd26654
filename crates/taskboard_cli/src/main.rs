//! Command-line front end for the task store.
//!
//! # Responsibility
//! - Translate subcommands into store operations against the SQLite snapshot.
//! - Render the derived view (filtered tasks, counts, priorities).

mod render;

use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;
use std::path::PathBuf;
use taskboard_core::db::open_db;
use taskboard_core::model::slugify_priority_id;
use taskboard_core::{
    init_from_config, CoreConfig, DateFilter, DateRange, NewTask, Persistence, Priority,
    PriorityPatch, SnapshotBridge, SqliteKeyValueStore, SystemClock, TaskId, TaskPatch, TaskState,
    TaskStore,
};

const DEFAULT_CONFIG_FILE: &str = "taskboard.toml";
const DEFAULT_PRIORITY_COLOR: &str = "#64748b";

#[derive(Debug, Parser)]
#[command(
    name = "taskboard",
    version,
    about = "Track tasks with priorities and date filters"
)]
struct Cli {
    /// TOML config file; defaults apply when it does not exist.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Overrides `db_path` from the config.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List tasks under a date filter.
    List(ListArgs),
    /// Add a task.
    Add {
        title: String,
        #[arg(long)]
        priority: Option<String>,
        #[arg(long)]
        done: bool,
    },
    /// Flip a task between done and not done.
    Toggle { id: String },
    /// Delete a task.
    Delete { id: String },
    /// Edit task fields.
    Edit(EditArgs),
    /// Manage priorities.
    #[command(subcommand)]
    Priority(PriorityCommand),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FilterKind {
    All,
    Today,
    Week,
    Custom,
}

#[derive(Debug, Args)]
struct ListArgs {
    #[arg(long, value_enum, default_value_t = FilterKind::All)]
    filter: FilterKind,
    /// First day of a custom range (YYYY-MM-DD).
    #[arg(long)]
    from: Option<NaiveDate>,
    /// Last day of a custom range (YYYY-MM-DD).
    #[arg(long)]
    to: Option<NaiveDate>,
}

#[derive(Debug, Args)]
struct EditArgs {
    id: String,
    #[arg(long)]
    title: Option<String>,
    #[arg(long, conflicts_with = "clear_priority")]
    priority: Option<String>,
    #[arg(long)]
    clear_priority: bool,
    #[arg(long, conflicts_with = "undone")]
    done: bool,
    #[arg(long)]
    undone: bool,
}

#[derive(Debug, Subcommand)]
enum PriorityCommand {
    List,
    Add {
        label: String,
        /// Defaults to a slug of the label.
        #[arg(long)]
        id: Option<String>,
        #[arg(long, default_value = DEFAULT_PRIORITY_COLOR)]
        color: String,
        /// Defaults to one past the current highest order.
        #[arg(long)]
        order: Option<i32>,
    },
    Edit {
        id: String,
        #[arg(long)]
        label: Option<String>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        order: Option<i32>,
    },
    Delete { id: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = CoreConfig::load(&cli.config)?;
    if let Some(db) = &cli.db {
        config.db_path = db.clone();
    }
    if let Err(err) = init_from_config(&config) {
        eprintln!("warning: file logging disabled: {err}");
    }

    let conn = open_db(&config.db_path)
        .with_context(|| format!("failed to open `{}`", config.db_path.display()))?;
    let bridge = SnapshotBridge::with_key(SqliteKeyValueStore::new(&conn), &config.storage_key);
    let mut store = TaskStore::open(SystemClock, bridge, config.week_start);

    run(&mut store, cli.command)
}

fn run<P: Persistence>(store: &mut TaskStore<SystemClock, P>, command: Command) -> Result<()> {
    match command {
        Command::List(args) => {
            store.set_date_filter(date_filter(&args)?);
            render::print_tasks(store.state());
        }
        Command::Add {
            title,
            priority,
            done,
        } => {
            let mut new_task = NewTask::new(title).completed(done);
            new_task.priority_id = priority;
            let Some(id) = store.add_task(new_task) else {
                bail!("task rejected: title is empty or priority does not exist");
            };
            info!("event=cli_add module=cli status=ok id={id}");
            println!("Added {}", render::short_id(&id));
        }
        Command::Toggle { id } => {
            let id = resolve_task_id(store.state(), &id)?;
            store.toggle_task(id.as_str());
            if let Some(task) = store.state().task(&id) {
                println!("{}", render::task_line(store.state(), task));
            }
        }
        Command::Delete { id } => {
            let id = resolve_task_id(store.state(), &id)?;
            store.delete_task(id.as_str());
            println!("Deleted {}", render::short_id(&id));
        }
        Command::Edit(args) => {
            let id = resolve_task_id(store.state(), &args.id)?;
            let patch = TaskPatch {
                title: args.title,
                completed: match (args.done, args.undone) {
                    (true, _) => Some(true),
                    (_, true) => Some(false),
                    _ => None,
                },
                priority_id: if args.clear_priority {
                    Some(None)
                } else {
                    args.priority.map(Some)
                },
            };
            if patch.is_empty() {
                bail!("nothing to edit; see `taskboard edit --help`");
            }
            if store.update_task(id.as_str(), patch).is_noop() {
                bail!("edit rejected or unchanged");
            }
            if let Some(task) = store.state().task(&id) {
                println!("{}", render::task_line(store.state(), task));
            }
        }
        Command::Priority(command) => run_priority(store, command)?,
    }
    Ok(())
}

fn run_priority<P: Persistence>(
    store: &mut TaskStore<SystemClock, P>,
    command: PriorityCommand,
) -> Result<()> {
    match command {
        PriorityCommand::List => render::print_priorities(store.state()),
        PriorityCommand::Add {
            label,
            id,
            color,
            order,
        } => {
            let id = match id {
                Some(id) => id,
                None => slugify_priority_id(&label)
                    .ok_or_else(|| anyhow!("cannot derive an id from label `{label}`"))?,
            };
            let order = match order {
                Some(order) => order,
                None => next_priority_order(store.state().priorities()),
            };
            if store
                .add_priority(Priority::new(id.clone(), label, color, order))
                .is_noop()
            {
                bail!("priority rejected: id `{id}` exists or label is empty");
            }
            println!("Added priority {id}");
        }
        PriorityCommand::Edit {
            id,
            label,
            color,
            order,
        } => {
            let patch = PriorityPatch {
                label,
                color,
                order,
            };
            if store.update_priority(id.as_str(), patch).is_noop() {
                bail!("priority `{id}` not found, rejected, or unchanged");
            }
            render::print_priorities(store.state());
        }
        PriorityCommand::Delete { id } => {
            if store.delete_priority(id.as_str()).is_noop() {
                bail!("priority `{id}` not found");
            }
            println!("Deleted priority {id}");
        }
    }
    Ok(())
}

/// One past the highest existing order, pinned at `i32::MAX`.
fn next_priority_order(priorities: &[Priority]) -> i32 {
    priorities
        .iter()
        .map(|priority| priority.order)
        .max()
        .map_or(1, |max| max.saturating_add(1))
}

fn date_filter(args: &ListArgs) -> Result<DateFilter> {
    Ok(match args.filter {
        FilterKind::All => DateFilter::All,
        FilterKind::Today => DateFilter::Today,
        FilterKind::Week => DateFilter::ThisWeek,
        FilterKind::Custom => match (args.from, args.to) {
            (Some(from), Some(to)) => DateFilter::Custom(Some(DateRange::new(from, to)?)),
            _ => DateFilter::Custom(None),
        },
    })
}

/// Resolves an exact id or a unique id prefix.
fn resolve_task_id(state: &TaskState, query: &str) -> Result<TaskId> {
    let query = query.trim();
    if let Some(task) = state.task(query) {
        return Ok(task.id.clone());
    }
    let mut matches = state
        .tasks()
        .iter()
        .filter(|task| !query.is_empty() && task.id.starts_with(query));
    match (matches.next(), matches.next()) {
        (Some(task), None) => Ok(task.id.clone()),
        (Some(_), Some(_)) => bail!("task id prefix `{query}` is ambiguous"),
        (None, _) => bail!("no task matches `{query}`"),
    }
}

#[cfg(test)]
mod tests {
    use super::{date_filter, next_priority_order, resolve_task_id, FilterKind, ListArgs};
    use chrono::NaiveDate;
    use taskboard_core::{
        default_priorities, DateFilter, NewTask, Priority, Task, TaskAction, TaskState,
    };

    fn state_with(ids: &[&str]) -> TaskState {
        let mut state = TaskState::default();
        taskboard_core::store::reduce(
            &mut state,
            TaskAction::Load {
                tasks: ids
                    .iter()
                    .map(|id| Task::with_id(*id, NewTask::new("t"), 0))
                    .collect(),
                priorities: Vec::new(),
            },
        );
        state
    }

    #[test]
    fn resolves_unique_prefixes_only() {
        let state = state_with(&["abc123", "abd456", "xyz"]);
        assert_eq!(resolve_task_id(&state, "abc").unwrap(), "abc123");
        assert_eq!(resolve_task_id(&state, "xyz").unwrap(), "xyz");
        assert!(resolve_task_id(&state, "ab").is_err());
        assert!(resolve_task_id(&state, "q").is_err());
        assert!(resolve_task_id(&state, "").is_err());
    }

    #[test]
    fn custom_filter_needs_both_bounds() {
        let from = NaiveDate::from_ymd_opt(2024, 1, 10);
        let to = NaiveDate::from_ymd_opt(2024, 1, 20);
        let partial = ListArgs {
            filter: FilterKind::Custom,
            from,
            to: None,
        };
        assert_eq!(date_filter(&partial).unwrap(), DateFilter::Custom(None));

        let inverted = ListArgs {
            filter: FilterKind::Custom,
            from: to,
            to: from,
        };
        assert!(date_filter(&inverted).is_err());
    }

    #[test]
    fn default_priority_order_follows_the_highest() {
        assert_eq!(next_priority_order(&[]), 1);
        assert_eq!(next_priority_order(&default_priorities()), 4);

        let mut priorities = default_priorities();
        priorities.push(Priority::new("max", "Max", "#000000", i32::MAX));
        assert_eq!(next_priority_order(&priorities), i32::MAX);
    }
}
