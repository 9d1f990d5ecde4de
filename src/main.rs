//! # taskman
//!
//! A small terminal task tracker. Tasks have a description, a priority
//! (low, medium, high), an optional due date and an optional category, and
//! are kept in a single JSON file that is rewritten after every change.
//!
//! ## Usage
//!
//! ```bash
//! taskman add "Complete project" --due 2026-01-25 --priority high --category work
//! taskman list
//! taskman list --pending-only --priority high
//! taskman list --completed-only --table
//! taskman complete 1
//! taskman search "project"
//! taskman delete 1
//! ```
//!
//! ## Data Storage
//!
//! Tasks are saved in your local data directory:
//! *   Linux: `~/.local/share/taskman/tasks.json`
//! *   macOS: `~/Library/Application Support/taskman/tasks.json`
//! *   Windows: `%LOCALAPPDATA%\taskman\tasks.json`
//!
//! Override it with `--file PATH` or the `TASKS_DB` environment variable.
//! Set `TASKMAN_LOG` (e.g. `debug`) or pass `-v` for diagnostics on stderr.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Local;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use tracing_subscriber::EnvFilter;

use taskman::commands::{add_task, complete_task, delete_task, list_tasks, search_tasks, Completion, ListFilter};
use taskman::display::{render_listing, render_search, render_table};
use taskman::models::{NewTask, Priority};
use taskman::storage::{default_path, Store};
use taskman::{Result, TaskError};

#[derive(Parser)]
#[command(name = "taskman", version)]
#[command(about = "Manage your tasks from the command line", long_about = None)]
struct Cli {
    /// Task file (default: tasks.json in the user data directory)
    #[arg(short, long, global = true, env = "TASKS_DB", value_name = "PATH")]
    file: Option<PathBuf>,
    /// Print diagnostics to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Task(TaskCommand),
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Commands that operate on the task file.
#[derive(Subcommand)]
enum TaskCommand {
    /// Add a new task
    Add {
        /// Task description (quoted if it has spaces)
        description: String,
        /// Due date in YYYY-MM-DD
        #[arg(short, long)]
        due: Option<String>,
        /// Priority: low, medium or high (default medium)
        #[arg(short, long)]
        priority: Option<String>,
        /// Category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List tasks, pending first
    List {
        /// Show only pending tasks
        #[arg(long, conflicts_with = "completed_only")]
        pending_only: bool,
        /// Show only completed tasks
        #[arg(long)]
        completed_only: bool,
        /// Filter by priority
        #[arg(short, long)]
        priority: Option<String>,
        /// Filter by category (exact match)
        #[arg(short, long)]
        category: Option<String>,
        /// Order pending tasks by due date
        #[arg(long)]
        by_due: bool,
        /// Render as a table
        #[arg(short, long)]
        table: bool,
    },
    /// Mark a task as complete
    Complete {
        /// Task ID
        id: u64,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: u64,
    },
    /// Search task descriptions (case-insensitive)
    Search {
        keyword: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("✗ Error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("TASKMAN_LOG")
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .with_target(false)
        .try_init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Task(command)) => run_task(command, cli.file.unwrap_or_else(default_path)),
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "taskman", &mut io::stdout());
            Ok(())
        }
        None => Cli::command().print_help().map_err(TaskError::Output),
    }
}

fn run_task(command: TaskCommand, path: PathBuf) -> Result<()> {
    let mut store = Store::open(path)?;
    let today = Local::now().date_naive();

    match command {
        TaskCommand::Add { description, due, priority, category } => {
            let task = add_task(&mut store, NewTask { description, due, priority, category })?;
            println!("✓ Task #{} added successfully!", task.id);
        }
        TaskCommand::List { pending_only, completed_only, priority, category, by_due, table } => {
            let filter = ListFilter {
                pending_only,
                completed_only,
                priority: priority.as_deref().map(str::parse::<Priority>).transpose()?,
                category,
                by_due,
            };
            let listing = list_tasks(store.tasks(), &filter);
            if table && !listing.is_empty() {
                println!("{}", render_table(&listing, today));
            } else {
                println!("{}", render_listing(&listing, today, store.tasks().is_empty()));
            }
        }
        TaskCommand::Complete { id } => match complete_task(&mut store, id)? {
            Completion::Completed(_) => println!("✓ Task #{} marked as complete!", id),
            Completion::AlreadyCompleted(_) => println!("⚠ Task #{} is already completed!", id),
        },
        TaskCommand::Delete { id } => {
            delete_task(&mut store, id)?;
            println!("✓ Task #{} deleted successfully!", id);
        }
        TaskCommand::Search { keyword } => {
            let results = search_tasks(store.tasks(), &keyword);
            println!("{}", render_search(&keyword, &results, today));
        }
    }
    Ok(())
}
