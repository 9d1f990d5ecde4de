//! The task operations. Each mutating operation saves the store exactly once
//! on success and leaves both the file and the in-memory list untouched on
//! failure.

use chrono::Local;

use crate::error::{Result, TaskError};
use crate::models::{NewTask, Priority, Task};
use crate::storage::Store;

/// Result of [`complete_task`].
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    Completed(Task),
    /// The task was already done; nothing changed and nothing was saved.
    AlreadyCompleted(Task),
}

/// Filters for [`list_tasks`]. All given filters must match.
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    pub pending_only: bool,
    pub completed_only: bool,
    pub priority: Option<Priority>,
    pub category: Option<String>,
    /// Order pending tasks by due date, undated last.
    pub by_due: bool,
}

impl ListFilter {
    fn matches(&self, t: &Task) -> bool {
        if self.pending_only && t.completed {
            return false;
        }
        if self.completed_only && !t.completed {
            return false;
        }
        if self.priority.is_some_and(|p| p != t.priority) {
            return false;
        }
        match self.category.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            Some(c) => t.category.as_deref() == Some(c),
            None => true,
        }
    }
}

/// Filtered tasks split for display.
#[derive(Debug, Default)]
pub struct Listing<'a> {
    pub pending: Vec<&'a Task>,
    pub completed: Vec<&'a Task>,
}

impl Listing<'_> {
    pub fn total(&self) -> usize {
        self.pending.len() + self.completed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Adds a new task under the next free id.
pub fn add_task(store: &mut Store, new: NewTask) -> Result<Task> {
    let task = new.into_task(store.next_id()?, Local::now())?;
    let mut tasks = store.tasks().to_vec();
    tasks.push(task.clone());
    store.commit(tasks)?;
    tracing::debug!(id = task.id, "task added");
    Ok(task)
}

/// Marks a task as complete by id.
pub fn complete_task(store: &mut Store, id: u64) -> Result<Completion> {
    let idx = store
        .tasks()
        .iter()
        .position(|t| t.id == id)
        .ok_or(TaskError::NotFound(id))?;

    if store.tasks()[idx].completed {
        tracing::warn!(id, "task already completed");
        return Ok(Completion::AlreadyCompleted(store.tasks()[idx].clone()));
    }
    let mut tasks = store.tasks().to_vec();
    tasks[idx].completed = true;
    tasks[idx].completed_at = Some(Local::now());
    let task = tasks[idx].clone();

    store.commit(tasks)?;
    tracing::debug!(id, "task completed");
    Ok(Completion::Completed(task))
}

/// Removes a task by id. Remaining ids are left as they are.
pub fn delete_task(store: &mut Store, id: u64) -> Result<Task> {
    let idx = store
        .tasks()
        .iter()
        .position(|t| t.id == id)
        .ok_or(TaskError::NotFound(id))?;
    let mut tasks = store.tasks().to_vec();
    let task = tasks.remove(idx);
    store.commit(tasks)?;
    tracing::debug!(id, "task deleted");
    Ok(task)
}

/// Selects the tasks matching `filter`, in insertion order unless
/// `filter.by_due` asks otherwise.
pub fn list_tasks<'a>(tasks: &'a [Task], filter: &ListFilter) -> Listing<'a> {
    let (mut pending, completed): (Vec<&Task>, Vec<&Task>) = tasks
        .iter()
        .filter(|t| filter.matches(t))
        .partition(|t| !t.completed);

    if filter.by_due {
        // stable: equal keys keep insertion order
        pending.sort_by_key(|t| (t.due_date.is_none(), t.due_date));
    }
    Listing { pending, completed }
}

/// Case-insensitive substring search over descriptions. A blank keyword
/// matches nothing.
pub fn search_tasks<'a>(tasks: &'a [Task], keyword: &str) -> Vec<&'a Task> {
    if keyword.trim().is_empty() {
        return Vec::new();
    }
    let needle = keyword.to_lowercase();
    tasks
        .iter()
        .filter(|t| t.description.to_lowercase().contains(&needle))
        .collect()
}
