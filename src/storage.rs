use std::collections::HashSet;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{Result, TaskError};
use crate::models::Task;

/// Returns the default path of the task file (`tasks.json`).
///
/// Used when neither `--file` nor `TASKS_DB` is given:
/// 1. `~/.local/share/taskman/tasks.json` (on Linux).
/// 2. `./tasks.json` (fallback when the platform has no data directory).
pub fn default_path() -> PathBuf {
    match dirs::data_local_dir() {
        Some(mut p) => {
            p.push("taskman");
            p.push("tasks.json");
            p
        }
        None => PathBuf::from("tasks.json"),
    }
}

/// Owns the task list for the lifetime of one command.
///
/// The list is read once when the store is opened and the whole file is
/// rewritten on every [`Store::save`].
#[derive(Debug)]
pub struct Store {
    path: PathBuf,
    tasks: Vec<Task>,
}

impl Store {
    /// Opens the store at `path`, loading any tasks already saved there.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let tasks = load_tasks(&path)?;
        tracing::debug!(count = tasks.len(), path = %path.display(), "loaded tasks");
        Ok(Store { path, tasks })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Next free id: one above the highest id in use.
    ///
    /// Fails when the highest id is `u64::MAX`, since no id above it exists.
    pub fn next_id(&self) -> Result<u64> {
        let max = self.tasks.iter().map(|t| t.id).max().unwrap_or(0);
        max.checked_add(1).ok_or_else(|| TaskError::CorruptStorage {
            path: self.path.clone(),
            reason: format!("task id {} leaves no room for a new id", max),
        })
    }

    /// Saves `tasks` as the new full list. The in-memory list is replaced
    /// only once the file has been written.
    pub fn commit(&mut self, tasks: Vec<Task>) -> Result<()> {
        save_tasks(&self.path, &tasks)?;
        tracing::debug!(count = tasks.len(), path = %self.path.display(), "saved tasks");
        self.tasks = tasks;
        Ok(())
    }
}

/// Loads all tasks from `path`.
///
/// A missing or blank file yields an empty list. Anything else that does not
/// parse into a consistent task list is reported as corrupt, never discarded.
pub fn load_tasks(path: &Path) -> Result<Vec<Task>> {
    let s = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(io_error("read", path)(e)),
    };
    if s.trim().is_empty() {
        return Ok(Vec::new());
    }

    let corrupt = |reason: String| TaskError::CorruptStorage { path: path.to_path_buf(), reason };
    let tasks: Vec<Task> = serde_json::from_str(&s).map_err(|e| corrupt(e.to_string()))?;

    let mut seen = HashSet::new();
    for t in &tasks {
        if t.id == 0 {
            return Err(corrupt("task id 0 is not allowed".into()));
        }
        if !seen.insert(t.id) {
            return Err(corrupt(format!("duplicate task id {}", t.id)));
        }
        if t.description.trim().is_empty() {
            return Err(corrupt(format!("task #{} has an empty description", t.id)));
        }
    }
    Ok(tasks)
}

/// Saves the given list of tasks to `path`.
///
/// The list goes to a uniquely named temporary file in the same directory
/// and is renamed over the target, so readers see either the old file or the
/// new one, even with several writers at once.
pub fn save_tasks(path: &Path, tasks: &[Task]) -> Result<()> {
    let dir = match path.parent().filter(|d| !d.as_os_str().is_empty()) {
        Some(dir) => {
            fs::create_dir_all(dir).map_err(io_error("create directory", dir))?;
            dir
        }
        None => Path::new("."),
    };

    let s = serde_json::to_string_pretty(tasks)?;
    let mut tmp = NamedTempFile::new_in(dir).map_err(io_error("create a temporary file in", dir))?;
    tmp.write_all(s.as_bytes()).map_err(io_error("write", tmp.path()))?;
    tmp.as_file().sync_all().map_err(io_error("sync", tmp.path()))?;
    // dropping the error's file handle removes the temporary file
    tmp.persist(path).map_err(|e| io_error("replace", path)(e.error))?;
    Ok(())
}

fn io_error(action: &'static str, path: &Path) -> impl FnOnce(std::io::Error) -> TaskError {
    let path = path.to_path_buf();
    move |source| TaskError::Io { action, path, source }
}
