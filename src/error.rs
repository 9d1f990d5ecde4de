use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while running a task command.
#[derive(Debug, Error)]
pub enum TaskError {
    /// Bad user input; `field` names the offending argument.
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("task #{0} not found")]
    NotFound(u64),

    #[error("task file {path} is corrupt: {reason}")]
    CorruptStorage { path: PathBuf, reason: String },

    #[error("failed to {action} {path}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write output: {0}")]
    Output(#[source] std::io::Error),

    #[error("failed to encode tasks: {0}")]
    Encode(#[from] serde_json::Error),
}

impl TaskError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        TaskError::Validation { field, reason: reason.into() }
    }

    /// Process exit code reported for this error. Validation failures share
    /// clap's usage-error code.
    pub fn exit_code(&self) -> u8 {
        match self {
            TaskError::Validation { .. } => 2,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, TaskError>;
