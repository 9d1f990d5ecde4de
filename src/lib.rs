//! Library half of `taskman`: the task model, the file-backed store, the
//! operations over it and the text presenter. `main.rs` wires these to the
//! command line.

pub mod commands;
pub mod display;
pub mod due;
pub mod error;
pub mod models;
pub mod storage;

pub use error::{Result, TaskError};
