//! Error types for the runner module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while running an external program.
#[derive(Debug, Error)]
pub enum RunError {
    /// Program binary not found.
    #[error("Program not found: {path}")]
    ProgramNotFound { path: PathBuf },

    /// Program exited unsuccessfully.
    #[error("{program} exited with code {code:?}")]
    Failed {
        program: String,
        code: Option<i32>,
        stderr: Option<String>,
    },

    /// I/O error while spawning or waiting.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RunError {
    /// Creates a new failed-exit error.
    pub fn failed(program: impl Into<String>, code: Option<i32>, stderr: Option<String>) -> Self {
        Self::Failed {
            program: program.into(),
            code,
            stderr,
        }
    }
}
