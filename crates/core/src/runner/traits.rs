//! Trait definitions for the runner module.

use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};

use super::error::RunError;

/// A program name plus its ordered argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(program: impl AsRef<Path>, args: Vec<String>) -> Self {
        Self {
            program: program.as_ref().to_path_buf(),
            args,
        }
    }

    /// Returns the value following the first occurrence of `flag`.
    pub fn arg_value(&self, flag: &str) -> Option<&str> {
        self.args
            .iter()
            .position(|a| a == flag)
            .and_then(|i| self.args.get(i + 1))
            .map(String::as_str)
    }

    /// The last argument, which for ffmpeg is the output path.
    pub fn output(&self) -> Option<&str> {
        self.args.last().map(String::as_str)
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " '{}'", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Runs external programs on behalf of the orchestrator.
///
/// Calls are awaited one at a time; implementations need not support
/// concurrent invocations.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Returns the name of this runner implementation.
    fn name(&self) -> &str;

    /// Runs the invocation to completion.
    async fn run(&self, invocation: &Invocation) -> Result<(), RunError>;

    /// Runs the invocation and returns its captured standard output.
    async fn output(&self, invocation: &Invocation) -> Result<String, RunError>;
}
