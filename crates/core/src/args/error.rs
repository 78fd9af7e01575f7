//! Error types for argument assembly.

use thiserror::Error;

/// Errors that can occur while assembling arguments.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgsError {
    /// Output padding pattern is not a single integer printf directive.
    #[error("Invalid padding pattern '{pattern}': {reason}")]
    InvalidPadding { pattern: String, reason: String },
}

impl ArgsError {
    /// Creates a new invalid padding error.
    pub fn invalid_padding(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPadding {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }
}
