//! Error types for the operations module.

use thiserror::Error;

use crate::args::ArgsError;
use crate::meta::MetadataError;
use crate::runner::RunError;

/// Errors that can occur while running an operation.
#[derive(Debug, Error)]
pub enum OperationError {
    /// No chapter source yielded any chapters.
    #[error("There are no chapters")]
    NoChapters,

    /// Requested chapter number does not exist.
    #[error("Chapter {chapter} does not exist ({available} available)")]
    ChapterOutOfRange { chapter: u32, available: usize },

    /// The request cannot produce any work.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A metadata file or probe report could not be parsed.
    #[error(transparent)]
    Metadata(#[from] MetadataError),

    /// Arguments could not be assembled.
    #[error(transparent)]
    Args(#[from] ArgsError),

    /// The external program failed.
    #[error(transparent)]
    Run(#[from] RunError),

    /// I/O error reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl OperationError {
    /// Whether this is the recoverable "no chapters" condition.
    pub fn is_no_chapters(&self) -> bool {
        matches!(self, Self::NoChapters)
    }
}
