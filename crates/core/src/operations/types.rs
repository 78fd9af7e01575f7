//! Types for the operations module.

use std::path::PathBuf;

/// Per-invocation options supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationOptions {
    /// Cue sheet chapter source.
    pub cue_file: Option<PathBuf>,
    /// FFmetadata file: chapter source and/or metadata input.
    pub meta_file: Option<PathBuf>,
    /// Cover image to attach.
    pub cover_file: Option<PathBuf>,
    /// Output base name, overriding the profile.
    pub output: Option<String>,
    /// Force `-y`.
    pub overwrite: bool,
}

/// What `extract` pulls out of the primary input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractMode {
    /// Chapters as a cue sheet (no ffmpeg run).
    Cue,
    /// Embedded cover art as `.jpg`.
    Cover,
    /// Global metadata and chapters as ffmetadata `.ini`.
    Meta,
    /// JSON summary (no ffmpeg run).
    Json,
}

/// What `remove` strips from the primary input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemoveTargets {
    pub chapters: bool,
    pub cover: bool,
    pub meta: bool,
}

/// Range selection for `cut`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CutRange {
    /// 1-based chapter from the resolved chapter source.
    Chapter(u32),
    /// Explicit `-ss`/`-to` values in seconds; empty strings are skipped.
    Span {
        start: String,
        end: String,
        /// 1-based output number.
        number: u32,
    },
}

/// Files produced by an operation, in creation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationReport {
    pub outputs: Vec<String>,
}

impl OperationReport {
    pub fn single(output: impl Into<String>) -> Self {
        Self {
            outputs: vec![output.into()],
        }
    }
}
