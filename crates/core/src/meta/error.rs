//! Error types for metadata parsing.

use thiserror::Error;

/// Errors raised while turning external bytes into a [`MediaMetadata`].
///
/// A parse never returns partially filled metadata: any of these aborts the
/// whole read.
///
/// [`MediaMetadata`]: super::MediaMetadata
#[derive(Debug, Error)]
pub enum MetadataError {
    /// FFmetadata INI input could not be read.
    #[error("Malformed ffmetadata at line {line}: {reason}")]
    MalformedIni { line: usize, reason: String },

    /// Cue sheet input could not be read.
    #[error("Malformed cue sheet at line {line}: {reason}")]
    MalformedCue { line: usize, reason: String },

    /// Probe report could not be read.
    #[error("Malformed probe report: {reason}")]
    MalformedProbe { reason: String },

    /// JSON summary could not be produced.
    #[error("Failed to encode JSON summary: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error while reading or writing a metadata file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MetadataError {
    /// Creates a new malformed ffmetadata error.
    pub fn ini(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedIni {
            line,
            reason: reason.into(),
        }
    }

    /// Creates a new malformed cue sheet error.
    pub fn cue(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedCue {
            line,
            reason: reason.into(),
        }
    }

    /// Creates a new malformed probe report error.
    pub fn probe(reason: impl Into<String>) -> Self {
        Self::MalformedProbe {
            reason: reason.into(),
        }
    }
}
