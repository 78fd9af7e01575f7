//! Operation profile: everything the engine needs besides the media.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Codec selection for one stream kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Codec {
    /// Say nothing; ffmpeg picks its default.
    #[default]
    Unset,
    /// Drop the stream (`-vn` / `-an`).
    Disabled,
    /// Encode with the named codec (`copy` included).
    Named(String),
}

impl Codec {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    pub fn copy() -> Self {
        Self::named("copy")
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }
}

impl From<String> for Codec {
    fn from(value: String) -> Self {
        match value.trim() {
            "" => Self::Unset,
            "none" | "vn" | "an" => Self::Disabled,
            name => Self::Named(name.to_string()),
        }
    }
}

impl From<&str> for Codec {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<Codec> for String {
    fn from(codec: Codec) -> Self {
        codec.to_string()
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unset => Ok(()),
            Self::Disabled => write!(f, "none"),
            Self::Named(name) => write!(f, "{}", name),
        }
    }
}

/// Configuration for one engine invocation.
///
/// The configurable fields deserialize from a `[profiles.<name>]` table;
/// the input paths and chapter number are set per operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArgumentProfile {
    /// ffmpeg `-v` level.
    pub log_level: Option<String>,
    /// Emit `-y`.
    pub overwrite: bool,
    /// Tokens placed before the inputs.
    pub pre_input: Vec<String>,
    /// Secondary input, e.g. a concat list.
    #[serde(skip)]
    pub input: Option<PathBuf>,
    /// ffmetadata file to take global metadata from.
    #[serde(skip)]
    pub meta_file: Option<PathBuf>,
    /// Cover image to attach.
    #[serde(skip)]
    pub cover_file: Option<PathBuf>,
    /// Tokens placed after the inputs and mapping.
    pub post_input: Vec<String>,
    pub video_codec: Codec,
    pub video_params: Vec<String>,
    pub video_filters: Vec<String>,
    pub audio_codec: Codec,
    pub audio_params: Vec<String>,
    pub audio_filters: Vec<String>,
    /// Filter graph entries, emitted ahead of the video filters in `-vf`.
    pub filter_complex: Vec<String>,
    /// Output base name.
    pub output: String,
    /// printf pattern for the chapter number, e.g. `%03d`.
    pub padding: Option<String>,
    /// Output extension override, e.g. `.jpg`.
    pub ext: Option<String>,
    /// 1-based chapter or segment number fed to `padding`.
    #[serde(skip)]
    pub number: Option<u32>,
}

impl ArgumentProfile {
    /// Appends tokens to the pre-input list.
    pub fn push_pre<I, S>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pre_input.extend(tokens.into_iter().map(Into::into));
    }

    /// Appends tokens to the post-input list.
    pub fn push_post<I, S>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.post_input.extend(tokens.into_iter().map(Into::into));
    }

    /// Output extension with a leading dot, if overridden.
    pub fn ext_override(&self) -> Option<String> {
        self.ext
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(|e| {
                if e.starts_with('.') {
                    e.to_string()
                } else {
                    format!(".{}", e)
                }
            })
    }
}
