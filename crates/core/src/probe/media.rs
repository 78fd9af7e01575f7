//! Normalization of a probe report into the metadata model.

use serde_json::Value;
use std::path::{Path, PathBuf};

use super::types::ProbeReport;
use crate::meta::{Chapter, Format, MediaMetadata, Stream, Tags};
use crate::runner::Invocation;

/// ffprobe arguments that produce a [`ProbeReport`]; the media path follows.
pub const PROBE_ARGS: &[&str] = &[
    "-v",
    "quiet",
    "-print_format",
    "json",
    "-show_format",
    "-show_streams",
    "-show_chapters",
];

/// Builds the ffprobe invocation for `path`.
pub fn probe_command(ffprobe: &Path, path: &Path) -> Invocation {
    let mut args: Vec<String> = PROBE_ARGS.iter().map(|a| a.to_string()).collect();
    args.push(path.to_string_lossy().to_string());
    Invocation::new(ffprobe, args)
}

/// A probed primary input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProbedMedia {
    /// Path the media was probed from.
    pub path: PathBuf,
    /// Format fields and embedded chapters.
    pub metadata: MediaMetadata,
    pub streams: Vec<Stream>,
    /// At least one stream is flagged as cover art.
    pub has_cover: bool,
}

impl ProbedMedia {
    /// Media known only by its path, without probe data.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let metadata = MediaMetadata {
            format: Format {
                filename: path.to_string_lossy().to_string(),
                ..Default::default()
            },
            chapters: Vec::new(),
        };
        Self {
            path,
            metadata,
            streams: Vec::new(),
            has_cover: false,
        }
    }

    /// Normalizes a probe report.
    ///
    /// Tag keys are lowercased. Unrecognized stream keys are ignored; a
    /// stream counts as cover art when it has `cover = "true"` or an
    /// `attached_pic` disposition.
    pub fn from_report(path: impl Into<PathBuf>, report: ProbeReport) -> Self {
        let path = path.into();
        let probe_format = report.format;

        let filename = if probe_format.filename.is_empty() {
            path.to_string_lossy().to_string()
        } else {
            probe_format.filename
        };

        let format = Format {
            filename,
            duration: probe_format.duration.unwrap_or_default(),
            size: probe_format.size.unwrap_or_default(),
            bit_rate: probe_format.bit_rate.unwrap_or_default(),
            tags: lowercase_keys(probe_format.tags),
        };

        let chapters = report
            .chapters
            .into_iter()
            .map(|c| {
                let mut tags = lowercase_keys(c.tags);
                let title = tags.remove("title").unwrap_or_default();
                Chapter {
                    timebase: c.time_base,
                    start: c.start,
                    end: c.end,
                    title,
                    tags,
                }
            })
            .collect();

        let mut has_cover = false;
        let streams = report
            .streams
            .iter()
            .map(|raw| {
                let mut stream = Stream::default();
                for (key, value) in raw {
                    match (key.as_str(), value_to_string(value)) {
                        ("codec_type", Some(v)) => stream.codec_type = v,
                        ("codec_name", Some(v)) => stream.codec_name = v,
                        ("index", Some(v)) => stream.index = v,
                        ("cover", Some(v)) if v == "true" => stream.is_cover = true,
                        ("disposition", _) => {
                            if value.get("attached_pic").and_then(Value::as_i64) == Some(1) {
                                stream.is_cover = true;
                            }
                        }
                        _ => {}
                    }
                }
                has_cover |= stream.is_cover;
                stream
            })
            .collect();

        Self {
            path,
            metadata: MediaMetadata { format, chapters },
            streams,
            has_cover,
        }
    }

    /// Extension of the probed file including the leading dot, or empty.
    pub fn ext(&self) -> String {
        self.path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e))
            .unwrap_or_default()
    }

    /// File stem of the probed file.
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string()
    }

    /// First stream of the given codec type.
    pub fn stream(&self, codec_type: &str) -> Option<&Stream> {
        self.streams.iter().find(|s| s.codec_type == codec_type)
    }
}

fn lowercase_keys(tags: impl IntoIterator<Item = (String, String)>) -> Tags {
    tags.into_iter()
        .map(|(k, v)| (k.to_lowercase(), v))
        .collect()
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
