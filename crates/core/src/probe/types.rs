//! Types for the probe report.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::meta::MetadataError;

/// Structured probe report, as printed by
/// `ffprobe -print_format json -show_format -show_streams -show_chapters`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProbeReport {
    #[serde(default)]
    pub format: ProbeFormat,
    /// Per-stream key/value maps. Values keep their JSON type here and are
    /// normalized to strings by the adapter.
    #[serde(default)]
    pub streams: Vec<Map<String, Value>>,
    #[serde(default)]
    pub chapters: Vec<ProbeChapter>,
}

impl ProbeReport {
    /// Parses ffprobe JSON output.
    pub fn from_json(output: &str) -> Result<Self, MetadataError> {
        serde_json::from_str(output)
            .map_err(|e| MetadataError::probe(format!("Failed to parse ffprobe output: {}", e)))
    }
}

/// Container-level fields of the report.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProbeFormat {
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub bit_rate: Option<String>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

/// A chapter as reported by the probe.
#[derive(Debug, Clone, Deserialize)]
pub struct ProbeChapter {
    pub time_base: String,
    pub start: i64,
    pub end: i64,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}
