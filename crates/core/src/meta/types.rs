//! Types for the metadata model.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use super::timebase::{
    parse_timebase, seconds_to_ticks, ticks_to_seconds, DEFAULT_TIMEBASE_STR,
};

/// Flat tag map. Ordered so serialized output is stable.
pub type Tags = BTreeMap<String, String>;

/// Tag keys surfaced by the JSON summary. Anything else only survives the
/// raw ffmetadata/cue round trip.
pub const SUMMARY_TAGS: &[&str] = &[
    "title",
    "album",
    "artist",
    "composer",
    "date",
    "year",
    "genre",
    "comment",
    "album_artist",
    "track",
    "language",
    "lyrics",
];

/// Container-level fields of a media file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Format {
    /// File name (or path) as reported by the probe or a cue `FILE` line.
    #[serde(default)]
    pub filename: String,
    /// Duration in decimal seconds, e.g. `"3723.480000"`.
    #[serde(default)]
    pub duration: String,
    /// Size in bytes, as a decimal string.
    #[serde(default)]
    pub size: String,
    /// Overall bit rate, as a decimal string.
    #[serde(default)]
    pub bit_rate: String,
    /// Global tags.
    #[serde(default)]
    pub tags: Tags,
}

impl Format {
    /// Returns the filename extension without the leading dot.
    pub fn ext(&self) -> &str {
        Path::new(&self.filename)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
    }

    /// Returns the duration in seconds, if known.
    pub fn duration_secs(&self) -> Option<f64> {
        self.duration
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|d| d.is_finite() && *d >= 0.0)
    }

    /// Returns the duration expressed in ticks of `timebase`.
    pub fn duration_ticks(&self, timebase: f64) -> Option<i64> {
        self.duration_secs().map(|d| seconds_to_ticks(d, timebase))
    }

    /// Renders the duration as `HH:MM:SS`, truncating fractional seconds.
    pub fn hhmmss(&self) -> String {
        let total = self.duration_secs().unwrap_or(0.0) as u64;
        format!(
            "{:02}:{:02}:{:02}",
            total / 3600,
            (total % 3600) / 60,
            total % 60
        )
    }
}

/// A single chapter marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    /// Rational timebase, `1/N`.
    #[serde(rename = "time_base", default = "default_timebase")]
    pub timebase: String,
    /// Start in timebase ticks.
    pub start: i64,
    /// End in timebase ticks. Zero when unknown.
    pub end: i64,
    /// Chapter title.
    #[serde(default)]
    pub title: String,
    /// Any other chapter tags.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: Tags,
}

fn default_timebase() -> String {
    DEFAULT_TIMEBASE_STR.to_string()
}

impl Default for Chapter {
    fn default() -> Self {
        Self {
            timebase: default_timebase(),
            start: 0,
            end: 0,
            title: String::new(),
            tags: Tags::new(),
        }
    }
}

impl Chapter {
    /// Creates a chapter in the default `1/1000` timebase.
    pub fn new(start: i64, end: i64, title: impl Into<String>) -> Self {
        Self {
            start,
            end,
            title: title.into(),
            ..Default::default()
        }
    }

    /// Sets the timebase.
    pub fn with_timebase(mut self, timebase: impl Into<String>) -> Self {
        self.timebase = timebase.into();
        self
    }

    /// Ticks per second. Always positive.
    pub fn timebase_float(&self) -> f64 {
        parse_timebase(&self.timebase)
    }

    /// Start in seconds.
    pub fn start_seconds(&self) -> f64 {
        self.start as f64 / self.timebase_float()
    }

    /// End in seconds.
    pub fn end_seconds(&self) -> f64 {
        self.end as f64 / self.timebase_float()
    }

    /// Start as a three-decimal seconds string, or `"0"` for a zero start.
    pub fn start_to_seconds(&self) -> String {
        ticks_to_seconds(self.start, self.timebase_float())
    }

    /// End as a three-decimal seconds string, or `"0"` for a zero end.
    pub fn end_to_seconds(&self) -> String {
        ticks_to_seconds(self.end, self.timebase_float())
    }

    /// Start re-expressed in ticks of another timebase.
    pub fn start_ticks_in(&self, timebase: f64) -> i64 {
        seconds_to_ticks(self.start_seconds(), timebase)
    }

    /// End re-expressed in ticks of another timebase.
    pub fn end_ticks_in(&self, timebase: f64) -> i64 {
        seconds_to_ticks(self.end_seconds(), timebase)
    }

    /// Cue sheet `MM:SS:00` stamp for the chapter start. Frames are always `00`.
    pub fn cue_stamp(&self) -> String {
        let secs = self.start_seconds() as i64;
        format!("{:02}:{:02}:00", secs / 60, secs % 60)
    }
}

/// A single stream as reported by the probe.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stream {
    pub index: String,
    pub codec_type: String,
    pub codec_name: String,
    /// Attached picture (album art) stream.
    pub is_cover: bool,
}

/// Root metadata aggregate: container format plus ordered chapters.
///
/// Chapters are expected in timeline order with no overlaps; nothing here
/// re-sorts them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaMetadata {
    pub format: Format,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
}

impl MediaMetadata {
    /// Whether any chapters are present.
    pub fn has_chapters(&self) -> bool {
        !self.chapters.is_empty()
    }

    /// Returns a global tag value, if set and non-empty.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.format
            .tags
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Sets the final chapter's end from the container duration.
    ///
    /// Cue sheets carry no end marker for the last track; this fills it in
    /// using the chapter's own timebase. No-op when the duration is unknown
    /// or there are no chapters.
    pub fn last_chapter_end(&mut self) {
        let Some(duration) = self.format.duration_secs() else {
            return;
        };
        if let Some(last) = self.chapters.last_mut() {
            last.end = seconds_to_ticks(duration, last.timebase_float());
        }
    }
}
