//! Cue sheet codec.
//!
//! Reading understands the subset needed to recover chapters: the `FILE`
//! header, per-track `TITLE` and `INDEX 01 MM:SS:FF` lines, plus the album
//! level `TITLE`/`PERFORMER`/`REM DATE`/`REM GENRE` lines before `FILE`.
//! Start times come back in a `1/1000` timebase; the last chapter's end is
//! left at zero (see [`MediaMetadata::last_chapter_end`]).
//!
//! Writing always renders frames as `00`, so a write/read cycle only keeps
//! whole seconds.

use once_cell::sync::Lazy;
use regex_lite::Regex;

use crate::meta::{Chapter, MediaMetadata, MetadataError};

/// Cue frames per second.
const FRAMES_PER_SECOND: i64 = 75;

static FILE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\w+\s+['"](?P<title>.*)['"]\s+\S.*$"#).expect("valid FILE line regex")
});

/// Parses cue sheet text into metadata.
pub fn parse(input: &str) -> Result<MediaMetadata, MetadataError> {
    let mut meta = MediaMetadata::default();
    let mut seen_file = false;
    // One slot per track; `None` until the track's TITLE is read.
    let mut titles: Vec<Option<String>> = Vec::new();
    let mut track_open = false;
    let mut starts: Vec<i64> = Vec::new();
    let mut last_line = 0;

    for (idx, raw) in input.lines().enumerate() {
        let line_no = idx + 1;
        last_line = line_no;
        let line = raw.trim();
        let (directive, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        match directive {
            "FILE" => {
                let caps = FILE_LINE.captures(line).ok_or_else(|| {
                    MetadataError::cue(line_no, format!("unrecognised FILE line '{}'", line))
                })?;
                meta.format.filename = caps
                    .name("title")
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default();
                seen_file = true;
            }
            "TRACK" => {
                titles.push(None);
                track_open = true;
            }
            "TITLE" if !seen_file => {
                meta.format.tags.insert("title".to_string(), unquote(rest));
            }
            "TITLE" => {
                if track_open {
                    if let Some(slot) = titles.last_mut() {
                        *slot = Some(unquote(rest));
                    }
                    track_open = false;
                } else {
                    titles.push(Some(unquote(rest)));
                }
            }
            "PERFORMER" if !seen_file => {
                meta.format.tags.insert("artist".to_string(), unquote(rest));
            }
            "REM" if !seen_file => {
                if let Some((key, value)) = rest.split_once(char::is_whitespace) {
                    let key = key.to_lowercase();
                    if key == "date" || key == "genre" {
                        meta.format.tags.insert(key, unquote(value));
                    }
                }
            }
            "INDEX" => {
                let Some(stamp) = rest.strip_prefix("01") else {
                    // Pre-gaps (INDEX 00) and sub-indexes do not start a chapter.
                    continue;
                };
                let start = cue_stamp_to_ticks(stamp.trim())
                    .ok_or_else(|| MetadataError::cue(line_no, format!("bad INDEX stamp '{}'", rest)))?;
                starts.push(start);
            }
            _ => {}
        }
    }

    if titles.len() != starts.len() {
        return Err(MetadataError::cue(
            last_line,
            format!(
                "{} track titles but {} INDEX 01 entries",
                titles.len(),
                starts.len()
            ),
        ));
    }

    meta.chapters = titles
        .into_iter()
        .zip(starts.iter())
        .enumerate()
        .map(|(i, (title, start))| Chapter {
            start: *start,
            end: starts.get(i + 1).copied().unwrap_or(0),
            title: title.unwrap_or_default(),
            ..Default::default()
        })
        .collect();

    tracing::debug!(
        file = %meta.format.filename,
        chapters = meta.chapters.len(),
        "Parsed cue sheet"
    );

    Ok(meta)
}

/// Serializes metadata as a cue sheet.
///
/// The `FILE` line uses `format.filename`'s final path component and its
/// extension as the file type.
pub fn serialize(meta: &MediaMetadata) -> String {
    let mut out = String::new();

    if let Some(artist) = meta.tag("artist") {
        out.push_str(&format!("PERFORMER \"{}\"\n", artist));
    }
    if let Some(title) = meta.tag("title") {
        out.push_str(&format!("TITLE \"{}\"\n", title));
    }

    let name = std::path::Path::new(&meta.format.filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(&meta.format.filename);
    out.push_str(&format!("FILE \"{}\" {}\n", name, meta.format.ext()));

    for (idx, chapter) in meta.chapters.iter().enumerate() {
        let number = idx + 1;
        let title = if chapter.title.is_empty() {
            format!("Chapter {}", number)
        } else {
            chapter.title.clone()
        };
        out.push_str(&format!("TRACK {} AUDIO\n", number));
        out.push_str(&format!("  TITLE \"{}\"\n", title));
        out.push_str(&format!("  INDEX 01 {}\n", chapter.cue_stamp()));
    }

    out
}

/// Converts `MM:SS:FF` into ticks at 1000 Hz. Frames are 1/75 second.
pub fn cue_stamp_to_ticks(stamp: &str) -> Option<i64> {
    let mut parts = stamp.split(':').map(|p| p.trim().parse::<i64>().ok());
    let minutes = parts.next()??;
    let seconds = parts.next()??;
    let frames = parts.next()??;
    if parts.next().is_some() || minutes < 0 || seconds < 0 || frames < 0 {
        return None;
    }
    Some((minutes * 60 + seconds) * 1000 + frames * 1000 / FRAMES_PER_SECOND)
}

/// Strips one matching pair of `'` or `"` delimiters.
fn unquote(s: &str) -> String {
    let s = s.trim();
    for quote in ['"', '\''] {
        if let Some(inner) = s.strip_prefix(quote).and_then(|r| r.strip_suffix(quote)) {
            return inner.to_string();
        }
    }
    s.to_string()
}
