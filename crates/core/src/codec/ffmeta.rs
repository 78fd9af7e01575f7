//! FFmetadata INI codec.
//!
//! ```text
//! ;FFMETADATA1
//! title=Book
//! artist=Author
//!
//! [CHAPTER]
//! TIMEBASE=1/1000
//! START=0
//! END=60000
//! title=Chapter 1
//! ```
//!
//! Keys and section names are case-insensitive, `[CHAPTER]` may repeat, and
//! `;`/`#` only start a comment at the beginning of a line.

use crate::meta::{Chapter, MediaMetadata, MetadataError};

/// First line of every ffmetadata file.
pub const FFMETA_HEADER: &str = ";FFMETADATA1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Global,
    Chapter,
    /// `[STREAM]` and anything else we do not model.
    Other,
}

/// Parses ffmetadata text into metadata.
pub fn parse(input: &str) -> Result<MediaMetadata, MetadataError> {
    let mut meta = MediaMetadata::default();
    let mut section = Section::Global;

    for (line_no, line) in logical_lines(input) {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with(';') || trimmed.starts_with('#') {
            continue;
        }

        if let Some(name) = trimmed
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
        {
            section = if name.trim().eq_ignore_ascii_case("chapter") {
                meta.chapters.push(Chapter::default());
                Section::Chapter
            } else {
                Section::Other
            };
            continue;
        }

        let (key, value) = split_key_value(trimmed)
            .ok_or_else(|| MetadataError::ini(line_no, format!("expected key=value, got '{}'", trimmed)))?;
        let key = unescape(key.trim()).to_lowercase();
        let value = unescape(value);

        match section {
            Section::Global => {
                meta.format.tags.insert(key, value);
            }
            Section::Chapter => {
                // A chapter section was pushed when the header was read.
                if let Some(chapter) = meta.chapters.last_mut() {
                    apply_chapter_key(chapter, &key, value, line_no)?;
                }
            }
            Section::Other => {}
        }
    }

    tracing::debug!(
        tags = meta.format.tags.len(),
        chapters = meta.chapters.len(),
        "Parsed ffmetadata"
    );

    Ok(meta)
}

/// Serializes metadata as ffmetadata text.
pub fn serialize(meta: &MediaMetadata) -> String {
    let mut out = String::new();
    out.push_str(FFMETA_HEADER);
    out.push('\n');

    for (key, value) in &meta.format.tags {
        push_pair(&mut out, key, value);
    }

    for chapter in &meta.chapters {
        out.push('\n');
        out.push_str("[CHAPTER]\n");
        push_pair(&mut out, "TIMEBASE", &chapter.timebase);
        push_pair(&mut out, "START", &chapter.start.to_string());
        push_pair(&mut out, "END", &chapter.end.to_string());
        push_pair(&mut out, "title", &chapter.title);
        for (key, value) in &chapter.tags {
            push_pair(&mut out, key, value);
        }
    }

    out
}

fn apply_chapter_key(
    chapter: &mut Chapter,
    key: &str,
    value: String,
    line_no: usize,
) -> Result<(), MetadataError> {
    match key {
        "timebase" => chapter.timebase = value,
        "start" => chapter.start = parse_ticks(&value, "START", line_no)?,
        "end" => chapter.end = parse_ticks(&value, "END", line_no)?,
        "title" => chapter.title = value,
        _ => {
            chapter.tags.insert(key.to_string(), value);
        }
    }
    Ok(())
}

fn parse_ticks(value: &str, field: &str, line_no: usize) -> Result<i64, MetadataError> {
    value.trim().parse::<i64>().map_err(|_| {
        MetadataError::ini(line_no, format!("{} is not an integer: '{}'", field, value))
    })
}

fn push_pair(out: &mut String, key: &str, value: &str) {
    out.push_str(&escape(key));
    out.push('=');
    out.push_str(&escape(value));
    out.push('\n');
}

/// Joins physical lines ending in an escaping backslash into one logical
/// line. Yields 1-based line numbers of where each logical line starts.
fn logical_lines(input: &str) -> Vec<(usize, String)> {
    let mut lines = Vec::new();
    let mut pending: Option<(usize, String)> = None;

    for (idx, raw) in input.lines().enumerate() {
        let (start, mut buf) = pending.take().unwrap_or((idx + 1, String::new()));
        buf.push_str(raw);

        if ends_with_escape(&buf) {
            buf.pop();
            buf.push_str("\\\n");
            pending = Some((start, buf));
        } else {
            lines.push((start, buf));
        }
    }

    if let Some(rest) = pending {
        lines.push(rest);
    }

    lines
}

fn ends_with_escape(s: &str) -> bool {
    s.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

/// Splits on the first `=` that is not backslash-escaped.
fn split_key_value(line: &str) -> Option<(&str, &str)> {
    let mut escaped = false;
    for (idx, c) in line.char_indices() {
        match c {
            '\\' if !escaped => escaped = true,
            '=' if !escaped => return Some((&line[..idx], &line[idx + 1..])),
            _ => escaped = false,
        }
    }
    None
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '=' | ';' | '#' | '\\' | '\n') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::Format;

    const SAMPLE: &str = ";FFMETADATA1
title=The Book
artist=Some Author
comment=loud; proud # and hashed

[CHAPTER]
TIMEBASE=1/1000
START=0
END=60000
title=Opening

[chapter]
timebase=1/1000
start=60000
end=125500
TITLE=Second
";

    #[test]
    fn test_parse_global_tags() {
        let meta = parse(SAMPLE).unwrap();
        assert_eq!(meta.tag("title"), Some("The Book"));
        assert_eq!(meta.tag("artist"), Some("Some Author"));
        assert_eq!(meta.tag("comment"), Some("loud; proud # and hashed"));
    }

    #[test]
    fn test_parse_repeated_chapter_sections() {
        let meta = parse(SAMPLE).unwrap();
        assert_eq!(meta.chapters.len(), 2);
        assert_eq!(meta.chapters[0], Chapter::new(0, 60000, "Opening"));
        assert_eq!(meta.chapters[1], Chapter::new(60000, 125500, "Second"));
    }

    #[test]
    fn test_parse_non_numeric_start_fails() {
        let input = ";FFMETADATA1\n[CHAPTER]\nTIMEBASE=1/1000\nSTART=abc\nEND=10\n";
        let err = parse(input).unwrap_err();
        assert!(matches!(err, MetadataError::MalformedIni { line: 4, .. }));
    }

    #[test]
    fn test_parse_line_without_separator_fails() {
        let err = parse(";FFMETADATA1\ntitle\n").unwrap_err();
        assert!(matches!(err, MetadataError::MalformedIni { line: 2, .. }));
    }

    #[test]
    fn test_parse_ignores_stream_sections() {
        let input = ";FFMETADATA1\nalbum=A\n[STREAM]\ntitle=stream title\n";
        let meta = parse(input).unwrap();
        assert_eq!(meta.tag("album"), Some("A"));
        assert_eq!(meta.tag("title"), None);
    }

    #[test]
    fn test_parse_escaped_multiline_value() {
        let input = ";FFMETADATA1\nlyrics=line one\\\nline two\nalbum=A\\=B\n";
        let meta = parse(input).unwrap();
        assert_eq!(meta.tag("lyrics"), Some("line one\nline two"));
        assert_eq!(meta.tag("album"), Some("A=B"));
    }

    #[test]
    fn test_serialize_layout() {
        let mut meta = MediaMetadata::default();
        meta.format.tags.insert("title".into(), "Book".into());
        meta.chapters.push(Chapter::new(0, 1500, "One"));

        let out = serialize(&meta);
        assert_eq!(
            out,
            ";FFMETADATA1\ntitle=Book\n\n[CHAPTER]\nTIMEBASE=1/1000\nSTART=0\nEND=1500\ntitle=One\n"
        );
    }

    #[test]
    fn test_round_trip_is_exact() {
        let mut meta = MediaMetadata {
            format: Format::default(),
            chapters: vec![
                Chapter::new(0, 44100, "Intro").with_timebase("1/44100"),
                Chapter::new(44100, 88200, "a = b; c # d").with_timebase("1/44100"),
                Chapter::new(88200, 100000, "").with_timebase("1/44100"),
            ],
        };
        meta.format.tags.insert("album".into(), "Album".into());
        meta.format.tags.insert("genre".into(), "Audiobook".into());
        meta.format.tags.insert("x_custom".into(), "kept".into());
        meta.format.tags.insert("lyrics".into(), "one\ntwo\\three".into());

        let parsed = parse(&serialize(&meta)).unwrap();
        assert_eq!(parsed.format.tags, meta.format.tags);
        assert_eq!(parsed.chapters, meta.chapters);
    }
}
