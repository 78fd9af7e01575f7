//! Testing utilities and mock implementations.
//!
//! [`MockRunner`] stands in for the external programs so that every
//! operation can be exercised without ffmpeg installed.
//!
//! # Example
//!
//! ```rust,ignore
//! use avtools_core::testing::{fixtures, MockRunner};
//!
//! let runner = MockRunner::new();
//! runner.set_probe_output(fixtures::probe_json("book.m4b", 3)).await;
//!
//! let orchestrator = Orchestrator::with_programs(runner, "ffmpeg", "ffprobe");
//! // ...
//! let runs = orchestrator.runner().recorded().await;
//! ```

mod mock_runner;

pub use mock_runner::MockRunner;

/// Test fixtures and helper functions.
pub mod fixtures {
    use serde_json::json;

    use crate::meta::{Chapter, Format, MediaMetadata};

    /// Metadata for `filename` with `chapters` consecutive ten second
    /// chapters titled "Chapter N".
    pub fn chaptered_media(filename: &str, chapters: usize) -> MediaMetadata {
        MediaMetadata {
            format: Format {
                filename: filename.to_string(),
                duration: format!("{}.000000", chapters * 10),
                ..Default::default()
            },
            chapters: (0..chapters as i64)
                .map(|i| Chapter::new(i * 10_000, (i + 1) * 10_000, format!("Chapter {}", i + 1)))
                .collect(),
        }
    }

    /// ffprobe JSON output for [`chaptered_media`].
    pub fn probe_json(filename: &str, chapters: usize) -> String {
        let meta = chaptered_media(filename, chapters);
        let chapters: Vec<_> = meta
            .chapters
            .iter()
            .enumerate()
            .map(|(id, c)| {
                json!({
                    "id": id,
                    "time_base": c.timebase,
                    "start": c.start,
                    "end": c.end,
                    "tags": {"title": c.title},
                })
            })
            .collect();

        json!({
            "format": {
                "filename": meta.format.filename,
                "duration": meta.format.duration,
                "size": "1048576",
                "bit_rate": "64000",
                "tags": {"title": "Fixture", "artist": "Tester"},
            },
            "streams": [
                {"index": 0, "codec_type": "audio", "codec_name": "aac"},
            ],
            "chapters": chapters,
        })
        .to_string()
    }
}
