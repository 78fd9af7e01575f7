//! The orchestrator: named operations over a [`CommandRunner`].

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::error::OperationError;
use super::types::{CutRange, ExtractMode, OperationOptions, OperationReport, RemoveTargets};
use crate::args::{build_args, ArgumentProfile, Codec};
use crate::codec::{cue, ffmeta, json};
use crate::config::Config;
use crate::meta::{Chapter, MediaMetadata};
use crate::probe::{probe_command, ProbeReport, ProbedMedia};
use crate::runner::{CommandRunner, Invocation};

/// Padding used by cut and split when the profile has none.
const DEFAULT_SEGMENT_PADDING: &str = "%d";

/// Runs named operations, delegating process execution to `R`.
pub struct Orchestrator<R: CommandRunner> {
    runner: R,
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
}

impl<R: CommandRunner> Orchestrator<R> {
    /// Creates an orchestrator using the program paths from `config`.
    pub fn new(runner: R, config: &Config) -> Self {
        Self::with_programs(runner, &config.ffmpeg_path, &config.ffprobe_path)
    }

    /// Creates an orchestrator with explicit program paths.
    pub fn with_programs(runner: R, ffmpeg: impl AsRef<Path>, ffprobe: impl AsRef<Path>) -> Self {
        Self {
            runner,
            ffmpeg: ffmpeg.as_ref().to_path_buf(),
            ffprobe: ffprobe.as_ref().to_path_buf(),
        }
    }

    /// Returns a reference to the runner.
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Probes `path` with ffprobe.
    pub async fn probe(&self, path: &Path) -> Result<ProbedMedia, OperationError> {
        let invocation = probe_command(&self.ffprobe, path);
        let output = self.runner.output(&invocation).await?;
        let report = ProbeReport::from_json(&output)?;
        let media = ProbedMedia::from_report(path, report);

        debug!(
            path = %path.display(),
            chapters = media.metadata.chapters.len(),
            has_cover = media.has_cover,
            "Probed media"
        );

        Ok(media)
    }

    /// Resolves chapters from exactly one source.
    ///
    /// Precedence: cue file, then ffmetadata file, then chapters embedded in
    /// the primary input. A final chapter with no end is closed at the
    /// input's duration.
    pub async fn resolve_chapters(
        &self,
        media: &ProbedMedia,
        options: &OperationOptions,
    ) -> Result<Vec<Chapter>, OperationError> {
        let (source, chapters) = if let Some(cue_file) = &options.cue_file {
            let text = tokio::fs::read_to_string(cue_file).await?;
            ("cue", cue::parse(&text)?.chapters)
        } else if let Some(meta_file) = &options.meta_file {
            let text = tokio::fs::read_to_string(meta_file).await?;
            ("ffmeta", ffmeta::parse(&text)?.chapters)
        } else {
            ("embedded", media.metadata.chapters.clone())
        };

        if chapters.is_empty() {
            return Err(OperationError::NoChapters);
        }

        let mut resolved = MediaMetadata {
            format: media.metadata.format.clone(),
            chapters,
        };
        if resolved.chapters.last().is_some_and(|c| c.end == 0) {
            resolved.last_chapter_end();
        }

        debug!(source, count = resolved.chapters.len(), "Resolved chapters");

        Ok(resolved.chapters)
    }

    /// Extracts chapters, cover art, metadata or a JSON summary.
    pub async fn extract(
        &self,
        media: &ProbedMedia,
        profile: &ArgumentProfile,
        options: &OperationOptions,
        mode: ExtractMode,
    ) -> Result<OperationReport, OperationError> {
        match mode {
            ExtractMode::Cue => {
                let chapters = self.resolve_chapters(media, options).await?;
                let meta = MediaMetadata {
                    format: media.metadata.format.clone(),
                    chapters,
                };
                let path = format!("{}.cue", output_or(options, &media.stem()));
                write_file(&path, cue::serialize(&meta)).await?;
                Ok(OperationReport::single(path))
            }
            ExtractMode::Json => {
                let text = self.show(media, options).await?;
                let path = format!("{}.json", output_or(options, &media.stem()));
                write_file(&path, text).await?;
                Ok(OperationReport::single(path))
            }
            ExtractMode::Cover => {
                let mut profile = prepare(profile, options, "cover");
                profile.audio_codec = Codec::Disabled;
                profile.video_codec = Codec::copy();
                profile.ext = Some(".jpg".to_string());
                let output = self.run_engine(&profile, &media.metadata).await?;
                Ok(OperationReport::single(output))
            }
            ExtractMode::Meta => {
                let mut profile = prepare(profile, options, "ffmeta");
                profile.push_post(["-f", "ffmetadata"]);
                profile.audio_codec = Codec::Disabled;
                profile.video_codec = Codec::Disabled;
                profile.ext = Some(".ini".to_string());
                let output = self.run_engine(&profile, &media.metadata).await?;
                Ok(OperationReport::single(output))
            }
        }
    }

    /// Concatenates `files` into one output with the concat demuxer.
    ///
    /// The list file lives until the engine returns.
    pub async fn join(
        &self,
        files: &[PathBuf],
        ext: &str,
        profile: &ArgumentProfile,
        options: &OperationOptions,
    ) -> Result<OperationReport, OperationError> {
        if files.is_empty() {
            return Err(OperationError::InvalidRequest(format!(
                "no files with extension '{}' to join",
                ext
            )));
        }

        let mut list = tempfile::Builder::new()
            .prefix("avtools-concat-")
            .suffix(".txt")
            .tempfile()?;
        list.write_all(concat_list(files).as_bytes())?;
        list.flush()?;
        debug!(path = %list.path().display(), files = files.len(), "Wrote concat list");

        let mut profile = prepare(profile, options, "joined");
        profile.push_pre(["-f", "concat", "-safe", "0"]);
        profile.input = Some(list.path().to_path_buf());
        profile.video_codec = Codec::Disabled;
        profile.ext = Some(ext.to_string());

        let output = self.run_engine(&profile, &MediaMetadata::default()).await?;
        drop(list);

        Ok(OperationReport::single(output))
    }

    /// Strips chapters, cover art and/or global metadata.
    pub async fn remove(
        &self,
        media: &ProbedMedia,
        profile: &ArgumentProfile,
        options: &OperationOptions,
        targets: RemoveTargets,
    ) -> Result<OperationReport, OperationError> {
        let mut profile = prepare(profile, options, &format!("{}-stripped", media.stem()));

        if targets.chapters {
            profile.push_post(["-map_chapters", "-1"]);
        }
        if targets.cover {
            profile.video_codec = Codec::Disabled;
        }
        if targets.meta {
            profile.push_post(["-map_metadata", "-1"]);
        }

        let output = self.run_engine(&profile, &media.metadata).await?;
        Ok(OperationReport::single(output))
    }

    /// Cuts one chapter or an explicit time span.
    pub async fn cut(
        &self,
        media: &ProbedMedia,
        profile: &ArgumentProfile,
        options: &OperationOptions,
        range: CutRange,
    ) -> Result<OperationReport, OperationError> {
        let (start, end, number) = match range {
            CutRange::Chapter(chapter) => {
                let chapters = self.resolve_chapters(media, options).await?;
                let selected = (chapter as usize)
                    .checked_sub(1)
                    .and_then(|idx| chapters.get(idx))
                    .ok_or(OperationError::ChapterOutOfRange {
                        chapter,
                        available: chapters.len(),
                    })?;
                (
                    selected.start_to_seconds(),
                    selected.end_to_seconds(),
                    chapter,
                )
            }
            CutRange::Span { start, end, number } => (start, end, number),
        };

        let output = self
            .cut_segment(media, profile, options, &start, &end, number)
            .await?;
        Ok(OperationReport::single(output))
    }

    /// Cuts every resolved chapter into its own file, one run at a time.
    pub async fn split(
        &self,
        media: &ProbedMedia,
        profile: &ArgumentProfile,
        options: &OperationOptions,
    ) -> Result<OperationReport, OperationError> {
        let chapters = self.resolve_chapters(media, options).await?;
        let mut report = OperationReport::default();

        for (idx, chapter) in chapters.iter().enumerate() {
            let output = self
                .cut_segment(
                    media,
                    profile,
                    options,
                    &chapter.start_to_seconds(),
                    &chapter.end_to_seconds(),
                    idx as u32 + 1,
                )
                .await?;
            report.outputs.push(output);
        }

        info!(count = report.outputs.len(), "Split complete");

        Ok(report)
    }

    /// Muxes a new cover and/or metadata into the primary input.
    ///
    /// A cue file is converted to a temporary ffmetadata file first.
    pub async fn update(
        &self,
        media: &ProbedMedia,
        profile: &ArgumentProfile,
        options: &OperationOptions,
    ) -> Result<OperationReport, OperationError> {
        if options.cover_file.is_none() && options.meta_file.is_none() && options.cue_file.is_none()
        {
            return Err(OperationError::InvalidRequest(
                "update needs a cover, ffmetadata or cue file".to_string(),
            ));
        }

        let mut profile = prepare(profile, options, &format!("{}-updated", media.stem()));

        // Held until the engine returns.
        let mut converted = None;
        if let Some(cue_file) = &options.cue_file {
            let text = tokio::fs::read_to_string(cue_file).await?;
            let mut meta = cue::parse(&text)?;
            meta.format.duration = media.metadata.format.duration.clone();
            meta.last_chapter_end();

            let mut file = tempfile::Builder::new()
                .prefix("avtools-ffmeta-")
                .suffix(".ini")
                .tempfile()?;
            file.write_all(ffmeta::serialize(&meta).as_bytes())?;
            file.flush()?;
            debug!(path = %file.path().display(), "Converted cue sheet to ffmetadata");

            profile.meta_file = Some(file.path().to_path_buf());
            converted = Some(file);
        } else if let Some(meta_file) = &options.meta_file {
            profile.meta_file = Some(meta_file.clone());
        }

        if let Some(cover) = &options.cover_file {
            profile.cover_file = Some(cover.clone());
            if profile.video_codec.is_unset() {
                profile.video_codec = Codec::copy();
            }
            profile.push_post(["-disposition:v:0", "attached_pic"]);
        }
        if profile.audio_codec.is_unset() {
            profile.audio_codec = Codec::copy();
        }

        let output = self.run_engine(&profile, &media.metadata).await?;
        drop(converted);

        Ok(OperationReport::single(output))
    }

    /// JSON summary of the primary input.
    ///
    /// Tags and chapters from an ffmetadata file, when given, take
    /// precedence over the probed ones.
    pub async fn show(
        &self,
        media: &ProbedMedia,
        options: &OperationOptions,
    ) -> Result<String, OperationError> {
        let mut meta = media.metadata.clone();

        if let Some(meta_file) = &options.meta_file {
            let text = tokio::fs::read_to_string(meta_file).await?;
            let extra = ffmeta::parse(&text)?;
            if extra.has_chapters() {
                meta.chapters = extra.chapters;
            }
            meta.format.tags.extend(extra.format.tags);
        }

        Ok(json::serialize(&meta)?)
    }

    async fn cut_segment(
        &self,
        media: &ProbedMedia,
        profile: &ArgumentProfile,
        options: &OperationOptions,
        start: &str,
        end: &str,
        number: u32,
    ) -> Result<String, OperationError> {
        let mut profile = prepare(profile, options, &format!("{}-", media.stem()));

        profile.pre_input.clear();
        if !start.is_empty() {
            profile.push_pre(["-ss", start]);
        }
        if !end.is_empty() && end != "0" {
            profile.push_pre(["-to", end]);
        }
        if profile.padding.is_none() {
            profile.padding = Some(DEFAULT_SEGMENT_PADDING.to_string());
        }
        profile.number = Some(number);

        self.run_engine(&profile, &media.metadata).await
    }

    async fn run_engine(
        &self,
        profile: &ArgumentProfile,
        media: &MediaMetadata,
    ) -> Result<String, OperationError> {
        let args = build_args(profile, media)?;
        let invocation = Invocation::new(&self.ffmpeg, args.into_vec());
        let output = invocation.output().unwrap_or_default().to_string();

        info!(runner = self.runner.name(), output = %output, "Running ffmpeg");
        self.runner.run(&invocation).await?;

        Ok(output)
    }
}

/// Renders the concat demuxer list for `files`.
pub fn concat_list(files: &[PathBuf]) -> String {
    files
        .iter()
        .map(|f| {
            let path = f.to_string_lossy().replace('\'', r"'\''");
            format!("file '{}'\n", path)
        })
        .collect()
}

/// Private copy of `profile` with the per-call options applied.
fn prepare(
    profile: &ArgumentProfile,
    options: &OperationOptions,
    default_output: &str,
) -> ArgumentProfile {
    let mut profile = profile.clone();
    if options.overwrite {
        profile.overwrite = true;
    }
    if let Some(output) = options.output.as_deref().filter(|o| !o.is_empty()) {
        profile.output = output.to_string();
    } else if profile.output.is_empty() {
        profile.output = default_output.to_string();
    }
    profile
}

fn output_or(options: &OperationOptions, fallback: &str) -> String {
    options
        .output
        .clone()
        .filter(|o| !o.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

async fn write_file(path: &str, contents: String) -> Result<(), OperationError> {
    tokio::fs::write(path, contents).await?;
    info!(path, "Wrote file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockRunner;

    const PROBE_JSON: &str = r#"{
        "format": {
            "filename": "/books/novel.m4b",
            "duration": "30.000000",
            "size": "1024",
            "bit_rate": "64000",
            "tags": {"title": "Novel", "artist": "Author"}
        },
        "streams": [
            {"index": 0, "codec_type": "audio", "codec_name": "aac"},
            {"index": 1, "codec_type": "video", "codec_name": "mjpeg",
             "disposition": {"attached_pic": 1}}
        ],
        "chapters": [
            {"time_base": "1/1000", "start": 0, "end": 10000, "tags": {"title": "One"}},
            {"time_base": "1/1000", "start": 10000, "end": 30000, "tags": {"title": "Two"}}
        ]
    }"#;

    fn orchestrator() -> Orchestrator<MockRunner> {
        Orchestrator::with_programs(MockRunner::new(), "ffmpeg", "ffprobe")
    }

    fn media() -> ProbedMedia {
        let report = ProbeReport::from_json(PROBE_JSON).unwrap();
        ProbedMedia::from_report("/books/novel.m4b", report)
    }

    #[tokio::test]
    async fn test_probe_uses_runner_output() {
        let orch = orchestrator();
        orch.runner().set_probe_output(PROBE_JSON).await;

        let media = orch.probe(Path::new("/books/novel.m4b")).await.unwrap();
        assert_eq!(media.metadata.chapters.len(), 2);
        assert!(media.has_cover);

        let recorded = orch.runner().recorded().await;
        assert_eq!(recorded[0].program, PathBuf::from("ffprobe"));
        assert_eq!(recorded[0].output(), Some("/books/novel.m4b"));
    }

    #[tokio::test]
    async fn test_embedded_chapters_used_without_files() {
        let orch = orchestrator();
        let chapters = orch
            .resolve_chapters(&media(), &OperationOptions::default())
            .await
            .unwrap();
        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[1].title, "Two");
    }

    #[tokio::test]
    async fn test_no_chapters_is_reported() {
        let orch = orchestrator();
        let media = ProbedMedia::from_path("/books/plain.mp3");
        let err = orch
            .resolve_chapters(&media, &OperationOptions::default())
            .await
            .unwrap_err();
        assert!(err.is_no_chapters());
    }

    #[tokio::test]
    async fn test_cut_chapter_sets_seek_and_number() {
        let orch = orchestrator();
        let report = orch
            .cut(
                &media(),
                &ArgumentProfile::default(),
                &OperationOptions::default(),
                CutRange::Chapter(2),
            )
            .await
            .unwrap();
        assert_eq!(report.outputs, vec!["novel-2.m4b"]);

        let recorded = orch.runner().recorded().await;
        assert_eq!(recorded[0].arg_value("-ss"), Some("10.000"));
        assert_eq!(recorded[0].arg_value("-to"), Some("30.000"));
    }

    #[tokio::test]
    async fn test_cut_chapter_out_of_range() {
        let orch = orchestrator();
        let err = orch
            .cut(
                &media(),
                &ArgumentProfile::default(),
                &OperationOptions::default(),
                CutRange::Chapter(3),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            OperationError::ChapterOutOfRange {
                chapter: 3,
                available: 2
            }
        ));
        assert_eq!(orch.runner().invocation_count().await, 0);
    }

    #[tokio::test]
    async fn test_cut_span_skips_zero_end() {
        let orch = orchestrator();
        orch.cut(
            &media(),
            &ArgumentProfile::default(),
            &OperationOptions::default(),
            CutRange::Span {
                start: "0".to_string(),
                end: "0".to_string(),
                number: 1,
            },
        )
        .await
        .unwrap();

        let recorded = orch.runner().recorded().await;
        assert_eq!(recorded[0].arg_value("-ss"), Some("0"));
        assert_eq!(recorded[0].arg_value("-to"), None);
    }

    #[tokio::test]
    async fn test_extract_cover_args() {
        let orch = orchestrator();
        let report = orch
            .extract(
                &media(),
                &ArgumentProfile::default(),
                &OperationOptions::default(),
                ExtractMode::Cover,
            )
            .await
            .unwrap();
        assert_eq!(report.outputs, vec!["cover.jpg"]);

        let args = orch.runner().recorded().await[0].args.clone();
        assert!(args.contains(&"-an".to_string()));
        assert_eq!(
            args.iter().position(|a| a == "-c:v").map(|i| args[i + 1].as_str()),
            Some("copy")
        );
    }

    #[tokio::test]
    async fn test_extract_meta_forces_ffmetadata() {
        let orch = orchestrator();
        let report = orch
            .extract(
                &media(),
                &ArgumentProfile::default(),
                &OperationOptions::default(),
                ExtractMode::Meta,
            )
            .await
            .unwrap();
        assert_eq!(report.outputs, vec!["ffmeta.ini"]);

        let recorded = orch.runner().recorded().await;
        assert_eq!(recorded[0].arg_value("-f"), Some("ffmetadata"));
        assert!(recorded[0].args.contains(&"-vn".to_string()));
        assert!(recorded[0].args.contains(&"-an".to_string()));
    }

    #[tokio::test]
    async fn test_remove_all_targets() {
        let orch = orchestrator();
        let targets = RemoveTargets {
            chapters: true,
            cover: true,
            meta: true,
        };
        let report = orch
            .remove(
                &media(),
                &ArgumentProfile::default(),
                &OperationOptions::default(),
                targets,
            )
            .await
            .unwrap();
        assert_eq!(report.outputs, vec!["novel-stripped.m4b"]);

        let recorded = orch.runner().recorded().await;
        assert_eq!(recorded[0].arg_value("-map_chapters"), Some("-1"));
        assert_eq!(recorded[0].arg_value("-map_metadata"), Some("-1"));
        assert!(recorded[0].args.contains(&"-vn".to_string()));
    }

    #[tokio::test]
    async fn test_update_requires_something() {
        let orch = orchestrator();
        let err = orch
            .update(
                &media(),
                &ArgumentProfile::default(),
                &OperationOptions::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, OperationError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_run_failure_propagates() {
        let orch = orchestrator();
        orch.runner().fail_next(1).await;
        let err = orch
            .remove(
                &media(),
                &ArgumentProfile::default(),
                &OperationOptions::default(),
                RemoveTargets::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, OperationError::Run(_)));
    }

    #[tokio::test]
    async fn test_show_reports_summary() {
        let orch = orchestrator();
        let text = orch
            .show(&media(), &OperationOptions::default())
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["title"], "Novel");
        assert_eq!(value["duration"], "00:00:30");
    }

    #[test]
    fn test_concat_list_escapes_quotes() {
        let list = concat_list(&[
            PathBuf::from("/music/a.mp3"),
            PathBuf::from("/music/it's.mp3"),
        ]);
        assert_eq!(list, "file '/music/a.mp3'\nfile '/music/it'\\''s.mp3'\n");
    }

    #[test]
    fn test_prepare_applies_options() {
        let options = OperationOptions {
            output: Some("custom".to_string()),
            overwrite: true,
            ..Default::default()
        };
        let profile = prepare(&ArgumentProfile::default(), &options, "fallback");
        assert_eq!(profile.output, "custom");
        assert!(profile.overwrite);

        let profile = prepare(&ArgumentProfile::default(), &OperationOptions::default(), "fallback");
        assert_eq!(profile.output, "fallback");
    }
}
