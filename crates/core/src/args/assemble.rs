//! Stage-by-stage argument assembly.

use std::path::Path;

use super::builder::ArgList;
use super::error::ArgsError;
use super::padding::Padding;
use super::profile::{ArgumentProfile, Codec};
use crate::meta::MediaMetadata;

/// Input slots actually appended, by position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSlots {
    /// Number of `-i` arguments emitted.
    pub count: usize,
    pub meta: Option<usize>,
    pub cover: Option<usize>,
}

/// Builds the complete ffmpeg argument list.
///
/// The primary input is `media.format.filename` (skipped when empty); its
/// extension is the fallback output extension.
pub fn build_args(profile: &ArgumentProfile, media: &MediaMetadata) -> Result<ArgList, ArgsError> {
    let mut args = ArgList::new();

    push_globals(&mut args, profile);
    args.append(profile.pre_input.iter().cloned());
    let slots = push_inputs(&mut args, profile, &media.format.filename);
    push_mapping(&mut args, &slots);
    args.append(profile.post_input.iter().cloned());
    push_video(&mut args, profile);
    push_audio(&mut args, profile);
    args.push(output_name(profile, &media.format.filename)?);

    tracing::debug!(args = %args, "Assembled arguments");

    Ok(args)
}

/// Stages 1 and 2: log level and overwrite flag.
pub fn push_globals(args: &mut ArgList, profile: &ArgumentProfile) {
    if let Some(level) = profile.log_level.as_deref().filter(|l| !l.is_empty()) {
        args.append(["-v", level]);
    }
    if profile.overwrite {
        args.push("-y");
    }
}

/// Stage 4: primary, secondary, metadata and cover inputs, in that order.
pub fn push_inputs(args: &mut ArgList, profile: &ArgumentProfile, primary: &str) -> InputSlots {
    let mut slots = InputSlots::default();

    let mut add = |args: &mut ArgList, path: &str| {
        args.append(["-i", path]);
        slots.count += 1;
        slots.count - 1
    };

    if !primary.is_empty() {
        add(args, primary);
    }
    if let Some(input) = &profile.input {
        add(args, &path_str(input));
    }
    let meta = profile.meta_file.as_ref().map(|m| add(args, &path_str(m)));
    let cover = profile.cover_file.as_ref().map(|c| add(args, &path_str(c)));

    slots.meta = meta;
    slots.cover = cover;
    slots
}

/// Stage 5: stream mapping.
///
/// When a cover or metadata input exists, the first stream of input 0 is
/// mapped explicitly, then each extra input is mapped at the slot it was
/// appended to, in append order.
pub fn push_mapping(args: &mut ArgList, slots: &InputSlots) {
    if slots.cover.is_none() && slots.meta.is_none() {
        return;
    }

    args.append(["-map", "0:0"]);

    let mut extra: Vec<(usize, bool)> = Vec::with_capacity(2);
    if let Some(idx) = slots.meta {
        extra.push((idx, true));
    }
    if let Some(idx) = slots.cover {
        extra.push((idx, false));
    }
    extra.sort_by_key(|(idx, _)| *idx);

    for (idx, is_meta) in extra {
        if is_meta {
            args.append(["-map_metadata".to_string(), idx.to_string()]);
        } else {
            args.append(["-map".to_string(), format!("{}:0", idx)]);
        }
    }
}

/// Stage 7: video codec.
///
/// Filter-complex entries come first in `-vf`, followed by the video filters
/// when a codec is named. An unset codec emits the filter-complex entries
/// only.
pub fn push_video(args: &mut ArgList, profile: &ArgumentProfile) {
    let complex = non_empty(&profile.filter_complex);
    let mut filters = complex.clone();
    filters.extend(non_empty(&profile.video_filters));

    push_codec(
        args,
        &profile.video_codec,
        ["-vn", "-c:v", "-vf"],
        &profile.video_params,
        &filters,
        &complex,
    );
}

/// Stage 8: audio codec. Nothing is emitted while the codec is unset.
pub fn push_audio(args: &mut ArgList, profile: &ArgumentProfile) {
    let filters = non_empty(&profile.audio_filters);

    push_codec(
        args,
        &profile.audio_codec,
        ["-an", "-c:a", "-af"],
        &profile.audio_params,
        &filters,
        &[],
    );
}

fn non_empty(filters: &[String]) -> Vec<&str> {
    filters
        .iter()
        .map(String::as_str)
        .filter(|f| !f.is_empty())
        .collect()
}

fn push_codec(
    args: &mut ArgList,
    codec: &Codec,
    [disable_flag, codec_flag, filter_flag]: [&str; 3],
    params: &[String],
    filters: &[&str],
    unset_filters: &[&str],
) {
    let filters = match codec {
        Codec::Disabled => {
            args.push(disable_flag);
            if !filters.is_empty() {
                tracing::debug!(flag = filter_flag, "Stream disabled, dropping filters");
            }
            return;
        }
        Codec::Named(name) => {
            args.append([codec_flag, name.as_str()]);
            args.append(params.iter().cloned());
            filters
        }
        Codec::Unset => unset_filters,
    };

    if !filters.is_empty() {
        args.append([filter_flag.to_string(), filters.join(",")]);
    }
}

/// Stage 9: base name, optional chapter number, extension.
pub fn output_name(profile: &ArgumentProfile, primary: &str) -> Result<String, ArgsError> {
    let mut name = profile.output.clone();

    if let (Some(pattern), Some(number)) = (profile.padding.as_deref(), profile.number) {
        name.push_str(&Padding::parse(pattern)?.apply(number));
    }

    let ext = profile.ext_override().unwrap_or_else(|| {
        Path::new(primary)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e))
            .unwrap_or_default()
    });
    name.push_str(&ext);

    Ok(name)
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::Format;
    use std::path::PathBuf;

    fn media(path: &str) -> MediaMetadata {
        MediaMetadata {
            format: Format {
                filename: path.to_string(),
                ..Default::default()
            },
            chapters: Vec::new(),
        }
    }

    fn args_of(profile: &ArgumentProfile) -> Vec<String> {
        build_args(profile, &media("/in/book.m4a")).unwrap().into_vec()
    }

    #[test]
    fn test_primary_input_with_audio_codec() {
        let profile = ArgumentProfile {
            audio_codec: Codec::named("aac"),
            output: "out".to_string(),
            ..Default::default()
        };
        let args = args_of(&profile);
        assert_eq!(args, ["-i", "/in/book.m4a", "-c:a", "aac", "out.m4a"]);
        assert!(!args.contains(&"-map".to_string()));
    }

    #[test]
    fn test_globals_and_pre_input_come_first() {
        let profile = ArgumentProfile {
            log_level: Some("error".to_string()),
            overwrite: true,
            pre_input: vec!["-ss".into(), "10.000".into(), "-to".into(), "20.000".into()],
            post_input: vec!["-map_chapters".into(), "-1".into()],
            output: "cut".to_string(),
            ..Default::default()
        };
        let args = args_of(&profile);
        assert_eq!(
            args,
            [
                "-v", "error", "-y", "-ss", "10.000", "-to", "20.000", "-i", "/in/book.m4a",
                "-map_chapters", "-1", "cut.m4a"
            ]
        );
    }

    #[test]
    fn test_cover_and_meta_mapping() {
        let profile = ArgumentProfile {
            meta_file: Some(PathBuf::from("meta.ini")),
            cover_file: Some(PathBuf::from("cover.jpg")),
            output: "tagged".to_string(),
            ..Default::default()
        };
        let list = build_args(&profile, &media("/in/book.m4a")).unwrap();
        assert_eq!(list.count("-map"), 2);
        assert_eq!(list.count("-map_metadata"), 1);

        let args = list.into_vec();
        assert_eq!(
            &args[..6],
            ["-i", "/in/book.m4a", "-i", "meta.ini", "-i", "cover.jpg"]
        );
        assert_eq!(
            &args[6..12],
            ["-map", "0:0", "-map_metadata", "1", "-map", "2:0"]
        );
    }

    #[test]
    fn test_mapping_tracks_secondary_input() {
        let profile = ArgumentProfile {
            input: Some(PathBuf::from("list.txt")),
            cover_file: Some(PathBuf::from("cover.jpg")),
            ..Default::default()
        };
        let mut args = ArgList::new();
        let slots = push_inputs(&mut args, &profile, "/in/book.m4a");
        assert_eq!(
            slots,
            InputSlots {
                count: 3,
                meta: None,
                cover: Some(2)
            }
        );
        push_mapping(&mut args, &slots);
        assert_eq!(&args.as_slice()[6..], ["-map", "0:0", "-map", "2:0"]);
    }

    #[test]
    fn test_meta_only_mapping() {
        let profile = ArgumentProfile {
            meta_file: Some(PathBuf::from("meta.ini")),
            ..Default::default()
        };
        let args = args_of(&profile);
        assert_eq!(
            &args[4..8],
            ["-map", "0:0", "-map_metadata", "1"]
        );
    }

    #[test]
    fn test_disabled_codecs() {
        let profile = ArgumentProfile {
            video_codec: Codec::Disabled,
            audio_codec: Codec::Disabled,
            video_filters: vec!["scale=100:100".into()],
            post_input: vec!["-f".into(), "ffmetadata".into()],
            output: "ffmeta".to_string(),
            ext: Some(".ini".to_string()),
            ..Default::default()
        };
        let args = args_of(&profile);
        assert_eq!(
            args,
            ["-i", "/in/book.m4a", "-f", "ffmetadata", "-vn", "-an", "ffmeta.ini"]
        );
    }

    #[test]
    fn test_video_filters_concatenate_filter_complex_first() {
        let profile = ArgumentProfile {
            video_codec: Codec::named("libx264"),
            video_params: vec!["-crf".into(), "23".into()],
            video_filters: vec!["scale=640:-2".into()],
            filter_complex: vec!["fps=24".into()],
            audio_codec: Codec::copy(),
            audio_filters: vec!["volume=2".into(), "aresample=44100".into()],
            output: "v".to_string(),
            ..Default::default()
        };
        let args = args_of(&profile);
        assert_eq!(
            &args[2..],
            [
                "-c:v", "libx264", "-crf", "23", "-vf", "fps=24,scale=640:-2", "-c:a", "copy",
                "-af", "volume=2,aresample=44100", "v.m4a"
            ]
        );
        assert_eq!(args.iter().filter(|a| *a == "-vf").count(), 1);
    }

    #[test]
    fn test_unset_codec_still_filters() {
        let profile = ArgumentProfile {
            filter_complex: vec!["fps=24".into()],
            output: "v".to_string(),
            ..Default::default()
        };
        assert_eq!(
            args_of(&profile),
            ["-i", "/in/book.m4a", "-vf", "fps=24", "v.m4a"]
        );
    }

    #[test]
    fn test_unset_codec_drops_stream_filters() {
        let profile = ArgumentProfile {
            video_filters: vec!["scale=1:1".into()],
            audio_filters: vec!["volume=2".into()],
            output: "o".to_string(),
            ..Default::default()
        };
        assert_eq!(args_of(&profile), ["-i", "/in/book.m4a", "o.m4a"]);

        let profile = ArgumentProfile {
            video_filters: vec!["scale=1:1".into()],
            filter_complex: vec!["fps=24".into()],
            output: "o".to_string(),
            ..Default::default()
        };
        assert_eq!(
            args_of(&profile),
            ["-i", "/in/book.m4a", "-vf", "fps=24", "o.m4a"]
        );
    }

    #[test]
    fn test_output_padding_and_ext() {
        let mut profile = ArgumentProfile {
            output: "book-".to_string(),
            padding: Some("%02d".to_string()),
            number: Some(3),
            ..Default::default()
        };
        assert_eq!(output_name(&profile, "/in/a.mp3").unwrap(), "book-03.mp3");

        profile.ext = Some("opus".to_string());
        assert_eq!(output_name(&profile, "/in/a.mp3").unwrap(), "book-03.opus");

        profile.number = None;
        assert_eq!(output_name(&profile, "/in/a.mp3").unwrap(), "book-.opus");
    }

    #[test]
    fn test_empty_output_name() {
        let profile = ArgumentProfile {
            padding: Some("%d".to_string()),
            number: Some(1),
            ..Default::default()
        };
        assert_eq!(output_name(&profile, "a.mp3").unwrap(), "1.mp3");
        assert_eq!(
            output_name(&ArgumentProfile::default(), "a.mp3").unwrap(),
            ".mp3"
        );
    }

    #[test]
    fn test_invalid_padding_is_an_error() {
        let profile = ArgumentProfile {
            padding: Some("%s".to_string()),
            number: Some(1),
            ..Default::default()
        };
        assert!(matches!(
            build_args(&profile, &media("a.mp3")),
            Err(ArgsError::InvalidPadding { .. })
        ));
    }

    #[test]
    fn test_no_primary_input() {
        let profile = ArgumentProfile {
            pre_input: vec!["-f".into(), "concat".into(), "-safe".into(), "0".into()],
            input: Some(PathBuf::from("/tmp/list")),
            video_codec: Codec::Disabled,
            output: "joined".to_string(),
            ext: Some(".mp3".to_string()),
            ..Default::default()
        };
        let args = build_args(&profile, &MediaMetadata::default())
            .unwrap()
            .into_vec();
        assert_eq!(
            args,
            ["-f", "concat", "-safe", "0", "-i", "/tmp/list", "-vn", "joined.mp3"]
        );
    }
}
