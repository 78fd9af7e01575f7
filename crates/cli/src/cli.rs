//! Command line definition.

use clap::{ArgGroup, Args, Parser, Subcommand};
use std::path::PathBuf;

use avtools_core::{CutRange, ExtractMode, OperationOptions, RemoveTargets};

#[derive(Debug, Parser)]
#[command(
    name = "avtools",
    version,
    about = "Split, join, and edit chapters, tags and cover art with ffmpeg"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Configuration file (defaults to $AVTOOLS_CONFIG).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Argument profile to use.
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    /// Overwrite existing output files.
    #[arg(short = 'y', long, global = true)]
    pub overwrite: bool,

    /// Output base name.
    #[arg(short, long, global = true)]
    pub output: Option<String>,

    /// Log ffmpeg output and debug messages.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Chapter source files.
#[derive(Debug, Default, Args)]
pub struct ChapterSource {
    /// Cue sheet.
    #[arg(short = 'c', long = "cuesheet")]
    pub cue_file: Option<PathBuf>,

    /// FFmpeg metadata file.
    #[arg(short = 'f', long = "ffmeta")]
    pub meta_file: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract chapters, cover art or metadata.
    #[command(group(ArgGroup::new("mode").required(true)))]
    Extract {
        input: PathBuf,
        /// Write chapters as a cue sheet.
        #[arg(long, group = "mode")]
        cue: bool,
        /// Extract embedded album art.
        #[arg(long, group = "mode")]
        cover: bool,
        /// Extract ffmpeg metadata.
        #[arg(long, group = "mode")]
        meta: bool,
        /// Write a JSON summary.
        #[arg(long, group = "mode")]
        json: bool,
        #[command(flatten)]
        source: ChapterSource,
    },

    /// Join every file with the given extension in the current directory.
    Join {
        /// Extension, with or without the leading dot.
        ext: String,
    },

    /// Remove chapters, cover art and/or metadata.
    Rm {
        input: PathBuf,
        #[arg(long)]
        chapters: bool,
        #[arg(long)]
        cover: bool,
        #[arg(long)]
        meta: bool,
    },

    /// Cut a chapter or a time span.
    #[command(group(
        ArgGroup::new("range")
            .required(true)
            .multiple(true)
            .args(["chapter", "start", "end"])
    ))]
    Cut {
        input: PathBuf,
        /// 1-based chapter number.
        #[arg(long, conflicts_with_all = ["start", "end"])]
        chapter: Option<u32>,
        /// Start in seconds.
        #[arg(short = 's', long)]
        start: Option<String>,
        /// End in seconds.
        #[arg(short = 'e', long)]
        end: Option<String>,
        #[command(flatten)]
        source: ChapterSource,
    },

    /// Split into one file per chapter.
    Split {
        input: PathBuf,
        #[command(flatten)]
        source: ChapterSource,
    },

    /// Add album art or replace metadata.
    Update {
        input: PathBuf,
        /// Image to attach.
        #[arg(short = 'a', long = "album-art")]
        cover_file: Option<PathBuf>,
        #[command(flatten)]
        source: ChapterSource,
    },

    /// Print a JSON summary of the file.
    Show {
        input: PathBuf,
        /// Merge tags and chapters from an ffmpeg metadata file.
        #[arg(short = 'f', long = "ffmeta")]
        meta_file: Option<PathBuf>,
    },
}

impl Command {
    /// Primary input, for every command except join.
    pub fn input(&self) -> Option<&PathBuf> {
        match self {
            Command::Extract { input, .. }
            | Command::Rm { input, .. }
            | Command::Cut { input, .. }
            | Command::Split { input, .. }
            | Command::Update { input, .. }
            | Command::Show { input, .. } => Some(input),
            Command::Join { .. } => None,
        }
    }

    /// Per-call options built from the global flags and the command's own.
    pub fn options(&self, global: &GlobalArgs) -> OperationOptions {
        let mut options = OperationOptions {
            output: global.output.clone(),
            overwrite: global.overwrite,
            ..Default::default()
        };

        match self {
            Command::Extract { source, .. }
            | Command::Cut { source, .. }
            | Command::Split { source, .. } => {
                options.cue_file = source.cue_file.clone();
                options.meta_file = source.meta_file.clone();
            }
            Command::Update {
                cover_file, source, ..
            } => {
                options.cover_file = cover_file.clone();
                options.cue_file = source.cue_file.clone();
                options.meta_file = source.meta_file.clone();
            }
            Command::Show { meta_file, .. } => {
                options.meta_file = meta_file.clone();
            }
            Command::Join { .. } | Command::Rm { .. } => {}
        }

        options
    }
}

pub fn extract_mode(cue: bool, cover: bool, meta: bool) -> ExtractMode {
    match (cue, cover, meta) {
        (true, _, _) => ExtractMode::Cue,
        (_, true, _) => ExtractMode::Cover,
        (_, _, true) => ExtractMode::Meta,
        _ => ExtractMode::Json,
    }
}

pub fn remove_targets(chapters: bool, cover: bool, meta: bool) -> RemoveTargets {
    RemoveTargets {
        chapters,
        cover,
        meta,
    }
}

pub fn cut_range(chapter: Option<u32>, start: Option<String>, end: Option<String>) -> CutRange {
    match chapter {
        Some(chapter) => CutRange::Chapter(chapter),
        None => CutRange::Span {
            start: start.unwrap_or_default(),
            end: end.unwrap_or_default(),
            number: 1,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_split_with_cue() {
        let cli = Cli::parse_from(["avtools", "split", "book.m4b", "-c", "book.cue", "-y"]);
        let options = cli.command.options(&cli.global);
        assert_eq!(options.cue_file, Some(PathBuf::from("book.cue")));
        assert!(options.overwrite);
        assert_eq!(cli.command.input(), Some(&PathBuf::from("book.m4b")));
    }

    #[test]
    fn test_extract_requires_mode() {
        assert!(Cli::try_parse_from(["avtools", "extract", "book.m4b"]).is_err());
        let cli = Cli::try_parse_from(["avtools", "extract", "book.m4b", "--cover"]).unwrap();
        assert!(matches!(cli.command, Command::Extract { cover: true, .. }));
    }

    #[test]
    fn test_cut_chapter_conflicts_with_span() {
        assert!(Cli::try_parse_from(["avtools", "cut", "a.mp3", "--chapter", "2", "-s", "5"]).is_err());
        assert!(Cli::try_parse_from(["avtools", "cut", "a.mp3"]).is_err());
        assert!(Cli::try_parse_from(["avtools", "cut", "a.mp3", "-s", "5", "-e", "9"]).is_ok());
    }

    #[test]
    fn test_update_flags() {
        let cli = Cli::parse_from(["avtools", "update", "a.mp3", "-a", "cover.jpg", "-f", "meta.ini"]);
        let options = cli.command.options(&cli.global);
        assert_eq!(options.cover_file, Some(PathBuf::from("cover.jpg")));
        assert_eq!(options.meta_file, Some(PathBuf::from("meta.ini")));
        assert_eq!(options.cue_file, None);
    }

    #[test]
    fn test_helpers() {
        assert_eq!(extract_mode(false, false, true), ExtractMode::Meta);
        assert_eq!(extract_mode(false, false, false), ExtractMode::Json);
        assert_eq!(
            cut_range(None, Some("1.5".into()), None),
            CutRange::Span {
                start: "1.5".into(),
                end: String::new(),
                number: 1
            }
        );
        assert_eq!(cut_range(Some(3), None, None), CutRange::Chapter(3));
        assert!(remove_targets(true, false, false).chapters);
    }
}
