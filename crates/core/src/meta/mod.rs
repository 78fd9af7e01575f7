//! Shared metadata model.
//!
//! Every format codec parses into, and serializes from, the types in this
//! module. Chapter boundaries are stored as integer ticks of a rational
//! timebase (`1/N`), and all seconds/tick conversions go through
//! [`Chapter`] and [`timebase`].
//!
//! # Example
//!
//! ```ignore
//! use avtools_core::meta::{Chapter, MediaMetadata};
//!
//! let chapter = Chapter::new(90_493, 120_000, "Intro");
//! assert_eq!(chapter.start_to_seconds(), "90.493");
//! assert_eq!(chapter.cue_stamp(), "01:30:00");
//! ```

mod error;
pub mod timebase;
mod types;

pub use error::MetadataError;
pub use timebase::{parse_timebase, seconds_to_ticks, ticks_to_seconds, DEFAULT_TIMEBASE};
pub use types::{Chapter, Format, MediaMetadata, Stream, Tags, SUMMARY_TAGS};
