//! Text codecs for the shared metadata model.
//!
//! - [`ffmeta`]: ffmpeg's `;FFMETADATA1` INI format (parse + serialize)
//! - [`cue`]: cue sheets (parse + serialize, lossy on the final chapter end)
//! - [`json`]: JSON summary (serialize only)
//!
//! All parsers are all-or-nothing: malformed input yields a
//! [`MetadataError`](crate::meta::MetadataError) and no metadata.

pub mod cue;
pub mod ffmeta;
pub mod json;
