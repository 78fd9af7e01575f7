//! Media probe adapter.
//!
//! Turns an ffprobe JSON report into the shared metadata model. The adapter
//! is read-only: a [`ProbedMedia`] is never changed after construction.

mod media;
mod types;

pub use media::{probe_command, ProbedMedia, PROBE_ARGS};
pub use types::{ProbeChapter, ProbeFormat, ProbeReport};
