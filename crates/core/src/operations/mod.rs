//! Operation orchestrator.
//!
//! Each named operation (extract, join, remove, cut, split, update, show)
//! picks a chapter source or codec, adjusts a private copy of the
//! [`ArgumentProfile`](crate::args::ArgumentProfile), and hands the
//! assembled arguments to a [`CommandRunner`](crate::runner::CommandRunner).
//! Invocations are strictly sequential; split issues one per chapter.
//!
//! # Example
//!
//! ```ignore
//! use avtools_core::operations::{Orchestrator, OperationOptions};
//! use avtools_core::runner::SystemRunner;
//!
//! let orchestrator = Orchestrator::new(SystemRunner::new(), &config);
//! let media = orchestrator.probe(Path::new("book.m4b")).await?;
//! let profile = config.profile(None)?;
//!
//! let options = OperationOptions {
//!     cue_file: Some(PathBuf::from("book.cue")),
//!     ..Default::default()
//! };
//! let report = orchestrator.split(&media, &profile, &options).await?;
//! println!("Wrote {} files", report.outputs.len());
//! ```

mod error;
mod orchestrator;
mod types;

pub use error::OperationError;
pub use orchestrator::{concat_list, Orchestrator};
pub use types::{CutRange, ExtractMode, OperationOptions, OperationReport, RemoveTargets};
