//! Argument assembly engine.
//!
//! Turns an [`ArgumentProfile`] plus the primary input's
//! [`MediaMetadata`](crate::meta::MediaMetadata) into the ordered argument
//! list ffmpeg expects. ffmpeg is position sensitive, so the emission order
//! is fixed:
//!
//! 1. `-v <level>`
//! 2. `-y`
//! 3. pre-input arguments
//! 4. `-i` for primary, secondary, metadata and cover inputs (in that order)
//! 5. stream mapping for the inputs that were actually added
//! 6. post-input arguments
//! 7. video codec, parameters and filters
//! 8. audio codec, parameters and filters
//! 9. output path
//!
//! Each stage is a separate function in [`assemble`] so it can be checked on
//! its own.

pub mod assemble;
mod builder;
mod error;
mod padding;
mod profile;

pub use assemble::build_args;
pub use builder::ArgList;
pub use error::ArgsError;
pub use padding::Padding;
pub use profile::{ArgumentProfile, Codec};
