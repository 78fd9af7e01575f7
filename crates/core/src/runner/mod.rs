//! External process execution.
//!
//! The core only ever builds an [`Invocation`]; running it is delegated to a
//! [`CommandRunner`]. [`SystemRunner`] spawns real processes, and
//! `testing::MockRunner` records invocations for tests.

mod error;
mod system;
mod traits;

pub use error::RunError;
pub use system::SystemRunner;
pub use traits::{CommandRunner, Invocation};
