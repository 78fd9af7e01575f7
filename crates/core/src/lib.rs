pub mod args;
pub mod codec;
pub mod config;
pub mod meta;
pub mod operations;
pub mod probe;
pub mod runner;
pub mod testing;

pub use args::{build_args, ArgList, ArgsError, ArgumentProfile, Codec, Padding};
pub use config::{
    load_config, load_config_from_str, load_env_config, validate_config, Config, ConfigError,
    DEFAULT_PROFILE,
};
pub use meta::{Chapter, Format, MediaMetadata, MetadataError, Stream, Tags};
pub use operations::{
    CutRange, ExtractMode, OperationError, OperationOptions, OperationReport, Orchestrator,
    RemoveTargets,
};
pub use probe::{ProbeReport, ProbedMedia};
pub use runner::{CommandRunner, Invocation, RunError, SystemRunner};
