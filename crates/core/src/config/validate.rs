use super::{types::Config, ConfigError, DEFAULT_PROFILE};
use crate::args::Padding;

/// Validate configuration
/// Currently validates:
/// - ffmpeg/ffprobe paths are not empty
/// - `default_profile` names an existing profile
/// - every padding pattern is a single integer directive
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.ffmpeg_path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "ffmpeg_path cannot be empty".to_string(),
        ));
    }
    if config.ffprobe_path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "ffprobe_path cannot be empty".to_string(),
        ));
    }

    if config.default_profile != DEFAULT_PROFILE
        && !config.profiles.contains_key(&config.default_profile)
    {
        return Err(ConfigError::ValidationError(format!(
            "default_profile '{}' is not defined",
            config.default_profile
        )));
    }

    for (name, profile) in &config.profiles {
        if let Some(pattern) = &profile.padding {
            Padding::parse(pattern).map_err(|e| {
                ConfigError::ValidationError(format!("profiles.{}.padding: {}", name, e))
            })?;
        }
    }

    Ok(())
}
