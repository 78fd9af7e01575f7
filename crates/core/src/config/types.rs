use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use super::ConfigError;
use crate::args::ArgumentProfile;

/// Name of the profile that always exists.
pub const DEFAULT_PROFILE: &str = "default";

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Path to ffmpeg binary.
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: PathBuf,
    /// Path to ffprobe binary.
    #[serde(default = "default_ffprobe_path")]
    pub ffprobe_path: PathBuf,
    /// Profile used when none is requested.
    #[serde(default = "default_profile_name")]
    pub default_profile: String,
    /// Named argument profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, ArgumentProfile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            ffprobe_path: default_ffprobe_path(),
            default_profile: default_profile_name(),
            profiles: BTreeMap::new(),
        }
    }
}

fn default_ffmpeg_path() -> PathBuf {
    PathBuf::from("ffmpeg")
}

fn default_ffprobe_path() -> PathBuf {
    PathBuf::from("ffprobe")
}

fn default_profile_name() -> String {
    DEFAULT_PROFILE.to_string()
}

/// The profile used when the configuration does not define `default`.
pub fn builtin_profile() -> ArgumentProfile {
    ArgumentProfile {
        log_level: Some("error".to_string()),
        ..Default::default()
    }
}

impl Config {
    /// Returns a copy of the named profile, or of the default profile when
    /// `name` is `None`.
    pub fn profile(&self, name: Option<&str>) -> Result<ArgumentProfile, ConfigError> {
        let name = name.unwrap_or(&self.default_profile);
        match self.profiles.get(name) {
            Some(profile) => Ok(profile.clone()),
            None if name == DEFAULT_PROFILE => Ok(builtin_profile()),
            None => Err(ConfigError::UnknownProfile(name.to_string())),
        }
    }

    /// Names of all available profiles, including the built-in default.
    pub fn profile_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.profiles.keys().cloned().collect();
        if !self.profiles.contains_key(DEFAULT_PROFILE) {
            names.push(DEFAULT_PROFILE.to_string());
            names.sort();
        }
        names
    }
}
