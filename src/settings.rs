use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{inventory::DEFAULT_USER, render::DEFAULT_KEY_LOCATION};

pub const APP_NAME: &str = "ec2-ssh-config";

/// Defaults persisted with `confy`; command line flags take precedence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Login user for every stanza
    pub user: String,
    /// Directory prefix of the `.pem` identity files
    pub key_location: String,
    /// AWS shared-config profile
    pub profile: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            user: DEFAULT_USER.to_string(),
            key_location: DEFAULT_KEY_LOCATION.to_string(),
            profile: None,
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        let path = confy::get_configuration_file_path(APP_NAME, Some("settings"))?;
        Self::load_path(path)
    }

    /// Read settings from `path`; a missing file yields the defaults and is
    /// never created.
    pub fn load_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "no settings file; using defaults");
            return Ok(Self::default());
        }
        Ok(confy::load_path(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub/settings.toml");
        let settings = Settings::load_path(&path).unwrap();
        assert!(!path.exists());
        assert!(!dir.path().join("sub").exists());
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.user, "ec2-user");
        assert_eq!(settings.key_location, "~/.ssh/");
    }

    #[test]
    fn test_unwritable_location_gives_defaults() {
        let settings = Settings::load_path("/proc/ec2-ssh-config/settings.toml").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "user = \"ubuntu\"\nprofile = \"ops\"\n").unwrap();

        let settings = Settings::load_path(&path).unwrap();
        assert_eq!(settings.user, "ubuntu");
        assert_eq!(settings.profile.as_deref(), Some("ops"));
        assert_eq!(settings.key_location, DEFAULT_KEY_LOCATION);
    }
}
