//! Application settings.
//!
//! Defaults for the scan come from an optional JSON settings file in the
//! XDG config directory (`~/.config/portsweep/settings.json` on Linux) or
//! from an explicit `--config` path. Command-line flags override them.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default location of the settings file, if the platform has one.
pub fn default_settings_file() -> Option<PathBuf> {
    ProjectDirs::from("", "", "portsweep").map(|dirs| dirs.config_dir().join("settings.json"))
}

/// Application-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Default concurrency bound.
    pub threads: usize,
    /// Default per-attempt timeout in seconds.
    pub timeout_secs: f64,
    /// Capture banners on open ports.
    pub grab_banners: bool,
    /// List closed/filtered/error outcomes in the console summary.
    pub show_all: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            threads: 100,
            timeout_secs: 1.0,
            grab_banners: true,
            show_all: false,
        }
    }
}

impl AppSettings {
    /// Load settings from `explicit`, or from the default location.
    ///
    /// A missing default file yields the built-in defaults; a missing
    /// explicit file is an error.
    pub fn load(explicit: Option<&Path>) -> ConfigResult<Self> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => match default_settings_file() {
                Some(path) if path.is_file() => Self::load_from(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Load settings from a specific file.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let settings: Self =
            serde_json::from_str(&content).map_err(|e| ConfigError::InvalidFormat {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        debug!(path = %path.display(), ?settings, "loaded settings");
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = AppSettings::default();
        assert_eq!(settings.threads, 100);
        assert_eq!(settings.timeout_secs, 1.0);
        assert!(settings.grab_banners);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "threads": 250 }"#).unwrap();

        let settings = AppSettings::load(Some(&path)).unwrap();
        assert_eq!(settings.threads, 250);
        assert_eq!(settings.timeout_secs, 1.0);
        assert!(!settings.show_all);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppSettings::load(Some(&dir.path().join("nope.json"))).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFailed { .. }));
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "threads = 5").unwrap();
        assert!(matches!(
            AppSettings::load_from(&path),
            Err(ConfigError::InvalidFormat { .. })
        ));
    }
}
