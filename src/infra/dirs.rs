//! Platform-specific directory management
//!
//! `SLMBUILD_CONFIG_DIR` overrides the platform config directory
//! (`$XDG_CONFIG_HOME/slmbuild` on Linux, `~/Library/Application Support/slmbuild` on macOS).

use std::env;
use std::path::PathBuf;

/// Environment variable overriding the config directory
pub const ENV_CONFIG_DIR: &str = "SLMBUILD_CONFIG_DIR";

const APP_NAME: &str = "slmbuild";

/// Settings file name inside the config directory
const SETTINGS_FILE: &str = "config.toml";

/// Directory provider for slmbuild
#[derive(Debug, Clone)]
pub struct SlmbuildDirs {
    config_dir: PathBuf,
}

impl SlmbuildDirs {
    /// Resolve directories from the environment, then platform defaults
    #[must_use]
    pub fn new() -> Self {
        Self {
            config_dir: Self::resolve_config_dir(),
        }
    }

    /// Use an explicit config directory
    #[must_use]
    pub fn with_config_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    #[must_use]
    pub fn config_dir(&self) -> PathBuf {
        self.config_dir.clone()
    }

    /// Path of the global settings file
    #[must_use]
    pub fn settings_path(&self) -> PathBuf {
        self.config_dir.join(SETTINGS_FILE)
    }

    fn resolve_config_dir() -> PathBuf {
        if let Ok(path) = env::var(ENV_CONFIG_DIR) {
            if !path.is_empty() {
                return PathBuf::from(path);
            }
        }

        dirs::config_dir()
            .map(|p| p.join(APP_NAME))
            .unwrap_or_else(|| PathBuf::from(".").join(format!(".{APP_NAME}")))
    }
}

impl Default for SlmbuildDirs {
    fn default() -> Self {
        Self::new()
    }
}
