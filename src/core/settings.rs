//! Global settings
//!
//! Reads `config.toml` from the config directory. Every key is optional;
//! command-line flags and environment variables take precedence over it.
//!
//! ```toml
//! [build]
//! skip_test = true
//! shared = false
//!
//! [tools]
//! slm = "/opt/slm/bin/slm"
//! stanza = "stanza"
//!
//! [output]
//! quiet = false
//! json = false
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::defaults;
use crate::error::SettingsError;
use crate::infra::dirs::SlmbuildDirs;

/// Global settings for slmbuild
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub build: BuildSettings,

    #[serde(default)]
    pub tools: ToolSettings,

    #[serde(default)]
    pub output: OutputSettings,
}

/// Default build behaviour
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildSettings {
    /// Skip building and running the test binary
    pub skip_test: Option<bool>,

    /// Build the package as a shared library
    pub shared: Option<bool>,
}

/// Programs used for the language tools
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolSettings {
    pub slm: Option<String>,
    pub stanza: Option<String>,
}

/// Output preferences
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSettings {
    pub quiet: Option<bool>,
    pub json: Option<bool>,
}

impl Settings {
    /// Load settings from the config directory
    pub fn load(dirs: &SlmbuildDirs) -> Result<Self, SettingsError> {
        Self::load_from_path(&dirs.settings_path())
    }

    /// Load settings from `path`; a missing file yields the defaults
    pub fn load_from_path(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            tracing::debug!("No settings file at {}", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| SettingsError::Read {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| SettingsError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Resolve `skip_test`: flag, then settings file, then default
    pub fn skip_test(&self, flag: Option<bool>) -> bool {
        flag.or(self.build.skip_test)
            .unwrap_or(defaults::DEFAULT_SKIP_TEST)
    }

    /// Resolve linkage: flag, then settings file, then default
    pub fn shared(&self, flag: Option<bool>) -> bool {
        flag.or(self.build.shared).unwrap_or(defaults::DEFAULT_SHARED)
    }

    /// Program for the language build tool
    pub fn slm_program(&self) -> String {
        self.tools
            .slm
            .clone()
            .unwrap_or_else(|| defaults::SLM_PROGRAM.to_string())
    }

    /// Program for the compiler
    pub fn stanza_program(&self) -> String {
        self.tools
            .stanza
            .clone()
            .unwrap_or_else(|| defaults::STANZA_PROGRAM.to_string())
    }
}
