//! Error types for slmbuild
//!
//! Domain-specific error types using thiserror.

use std::path::PathBuf;
use thiserror::Error;

/// Manifest (slm.toml) errors
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Manifest file does not exist
    #[error("Manifest not found at '{path}'")]
    NotFound { path: PathBuf },

    /// Manifest could not be read
    #[error("Failed to read manifest '{path}': {error}")]
    Read { path: PathBuf, error: String },

    /// Serialized form is not valid TOML
    #[error("Failed to parse manifest: {source}")]
    Parse {
        #[source]
        source: toml::de::Error,
    },

    /// Required key missing or of the wrong shape
    #[error("Invalid manifest: {message}")]
    Schema { message: String },

    /// Ecosystem dependency lacks `pkg` or `version`
    #[error("Dependency '{dependency}' is missing required field '{field}'")]
    MissingDependencyField { dependency: String, field: String },

    /// Two dependency entries name the same ecosystem package
    #[error("Package '{package}' is required by both '{first}' and '{second}'")]
    DuplicatePackage {
        package: String,
        first: String,
        second: String,
    },
}

impl ManifestError {
    pub(crate) fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
        }
    }
}

/// Why a pipeline step failed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StepFailure {
    /// Command ran and exited unsuccessfully (`None` when killed by a signal)
    #[error("`{command}` {}", describe_exit(.code))]
    Exit { command: String, code: Option<i32> },

    /// Command could not be started at all
    #[error("`{command}` could not be started: {error}")]
    Spawn { command: String, error: String },
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exited with status {code}"),
        None => "was terminated by a signal".to_string(),
    }
}

/// Build pipeline errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// A fatal step failed; no later step ran
    #[error("Step '{step}' failed: {cause}")]
    StepFailed { step: String, cause: StepFailure },
}

/// Artifact publishing errors
#[derive(Error, Debug)]
pub enum PublishError {
    /// A declared artifact is absent from the source layout
    #[error("Missing artifact '{path}' in source layout")]
    MissingArtifact { path: PathBuf },

    /// Destination lies inside a tree being copied, or is the source itself
    #[error("Destination '{destination}' overlaps source '{source_path}'")]
    DestinationOverlapsSource {
        destination: PathBuf,
        source_path: PathBuf,
    },

    /// Copy failed
    #[error("Failed to copy '{from}' to '{to}': {error}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        error: String,
    },

    /// Filesystem error while preparing the destination
    #[error(transparent)]
    Filesystem(#[from] FilesystemError),
}

/// Filesystem errors
#[derive(Error, Debug)]
pub enum FilesystemError {
    /// Failed to create directory
    #[error("Failed to create directory '{path}': {error}")]
    CreateDir { path: PathBuf, error: String },

    /// Failed to make a path absolute
    #[error("Failed to resolve path '{path}': {error}")]
    Resolve { path: PathBuf, error: String },

    /// Failed to walk a directory tree
    #[error("Failed to walk '{path}': {error}")]
    Walk { path: PathBuf, error: String },
}

/// Settings file errors
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Failed to read settings file
    #[error("Failed to read settings file '{path}': {error}")]
    Read { path: PathBuf, error: String },

    /// Failed to parse settings file
    #[error("Failed to parse settings file '{path}': {error}")]
    Parse { path: PathBuf, error: String },
}
