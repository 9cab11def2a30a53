//! Manifest (slm.toml) parsing and validation
//!
//! The manifest names the package, its version, and its dependencies.
//! Parsing is a single validating step: everything downstream works on
//! the typed [`Manifest`] and never touches raw TOML again.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ManifestError;

/// Manifest file name
pub const MANIFEST_FILE: &str = "slm.toml";

/// Lock file name, co-located with the manifest
pub const LOCK_FILE: &str = "slm.lock";

/// Dependency `type` marking an ecosystem (conan) package
pub const ECOSYSTEM_PACKAGE_TYPE: &str = "conan";

/// Named option values, sorted by option name
pub type OptionSet = BTreeMap<String, OptionValue>;

/// The project manifest (slm.toml)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Manifest {
    /// Package name
    pub name: String,

    /// Package version
    pub version: String,

    /// Dependencies in declaration order
    pub dependencies: Vec<(String, DependencyEntry)>,

    /// Co-located lock file, if one existed when the manifest was loaded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lock: Option<PathBuf>,
}

/// How a dependency is obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyKind {
    /// Resolved through the external package manager (`type = "conan"`)
    EcosystemPackage,
    /// Anything else; handled by the language build tool itself
    Other,
}

/// A single `[dependencies.<name>]` table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DependencyEntry {
    pub kind: DependencyKind,

    /// `pkg`
    pub package_name: Option<String>,

    /// `version`
    pub version_constraint: Option<String>,

    /// `options`
    pub options: OptionSet,

    /// Keys this crate does not interpret (`git`, `path`, ...)
    #[serde(skip_serializing_if = "toml::Table::is_empty")]
    pub extra: toml::Table,
}

impl DependencyEntry {
    /// Create an ecosystem package entry
    pub fn ecosystem(package_name: &str, version_constraint: &str) -> Self {
        Self {
            kind: DependencyKind::EcosystemPackage,
            package_name: Some(package_name.to_string()),
            version_constraint: Some(version_constraint.to_string()),
            options: OptionSet::new(),
            extra: toml::Table::new(),
        }
    }

    /// Add an explicit option
    #[must_use]
    pub fn with_option(mut self, name: &str, value: impl Into<OptionValue>) -> Self {
        self.options.insert(name.to_string(), value.into());
        self
    }

    /// Whether the external package manager resolves this entry
    pub fn is_ecosystem_package(&self) -> bool {
        self.kind == DependencyKind::EcosystemPackage
    }
}

/// A scalar option value; arrays and tables are rejected
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl OptionValue {
    /// Parse a value given on the command line (`true`, `42`, `1.5`, anything else is a string)
    pub fn parse_cli(raw: &str) -> Self {
        match raw {
            "true" | "True" => Self::Bool(true),
            "false" | "False" => Self::Bool(false),
            _ => raw
                .parse::<i64>()
                .map(Self::Integer)
                .or_else(|_| raw.parse::<f64>().map(Self::Float))
                .unwrap_or_else(|_| Self::String(raw.to_string())),
        }
    }
}

/// Booleans render the way the package manager spells them (`True`/`False`).
impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl Manifest {
    /// Load and validate the manifest at `path`.
    ///
    /// A `slm.lock` next to the manifest is recorded as the lock reference.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        if !path.is_file() {
            return Err(ManifestError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| ManifestError::Read {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let mut manifest = Self::from_toml(&content)?;

        let lock = path.with_file_name(LOCK_FILE);
        if lock.is_file() {
            manifest.lock = Some(lock);
        }

        tracing::debug!(
            "Loaded manifest {} {} ({} dependencies)",
            manifest.name,
            manifest.version,
            manifest.dependencies.len()
        );
        Ok(manifest)
    }

    /// Load `slm.toml` from a project directory
    pub fn load_from_dir(dir: &Path) -> Result<Self, ManifestError> {
        Self::load(&dir.join(MANIFEST_FILE))
    }

    /// Parse and validate manifest TOML
    pub fn from_toml(content: &str) -> Result<Self, ManifestError> {
        let table: toml::Table =
            toml::from_str(content).map_err(|source| ManifestError::Parse { source })?;

        let raw: RawManifest = toml::Value::Table(table)
            .try_into()
            .map_err(|e| ManifestError::schema(schema_message(&e)))?;

        let dependencies = raw
            .dependencies
            .into_iter()
            .map(|(name, value)| {
                let entry = value.try_into::<RawDependency>().map_err(|e| {
                    ManifestError::schema(format!("dependency '{name}': {}", schema_message(&e)))
                })?;
                Ok((name, DependencyEntry::from(entry)))
            })
            .collect::<Result<Vec<_>, ManifestError>>()?;

        Ok(Self {
            name: raw.name,
            version: raw.version,
            dependencies,
            lock: None,
        })
    }

    /// Look up a dependency by its manifest key
    pub fn dependency(&self, name: &str) -> Option<&DependencyEntry> {
        self.dependencies
            .iter()
            .find(|(dep_name, _)| dep_name == name)
            .map(|(_, entry)| entry)
    }

    /// Ecosystem package dependencies, in declaration order
    pub fn ecosystem_dependencies(&self) -> impl Iterator<Item = (&str, &DependencyEntry)> {
        self.dependencies
            .iter()
            .filter(|(_, entry)| entry.is_ecosystem_package())
            .map(|(name, entry)| (name.as_str(), entry))
    }
}

/// Top-level keys; anything else in the file is ignored
#[derive(Deserialize)]
struct RawManifest {
    name: String,
    version: String,
    dependencies: toml::Table,
}

/// One `[dependencies.<name>]` table as written
#[derive(Deserialize)]
struct RawDependency {
    #[serde(rename = "type")]
    kind: Option<String>,
    pkg: Option<String>,
    version: Option<String>,
    #[serde(default)]
    options: OptionSet,
    #[serde(flatten)]
    extra: toml::Table,
}

impl From<RawDependency> for DependencyEntry {
    fn from(raw: RawDependency) -> Self {
        let kind = match raw.kind.as_deref() {
            Some(ECOSYSTEM_PACKAGE_TYPE) => DependencyKind::EcosystemPackage,
            _ => DependencyKind::Other,
        };
        Self {
            kind,
            package_name: raw.pkg,
            version_constraint: raw.version,
            options: raw.options,
            extra: raw.extra,
        }
    }
}

fn schema_message(error: &toml::de::Error) -> String {
    error.message().trim_end().to_string()
}
