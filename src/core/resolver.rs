//! Dependency resolution
//!
//! Turns the manifest's ecosystem dependencies into package requirements
//! for the external package manager. This is a pure transform: no network,
//! no filesystem, and no graph solving (the package manager does that).

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::core::manifest::{Manifest, OptionSet};
use crate::core::options::{propagate, PackageConfiguration};
use crate::error::ManifestError;

/// A requirement handed to the package manager
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedRequirement {
    pub package_name: String,
    pub version_constraint: String,
    pub propagated_options: OptionSet,
}

/// Package reference in `name/constraint` form
impl fmt::Display for ResolvedRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.package_name, self.version_constraint)
    }
}

/// Resolve ecosystem dependencies in manifest declaration order.
///
/// Entries of any other kind are skipped. An ecosystem entry without `pkg`
/// or `version` fails the whole resolution; no partial list is returned.
pub fn resolve(manifest: &Manifest) -> Result<Vec<ResolvedRequirement>, ManifestError> {
    let mut requirements = Vec::new();
    let mut seen: HashMap<&str, &str> = HashMap::new();

    for (dep_name, entry) in manifest.ecosystem_dependencies() {
        let package_name = entry
            .package_name
            .as_deref()
            .ok_or_else(|| missing_field(dep_name, "pkg"))?;
        let version_constraint = entry
            .version_constraint
            .as_deref()
            .ok_or_else(|| missing_field(dep_name, "version"))?;

        if let Some(first) = seen.insert(package_name, dep_name) {
            return Err(ManifestError::DuplicatePackage {
                package: package_name.to_string(),
                first: first.to_string(),
                second: dep_name.to_string(),
            });
        }

        tracing::trace!("requires(\"{package_name}/{version_constraint}\") for '{dep_name}'");
        requirements.push(ResolvedRequirement {
            package_name: package_name.to_string(),
            version_constraint: version_constraint.to_string(),
            propagated_options: OptionSet::new(),
        });
    }

    Ok(requirements)
}

/// Resolve requirements and attach the options propagated from `config`
pub fn resolve_with_options(
    manifest: &Manifest,
    config: &PackageConfiguration,
) -> Result<Vec<ResolvedRequirement>, ManifestError> {
    let mut requirements = resolve(manifest)?;
    let mut options = propagate(manifest, config);

    for requirement in &mut requirements {
        if let Some(opts) = options.remove(&requirement.package_name) {
            requirement.propagated_options = opts;
        }
    }

    Ok(requirements)
}

fn missing_field(dependency: &str, field: &str) -> ManifestError {
    ManifestError::MissingDependencyField {
        dependency: dependency.to_string(),
        field: field.to_string(),
    }
}
