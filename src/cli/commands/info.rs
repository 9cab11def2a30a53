//! CLI implementation for `slmbuild info`
//!
//! Shows the name and version the package is published under, taken from
//! slm.toml, and lists the declared dependencies.

use anyhow::{Context as _, Result};
use serde_json::json;

use crate::cli::output::{self, OutputConfig};
use crate::cli::Context;
use crate::core::manifest::{DependencyKind, Manifest};

/// Execute the info command
pub fn execute(ctx: &Context) -> Result<()> {
    let manifest = Manifest::load_from_dir(&ctx.project_dir)
        .with_context(|| format!("Failed to load manifest from {}", ctx.project_dir.display()))?;

    tracing::info!("Package name={} version={}", manifest.name, manifest.version);

    if OutputConfig::global().json {
        return output::print_json(&json!({
            "name": manifest.name,
            "version": manifest.version,
            "lock": manifest.lock,
            "dependencies": manifest.dependencies,
            "build": {
                "git_sha": option_env!("VERGEN_GIT_SHA"),
                "timestamp": option_env!("VERGEN_BUILD_TIMESTAMP"),
            },
        }));
    }

    output::say(format!("{} {}", manifest.name, manifest.version));
    if let Some(lock) = &manifest.lock {
        output::say(format!("  lock: {}", lock.display()));
    }

    if manifest.dependencies.is_empty() {
        output::say("  no dependencies");
    }
    for (name, entry) in &manifest.dependencies {
        let kind = match entry.kind {
            DependencyKind::EcosystemPackage => "conan",
            DependencyKind::Other => "other",
        };
        let version = entry.version_constraint.as_deref().unwrap_or("*");
        output::say(format!("  {name} ({kind}) {version}"));
    }

    Ok(())
}
