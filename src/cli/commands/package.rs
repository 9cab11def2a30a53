//! CLI implementation for `slmbuild package`
//!
//! Runs the build pipeline and, only if it succeeds, copies the manifest,
//! lock file, project descriptors and sources into the package directory.

use std::path::PathBuf;

use anyhow::{Context as _, Result};

use super::BuildArgs;
use crate::cli::output::{self, OutputConfig};
use crate::cli::Context;
use crate::config::defaults;
use crate::core::manifest::Manifest;
use crate::core::publish::ArtifactPublisher;

/// Execute the package command
pub fn execute(ctx: &Context, args: &BuildArgs, dest: Option<PathBuf>) -> Result<()> {
    // Fails (and publishes nothing) unless the pipeline succeeded
    super::build::execute(ctx, args)?;

    let manifest = Manifest::load_from_dir(&ctx.project_dir)
        .with_context(|| format!("Failed to load manifest from {}", ctx.project_dir.display()))?;

    let dest = dest.unwrap_or_else(|| ctx.project_dir.join(defaults::DEFAULT_PACKAGE_DIR));
    let report = ArtifactPublisher::package(&manifest)
        .publish(&ctx.project_dir, &dest)
        .with_context(|| format!("Failed to package '{}'", manifest.name))?;

    if OutputConfig::global().json {
        return output::print_json(&report);
    }

    for path in &report.published {
        output::say(format!("  {}", path.display()));
    }
    output::success(format!(
        "Packaged {} {} into {} ({} files)",
        manifest.name,
        manifest.version,
        dest.display(),
        report.files
    ));
    Ok(())
}
