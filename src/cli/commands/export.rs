//! CLI implementation for `slmbuild export`

use std::path::PathBuf;

use anyhow::{Context as _, Result};

use crate::cli::output::{self, OutputConfig};
use crate::cli::Context;
use crate::config::defaults;
use crate::core::manifest::Manifest;
use crate::core::publish::ArtifactPublisher;

/// Execute the export command
pub fn execute(ctx: &Context, dest: Option<PathBuf>) -> Result<()> {
    let manifest = Manifest::load_from_dir(&ctx.project_dir)
        .with_context(|| format!("Failed to load manifest from {}", ctx.project_dir.display()))?;

    let dest = dest.unwrap_or_else(|| ctx.project_dir.join(defaults::DEFAULT_EXPORT_DIR));
    let report = ArtifactPublisher::export_sources()
        .publish(&ctx.project_dir, &dest)
        .with_context(|| format!("Failed to export sources of '{}'", manifest.name))?;

    if OutputConfig::global().json {
        return output::print_json(&report);
    }

    output::success(format!(
        "Exported {} sources to {} ({} files)",
        manifest.name,
        dest.display(),
        report.files
    ));
    Ok(())
}
