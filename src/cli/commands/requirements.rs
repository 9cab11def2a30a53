//! CLI implementation for `slmbuild requirements`
//!
//! Prints what the package manager needs before a build: package
//! requirements from slm.toml, tool requirements, and the option
//! assignments that keep linkage consistent across the graph.

use anyhow::{Context as _, Result};
use serde_json::json;

use super::ConfigArgs;
use crate::cli::output::{self, OutputConfig};
use crate::cli::Context;
use crate::core::manifest::Manifest;
use crate::core::options::{option_args, propagate};
use crate::core::resolver::resolve_with_options;
use crate::core::tools::{tool_requirements, TargetOs};

/// Execute the requirements command
pub fn execute(ctx: &Context, args: &ConfigArgs) -> Result<()> {
    let manifest = Manifest::load_from_dir(&ctx.project_dir)
        .with_context(|| format!("Failed to load manifest from {}", ctx.project_dir.display()))?;
    let config = args.package_configuration(ctx)?;

    let requirements = resolve_with_options(&manifest, &config)
        .with_context(|| format!("Failed to resolve dependencies of '{}'", manifest.name))?;
    let assignments = option_args(&propagate(&manifest, &config));
    let tools = tool_requirements(TargetOs::host());

    tracing::info!(
        "{} requirements, {} tool requirements for {}",
        requirements.len(),
        tools.len(),
        manifest.name
    );

    if OutputConfig::global().json {
        return output::print_json(&json!({
            "package": {
                "name": manifest.name,
                "version": manifest.version,
                "options": config.effective_options(),
            },
            "requires": requirements,
            "tool_requires": tools,
            "option_args": assignments,
        }));
    }

    output::say(format!("{}/{}", manifest.name, manifest.version));
    for (key, value) in config.effective_options() {
        output::say(format!("  option {key}={value}"));
    }

    output::say("requires:");
    for requirement in &requirements {
        output::say(format!("  {requirement}"));
    }

    output::say("tool_requires:");
    for tool in &tools {
        output::say(format!("  {tool}"));
    }

    output::say("options:");
    for assignment in &assignments {
        output::say(format!("  -o {assignment}"));
    }

    Ok(())
}
