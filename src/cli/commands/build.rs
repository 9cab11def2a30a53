//! Build command implementation
//!
//! Implements `slmbuild build`: validates the manifest and its
//! dependencies, then runs the standard build pipeline in the project
//! directory. Tool output streams straight to the terminal.

use anyhow::{Context as _, Result};
use serde_json::json;

use super::BuildArgs;
use crate::cli::output::{self, status, OutputConfig};
use crate::cli::Context;
use crate::core::manifest::Manifest;
use crate::core::pipeline::{BuildPipeline, PipelineConfig, PipelineRun, StepOutcome};
use crate::core::resolver::resolve;
use crate::infra::process::ShellRunner;

/// Execute the build command and return the finished run
pub fn execute(ctx: &Context, args: &BuildArgs) -> Result<PipelineRun> {
    let manifest = Manifest::load_from_dir(&ctx.project_dir)
        .with_context(|| format!("Failed to load manifest from {}", ctx.project_dir.display()))?;

    // A manifest the package manager could not resolve makes the build meaningless
    let requirements = resolve(&manifest)
        .with_context(|| format!("Failed to resolve dependencies of '{}'", manifest.name))?;
    tracing::debug!("{} conan requirements", requirements.len());

    let config = PipelineConfig {
        package_name: manifest.name.clone(),
        skip_test: ctx.settings.skip_test(args.skip_test),
        slm: ctx.settings.slm_program(),
        stanza: ctx.settings.stanza_program(),
    };

    tracing::info!("Building {} {}", manifest.name, manifest.version);
    let pipeline = BuildPipeline::standard(&ctx.project_dir, &config);
    let run = pipeline.run(&mut ShellRunner::new());

    report(&run)?;

    run.into_result()
        .with_context(|| format!("Build of '{}' failed", manifest.name))
}

fn report(run: &PipelineRun) -> Result<()> {
    if OutputConfig::global().json {
        let steps: Vec<_> = run
            .records
            .iter()
            .map(|r| {
                let (outcome, cause) = match &r.outcome {
                    StepOutcome::Success => ("success", None),
                    StepOutcome::Skipped => ("skipped", None),
                    StepOutcome::Failed(cause) => ("failed", Some(cause.to_string())),
                };
                json!({ "step": r.step, "outcome": outcome, "cause": cause })
            })
            .collect();
        return output::print_json(&json!({
            "status": run.status.to_string(),
            "steps": steps,
        }));
    }

    for record in &run.records {
        match &record.outcome {
            StepOutcome::Success => output::say(format!("{} {}", status::SUCCESS, record.step)),
            StepOutcome::Skipped => {
                output::say(format!("{} {} (skipped)", status::SKIPPED, record.step));
            }
            StepOutcome::Failed(cause) => {
                output::say(format!("{} {}: {cause}", status::ERROR, record.step));
            }
        }
    }
    if run.succeeded() {
        output::success("Build complete");
    }
    Ok(())
}
