//! CLI implementation for `slmbuild doctor`
//!
//! Checks the locally installed language tools against the versions the
//! package requires.

use anyhow::{bail, Result};

use crate::cli::output::{self, create_spinner, status, OutputConfig};
use crate::cli::Context;
use crate::core::tools::{check_tool, tool_requirements, TargetOs};

/// Execute the doctor command
pub fn execute(ctx: &Context) -> Result<()> {
    let programs = [
        ("lbstanza", ctx.settings.stanza_program()),
        ("slm", ctx.settings.slm_program()),
    ];
    let requirements = tool_requirements(TargetOs::host());

    let spinner = create_spinner("Checking build tools...");
    let checks: Vec<_> = programs
        .iter()
        .map(|(package, program)| {
            let req = requirements
                .iter()
                .find(|r| r.package == *package)
                .and_then(|r| r.version_req());
            check_tool(program, req.as_ref())
        })
        .collect();
    spinner.finish_and_clear();

    if OutputConfig::global().json {
        output::print_json(&checks)?;
    } else {
        for check in &checks {
            match (&check.version, &check.error) {
                (_, Some(error)) => {
                    output::say(format!("{} {}: {error}", status::ERROR, check.program));
                }
                (Some(version), None) => {
                    output::say(format!("{} {} {version}", status::SUCCESS, check.program));
                }
                (None, None) => output::say(format!("{} {}", status::SUCCESS, check.program)),
            }
        }
    }

    let failed = checks.iter().filter(|c| !c.passed).count();
    if failed > 0 {
        bail!("{failed} required tool(s) missing or too old");
    }
    output::say(format!("{} All build tools available", status::INFO));
    Ok(())
}
