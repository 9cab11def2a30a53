//! Build tool requirements and checks
//!
//! Lists the tools the package manager must provision before a build and
//! checks that locally installed tools are invocable and new enough.

use std::fmt;

use regex::Regex;
use semver::{Version, VersionReq};
use serde::Serialize;

/// Operating system a build targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetOs {
    Linux,
    Macos,
    Windows,
    Other,
}

impl TargetOs {
    /// The OS this binary runs on
    pub fn host() -> Self {
        match std::env::consts::OS {
            "linux" => Self::Linux,
            "macos" => Self::Macos,
            "windows" => Self::Windows,
            _ => Self::Other,
        }
    }
}

/// A build tool the package manager provisions
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolRequirement {
    /// Package name in the ecosystem
    pub package: String,
    /// Version constraint in package-manager syntax (`[>=0.18.58]` or exact)
    pub constraint: String,
    /// Program invoked for this tool, if the pipeline calls it directly
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,
}

impl ToolRequirement {
    fn new(package: &str, constraint: &str, program: Option<&str>) -> Self {
        Self {
            package: package.to_string(),
            constraint: constraint.to_string(),
            program: program.map(String::from),
        }
    }

    /// The constraint as a semver requirement.
    ///
    /// Bracketed ranges map to their contents; a bare version is exact.
    pub fn version_req(&self) -> Option<VersionReq> {
        let raw = match self
            .constraint
            .strip_prefix('[')
            .and_then(|c| c.strip_suffix(']'))
        {
            Some(range) => range.to_string(),
            None => format!("={}", self.constraint),
        };
        VersionReq::parse(&raw).ok()
    }
}

/// Package reference in `name/constraint` form
impl fmt::Display for ToolRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.package, self.constraint)
    }
}

/// Tools needed to build an slm package for `os`
pub fn tool_requirements(os: TargetOs) -> Vec<ToolRequirement> {
    let mut tools = vec![
        ToolRequirement::new("lbstanza", "[>=0.18.58]", Some("stanza")),
        ToolRequirement::new("slm", "[>=0.5.5]", Some("slm")),
        // Needed when a dependency is not itself an slm package
        ToolRequirement::new("cmake", "[>3.20]", None),
        ToolRequirement::new("ninja", "[>1.11]", None),
    ];

    if os == TargetOs::Windows {
        tools.push(ToolRequirement::new("mingw-builds", "11.2.0", None));
    }

    tools
}

/// Result of checking one locally installed tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolCheck {
    pub program: String,
    pub version: Option<String>,
    pub passed: bool,
    pub error: Option<String>,
}

impl ToolCheck {
    fn fail(program: &str, version: Option<String>, error: String) -> Self {
        Self {
            program: program.to_string(),
            version,
            passed: false,
            error: Some(error),
        }
    }
}

/// Check that `program` is on `PATH`, answers `<program> version`, and
/// satisfies `requirement` when one is given.
pub fn check_tool(program: &str, requirement: Option<&VersionReq>) -> ToolCheck {
    let path = match which::which(program) {
        Ok(path) => path,
        Err(_) => return ToolCheck::fail(program, None, format!("'{program}' not found in PATH")),
    };

    let output = match std::process::Command::new(&path).arg("version").output() {
        Ok(output) if output.status.success() => output,
        Ok(output) => {
            return ToolCheck::fail(
                program,
                None,
                format!("'{program} version' exited with {}", output.status),
            )
        }
        Err(e) => return ToolCheck::fail(program, None, format!("failed to run '{program}': {e}")),
    };

    let combined = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    let Some(version) = extract_version(&combined) else {
        return ToolCheck::fail(program, None, "could not determine version".to_string());
    };

    if let Some(req) = requirement {
        let satisfied = parse_lenient(&version).is_some_and(|v| req.matches(&v));
        if !satisfied {
            return ToolCheck::fail(
                program,
                Some(version.clone()),
                format!("version {version} does not satisfy {req}"),
            );
        }
    }

    ToolCheck {
        program: program.to_string(),
        version: Some(version),
        passed: true,
        error: None,
    }
}

/// Extract a version string like `0.18.58` or `v1.2` from tool output
pub fn extract_version(output: &str) -> Option<String> {
    let version_regex = Regex::new(r"v?(\d+\.\d+(?:\.\d+)?)").ok()?;
    version_regex
        .captures(output)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Parse `x.y` or `x.y.z` as a semver version
fn parse_lenient(version: &str) -> Option<Version> {
    Version::parse(version)
        .or_else(|_| Version::parse(&format!("{version}.0")))
        .ok()
}
