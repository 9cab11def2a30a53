//! Build pipeline
//!
//! A linear state machine over a fixed list of lifecycle steps:
//!
//! ```text
//! NotStarted -> Running(i) -> Running(i + 1) | Failed | Succeeded
//! ```
//!
//! Steps run strictly in declaration order. The first fatal failure ends
//! the run; completed steps are not rolled back and nothing is retried.
//! Conditional steps (clean without a marker, test with `skip_test`) are
//! recorded as [`StepOutcome::Skipped`], never as failures.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{PipelineError, StepFailure};
use crate::infra::process::{CommandRunner, Scope};

/// Build-state marker directory left behind by the language build tool
pub const BUILD_STATE_MARKER: &str = ".slm";

/// Directory the test binary is written to
pub const TEST_OUTPUT_DIR: &str = "build_slm";

/// What a step does, with the data its gating needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepKind {
    /// Run each command; used for sanity checks
    Verify { commands: Vec<String> },

    /// Run `command` only if `marker` (relative to the working directory) is a directory
    Clean { marker: PathBuf, command: String },

    /// Run the build tool
    Build { command: String },

    /// Build the test binary, then run it; skipped entirely when `skip` is set
    Test {
        build_command: String,
        run_command: String,
        skip: bool,
    },
}

/// One unit of the build lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineStep {
    pub name: String,
    pub kind: StepKind,
    pub working_dir: PathBuf,
    /// Whether a failure ends the run
    pub fatal: bool,
}

impl PipelineStep {
    /// Create a fatal step
    pub fn new(name: &str, kind: StepKind, working_dir: &Path) -> Self {
        Self {
            name: name.to_string(),
            kind,
            working_dir: working_dir.to_path_buf(),
            fatal: true,
        }
    }

    /// Let the pipeline continue past a failure of this step
    #[must_use]
    pub fn non_fatal(mut self) -> Self {
        self.fatal = false;
        self
    }

    /// Commands to run with their scope, or `None` if the step's gate says skip
    fn planned_commands(&self) -> Option<Vec<(&str, Scope)>> {
        match &self.kind {
            StepKind::Verify { commands } => Some(
                commands
                    .iter()
                    .map(|c| (c.as_str(), Scope::Build))
                    .collect(),
            ),
            StepKind::Clean { marker, command } => self
                .working_dir
                .join(marker)
                .is_dir()
                .then(|| vec![(command.as_str(), Scope::Build)]),
            StepKind::Build { command } => Some(vec![(command.as_str(), Scope::Build)]),
            StepKind::Test {
                build_command,
                run_command,
                skip,
            } => (!skip).then(|| {
                vec![
                    (build_command.as_str(), Scope::Build),
                    (run_command.as_str(), Scope::Run),
                ]
            }),
        }
    }

    fn skip_reason(&self) -> &'static str {
        match &self.kind {
            StepKind::Clean { .. } => "no prior build state",
            StepKind::Test { .. } => "tests disabled by skip_test",
            _ => "nothing to do",
        }
    }
}

/// Result of a single step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Success,
    Skipped,
    Failed(StepFailure),
}

/// A step's name with its outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    pub step: String,
    pub outcome: StepOutcome,
}

/// Pipeline state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    NotStarted,
    Running(usize),
    Succeeded,
    Failed { step: String, cause: StepFailure },
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotStarted => f.write_str("not started"),
            Self::Running(i) => write!(f, "running step {}", i + 1),
            Self::Succeeded => f.write_str("succeeded"),
            Self::Failed { step, cause } => write!(f, "failed at '{step}': {cause}"),
        }
    }
}

/// State of one pipeline invocation. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineRun {
    pub status: RunStatus,
    pub records: Vec<StepRecord>,
    pub log: Vec<String>,
}

impl PipelineRun {
    fn new() -> Self {
        Self {
            status: RunStatus::NotStarted,
            records: Vec::new(),
            log: Vec::new(),
        }
    }

    fn note(&mut self, line: String) {
        tracing::info!("{line}");
        self.log.push(line);
    }

    pub fn succeeded(&self) -> bool {
        self.status == RunStatus::Succeeded
    }

    /// Outcomes in step order
    pub fn outcomes(&self) -> Vec<&StepOutcome> {
        self.records.iter().map(|r| &r.outcome).collect()
    }

    /// Convert a terminal run into a `Result`
    pub fn into_result(self) -> Result<Self, PipelineError> {
        match &self.status {
            RunStatus::Failed { step, cause } => Err(PipelineError::StepFailed {
                step: step.clone(),
                cause: cause.clone(),
            }),
            _ => Ok(self),
        }
    }
}

/// Inputs to the standard step sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Package name; the test target is `<name>-tests`
    pub package_name: String,
    /// Skip building and running the test binary
    pub skip_test: bool,
    /// Language build tool program
    pub slm: String,
    /// Compiler program
    pub stanza: String,
}

impl PipelineConfig {
    pub fn new(package_name: &str) -> Self {
        Self {
            package_name: package_name.to_string(),
            skip_test: false,
            slm: "slm".to_string(),
            stanza: "stanza".to_string(),
        }
    }

    #[must_use]
    pub fn with_skip_test(mut self, skip_test: bool) -> Self {
        self.skip_test = skip_test;
        self
    }
}

/// Ordered list of steps, fixed at construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPipeline {
    steps: Vec<PipelineStep>,
}

impl BuildPipeline {
    pub fn new(steps: Vec<PipelineStep>) -> Self {
        Self { steps }
    }

    /// The standard lifecycle for an slm package in `source_dir`:
    /// verify-workdir, verify-tools, clean, build, test.
    pub fn standard(source_dir: &Path, config: &PipelineConfig) -> Self {
        let test_target = format!("{}-tests", config.package_name);
        let test_binary = format!("{TEST_OUTPUT_DIR}/{test_target}");

        Self::new(vec![
            PipelineStep::new(
                "verify-workdir",
                StepKind::Verify {
                    commands: vec![list_dir_command().to_string()],
                },
                source_dir,
            ),
            PipelineStep::new(
                "verify-tools",
                StepKind::Verify {
                    commands: vec![
                        format!("{} version", config.stanza),
                        format!("{} version", config.slm),
                    ],
                },
                source_dir,
            ),
            PipelineStep::new(
                "clean",
                StepKind::Clean {
                    marker: PathBuf::from(BUILD_STATE_MARKER),
                    command: format!("{} clean", config.slm),
                },
                source_dir,
            ),
            PipelineStep::new(
                "build",
                StepKind::Build {
                    command: format!("{} build", config.slm),
                },
                source_dir,
            ),
            PipelineStep::new(
                "test",
                StepKind::Test {
                    build_command: format!(
                        "{} build {test_target} -verbose -o {test_binary}",
                        config.stanza
                    ),
                    run_command: test_binary,
                    skip: config.skip_test,
                },
                source_dir,
            ),
        ])
    }

    pub fn steps(&self) -> &[PipelineStep] {
        &self.steps
    }

    /// Execute every step in order, stopping at the first fatal failure
    pub fn run(&self, runner: &mut dyn CommandRunner) -> PipelineRun {
        let mut run = PipelineRun::new();

        for (index, step) in self.steps.iter().enumerate() {
            run.status = RunStatus::Running(index);
            let outcome = execute_step(step, runner, &mut run);

            let failure = match &outcome {
                StepOutcome::Failed(cause) if step.fatal => Some(cause.clone()),
                _ => None,
            };
            run.records.push(StepRecord {
                step: step.name.clone(),
                outcome,
            });

            if let Some(cause) = failure {
                tracing::error!("Step '{}' failed: {cause}", step.name);
                run.status = RunStatus::Failed {
                    step: step.name.clone(),
                    cause,
                };
                return run;
            }
        }

        run.status = RunStatus::Succeeded;
        run
    }
}

fn execute_step(
    step: &PipelineStep,
    runner: &mut dyn CommandRunner,
    run: &mut PipelineRun,
) -> StepOutcome {
    let Some(commands) = step.planned_commands() else {
        run.note(format!("[{}] skipped: {}", step.name, step.skip_reason()));
        return StepOutcome::Skipped;
    };

    run.note(format!("[{}] started", step.name));
    for (command, scope) in commands {
        run.note(format!("[{}] $ {command}", step.name));

        let failure = match runner.run(command, &step.working_dir, scope) {
            Ok(status) if status.success() => continue,
            Ok(status) => StepFailure::Exit {
                command: command.to_string(),
                code: status.code,
            },
            Err(e) => StepFailure::Spawn {
                command: command.to_string(),
                error: e.to_string(),
            },
        };

        run.note(format!("[{}] failed: {failure}", step.name));
        if !step.fatal {
            tracing::warn!("Continuing past non-fatal step '{}'", step.name);
        }
        return StepOutcome::Failed(failure);
    }

    run.note(format!("[{}] succeeded", step.name));
    StepOutcome::Success
}

#[cfg(windows)]
fn list_dir_command() -> &'static str {
    "cd & dir"
}

#[cfg(not(windows))]
fn list_dir_command() -> &'static str {
    "pwd ; ls -la"
}
