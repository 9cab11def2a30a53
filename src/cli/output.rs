//! Output formatting and progress indicators
//!
//! Human output goes to stdout with status prefixes; `--json` replaces it
//! with one JSON document per phase (build, publish). Errors go to stderr.

use std::sync::OnceLock;

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

/// Status message prefixes
pub mod status {
    /// Success prefix (green checkmark)
    pub const SUCCESS: &str = "✓";

    /// Error prefix (red X)
    pub const ERROR: &str = "✗";

    /// Skip prefix
    pub const SKIPPED: &str = "-";

    /// Info prefix (blue circle)
    pub const INFO: &str = "ℹ";
}

static OUTPUT: OnceLock<OutputConfig> = OnceLock::new();

/// Global output preferences
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputConfig {
    pub quiet: bool,
    pub json: bool,
    pub verbose: u8,
}

impl OutputConfig {
    pub fn new(quiet: bool, json: bool, verbose: u8) -> Self {
        Self {
            quiet,
            json,
            verbose,
        }
    }

    /// Install as the process-wide configuration (first call wins)
    pub fn apply_global(self) {
        let _ = OUTPUT.set(self);
    }

    /// The process-wide configuration
    pub fn global() -> Self {
        OUTPUT.get().copied().unwrap_or_default()
    }
}

/// Print a human-readable line unless quiet or JSON output is active
pub fn say(line: impl AsRef<str>) {
    let config = OutputConfig::global();
    if !config.quiet && !config.json {
        println!("{}", line.as_ref());
    }
}

/// Print a success line
pub fn success(message: impl AsRef<str>) {
    say(format!("{} {}", status::SUCCESS, message.as_ref()));
}

/// Print `value` as pretty JSON
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Create a spinner for operations with unknown duration.
///
/// Hidden when quiet or JSON output is active.
pub fn create_spinner(message: &str) -> ProgressBar {
    let config = OutputConfig::global();
    if config.quiet || config.json {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
        .template("{spinner:.blue} {msg}")
    {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}

/// Report an error with its cause chain on stderr
pub fn display_error(error: &anyhow::Error) {
    if OutputConfig::global().json {
        let causes: Vec<String> = error.chain().skip(1).map(ToString::to_string).collect();
        let doc = serde_json::json!({ "error": error.to_string(), "causes": causes });
        eprintln!("{doc}");
        return;
    }

    eprintln!("{} Error: {error}", status::ERROR);
    for cause in error.chain().skip(1) {
        eprintln!("  caused by: {cause}");
    }
}
