//! Command-line interface module
//!
//! This module handles argument parsing and output formatting.
//! It contains no business logic - that belongs in the [`crate::core`] module.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Parser;

use crate::core::settings::Settings;
use crate::infra::dirs::SlmbuildDirs;
use commands::Commands;
use output::OutputConfig;

/// slmbuild - build and package slm projects for conan
///
/// Reads slm.toml, resolves conan dependencies, runs the build lifecycle
/// and lays out the package.
#[derive(Parser, Debug)]
#[command(name = "slmbuild")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output in JSON format for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Project directory containing slm.toml
    #[arg(short = 'C', long, global = true, value_name = "DIR")]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Everything a command needs from the invoking environment
#[derive(Debug, Clone)]
pub struct Context {
    pub project_dir: PathBuf,
    pub settings: Settings,
}

impl Cli {
    /// Output preferences from flags, falling back to the settings file
    pub fn output_config(&self, settings: &Settings) -> OutputConfig {
        OutputConfig::new(
            self.quiet || settings.output.quiet.unwrap_or(false),
            self.json || settings.output.json.unwrap_or(false),
            self.verbose,
        )
    }

    /// Load settings, install output preferences, and execute the command
    pub fn run(self) -> Result<()> {
        let dirs = SlmbuildDirs::new();
        let settings = Settings::load(&dirs).context("Failed to load settings")?;
        self.output_config(&settings).apply_global();

        let project_dir = match &self.project_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().context("Failed to determine current directory")?,
        };
        let ctx = Context {
            project_dir,
            settings,
        };

        if let Some(cmd) = self.command {
            cmd.run(&ctx)
        } else {
            // No subcommand provided, show help
            use clap::CommandFactory;
            let mut cmd = Self::command();
            cmd.print_help()?;
            Ok(())
        }
    }
}
