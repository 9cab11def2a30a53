//! CLI command implementations
//!
//! Each command is implemented in its own submodule.

pub mod build;
pub mod doctor;
pub mod export;
pub mod info;
pub mod package;
pub mod requirements;

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};

use crate::cli::Context;
use crate::core::options::{parse_assignment, PackageConfiguration};

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the package identity and declared dependencies
    Info,

    /// Print conan requirements, tool requirements and propagated options
    Requirements {
        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Run the build lifecycle: verify, clean, build, test
    Build {
        #[command(flatten)]
        build: BuildArgs,
    },

    /// Build, then lay out the package
    Package {
        #[command(flatten)]
        build: BuildArgs,

        /// Package output directory
        #[arg(short, long, value_name = "DIR")]
        dest: Option<PathBuf>,
    },

    /// Copy the recipe sources (manifest, lock, project file, src/)
    Export {
        /// Export directory
        #[arg(short, long, value_name = "DIR")]
        dest: Option<PathBuf>,
    },

    /// Check that the build tools are installed and new enough
    Doctor,
}

/// Top-level package configuration flags
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Build as a shared library
    #[arg(long, conflicts_with = "static_lib")]
    pub shared: bool,

    /// Build as a static library
    #[arg(long = "static")]
    pub static_lib: bool,

    /// Extra package option (repeatable)
    #[arg(short = 'o', long = "option", value_name = "KEY=VALUE")]
    pub options: Vec<String>,
}

impl ConfigArgs {
    /// Linkage chosen on the command line, if any
    pub fn shared_flag(&self) -> Option<bool> {
        match (self.shared, self.static_lib) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }

    /// Build the package configuration: flags over settings over defaults
    pub fn package_configuration(&self, ctx: &Context) -> Result<PackageConfiguration> {
        let mut config = PackageConfiguration {
            shared: ctx.settings.shared(self.shared_flag()),
            ..PackageConfiguration::default()
        };

        for raw in &self.options {
            let (key, value) = parse_assignment(raw)
                .ok_or_else(|| anyhow!("Invalid option '{raw}': expected KEY=VALUE"))?;
            config = config.with_option(&key, value);
        }

        Ok(config)
    }
}

/// Flags shared by commands that run the pipeline
#[derive(Args, Debug, Clone, Default)]
pub struct BuildArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Skip building and running the test binary
    #[arg(
        long,
        env = "SLMBUILD_SKIP_TEST",
        value_parser = clap::builder::BoolishValueParser::new(),
        num_args = 0..=1,
        default_missing_value = "true",
        value_name = "BOOL"
    )]
    pub skip_test: Option<bool>,
}

impl Commands {
    /// Execute the command
    pub fn run(self, ctx: &Context) -> Result<()> {
        match self {
            Self::Info => info::execute(ctx),
            Self::Requirements { config } => requirements::execute(ctx, &config),
            Self::Build { build } => build::execute(ctx, &build).map(|_| ()),
            Self::Package { build, dest } => package::execute(ctx, &build, dest),
            Self::Export { dest } => export::execute(ctx, dest),
            Self::Doctor => doctor::execute(ctx),
        }
    }
}
