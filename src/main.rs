//! slmbuild CLI - build and package slm projects
//!
//! Entry point for the slmbuild command-line application.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use slmbuild::cli::output::display_error;
use slmbuild::cli::Cli;

fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins over -v
    let level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level.into()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = cli.run() {
        display_error(&e);
        std::process::exit(1);
    }
}
