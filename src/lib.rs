//! slmbuild - manifest-driven build orchestrator for slm packages
//!
//! Reads a package's `slm.toml`, turns its conan dependencies into package
//! requirements, propagates linkage options into those dependencies, runs
//! the build lifecycle, and lays out the finished package.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface parsing and output formatting
//! - [`core`] - Manifest model, resolution, option propagation, pipeline, publishing
//! - [`infra`] - Infrastructure layer (processes, filesystem, directories)
//! - [`config`] - Configuration constants
//! - [`error`] - Error types and handling

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod infra;

#[cfg(test)]
pub mod test_utils;
