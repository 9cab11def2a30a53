//! Core business logic module
//!
//! # Submodules
//!
//! - [`manifest`] - Manifest (slm.toml) parsing and validation
//! - [`resolver`] - Conan dependency entries to package requirements
//! - [`options`] - Option propagation from the package into its dependencies
//! - [`pipeline`] - Build lifecycle state machine
//! - [`publish`] - Package and source export layouts
//! - [`tools`] - Build tool requirements and version checks
//! - [`settings`] - Global settings file

pub mod manifest;
pub mod options;
pub mod pipeline;
pub mod publish;
pub mod resolver;
pub mod settings;
pub mod tools;
