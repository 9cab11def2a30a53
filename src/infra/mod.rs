//! Infrastructure layer
//!
//! Handles I/O the core delegates: external processes, filesystem copies,
//! and platform directories.

pub mod dirs;
pub mod filesystem;
pub mod process;
