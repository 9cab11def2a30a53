//! Common test utilities and helpers
//!
//! Shared project fixtures for integration tests. Every run of the binary
//! gets its own config directory so a developer's settings never leak in.

#![allow(dead_code)]

use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Scenario A manifest: one conan dependency, no options
pub const PCRE_MANIFEST: &str = r#"
name = "pcre"
version = "1.0.0"

[dependencies]
pcre2 = { type = "conan", pkg = "pcre2", version = "[>=10.40]" }
"#;

/// Scenario B manifest: the dependency pins `shared = false`
pub const PCRE_STATIC_DEP_MANIFEST: &str = r#"
name = "pcre"
version = "1.0.0"

[dependencies]
pcre2 = { type = "conan", pkg = "pcre2", version = "[>=10.40]", options = { shared = false } }
"#;

/// Test project context
pub struct TestProject {
    /// Project directory
    pub dir: TempDir,
    /// Isolated config directory
    pub config: TempDir,
}

impl TestProject {
    /// Create an empty project
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
            config: TempDir::new().expect("Failed to create config directory"),
        }
    }

    /// Create a project with a manifest, project file and one source file
    pub fn with_manifest(manifest: &str) -> Self {
        let project = Self::new();
        project.create_file("slm.toml", manifest);
        project.create_file("stanza.proj", "package pcre defined-in \"src/pcre.stanza\"\n");
        project.create_file("src/pcre.stanza", "defpackage pcre :\n  import core\n");
        project
    }

    /// Get the path to the test project directory
    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Create a file in the test project
    pub fn create_file(&self, name: &str, content: &str) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    /// Create a directory in the test project
    pub fn create_dir(&self, name: &str) {
        std::fs::create_dir_all(self.dir.path().join(name)).expect("Failed to create directory");
    }

    /// Check if a file exists in the test project
    pub fn file_exists(&self, name: &str) -> bool {
        self.dir.path().join(name).exists()
    }

    /// Write the global settings file
    pub fn write_settings(&self, content: &str) {
        std::fs::write(self.config.path().join("config.toml"), content)
            .expect("Failed to write settings");
    }

    /// Install an executable shell script as a fake tool and return its path
    #[cfg(unix)]
    pub fn fake_tool(&self, name: &str, script: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = self.config.path().join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{script}\n")).expect("Failed to write tool");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("Failed to make tool executable");
        path
    }

    /// Run slmbuild in the project directory
    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_slmbuild"))
            .current_dir(self.dir.path())
            .env("SLMBUILD_CONFIG_DIR", self.config.path())
            .env_remove("SLMBUILD_SKIP_TEST")
            .env_remove("RUST_LOG")
            .args(args)
            .output()
            .expect("Failed to execute slmbuild")
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse stdout as JSON
pub fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "stdout is not JSON ({e}): {}",
            String::from_utf8_lossy(&output.stdout)
        )
    })
}
