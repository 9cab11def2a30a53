//! Test utilities
//!
//! Proptest generators and a scripted [`CommandRunner`] for pipeline tests.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::infra::process::{CommandRunner, ExitStatus, Scope};

pub mod generators {
    use proptest::prelude::*;

    /// Generate a valid package name (lowercase alphanumeric with hyphens)
    pub fn package_name() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9-]{0,20}[a-z0-9]?".prop_filter("Name must not be empty", |s| !s.is_empty())
    }

    /// Generate a version constraint: exact version or a bracketed range
    pub fn version_constraint() -> impl Strategy<Value = String> {
        (0u32..50, 0u32..50, prop::bool::ANY).prop_map(|(major, minor, ranged)| {
            if ranged {
                format!("[>={major}.{minor}]")
            } else {
                format!("{major}.{minor}")
            }
        })
    }
}

/// Records every command and answers with scripted exit statuses.
/// Commands not scripted succeed.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    pub calls: Vec<(String, Scope)>,
    failures: HashMap<String, i32>,
    unspawnable: HashSet<String>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `command` exit with `code`
    pub fn fail(mut self, command: &str, code: i32) -> Self {
        self.failures.insert(command.to_string(), code);
        self
    }

    /// Make `command` fail to start
    pub fn unspawnable(mut self, command: &str) -> Self {
        self.unspawnable.insert(command.to_string());
        self
    }

    /// Commands run so far
    pub fn commands(&self) -> Vec<&str> {
        self.calls.iter().map(|(c, _)| c.as_str()).collect()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(
        &mut self,
        command: &str,
        _working_dir: &Path,
        scope: Scope,
    ) -> std::io::Result<ExitStatus> {
        self.calls.push((command.to_string(), scope));

        if self.unspawnable.contains(command) {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "program not found",
            ));
        }

        Ok(self
            .failures
            .get(command)
            .map_or(ExitStatus::SUCCESS, |code| ExitStatus::from_code(*code)))
    }
}

#[cfg(test)]
mod tests {
    use super::generators::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_package_name_is_valid(name in package_name()) {
            prop_assert!(!name.is_empty());
            prop_assert!(name.chars().next().unwrap().is_ascii_lowercase());
        }

        #[test]
        fn prop_version_constraint_is_nonempty(constraint in version_constraint()) {
            prop_assert!(!constraint.is_empty());
        }
    }
}
