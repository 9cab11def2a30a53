//! Artifact publishing
//!
//! Copies the declared project files and the source tree into a package
//! layout. Every required artifact and the destination are checked before
//! anything is copied, so a rejected publish leaves both layouts untouched.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::manifest::{Manifest, LOCK_FILE, MANIFEST_FILE};
use crate::error::PublishError;
use crate::infra::filesystem;

/// Project descriptor read by the compiler
pub const PROJECT_FILE: &str = "stanza.proj";

/// Source tree directory
pub const SOURCE_DIR: &str = "src";

/// Whether an artifact is a single file or a directory tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    File,
    Tree,
}

/// One entry of a publish plan; paths are relative to the layouts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub kind: ArtifactKind,
    pub required: bool,
}

impl Artifact {
    fn file(path: &str, required: bool) -> Self {
        Self::renamed(path, path, required)
    }

    fn renamed(source: &str, destination: &str, required: bool) -> Self {
        Self {
            source: PathBuf::from(source),
            destination: PathBuf::from(destination),
            kind: ArtifactKind::File,
            required,
        }
    }

    fn tree(path: &str) -> Self {
        Self {
            source: PathBuf::from(path),
            destination: PathBuf::from(path),
            kind: ArtifactKind::Tree,
            required: true,
        }
    }

    fn present_in(&self, root: &Path) -> bool {
        let path = root.join(&self.source);
        match self.kind {
            ArtifactKind::File => path.is_file(),
            ArtifactKind::Tree => path.is_dir(),
        }
    }
}

/// What a publish run copied
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct PublishReport {
    /// Destination paths of copied artifacts
    pub published: Vec<PathBuf>,
    /// Optional artifacts that were absent
    pub skipped: Vec<PathBuf>,
    /// Number of files copied, counting tree contents
    pub files: usize,
}

/// Copies a fixed set of artifacts from a source layout to a destination layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPublisher {
    artifacts: Vec<Artifact>,
}

impl ArtifactPublisher {
    pub fn new(artifacts: Vec<Artifact>) -> Self {
        Self { artifacts }
    }

    /// Package layout for a built package.
    ///
    /// The lock file is required: a successful build always writes one.
    /// `stanza-<name>-relative.proj` is published as `stanza-<name>.proj`.
    pub fn package(manifest: &Manifest) -> Self {
        let relative = format!("stanza-{}-relative.proj", manifest.name);
        let published = format!("stanza-{}.proj", manifest.name);

        Self::new(vec![
            Artifact::file(MANIFEST_FILE, true),
            Artifact::file(LOCK_FILE, true),
            Artifact::renamed(&relative, &published, false),
            Artifact::file(PROJECT_FILE, true),
            Artifact::tree(SOURCE_DIR),
        ])
    }

    /// Recipe source export: manifest, lock if present, project file, sources
    pub fn export_sources() -> Self {
        Self::new(vec![
            Artifact::file(MANIFEST_FILE, true),
            Artifact::file(LOCK_FILE, false),
            Artifact::file(PROJECT_FILE, true),
            Artifact::tree(SOURCE_DIR),
        ])
    }

    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    /// Copy every artifact from `source` into `destination`
    pub fn publish(&self, source: &Path, destination: &Path) -> Result<PublishReport, PublishError> {
        if let Some(missing) = self
            .artifacts
            .iter()
            .find(|a| a.required && !a.present_in(source))
        {
            return Err(PublishError::MissingArtifact {
                path: source.join(&missing.source),
            });
        }

        self.check_destination(source, destination)?;

        filesystem::create_dir_all(destination)?;
        let mut report = PublishReport::default();

        for artifact in &self.artifacts {
            if !artifact.present_in(source) {
                tracing::debug!("Skipping absent optional artifact {}", artifact.source.display());
                report.skipped.push(artifact.destination.clone());
                continue;
            }

            let from = source.join(&artifact.source);
            let to = destination.join(&artifact.destination);
            match artifact.kind {
                ArtifactKind::File => {
                    filesystem::copy_file(&from, &to)?;
                    report.files += 1;
                }
                ArtifactKind::Tree => {
                    report.files += filesystem::copy_tree(&from, &to, destination)?;
                }
            }
            tracing::info!("Published {}", artifact.destination.display());
            report.published.push(artifact.destination.clone());
        }

        Ok(report)
    }

    /// Reject a destination equal to `source` or nested in a copied tree
    fn check_destination(&self, source: &Path, destination: &Path) -> Result<(), PublishError> {
        let resolved = filesystem::resolve_path(destination)?;
        let overlap = |path: PathBuf| PublishError::DestinationOverlapsSource {
            destination: destination.to_path_buf(),
            source_path: path,
        };

        if resolved == filesystem::resolve_path(source)? {
            return Err(overlap(source.to_path_buf()));
        }

        for artifact in self.artifacts.iter().filter(|a| a.kind == ArtifactKind::Tree) {
            let tree = source.join(&artifact.source);
            if !tree.exists() {
                continue;
            }
            if resolved.starts_with(filesystem::resolve_path(&tree)?) {
                return Err(overlap(tree));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn manifest() -> Manifest {
        Manifest {
            name: "pcre".to_string(),
            version: "1.0.0".to_string(),
            dependencies: Vec::new(),
            lock: None,
        }
    }

    fn source_layout() -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(MANIFEST_FILE), "name = \"pcre\"").unwrap();
        std::fs::write(dir.path().join(LOCK_FILE), "locked").unwrap();
        std::fs::write(dir.path().join(PROJECT_FILE), "package pcre").unwrap();
        std::fs::create_dir_all(dir.path().join("src/inner")).unwrap();
        std::fs::write(dir.path().join("src/pcre.stanza"), "defpackage pcre").unwrap();
        std::fs::write(dir.path().join("src/inner/util.stanza"), "util").unwrap();
        dir
    }

    #[test]
    fn test_package_copies_declared_files_and_tree() {
        let src = source_layout();
        let dst = TempDir::new().unwrap();

        let report = ArtifactPublisher::package(&manifest())
            .publish(src.path(), dst.path())
            .unwrap();

        assert!(dst.path().join(MANIFEST_FILE).is_file());
        assert!(dst.path().join(LOCK_FILE).is_file());
        assert!(dst.path().join(PROJECT_FILE).is_file());
        assert!(dst.path().join("src/inner/util.stanza").is_file());
        assert_eq!(report.files, 5);
        assert!(report.skipped.contains(&PathBuf::from("stanza-pcre.proj")));
    }

    #[test]
    fn test_relative_descriptor_is_renamed() {
        let src = source_layout();
        std::fs::write(src.path().join("stanza-pcre-relative.proj"), "relative").unwrap();
        let dst = TempDir::new().unwrap();

        ArtifactPublisher::package(&manifest())
            .publish(src.path(), dst.path())
            .unwrap();

        assert_eq!(
            std::fs::read_to_string(dst.path().join("stanza-pcre.proj")).unwrap(),
            "relative"
        );
        assert!(!dst.path().join("stanza-pcre-relative.proj").exists());
    }

    #[test]
    fn test_lock_is_required_for_package() {
        let src = source_layout();
        std::fs::remove_file(src.path().join(LOCK_FILE)).unwrap();
        let dst = TempDir::new().unwrap();

        let result = ArtifactPublisher::package(&manifest()).publish(src.path(), dst.path());

        match result {
            Err(PublishError::MissingArtifact { path }) => {
                assert_eq!(path, src.path().join(LOCK_FILE));
            }
            other => panic!("expected MissingArtifact, got {other:?}"),
        }
        assert!(!dst.path().join(MANIFEST_FILE).exists());
    }

    #[test]
    fn test_export_skips_absent_lock() {
        let src = source_layout();
        std::fs::remove_file(src.path().join(LOCK_FILE)).unwrap();
        let dst = TempDir::new().unwrap();

        let report = ArtifactPublisher::export_sources()
            .publish(src.path(), dst.path())
            .unwrap();

        assert_eq!(report.skipped, vec![PathBuf::from(LOCK_FILE)]);
        assert!(!dst.path().join(LOCK_FILE).exists());
    }

    #[test]
    fn test_destination_inside_source_tree_is_rejected() {
        let src = source_layout();
        let dest = src.path().join("src/out");

        let result = ArtifactPublisher::export_sources().publish(src.path(), &dest);

        assert!(matches!(
            result,
            Err(PublishError::DestinationOverlapsSource { source_path, .. })
                if source_path == src.path().join(SOURCE_DIR)
        ));
        assert!(!dest.exists());
        let files = walkdir::WalkDir::new(src.path().join(SOURCE_DIR))
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .count();
        assert_eq!(files, 2);
    }

    #[test]
    fn test_destination_equal_to_source_is_rejected() {
        let src = source_layout();

        let result = ArtifactPublisher::package(&manifest()).publish(src.path(), src.path());

        assert!(matches!(
            result,
            Err(PublishError::DestinationOverlapsSource { .. })
        ));
    }

    #[test]
    fn test_destination_beside_source_tree_is_accepted() {
        let src = source_layout();
        let dest = src.path().join("package");

        let report = ArtifactPublisher::package(&manifest())
            .publish(src.path(), &dest)
            .unwrap();

        assert_eq!(report.files, 5);
        assert!(dest.join("src/pcre.stanza").is_file());
    }

    #[test]
    fn test_missing_source_tree_is_missing_artifact() {
        let src = source_layout();
        std::fs::remove_dir_all(src.path().join(SOURCE_DIR)).unwrap();
        let dst = TempDir::new().unwrap();

        let result = ArtifactPublisher::export_sources().publish(src.path(), dst.path());

        assert!(matches!(result, Err(PublishError::MissingArtifact { .. })));
    }

    #[test]
    fn test_missing_project_file_is_missing_artifact() {
        let src = source_layout();
        std::fs::remove_file(src.path().join(PROJECT_FILE)).unwrap();
        let dst = TempDir::new().unwrap();

        let result = ArtifactPublisher::package(&manifest()).publish(src.path(), dst.path());

        assert!(matches!(
            result,
            Err(PublishError::MissingArtifact { path }) if path.ends_with(PROJECT_FILE)
        ));
    }
}
