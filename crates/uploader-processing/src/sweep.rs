//! Batch reprocessing of stored originals.
//!
//! Walks a directory of original images and regenerates the optimized and
//! thumbnail variants for each file. A single corrupt or unreadable file
//! is recorded and skipped; it never aborts the rest of the sweep.

use std::path::PathBuf;

use serde::Serialize;
use uploader_core::{DirectoryLayout, UploaderConfig, UploaderError, Variant};

use crate::image::artifacts::{ArtifactGenerator, ArtifactOutcome};

/// A per-file error recorded during a sweep.
#[derive(Debug, Clone, Serialize)]
pub struct SweepFailure {
    pub file: String,
    pub error: String,
}

/// Counts of artifacts actually created across one sweep, plus any
/// per-file failures.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SweepOutcome {
    pub optimized: usize,
    pub thumbnails: usize,
    pub failures: Vec<SweepFailure>,
}

/// Regenerates derived artifacts for every original under a logical path.
pub struct ReprocessSweep {
    root: PathBuf,
    layout: DirectoryLayout,
    artifacts: ArtifactGenerator,
}

/// VCS placeholder files kept in otherwise-empty upload directories.
fn is_ignore_marker(filename: &str) -> bool {
    filename == ".gitignore" || filename.ends_with(".gitignore")
}

impl ReprocessSweep {
    pub fn new(root: impl Into<PathBuf>, config: &UploaderConfig) -> Self {
        let root = root.into();
        ReprocessSweep {
            layout: config.layout(),
            artifacts: ArtifactGenerator::new(root.clone(), config),
            root,
        }
    }

    /// Sweep the originals under `path`, regenerating artifacts.
    ///
    /// With `overwrite` false only missing artifacts are created, so an
    /// interrupted sweep picks up where it left off. The original
    /// directory itself must exist; that is checked before any per-file
    /// work.
    pub async fn run(&self, path: &str, overwrite: bool) -> Result<SweepOutcome, UploaderError> {
        let location = self.layout.resolve(path, Some(Variant::Original));
        let directory = self.root.join(&location);

        match tokio::fs::metadata(&directory).await {
            Ok(metadata) if metadata.is_dir() => {}
            _ => return Err(UploaderError::DirectoryNotFound(location)),
        }

        tracing::info!(
            directory = %directory.display(),
            overwrite = overwrite,
            "Starting reprocess sweep"
        );

        let mut outcome = SweepOutcome::default();
        let mut entries = tokio::fs::read_dir(&directory).await?;

        while let Some(entry) = entries.next_entry().await? {
            let file_type = entry.file_type().await?;
            if file_type.is_dir() {
                continue;
            }
            let filename = entry.file_name().to_string_lossy().into_owned();
            if is_ignore_marker(&filename) {
                continue;
            }

            match self.artifacts.ensure_optimized(path, &filename, overwrite).await {
                Ok(ArtifactOutcome::Created(_)) => outcome.optimized += 1,
                Ok(ArtifactOutcome::Skipped) => {}
                Err(e) => {
                    tracing::warn!(file = %filename, error = %e, "Optimized generation failed");
                    outcome.failures.push(SweepFailure {
                        file: filename.clone(),
                        error: e.to_string(),
                    });
                }
            }

            match self.artifacts.ensure_thumbnail(path, &filename, overwrite).await {
                Ok(ArtifactOutcome::Created(_)) => outcome.thumbnails += 1,
                Ok(ArtifactOutcome::Skipped) => {}
                Err(e) => {
                    tracing::warn!(file = %filename, error = %e, "Thumbnail generation failed");
                    outcome.failures.push(SweepFailure {
                        file: filename,
                        error: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            optimized = outcome.optimized,
            thumbnails = outcome.thumbnails,
            failures = outcome.failures.len(),
            "Reprocess sweep finished"
        );

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignore_markers_are_detected() {
        assert!(is_ignore_marker(".gitignore"));
        assert!(is_ignore_marker("uploads.gitignore"));
        assert!(!is_ignore_marker("photo.jpg"));
        assert!(!is_ignore_marker("gitignore.jpg"));
    }
}
