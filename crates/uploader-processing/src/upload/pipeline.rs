//! Upload pipeline: validate → move → derive artifacts.
//!
//! Orchestrates validation, the move to the destination directory, and
//! (for images) optimized/thumbnail generation. A fresh upload always
//! regenerates its variants (`overwrite = true`): the original just
//! changed, so any artifact on disk is stale by definition. Artifact
//! failures on upload are logged and left for a later reprocess sweep
//! rather than failing the upload itself.

use std::path::{Path, PathBuf};

use uploader_core::{DirectoryLayout, FileCategory, UploaderConfig, UploaderError, Variant};
use uuid::Uuid;

use super::types::{UploadResult, UploadedFile};
use crate::image::artifacts::ArtifactGenerator;
use crate::validator::ValidationPolicy;

/// Replace every character outside `[A-Za-z0-9_-]` with `-`. Case is
/// preserved; the extension must already be stripped.
fn sanitize_base_name(stem: &str) -> String {
    stem.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

/// Uploads files of all four kinds and derives image variants.
pub struct UploadPipeline {
    root: PathBuf,
    layout: DirectoryLayout,
    validator: ValidationPolicy,
    artifacts: ArtifactGenerator,
    create_optimized: bool,
    create_thumbnails: bool,
}

impl UploadPipeline {
    pub fn new(root: impl Into<PathBuf>, config: &UploaderConfig) -> Self {
        let root = root.into();
        UploadPipeline {
            layout: config.layout(),
            validator: ValidationPolicy::from_config(config),
            artifacts: ArtifactGenerator::new(root.clone(), config),
            create_optimized: config.create_optimized,
            create_thumbnails: config.create_thumbnails,
            root,
        }
    }

    pub async fn upload_image(
        &self,
        file: &dyn UploadedFile,
        path: &str,
        name: Option<&str>,
    ) -> Result<UploadResult, UploaderError> {
        self.upload(file, path, name, FileCategory::Image).await
    }

    pub async fn upload_document(
        &self,
        file: &dyn UploadedFile,
        path: &str,
        name: Option<&str>,
    ) -> Result<UploadResult, UploaderError> {
        self.upload(file, path, name, FileCategory::Document).await
    }

    pub async fn upload_video(
        &self,
        file: &dyn UploadedFile,
        path: &str,
        name: Option<&str>,
    ) -> Result<UploadResult, UploaderError> {
        self.upload(file, path, name, FileCategory::Video).await
    }

    pub async fn upload_audio(
        &self,
        file: &dyn UploadedFile,
        path: &str,
        name: Option<&str>,
    ) -> Result<UploadResult, UploaderError> {
        self.upload(file, path, name, FileCategory::Audio).await
    }

    pub async fn upload(
        &self,
        file: &dyn UploadedFile,
        path: &str,
        name: Option<&str>,
        category: FileCategory,
    ) -> Result<UploadResult, UploaderError> {
        self.validator
            .check(file.size(), file.extension(), file.mime_type(), category)?;

        let extension = file.extension().to_lowercase();
        let base_name = match name {
            Some(name) => name.to_string(),
            None => {
                let stem = Path::new(file.original_name())
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or(file.original_name());
                sanitize_base_name(stem)
            }
        };
        let stored_name = format!("{}.{}", base_name, extension);

        // Images go into the original variant directory so derived
        // artifacts can be resolved next to them; other kinds are stored
        // directly under the logical path.
        let variant = match category {
            FileCategory::Image => Some(Variant::Original),
            _ => None,
        };
        let location = self.layout.resolve(path, variant);
        let destination = self.root.join(&location);

        file.move_to(&destination, &stored_name).await.map_err(|e| {
            tracing::error!(
                destination = %destination.display(),
                filename = %stored_name,
                error = %e,
                "Upload move failed"
            );
            UploaderError::UploadFailed(format!("{} '{}'", category, file.original_name()))
        })?;

        tracing::info!(
            category = %category,
            destination = %destination.display(),
            filename = %stored_name,
            size_bytes = file.size(),
            "Upload stored"
        );

        let mut result = UploadResult {
            id: Uuid::new_v4(),
            name: stored_name.clone(),
            size: file.size(),
            mime_type: file.mime_type().to_string(),
            extension,
            original_name: file.original_name().to_string(),
            url: format!("{}{}", location, stored_name),
            optimized_url: None,
            thumbnail_url: None,
        };

        if category == FileCategory::Image {
            if self.create_optimized {
                result.optimized_url = self.derive(path, &stored_name, Variant::Optimized).await;
            }
            if self.create_thumbnails {
                result.thumbnail_url = self.derive(path, &stored_name, Variant::Thumbnail).await;
            }
        }

        Ok(result)
    }

    /// Generate one variant for a freshly uploaded image. Failures do not
    /// fail the upload; a reprocess sweep can fill the gap later.
    async fn derive(&self, path: &str, filename: &str, variant: Variant) -> Option<String> {
        let outcome = match variant {
            Variant::Optimized => self.artifacts.ensure_optimized(path, filename, true).await,
            Variant::Thumbnail => self.artifacts.ensure_thumbnail(path, filename, true).await,
            Variant::Original => return None,
        };
        match outcome {
            Ok(outcome) => outcome.created_location().map(str::to_string),
            Err(e) => {
                tracing::warn!(
                    filename = %filename,
                    variant = ?variant,
                    error = %e,
                    "Artifact generation failed during upload"
                );
                None
            }
        }
    }
}
