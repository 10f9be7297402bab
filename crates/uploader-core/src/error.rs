//! Error types for the upload and reprocessing pipeline.

use crate::human_size::human_size;

/// Errors raised by validation, upload, and artifact generation.
///
/// Validation and move failures are raised synchronously to the caller of
/// `upload`; retry policy is a caller concern. During a reprocess sweep,
/// `ArtifactGenerationFailed` is caught at the per-file boundary and
/// collected instead of aborting the sweep.
#[derive(Debug, thiserror::Error)]
pub enum UploaderError {
    #[error("File size of {} is greater than maximum allowed size of {}.", human_size(*.size), human_size(*.max))]
    TooLarge { size: u64, max: u64 },

    #[error("File does not have an approved extension: {}", .allowed.join(", "))]
    UnapprovedExtension {
        extension: String,
        allowed: Vec<String>,
    },

    #[error("File does not have an approved type: {}", .allowed.join(", "))]
    UnapprovedMimeType {
        mime_type: String,
        allowed: Vec<String>,
    },

    #[error("Could not upload {0}.")]
    UploadFailed(String),

    #[error("Directory does not exist: {0}")]
    DirectoryNotFound(String),

    #[error("Could not process {file}: {reason}")]
    ArtifactGenerationFailed { file: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
