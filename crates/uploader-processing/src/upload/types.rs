//! Types for the upload pipeline.

use async_trait::async_trait;
use serde::Serialize;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// An incoming file handle: what the pipeline needs to know about an
/// upload before and during the move to its destination.
#[async_trait]
pub trait UploadedFile: Send + Sync {
    /// Size in bytes.
    fn size(&self) -> u64;

    /// Client-reported extension, not yet normalized.
    fn extension(&self) -> &str;

    /// Client-reported MIME type.
    fn mime_type(&self) -> &str;

    /// Client-reported original filename.
    fn original_name(&self) -> &str;

    /// Move the file into `directory` under `filename`.
    async fn move_to(&self, directory: &Path, filename: &str) -> std::io::Result<()>;
}

/// An upload backed by a file already on the local filesystem (CLI and
/// test usage).
#[derive(Debug, Clone)]
pub struct LocalUpload {
    path: PathBuf,
    original_name: String,
    extension: String,
    mime_type: String,
    size: u64,
}

impl LocalUpload {
    pub async fn from_path(path: impl Into<PathBuf>) -> std::io::Result<Self> {
        let path = path.into();
        let metadata = tokio::fs::metadata(&path).await?;
        let original_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_string();
        let mime_type = mime_for_extension(&extension).to_string();

        Ok(LocalUpload {
            path,
            original_name,
            extension,
            mime_type,
            size: metadata.len(),
        })
    }
}

#[async_trait]
impl UploadedFile for LocalUpload {
    fn size(&self) -> u64 {
        self.size
    }

    fn extension(&self) -> &str {
        &self.extension
    }

    fn mime_type(&self) -> &str {
        &self.mime_type
    }

    fn original_name(&self) -> &str {
        &self.original_name
    }

    async fn move_to(&self, directory: &Path, filename: &str) -> std::io::Result<()> {
        tokio::fs::create_dir_all(directory).await?;
        let destination = directory.join(filename);
        // rename fails across filesystems; fall back to copy + remove
        match tokio::fs::rename(&self.path, &destination).await {
            Ok(()) => Ok(()),
            Err(_) => {
                tokio::fs::copy(&self.path, &destination).await?;
                tokio::fs::remove_file(&self.path).await
            }
        }
    }
}

/// Map an extension to the MIME type a browser would report for it.
fn mime_for_extension(extension: &str) -> &'static str {
    match extension.to_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "ppt" => "application/vnd.ms-powerpoint",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "avi" => "video/avi",
        "ogg" => "video/ogg",
        "mp3" => "audio/mpeg3",
        "wav" => "audio/wav",
        _ => "application/octet-stream",
    }
}

/// Outcome of a successful upload.
#[derive(Debug, Clone, Serialize)]
pub struct UploadResult {
    pub id: Uuid,
    /// Stored filename: sanitized or caller-supplied base name plus the
    /// lowercased original extension.
    pub name: String,
    pub size: u64,
    pub mime_type: String,
    pub extension: String,
    pub original_name: String,
    /// Resolved location of the stored file.
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimized_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_mapping_covers_configured_defaults() {
        assert_eq!(mime_for_extension("JPG"), "image/jpeg");
        assert_eq!(mime_for_extension("pdf"), "application/pdf");
        assert_eq!(mime_for_extension("unknown"), "application/octet-stream");
    }

    #[test]
    fn upload_result_omits_absent_variant_urls() {
        let result = UploadResult {
            id: Uuid::new_v4(),
            name: "1.pdf".to_string(),
            size: 10,
            mime_type: "application/pdf".to_string(),
            extension: "pdf".to_string(),
            original_name: "report.pdf".to_string(),
            url: "docs/1.pdf".to_string(),
            optimized_url: None,
            thumbnail_url: None,
        };
        let json = serde_json::to_string(&result).unwrap();
        assert!(!json.contains("optimized_url"));
        assert!(!json.contains("thumbnail_url"));
    }
}
