//! Upload validation policy.
//!
//! Holds the per-category allow-sets and the maximum upload size, and
//! checks an incoming file against one category. A category with no
//! configured allow-sets rejects everything; that fail-closed behavior is
//! intentional.

use std::collections::HashMap;

use uploader_core::{FileCategory, UploaderConfig, UploaderError};

/// Allowed extensions and MIME types for one category.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    pub extensions: Vec<String>,
    pub mime_types: Vec<String>,
}

/// Per-category validation rules plus the global size cap.
#[derive(Debug, Clone)]
pub struct ValidationPolicy {
    maximum_upload_size: u64,
    allowed: HashMap<FileCategory, AllowList>,
}

impl ValidationPolicy {
    pub fn new(maximum_upload_size: u64, allowed: HashMap<FileCategory, AllowList>) -> Self {
        ValidationPolicy {
            maximum_upload_size,
            allowed,
        }
    }

    pub fn from_config(config: &UploaderConfig) -> Self {
        let mut allowed = HashMap::new();
        for category in [
            FileCategory::Document,
            FileCategory::Image,
            FileCategory::Video,
            FileCategory::Audio,
        ] {
            allowed.insert(
                category,
                AllowList {
                    extensions: config.extensions_for(category).to_vec(),
                    mime_types: config.mime_types_for(category).to_vec(),
                },
            );
        }
        ValidationPolicy::new(config.maximum_upload_size, allowed)
    }

    fn allow_list(&self, category: FileCategory) -> AllowList {
        self.allowed.get(&category).cloned().unwrap_or_default()
    }

    /// Check size, extension, and MIME type in that order, failing at the
    /// first violation.
    pub fn check(
        &self,
        size: u64,
        extension: &str,
        mime_type: &str,
        category: FileCategory,
    ) -> Result<(), UploaderError> {
        self.check_size(size)?;
        self.check_extension(extension, category)?;
        self.check_mime_type(mime_type, category)?;
        Ok(())
    }

    pub fn check_size(&self, size: u64) -> Result<(), UploaderError> {
        if size > self.maximum_upload_size {
            return Err(UploaderError::TooLarge {
                size,
                max: self.maximum_upload_size,
            });
        }
        Ok(())
    }

    pub fn check_extension(
        &self,
        extension: &str,
        category: FileCategory,
    ) -> Result<(), UploaderError> {
        let allowed = self.allow_list(category).extensions;
        let normalized = extension.to_lowercase();
        if !allowed.iter().any(|e| e == &normalized) {
            return Err(UploaderError::UnapprovedExtension {
                extension: extension.to_string(),
                allowed,
            });
        }
        Ok(())
    }

    pub fn check_mime_type(
        &self,
        mime_type: &str,
        category: FileCategory,
    ) -> Result<(), UploaderError> {
        let allowed = self.allow_list(category).mime_types;
        let normalized = mime_type.to_lowercase();
        if !allowed.iter().any(|m| m == &normalized) {
            return Err(UploaderError::UnapprovedMimeType {
                mime_type: mime_type.to_string(),
                allowed,
            });
        }
        Ok(())
    }
}
