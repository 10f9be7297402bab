//! Configuration module
//!
//! Environment-backed configuration for the uploader. Every option has a
//! default matching the published package defaults, so `from_env` succeeds
//! on an empty environment. The config is constructed once at startup and
//! injected into each component; nothing reads the environment
//! mid-operation.

use std::env;

use crate::category::FileCategory;
use crate::layout::DirectoryLayout;

const MAXIMUM_UPLOAD_SIZE: u64 = 32_000_000;
const OPTIMIZED_IMAGE_QUALITY: u8 = 60;
const OPTIMIZED_MAXIMUM_WIDTH: u32 = 1000;
const THUMBNAIL_WIDTH: u32 = 100;

/// Uploader configuration.
#[derive(Clone, Debug)]
pub struct UploaderConfig {
    pub base_directory: String,
    pub original_directory: String,
    pub optimized_directory: String,
    pub thumbnail_directory: String,
    pub create_optimized: bool,
    pub create_thumbnails: bool,
    pub document_extensions: Vec<String>,
    pub image_extensions: Vec<String>,
    pub video_extensions: Vec<String>,
    pub audio_extensions: Vec<String>,
    pub document_mime_types: Vec<String>,
    pub image_mime_types: Vec<String>,
    pub video_mime_types: Vec<String>,
    pub audio_mime_types: Vec<String>,
    /// Maximum upload size in bytes.
    pub maximum_upload_size: u64,
    optimized_image_quality: u8,
    /// Maximum width of optimized images. 0 disables resizing.
    pub optimized_maximum_width: u32,
    /// Width of generated thumbnails. Always enforced.
    pub thumbnail_width: u32,
}

fn list_from_env(var: &str, default: &str) -> Vec<String> {
    env::var(var)
        .unwrap_or_else(|_| default.to_string())
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn bool_from_env(var: &str, default: bool) -> bool {
    env::var(var)
        .ok()
        .and_then(|s| s.to_lowercase().parse().ok())
        .unwrap_or(default)
}

impl Default for UploaderConfig {
    fn default() -> Self {
        UploaderConfig {
            base_directory: String::new(),
            original_directory: "original".to_string(),
            optimized_directory: String::new(),
            thumbnail_directory: "thumbnail".to_string(),
            create_optimized: true,
            create_thumbnails: true,
            document_extensions: split_list("pdf,doc,docx,ppt"),
            image_extensions: split_list("jpg,jpeg,gif,png"),
            video_extensions: split_list("avi,mov,mp4,ogg"),
            audio_extensions: split_list("mp3,wav"),
            document_mime_types: split_list(
                "application/pdf,application/msword,\
                 application/vnd.openxmlformats-officedocument.wordprocessingml.document,\
                 application/vnd.ms-powerpoint,\
                 application/vnd.openxmlformats-officedocument.presentationml.presentation",
            ),
            image_mime_types: split_list("image/gif,image/jpeg,image/png"),
            video_mime_types: split_list("video/avi,video/quicktime,video/mp4,video/ogg"),
            audio_mime_types: split_list("audio/mpeg3,audio/wav"),
            maximum_upload_size: MAXIMUM_UPLOAD_SIZE,
            optimized_image_quality: OPTIMIZED_IMAGE_QUALITY,
            optimized_maximum_width: OPTIMIZED_MAXIMUM_WIDTH,
            thumbnail_width: THUMBNAIL_WIDTH,
        }
    }
}

fn split_list(s: &str) -> Vec<String> {
    s.split(',').map(|s| s.trim().to_string()).collect()
}

impl UploaderConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let mut config = UploaderConfig {
            base_directory: env::var("UPLOADER_BASE_DIRECTORY").unwrap_or_default(),
            original_directory: env::var("UPLOADER_ORIGINAL_DIRECTORY")
                .unwrap_or_else(|_| "original".to_string()),
            optimized_directory: env::var("UPLOADER_OPTIMIZED_DIRECTORY").unwrap_or_default(),
            thumbnail_directory: env::var("UPLOADER_THUMBNAIL_DIRECTORY")
                .unwrap_or_else(|_| "thumbnail".to_string()),
            create_optimized: bool_from_env("UPLOADER_CREATE_OPTIMIZED", true),
            create_thumbnails: bool_from_env("UPLOADER_CREATE_THUMBNAILS", true),
            document_extensions: list_from_env("UPLOADER_DOCUMENT_EXTENSIONS", "pdf,doc,docx,ppt"),
            image_extensions: list_from_env("UPLOADER_IMAGE_EXTENSIONS", "jpg,jpeg,gif,png"),
            video_extensions: list_from_env("UPLOADER_VIDEO_EXTENSIONS", "avi,mov,mp4,ogg"),
            audio_extensions: list_from_env("UPLOADER_AUDIO_EXTENSIONS", "mp3,wav"),
            document_mime_types: env::var("UPLOADER_DOCUMENT_MIME_TYPES")
                .map(|s| split_lower(&s))
                .unwrap_or_else(|_| UploaderConfig::default().document_mime_types),
            image_mime_types: env::var("UPLOADER_IMAGE_MIME_TYPES")
                .map(|s| split_lower(&s))
                .unwrap_or_else(|_| UploaderConfig::default().image_mime_types),
            video_mime_types: env::var("UPLOADER_VIDEO_MIME_TYPES")
                .map(|s| split_lower(&s))
                .unwrap_or_else(|_| UploaderConfig::default().video_mime_types),
            audio_mime_types: env::var("UPLOADER_AUDIO_MIME_TYPES")
                .map(|s| split_lower(&s))
                .unwrap_or_else(|_| UploaderConfig::default().audio_mime_types),
            maximum_upload_size: env::var("UPLOADER_MAXIMUM_UPLOAD_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(MAXIMUM_UPLOAD_SIZE),
            optimized_image_quality: OPTIMIZED_IMAGE_QUALITY,
            optimized_maximum_width: env::var("UPLOADER_OPTIMIZED_MAXIMUM_WIDTH")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(OPTIMIZED_MAXIMUM_WIDTH),
            thumbnail_width: env::var("UPLOADER_THUMBNAIL_WIDTH")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(THUMBNAIL_WIDTH),
        };

        if let Some(quality) = env::var("UPLOADER_OPTIMIZED_IMAGE_QUALITY")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.set_optimized_image_quality(quality);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.thumbnail_width == 0 {
            return Err(anyhow::anyhow!(
                "UPLOADER_THUMBNAIL_WIDTH must be greater than 0"
            ));
        }
        Ok(())
    }

    /// Set the optimized image quality. Values outside 1-100 are ignored
    /// and the last valid value is kept.
    pub fn set_optimized_image_quality(&mut self, quality: u8) {
        if (1..=100).contains(&quality) {
            self.optimized_image_quality = quality;
        }
    }

    pub fn optimized_image_quality(&self) -> u8 {
        self.optimized_image_quality
    }

    /// Build the directory layout from the configured directory names.
    pub fn layout(&self) -> DirectoryLayout {
        DirectoryLayout::new(
            &self.base_directory,
            &self.original_directory,
            &self.optimized_directory,
            &self.thumbnail_directory,
        )
    }

    pub fn extensions_for(&self, category: FileCategory) -> &[String] {
        match category {
            FileCategory::Document => &self.document_extensions,
            FileCategory::Image => &self.image_extensions,
            FileCategory::Video => &self.video_extensions,
            FileCategory::Audio => &self.audio_extensions,
        }
    }

    pub fn mime_types_for(&self, category: FileCategory) -> &[String] {
        match category {
            FileCategory::Document => &self.document_mime_types,
            FileCategory::Image => &self.image_mime_types,
            FileCategory::Video => &self.video_mime_types,
            FileCategory::Audio => &self.audio_mime_types,
        }
    }
}

fn split_lower(s: &str) -> Vec<String> {
    s.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}
