//! Integration tests for the upload pipeline.

use std::path::Path;

use image::{Rgb, RgbImage};
use tempfile::tempdir;

use uploader_core::{UploaderConfig, UploaderError};
use uploader_processing::{LocalUpload, UploadPipeline};

fn test_config() -> UploaderConfig {
    let mut config = UploaderConfig::default();
    config.optimized_maximum_width = 64;
    config.thumbnail_width = 16;
    config
}

/// Stage an incoming file in its own directory, as if it had just been
/// written by a form handler.
async fn stage_image(dir: &Path, name: &str) -> LocalUpload {
    let path = dir.join(name);
    let img = RgbImage::from_pixel(48, 32, Rgb([120, 40, 200]));
    img.save(&path).unwrap();
    LocalUpload::from_path(path).await.unwrap()
}

async fn stage_bytes(dir: &Path, name: &str, data: &[u8]) -> LocalUpload {
    let path = dir.join(name);
    tokio::fs::write(&path, data).await.unwrap();
    LocalUpload::from_path(path).await.unwrap()
}

#[tokio::test]
async fn image_upload_stores_original_and_derives_variants() {
    let root = tempdir().unwrap();
    let inbox = tempdir().unwrap();
    let file = stage_image(inbox.path(), "My Photo (1).png").await;

    let pipeline = UploadPipeline::new(root.path(), &test_config());
    let result = pipeline.upload_image(&file, "users", None).await.unwrap();

    assert_eq!(result.name, "My-Photo--1-.png");
    assert_eq!(result.extension, "png");
    assert_eq!(result.mime_type, "image/png");
    assert_eq!(result.original_name, "My Photo (1).png");
    assert_eq!(result.url, "users/original/My-Photo--1-.png");
    assert_eq!(result.optimized_url.as_deref(), Some("users/My-Photo--1-.png"));
    assert_eq!(
        result.thumbnail_url.as_deref(),
        Some("users/thumbnail/My-Photo--1-.png")
    );

    assert!(root.path().join("users/original/My-Photo--1-.png").exists());
    assert!(root.path().join("users/My-Photo--1-.png").exists());
    assert!(root.path().join("users/thumbnail/My-Photo--1-.png").exists());

    // The staged source was moved, not copied.
    assert!(!inbox.path().join("My Photo (1).png").exists());
}

#[tokio::test]
async fn caller_supplied_name_wins_over_sanitizing() {
    let root = tempdir().unwrap();
    let inbox = tempdir().unwrap();
    let file = stage_image(inbox.path(), "upload.PNG").await;

    let pipeline = UploadPipeline::new(root.path(), &test_config());
    let result = pipeline
        .upload_image(&file, "avatars", Some("42"))
        .await
        .unwrap();

    // Extension is lowercased regardless of how the client spelled it.
    assert_eq!(result.name, "42.png");
    assert!(root.path().join("avatars/original/42.png").exists());
}

#[tokio::test]
async fn document_upload_stores_flat_with_no_variants() {
    let root = tempdir().unwrap();
    let inbox = tempdir().unwrap();
    let file = stage_bytes(inbox.path(), "Q3 report.pdf", b"%PDF-1.4").await;

    let pipeline = UploadPipeline::new(root.path(), &test_config());
    let result = pipeline.upload_document(&file, "docs", None).await.unwrap();

    assert_eq!(result.name, "Q3-report.pdf");
    assert_eq!(result.url, "docs/Q3-report.pdf");
    assert!(result.optimized_url.is_none());
    assert!(result.thumbnail_url.is_none());

    assert!(root.path().join("docs/Q3-report.pdf").exists());
    assert!(!root.path().join("docs/original").exists());
}

#[tokio::test]
async fn unapproved_extension_is_rejected_before_any_move() {
    let root = tempdir().unwrap();
    let inbox = tempdir().unwrap();
    let file = stage_bytes(inbox.path(), "payload.exe", b"MZ").await;

    let pipeline = UploadPipeline::new(root.path(), &test_config());
    let err = pipeline.upload_document(&file, "docs", None).await.unwrap_err();

    assert!(matches!(err, UploaderError::UnapprovedExtension { .. }));
    // Rejected uploads leave the staged file untouched.
    assert!(inbox.path().join("payload.exe").exists());
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
    let root = tempdir().unwrap();
    let inbox = tempdir().unwrap();
    let file = stage_image(inbox.path(), "big.png").await;

    let mut config = test_config();
    config.maximum_upload_size = 4;
    let pipeline = UploadPipeline::new(root.path(), &config);
    let err = pipeline.upload_image(&file, "users", None).await.unwrap_err();

    assert!(matches!(err, UploaderError::TooLarge { .. }));
}

#[tokio::test]
async fn disabled_variant_flags_skip_generation() {
    let root = tempdir().unwrap();
    let inbox = tempdir().unwrap();
    let file = stage_image(inbox.path(), "plain.png").await;

    let mut config = test_config();
    config.create_optimized = false;
    config.create_thumbnails = false;
    let pipeline = UploadPipeline::new(root.path(), &config);
    let result = pipeline.upload_image(&file, "users", None).await.unwrap();

    assert!(result.optimized_url.is_none());
    assert!(result.thumbnail_url.is_none());
    assert!(root.path().join("users/original/plain.png").exists());
    assert!(!root.path().join("users/plain.png").exists());
    assert!(!root.path().join("users/thumbnail").exists());
}

#[tokio::test]
async fn path_normalization_makes_equivalent_spellings_identical() {
    let root = tempdir().unwrap();
    let inbox = tempdir().unwrap();
    let config = test_config();

    let first = stage_image(inbox.path(), "a.png").await;
    let pipeline = UploadPipeline::new(root.path(), &config);
    let result_a = pipeline.upload_image(&first, "/teams/", None).await.unwrap();

    let second = stage_image(inbox.path(), "b.png").await;
    let result_b = pipeline.upload_image(&second, "teams", None).await.unwrap();

    assert_eq!(result_a.url, "teams/original/a.png");
    assert_eq!(result_b.url, "teams/original/b.png");
    assert!(root.path().join("teams/original/a.png").exists());
    assert!(root.path().join("teams/original/b.png").exists());
}
