//! Derived image artifact generation.
//!
//! Produces the "optimized" (width-bounded, recompressed) and "thumbnail"
//! (fixed-width) variants of a stored original. Generation is idempotent
//! by target existence: an artifact that is already on disk is skipped
//! unless the caller asks to overwrite, which keeps reprocess sweeps cheap
//! to re-run and safely resumable.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::DynamicImage;

use uploader_core::{DirectoryLayout, UploaderConfig, UploaderError, Variant};

use super::orientation::ImageOrientation;
use super::resize;

/// Result of a single artifact generation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactOutcome {
    /// The artifact was written; carries the resolved relative location.
    Created(String),
    /// The artifact already existed and overwrite was not requested.
    Skipped,
}

impl ArtifactOutcome {
    pub fn created_location(&self) -> Option<&str> {
        match self {
            ArtifactOutcome::Created(location) => Some(location),
            ArtifactOutcome::Skipped => None,
        }
    }
}

/// Generates optimized and thumbnail variants from stored originals.
#[derive(Clone)]
pub struct ArtifactGenerator {
    root: PathBuf,
    layout: DirectoryLayout,
    quality: u8,
    optimized_maximum_width: u32,
    thumbnail_width: u32,
}

impl ArtifactGenerator {
    pub fn new(root: impl Into<PathBuf>, config: &UploaderConfig) -> Self {
        ArtifactGenerator {
            root: root.into(),
            layout: config.layout(),
            quality: config.optimized_image_quality(),
            optimized_maximum_width: config.optimized_maximum_width,
            thumbnail_width: config.thumbnail_width,
        }
    }

    /// Ensure the optimized variant exists for `filename` under `path`.
    pub async fn ensure_optimized(
        &self,
        path: &str,
        filename: &str,
        overwrite: bool,
    ) -> Result<ArtifactOutcome, UploaderError> {
        self.ensure(path, filename, overwrite, Variant::Optimized)
            .await
    }

    /// Ensure the thumbnail variant exists for `filename` under `path`.
    pub async fn ensure_thumbnail(
        &self,
        path: &str,
        filename: &str,
        overwrite: bool,
    ) -> Result<ArtifactOutcome, UploaderError> {
        self.ensure(path, filename, overwrite, Variant::Thumbnail)
            .await
    }

    async fn ensure(
        &self,
        path: &str,
        filename: &str,
        overwrite: bool,
        variant: Variant,
    ) -> Result<ArtifactOutcome, UploaderError> {
        let location = self.layout.resolve_file(path, Some(variant), filename);
        let target = self.root.join(&location);

        if !overwrite && tokio::fs::try_exists(&target).await.unwrap_or(false) {
            tracing::debug!(target = %target.display(), "Artifact exists, skipping");
            return Ok(ArtifactOutcome::Skipped);
        }

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let original = self
            .root
            .join(self.layout.resolve_file(path, Some(Variant::Original), filename));
        let data = tokio::fs::read(&original).await.map_err(|e| {
            UploaderError::ArtifactGenerationFailed {
                file: filename.to_string(),
                reason: format!("could not read original {}: {}", original.display(), e),
            }
        })?;

        let encoded = self.render(&data, filename, variant).map_err(|e| {
            UploaderError::ArtifactGenerationFailed {
                file: filename.to_string(),
                reason: e.to_string(),
            }
        })?;

        tokio::fs::write(&target, &encoded).await.map_err(|e| {
            UploaderError::ArtifactGenerationFailed {
                file: filename.to_string(),
                reason: format!("could not write {}: {}", target.display(), e),
            }
        })?;

        tracing::info!(
            target = %target.display(),
            variant = ?variant,
            size_bytes = encoded.len(),
            "Generated image artifact"
        );

        Ok(ArtifactOutcome::Created(location))
    }

    /// Decode, reorient, resize, and re-encode for the requested variant.
    fn render(&self, data: &[u8], filename: &str, variant: Variant) -> anyhow::Result<Vec<u8>> {
        let img = image::ImageReader::new(Cursor::new(data))
            .with_guessed_format()?
            .decode()?;
        let img = ImageOrientation::apply_exif_orientation(img, data);

        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match variant {
            Variant::Optimized => {
                let img = if self.optimized_maximum_width > 0 {
                    resize::widen(&img, self.optimized_maximum_width)
                } else {
                    img
                };
                encode_with_quality(&img, &extension, self.quality)
            }
            Variant::Thumbnail => {
                let img = resize::widen(&img, self.thumbnail_width);
                encode_default(&img, &extension)
            }
            Variant::Original => anyhow::bail!("original is not a derived variant"),
        }
    }
}

/// Encode at a configured quality for lossy formats; lossless formats fall
/// back to their default encoding.
fn encode_with_quality(img: &DynamicImage, extension: &str, quality: u8) -> anyhow::Result<Vec<u8>> {
    match extension {
        "jpg" | "jpeg" => encode_jpeg(img, quality),
        "webp" => encode_webp(img, quality as f32),
        _ => encode_default(img, extension),
    }
}

/// Encode with the format's default settings (thumbnails).
fn encode_default(img: &DynamicImage, extension: &str) -> anyhow::Result<Vec<u8>> {
    let format = image::ImageFormat::from_extension(extension)
        .ok_or_else(|| anyhow::anyhow!("unsupported image extension: {}", extension))?;

    let mut buffer = Vec::new();
    let mut cursor = Cursor::new(&mut buffer);
    if format == image::ImageFormat::Jpeg {
        // JPEG has no alpha channel
        DynamicImage::ImageRgb8(img.to_rgb8()).write_to(&mut cursor, format)?;
    } else {
        img.write_to(&mut cursor, format)?;
    }
    Ok(buffer)
}

fn encode_jpeg(img: &DynamicImage, quality: u8) -> anyhow::Result<Vec<u8>> {
    let rgb_img = img.to_rgb8();
    let (width, height) = rgb_img.dimensions();

    let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
    comp.set_size(width as usize, height as usize);
    comp.set_quality(quality as f32);
    comp.set_progressive_mode();
    comp.set_optimize_coding(true);

    let mut comp = comp.start_compress(Vec::new())?;
    comp.write_scanlines(&rgb_img)?;
    let jpeg_data = comp.finish()?;

    Ok(jpeg_data)
}

fn encode_webp(img: &DynamicImage, quality: f32) -> anyhow::Result<Vec<u8>> {
    let rgba_img = img.to_rgba8();
    let (width, height) = rgba_img.dimensions();

    let encoder = webp::Encoder::from_rgba(&rgba_img, width, height);
    let webp_data = encoder.encode(quality);

    Ok(webp_data.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn test_image(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            width,
            height,
            Rgba([200, 50, 50, 255]),
        ))
    }

    #[test]
    fn jpeg_encoding_round_trips() {
        let encoded = encode_jpeg(&test_image(64, 48), 60).unwrap();
        let decoded = image::load_from_memory(&encoded).unwrap();
        assert_eq!(image::GenericImageView::dimensions(&decoded), (64, 48));
    }

    #[test]
    fn webp_encoding_round_trips() {
        let encoded = encode_webp(&test_image(32, 32), 60.0).unwrap();
        let decoded = image::load_from_memory(&encoded).unwrap();
        assert_eq!(image::GenericImageView::dimensions(&decoded), (32, 32));
    }

    #[test]
    fn default_encoding_rejects_unknown_extension() {
        assert!(encode_default(&test_image(4, 4), "xyz").is_err());
    }

    #[test]
    fn default_jpeg_encoding_drops_alpha() {
        let encoded = encode_default(&test_image(8, 8), "jpg").unwrap();
        let decoded = image::load_from_memory(&encoded).unwrap();
        assert_eq!(image::GenericImageView::dimensions(&decoded), (8, 8));
    }
}
