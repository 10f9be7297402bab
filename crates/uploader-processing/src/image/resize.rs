//! Width-constrained resizing.

use image::{DynamicImage, GenericImageView};

/// Select a filter based on how aggressively the image is being scaled.
/// Heavy downscales tolerate cheaper filters; near-1:1 scales get Lanczos.
pub fn select_filter(
    orig_width: u32,
    orig_height: u32,
    new_width: u32,
    new_height: u32,
) -> image::imageops::FilterType {
    let width_ratio = orig_width as f32 / new_width as f32;
    let height_ratio = orig_height as f32 / new_height as f32;
    let max_ratio = width_ratio.max(height_ratio);

    if max_ratio > 2.0 {
        image::imageops::FilterType::Triangle
    } else if max_ratio > 1.5 {
        image::imageops::FilterType::CatmullRom
    } else {
        image::imageops::FilterType::Lanczos3
    }
}

/// Resize to an exact width, preserving aspect ratio. Smaller images are
/// upsized.
pub fn widen(img: &DynamicImage, width: u32) -> DynamicImage {
    let (orig_width, orig_height) = img.dimensions();
    if orig_width == width {
        return img.clone();
    }
    let aspect_ratio = orig_height as f32 / orig_width as f32;
    let height = ((width as f32 * aspect_ratio).round() as u32).max(1);
    let filter = select_filter(orig_width, orig_height, width, height);
    img.resize_exact(width, height, filter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn test_image(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            width,
            height,
            Rgba([255, 0, 0, 255]),
        ))
    }

    #[test]
    fn widen_downscales_preserving_aspect() {
        let img = test_image(200, 100);
        let resized = widen(&img, 100);
        assert_eq!(resized.dimensions(), (100, 50));
    }

    #[test]
    fn widen_upsizes_smaller_images() {
        let img = test_image(50, 50);
        let resized = widen(&img, 100);
        assert_eq!(resized.dimensions(), (100, 100));
    }

    #[test]
    fn widen_is_noop_at_target_width() {
        let img = test_image(100, 40);
        let resized = widen(&img, 100);
        assert_eq!(resized.dimensions(), (100, 40));
    }

    #[test]
    fn widen_never_produces_zero_height() {
        let img = test_image(1000, 1);
        let resized = widen(&img, 10);
        assert_eq!(resized.dimensions(), (10, 1));
    }

    #[test]
    fn filter_selection_tracks_scale_ratio() {
        assert_eq!(
            select_filter(1000, 1000, 100, 100),
            image::imageops::FilterType::Triangle
        );
        assert_eq!(
            select_filter(180, 180, 100, 100),
            image::imageops::FilterType::CatmullRom
        );
        assert_eq!(
            select_filter(100, 100, 100, 100),
            image::imageops::FilterType::Lanczos3
        );
    }
}
