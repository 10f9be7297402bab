//! EXIF orientation correction.

use image::{imageops, DynamicImage};
use std::io::Cursor;

/// Image orientation operations (rotation and flipping).
pub struct ImageOrientation;

impl ImageOrientation {
    /// Read the EXIF orientation tag from raw image bytes.
    ///
    /// Returns the orientation value (1-8), or 1 (normal) when the image
    /// carries no EXIF data or the tag is absent.
    pub fn read_exif_orientation(data: &[u8]) -> u8 {
        let mut cursor = Cursor::new(data);
        let Ok(parsed) = exif::Reader::new().read_from_container(&mut cursor) else {
            return 1;
        };
        parsed
            .get_field(exif::Tag::Orientation, exif::In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .filter(|v| (1..=8).contains(v))
            .map(|v| v as u8)
            .unwrap_or(1)
    }

    /// Rotation and flip operations needed for a given EXIF orientation.
    /// Returns (rotate_angle, flip_horizontal, flip_vertical).
    pub fn orientation_transforms(orientation: u8) -> (Option<u16>, bool, bool) {
        match orientation {
            1 => (None, false, false),      // Normal
            2 => (None, true, false),       // Mirror horizontal
            3 => (Some(180), false, false), // Rotate 180
            4 => (None, false, true),       // Mirror vertical
            5 => (Some(270), true, false),  // Mirror horizontal + Rotate 270 CW
            6 => (Some(90), false, false),  // Rotate 90 CW
            7 => (Some(90), true, false),   // Mirror horizontal + Rotate 90 CW
            8 => (Some(270), false, false), // Rotate 270 CW
            _ => (None, false, false),
        }
    }

    /// Apply EXIF orientation correction so the decoded pixels match the
    /// intended display orientation.
    pub fn apply_exif_orientation(mut img: DynamicImage, data: &[u8]) -> DynamicImage {
        let orientation = Self::read_exif_orientation(data);
        if orientation == 1 {
            return img;
        }

        let (rotate, flip_h, flip_v) = Self::orientation_transforms(orientation);

        tracing::debug!(
            orientation = orientation,
            rotate = ?rotate,
            flip_horizontal = flip_h,
            flip_vertical = flip_v,
            "Applying EXIF orientation"
        );

        if let Some(angle) = rotate {
            img = Self::rotate_by_angle(img, angle);
        }
        if flip_h {
            img = DynamicImage::ImageRgba8(imageops::flip_horizontal(&img.to_rgba8()));
        }
        if flip_v {
            img = DynamicImage::ImageRgba8(imageops::flip_vertical(&img.to_rgba8()));
        }

        img
    }

    /// Rotate by 90, 180, or 270 degrees clockwise.
    pub fn rotate_by_angle(img: DynamicImage, angle: u16) -> DynamicImage {
        match angle {
            90 => DynamicImage::ImageRgba8(imageops::rotate90(&img.to_rgba8())),
            180 => DynamicImage::ImageRgba8(imageops::rotate180(&img.to_rgba8())),
            270 => DynamicImage::ImageRgba8(imageops::rotate270(&img.to_rgba8())),
            _ => img,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgba, RgbaImage};

    #[test]
    fn missing_exif_reads_as_normal() {
        assert_eq!(ImageOrientation::read_exif_orientation(b""), 1);
        assert_eq!(ImageOrientation::read_exif_orientation(b"not an image"), 1);
    }

    #[test]
    fn transforms_cover_all_orientations() {
        assert_eq!(
            ImageOrientation::orientation_transforms(1),
            (None, false, false)
        );
        assert_eq!(
            ImageOrientation::orientation_transforms(3),
            (Some(180), false, false)
        );
        assert_eq!(
            ImageOrientation::orientation_transforms(6),
            (Some(90), false, false)
        );
        assert_eq!(
            ImageOrientation::orientation_transforms(8),
            (Some(270), false, false)
        );
        // Out of range treated as normal
        assert_eq!(
            ImageOrientation::orientation_transforms(9),
            (None, false, false)
        );
    }

    #[test]
    fn rotation_swaps_dimensions() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 2, Rgba([0, 0, 255, 255])));
        assert_eq!(
            ImageOrientation::rotate_by_angle(img.clone(), 90).dimensions(),
            (2, 4)
        );
        assert_eq!(
            ImageOrientation::rotate_by_angle(img.clone(), 180).dimensions(),
            (4, 2)
        );
        assert_eq!(
            ImageOrientation::rotate_by_angle(img, 270).dimensions(),
            (2, 4)
        );
    }

    #[test]
    fn exifless_image_passes_through_unchanged() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(10, 20, Rgba([255, 0, 0, 255])));
        let oriented = ImageOrientation::apply_exif_orientation(img.clone(), b"");
        assert_eq!(oriented.dimensions(), img.dimensions());
    }
}
