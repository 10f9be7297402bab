//! Image processing module
//!
//! Derived-artifact generation for stored images: EXIF orientation
//! correction, width-constrained resizing, and quality-controlled
//! re-encoding.

pub mod artifacts;
pub mod orientation;
pub mod resize;

pub use artifacts::{ArtifactGenerator, ArtifactOutcome};
pub use orientation::ImageOrientation;
