//! Upload processing pipeline
//!
//! This crate provides validation, image artifact generation (optimized
//! and thumbnail variants), the upload pipeline, and the batch reprocess
//! sweep over stored originals.

pub mod image;
pub mod sweep;
pub mod upload;
pub mod validator;

pub use image::artifacts::{ArtifactGenerator, ArtifactOutcome};
pub use sweep::{ReprocessSweep, SweepFailure, SweepOutcome};
pub use upload::pipeline::UploadPipeline;
pub use upload::types::{LocalUpload, UploadResult, UploadedFile};
pub use validator::ValidationPolicy;
