//! Upload pipeline: validate → move → derive artifacts.

pub mod pipeline;
pub mod types;

pub use pipeline::UploadPipeline;
pub use types::{LocalUpload, UploadResult, UploadedFile};
