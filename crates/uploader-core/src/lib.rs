//! Uploader core library
//!
//! This crate provides the configuration surface, directory layout
//! resolution, file categories, and error types shared by the processing
//! pipeline and the CLI.

pub mod category;
pub mod config;
pub mod error;
pub mod human_size;
pub mod layout;

// Re-export commonly used types
pub use category::FileCategory;
pub use config::UploaderConfig;
pub use error::UploaderError;
pub use human_size::human_size;
pub use layout::{DirectoryLayout, Variant};
