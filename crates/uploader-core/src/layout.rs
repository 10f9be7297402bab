//! Directory layout resolution.
//!
//! Turns a logical (base path, variant) pair into a normalized relative
//! filesystem path using the configured directory names. Pure string
//! transform, no I/O.

use serde::{Deserialize, Serialize};

/// Which derived-artifact directory a path should resolve into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Variant {
    Original,
    Optimized,
    Thumbnail,
}

/// Configured directory names for stored files and their derived variants.
///
/// Every segment is kept in normalized form: no leading separator, exactly
/// one trailing separator when non-empty. The `optimized` segment may be
/// empty, which places optimized images alongside the logical path root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryLayout {
    base: String,
    original: String,
    optimized: String,
    thumbnail: String,
}

/// Normalize a path segment: strip leading separators, then collapse any
/// trailing separators down to exactly one. Empty input stays empty.
fn normalize_segment(segment: &str) -> String {
    let trimmed = segment.trim_start_matches('/');
    if trimmed.is_empty() {
        return String::new();
    }
    let trimmed = trimmed.trim_end_matches('/');
    if trimmed.is_empty() {
        return String::new();
    }
    format!("{}/", trimmed)
}

impl Default for DirectoryLayout {
    fn default() -> Self {
        Self::new("", "original", "", "thumbnail")
    }
}

impl DirectoryLayout {
    pub fn new(base: &str, original: &str, optimized: &str, thumbnail: &str) -> Self {
        DirectoryLayout {
            base: normalize_segment(base),
            original: normalize_segment(original),
            optimized: normalize_segment(optimized),
            thumbnail: normalize_segment(thumbnail),
        }
    }

    fn variant_segment(&self, variant: Variant) -> &str {
        match variant {
            Variant::Original => &self.original,
            Variant::Optimized => &self.optimized,
            Variant::Thumbnail => &self.thumbnail,
        }
    }

    /// Resolve a caller-supplied path (e.g. an entity's storage folder) into
    /// the directory for the given variant, or the plain storage directory
    /// when no variant is requested.
    ///
    /// The result always ends in a single `/` (or is empty when every
    /// segment is empty), so a filename can be appended directly.
    pub fn resolve(&self, base_path: &str, variant: Option<Variant>) -> String {
        let mut resolved = String::new();
        resolved.push_str(&self.base);
        resolved.push_str(&normalize_segment(base_path));
        if let Some(variant) = variant {
            resolved.push_str(self.variant_segment(variant));
        }
        resolved
    }

    /// Resolve a full file location: variant directory plus filename.
    pub fn resolve_file(&self, base_path: &str, variant: Option<Variant>, filename: &str) -> String {
        format!("{}{}", self.resolve(base_path, variant), filename)
    }
}
