//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the operations every backend must
//! support: re-save an original, aspect resize, fit crop, and EXIF reading.
//! Every write operation reports what actually landed on disk as a
//! [`SavedImage`], so callers never have to re-open the output.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate and `kamadak-exif`.

use super::params::{FitParams, ResizeParams, SaveParams};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Properties of an image written by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavedImage {
    pub width: u32,
    pub height: u32,
    /// Size of the written file in bytes.
    pub filesize: u64,
}

/// EXIF tags keyed by tag name (e.g. `"Model"`), values rendered for display.
pub type ExifData = BTreeMap<String, String>;

/// Trait for image processing backends.
///
/// Operations take a source path and decode it themselves; the backend holds
/// no per-image state between calls.
pub trait ImageBackend: Sync {
    /// Decode the source and write it to `output` at the given quality.
    fn save(&self, params: &SaveParams) -> Result<SavedImage, BackendError>;

    /// Resize preserving aspect ratio, bounded by the target box.
    fn resize(&self, params: &ResizeParams) -> Result<SavedImage, BackendError>;

    /// Center crop to the target aspect, then shrink to the target size.
    fn fit(&self, params: &FitParams) -> Result<SavedImage, BackendError>;

    /// Read EXIF tags. Images without EXIF yield an empty map.
    fn read_exif(&self, path: &Path) -> Result<ExifData, BackendError>;
}
