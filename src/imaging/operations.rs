//! High-level image operations.
//!
//! These functions combine calculations with backend execution.
//! They take a dimension entry, compute parameters, and call the backend.

use super::backend::{BackendError, ImageBackend, SavedImage};
use super::params::{FitParams, Quality, ResizeParams, SaveParams};
use crate::config::DimensionSpec;
use std::path::Path;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Re-encode the uploaded original at `output`.
pub fn save_original(
    backend: &impl ImageBackend,
    source: &Path,
    output: &Path,
    quality: Quality,
) -> Result<SavedImage> {
    backend.save(&SaveParams {
        source: source.to_path_buf(),
        output: output.to_path_buf(),
        quality,
    })
}

/// A thumbnail operation ready to hand to a backend.
#[derive(Debug, Clone, PartialEq)]
pub enum ThumbnailPlan {
    /// Squared thumbnail: crop to a square, shrink only.
    Fit(FitParams),
    /// Aspect resize bounded by the configured box.
    Resize(ResizeParams),
}

impl ThumbnailPlan {
    pub fn is_squared(&self) -> bool {
        matches!(self, ThumbnailPlan::Fit(_))
    }
}

/// Plan a thumbnail operation without executing it.
///
/// Squared specs use the shorter of width and height as the side of the
/// square. Non-squared specs bound both edges.
pub fn plan_thumbnail(
    spec: &DimensionSpec,
    source: &Path,
    output: &Path,
    quality: Quality,
) -> ThumbnailPlan {
    let width = spec.width;
    let height = spec.target_height();

    if spec.squared {
        let side = width.min(height);
        ThumbnailPlan::Fit(FitParams {
            source: source.to_path_buf(),
            output: output.to_path_buf(),
            width: side,
            height: side,
            quality,
        })
    } else {
        ThumbnailPlan::Resize(ResizeParams {
            source: source.to_path_buf(),
            output: output.to_path_buf(),
            width,
            height,
            quality,
        })
    }
}

/// Execute a planned thumbnail operation.
pub fn create_thumbnail(backend: &impl ImageBackend, plan: &ThumbnailPlan) -> Result<SavedImage> {
    match plan {
        ThumbnailPlan::Fit(params) => backend.fit(params),
        ThumbnailPlan::Resize(params) => backend.resize(params),
    }
}
