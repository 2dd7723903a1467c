//! One struct per backend call: where to read, where to write, and the
//! target size. [`operations`](super::operations) fills them in from the
//! upload config; a [`backend`](super::backend) executes them.
//!
//! - [`SaveParams`]: store the original at its own size.
//! - [`ResizeParams`]: aspect resize into a box.
//! - [`FitParams`]: center crop, then shrink.

use std::path::PathBuf;

/// Encoder quality, always within 1..=100.
///
/// The config accepts 0 for "worst"; it maps to 1 here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u32);

impl Quality {
    /// Clamp a configured quality into range.
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Parameters for re-encoding an image at its own dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub quality: Quality,
}

/// Parameters for an aspect-preserving resize.
///
/// The result fits inside `width` x `height`; one edge matches the box.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub quality: Quality,
}

/// Parameters for a fit operation (center crop + shrink-only resize).
#[derive(Debug, Clone, PartialEq)]
pub struct FitParams {
    pub source: PathBuf,
    pub output: PathBuf,
    /// Target dimensions. The output never exceeds the source's crop.
    pub width: u32,
    pub height: u32,
    pub quality: Quality,
}
