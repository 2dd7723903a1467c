//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Calculate the largest size that fits inside `bound` while keeping the
/// source aspect ratio.
///
/// One edge matches the bound exactly, the other is at most the bound.
/// Both edges are at least 1px.
///
/// # Examples
/// ```
/// # use imageupload::imaging::calculate_bounded_dimensions;
/// // Square source into a 200x100 box → 100x100
/// assert_eq!(calculate_bounded_dimensions((400, 400), (200, 100)), (100, 100));
///
/// // 4:3 landscape into a 200x200 box → 200x150
/// assert_eq!(calculate_bounded_dimensions((800, 600), (200, 200)), (200, 150));
/// ```
pub fn calculate_bounded_dimensions(source: (u32, u32), bound: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (max_w, max_h) = bound;

    let w_ratio = max_w as f64 / src_w as f64;
    let h_ratio = max_h as f64 / src_h as f64;
    let ratio = w_ratio.min(h_ratio);

    let w = ((src_w as f64 * ratio).round() as u32).max(1);
    let h = ((src_h as f64 * ratio).round() as u32).max(1);
    (w, h)
}

/// Crop window and final size for a fit operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitGeometry {
    pub crop_x: u32,
    pub crop_y: u32,
    pub crop_width: u32,
    pub crop_height: u32,
    /// Output size after the crop is scaled down.
    pub width: u32,
    pub height: u32,
}

/// Calculate a center crop with the target aspect ratio, and the size it is
/// scaled to.
///
/// The crop is the largest window of the target aspect that fits inside the
/// source. It is then shrunk to the target; a crop smaller than the target
/// is kept as is, so the output never exceeds the source.
///
/// # Arguments
/// * `source` - Original image dimensions (width, height)
/// * `target` - Requested output dimensions (width, height)
pub fn calculate_fit_geometry(source: (u32, u32), target: (u32, u32)) -> FitGeometry {
    let (src_w, src_h) = source;
    let (tgt_w, tgt_h) = target;

    let src_aspect = src_w as f64 / src_h as f64;
    let tgt_aspect = tgt_w as f64 / tgt_h as f64;

    let (crop_w, crop_h) = if src_aspect > tgt_aspect {
        // Source is wider: keep full height, trim the sides
        let w = ((src_h as f64 * tgt_aspect).round() as u32).clamp(1, src_w);
        (w, src_h)
    } else {
        // Source is taller: keep full width, trim top and bottom
        let h = ((src_w as f64 / tgt_aspect).round() as u32).clamp(1, src_h);
        (src_w, h)
    };

    FitGeometry {
        crop_x: (src_w - crop_w) / 2,
        crop_y: (src_h - crop_h) / 2,
        crop_width: crop_w,
        crop_height: crop_h,
        width: crop_w.min(tgt_w),
        height: crop_h.min(tgt_h),
    }
}
