//! The upload manifest returned to callers.
//!
//! Both types serialize to flat JSON so a host application can hand them
//! straight to a client.
//!
//! Path fields follow one convention: `path`/`*filepath` are on-disk paths
//! under `base_path`; `dir`/`*filedir` are relative to `public_root`,
//! `/`-separated, without leading separator or `..`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything produced by one upload.
///
/// Built fresh per call. Failures never abort the call; check [`error`]
/// and [`thumbnail_errors`] instead.
///
/// [`error`]: UploadResult::error
/// [`thumbnail_errors`]: UploadResult::thumbnail_errors
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadResult {
    /// Client-supplied filename, e.g. `IMG_0001.JPG`.
    pub original_filename: String,
    /// Where the original was saved. Empty until the save succeeds.
    pub original_filepath: String,
    /// Relative directory of the saved original. Empty until the save succeeds.
    pub original_filedir: String,
    /// Where the upload's bytes were read from (usually a temp file).
    pub original_real_path: String,
    pub original_extension: String,
    pub original_mime: String,
    /// Size of the upload in bytes, before re-encoding.
    pub original_filesize: u64,
    pub original_width: u32,
    pub original_height: u32,

    /// EXIF tags of the original, only when `capture_exif` is on.
    pub exif: BTreeMap<String, String>,

    /// Target directory on disk.
    pub path: String,
    /// Target directory relative to the public root.
    pub dir: String,
    /// `{basename}.{original_extension}`
    pub filename: String,
    pub basename: String,

    /// Generated thumbnails keyed by their config name.
    pub dimensions: BTreeMap<String, ThumbnailResult>,

    /// First failure while preparing the directory or saving the original.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Thumbnails that were skipped, with the reason.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub thumbnail_errors: BTreeMap<String, String>,
}

impl UploadResult {
    /// True when the original and every configured thumbnail were written.
    pub fn is_complete(&self) -> bool {
        self.error.is_none() && self.thumbnail_errors.is_empty()
    }
}

/// One generated thumbnail.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThumbnailResult {
    /// Directory on disk holding the thumbnail.
    pub path: String,
    /// `path` relative to the public root.
    pub dir: String,
    pub filename: String,
    /// Full path of the thumbnail on disk.
    pub filepath: String,
    /// Relative directory of the thumbnail file (same as `dir`).
    pub filedir: String,
    pub width: u32,
    pub height: u32,
    pub filesize: u64,
    pub is_squared: bool,
}
