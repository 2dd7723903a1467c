//! # imageupload
//!
//! Store an uploaded image under a derived filename and generate a
//! configurable set of thumbnails next to it, returning a manifest of
//! everything written.
//!
//! ```no_run
//! use imageupload::config::load_config;
//! use imageupload::upload::{LocalFile, Uploader};
//! use std::path::Path;
//!
//! let config = load_config(Path::new("imageupload.toml"))?;
//! let uploader = Uploader::new(config)?;
//! let file = LocalFile::with_client_name(Path::new("/tmp/phpA1b2C3"), "IMG_0001.jpg")?;
//!
//! let result = uploader.upload(&file, None, Some("albums/2024/cover.jpg"));
//! if let Some(error) = &result.error {
//!     eprintln!("upload incomplete: {error}");
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Pipeline
//!
//! ```text
//! 1. Directory  base_path + sub path  →  created if missing
//! 2. Inspect    upload handle         →  name, extension, MIME, size
//! 3. Name       naming strategy       →  basename, filename
//! 4. Original   decode + re-encode    →  {dir}/{filename}
//! 5. Thumbnails one per config key    →  {dir}/{basename}_{key}.{ext} or {dir}/{key}/{filename}
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`upload`] | The [`Uploader`](upload::Uploader) pipeline and the [`UploadedFile`](upload::UploadedFile) handle |
//! | [`config`] | `imageupload.toml` loading, validation, and typed thumbnail specs |
//! | [`naming`] | Basename derivation strategies |
//! | [`storage`] | Directory creation and public-relative paths |
//! | [`imaging`] | Backend trait and pure-Rust implementation: save, resize, fit, EXIF |
//! | [`types`] | The [`UploadResult`](types::UploadResult) manifest |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Never Raise, Always Report
//!
//! An upload that half-worked is still worth returning: the original may be
//! stored even if one thumbnail failed, and the caller needs the paths either
//! way. [`Uploader::upload`](upload::Uploader::upload) therefore returns an
//! [`UploadResult`](types::UploadResult) unconditionally. Directory and
//! original-image failures land in `error`, thumbnail failures in
//! `thumbnail_errors`.
//!
//! ## Backend Trait
//!
//! All pixel work goes through [`imaging::ImageBackend`]. The production
//! [`RustBackend`](imaging::RustBackend) is pure Rust (`image` +
//! `kamadak-exif`); tests swap in a recording mock so the orchestration
//! logic is checked without encoding images.
//!
//! ## Config Validated Up Front
//!
//! Thumbnail specs are typed records checked when the config loads, not
//! when the first upload reaches them. An [`Uploader`](upload::Uploader)
//! cannot be built from an invalid config.

pub mod config;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod storage;
pub mod types;
pub mod upload;

#[cfg(test)]
pub(crate) mod test_helpers;
