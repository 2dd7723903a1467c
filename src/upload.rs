//! Upload orchestration.
//!
//! [`Uploader::upload`] runs a straight five-step pipeline, every step
//! writing into one [`UploadResult`]:
//!
//! 1. resolve and create the target directory (`base_path` + sub path)
//! 2. capture the upload's name, extension, MIME type and size
//! 3. derive the stored basename from the naming strategy
//! 4. decode and re-save the original at the configured quality
//! 5. generate each configured thumbnail
//!
//! ## Failure policy
//!
//! `upload` never returns an error. A failure in steps 1 or 4 is stored in
//! [`UploadResult::error`] and the pipeline keeps going with whatever it has.
//! A failing thumbnail is left out of `dimensions` and its reason goes to
//! [`UploadResult::thumbnail_errors`]; the remaining thumbnails still run.
//!
//! ## Thumbnail layout
//!
//! ```text
//! suffix_thumbnails = true          suffix_thumbnails = false
//! uploads/images/                   uploads/images/
//! ├── photo.jpg                     ├── photo.jpg
//! ├── photo_small.jpg               ├── small/
//! └── photo_square.jpg              │   └── photo.jpg
//!                                   └── square/
//!                                       └── photo.jpg
//! ```

use crate::config::{ConfigError, DimensionSpec, UploadConfig};
use crate::imaging::{
    BackendError, ImageBackend, Quality, RustBackend, create_thumbnail, plan_thumbnail,
    save_original,
};
use crate::naming::{self, NamingStrategy};
use crate::storage;
use crate::types::{ThumbnailResult, UploadResult};
use image::ImageFormat;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, info_span, warn};

/// Failures captured into an [`UploadResult`].
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("failed to create directory {}: {source}", .path.display())]
    DirectoryCreation { path: PathBuf, source: io::Error },
    #[error("failed to process image {}: {source}", .path.display())]
    ImageProcessing { path: PathBuf, source: BackendError },
}

// ============================================================================
// Uploaded files
// ============================================================================

/// An uploaded file as handed over by the host (web framework, CLI, ...).
pub trait UploadedFile {
    /// Filename as sent by the client.
    fn client_original_name(&self) -> &str;

    /// Extension of the client filename, without the dot. Case is kept.
    fn client_original_extension(&self) -> String {
        Path::new(self.client_original_name())
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Where the uploaded bytes live on disk.
    fn real_path(&self) -> &Path;

    /// Size in bytes.
    fn size(&self) -> u64;

    fn mime_type(&self) -> &str;
}

/// An upload that is already a file on local disk.
#[derive(Debug, Clone)]
pub struct LocalFile {
    path: PathBuf,
    client_name: String,
    size: u64,
    mime: String,
}

impl LocalFile {
    /// Wrap a file, using its own filename as the client name.
    pub fn open(path: &Path) -> io::Result<Self> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::with_client_name(path, &name)
    }

    /// Wrap a file stored under a temporary name, remembering the name the
    /// client sent.
    pub fn with_client_name(path: &Path, client_name: &str) -> io::Result<Self> {
        let metadata = fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a file", path.display()),
            ));
        }
        Ok(Self {
            path: path.to_path_buf(),
            client_name: client_name.to_string(),
            size: metadata.len(),
            mime: sniff_mime(path, client_name)?,
        })
    }
}

impl UploadedFile for LocalFile {
    fn client_original_name(&self) -> &str {
        &self.client_name
    }

    fn real_path(&self) -> &Path {
        &self.path
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn mime_type(&self) -> &str {
        &self.mime
    }
}

/// MIME type from the file's magic bytes, then from the client extension.
fn sniff_mime(path: &Path, client_name: &str) -> io::Result<String> {
    let mut head = Vec::with_capacity(64);
    fs::File::open(path)?.take(64).read_to_end(&mut head)?;

    let format = image::guess_format(&head)
        .or_else(|_| ImageFormat::from_path(client_name))
        .ok();
    Ok(format
        .map(|f| f.to_mime_type().to_string())
        .unwrap_or_else(|| "application/octet-stream".to_string()))
}

// ============================================================================
// Orchestrator
// ============================================================================

/// Stores uploads and their thumbnails according to an [`UploadConfig`].
///
/// Holds no per-upload state, so one instance can serve concurrent callers.
pub struct Uploader<B = RustBackend> {
    config: UploadConfig,
    backend: B,
}

impl Uploader<RustBackend> {
    /// Build an uploader with the pure Rust backend for `config.library`.
    pub fn new(config: UploadConfig) -> Result<Self, ConfigError> {
        let backend = RustBackend::for_library(&config.library);
        Self::with_backend(config, backend)
    }
}

impl<B: ImageBackend> Uploader<B> {
    /// Build an uploader with a specific backend (allows testing with mock).
    pub fn with_backend(config: UploadConfig, backend: B) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, backend })
    }

    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    /// Store `file` and generate its thumbnails.
    ///
    /// `new_filename_hint` is only used by the `custom` naming strategy.
    /// The directory portion of `sub_path` is appended to `base_path`.
    pub fn upload(
        &self,
        file: &impl UploadedFile,
        new_filename_hint: Option<&str>,
        sub_path: Option<&str>,
    ) -> UploadResult {
        let now = chrono::Utc::now().timestamp();
        self.upload_at(file, new_filename_hint, sub_path, now)
    }

    /// [`upload`](Self::upload) with an explicit unix timestamp for the
    /// `hash` and `timestamp` naming strategies.
    pub fn upload_at(
        &self,
        file: &impl UploadedFile,
        new_filename_hint: Option<&str>,
        sub_path: Option<&str>,
        timestamp: i64,
    ) -> UploadResult {
        let _span = info_span!("upload", file = file.client_original_name()).entered();
        let mut result = UploadResult::default();

        let target_dir = self.prepare_target_dir(sub_path, &mut result);

        capture_original_properties(file, &mut result);

        let strategy = NamingStrategy::from_scheme(self.config.naming_strategy, new_filename_hint);
        result.basename = strategy.basename(&result.original_filename, timestamp);
        result.filename = naming::filename(&result.basename, &result.original_extension);
        debug!(filename = %result.filename, ?strategy, "derived filename");

        if let Err(err) = self.save_original(file, &target_dir, &mut result) {
            record_error(&mut result, err);
        }

        self.create_thumbnails(file.real_path(), &target_dir, &mut result);

        info!(
            path = %result.path,
            filename = %result.filename,
            thumbnails = result.dimensions.len(),
            failed = result.thumbnail_errors.len(),
            "upload finished"
        );
        result
    }

    fn quality(&self) -> Quality {
        Quality::new(self.config.quality)
    }

    fn relative(&self, path: &Path) -> String {
        storage::relative_path(&self.config.public_root, path)
    }

    /// Step 1: record the target directory and make sure it exists.
    fn prepare_target_dir(&self, sub_path: Option<&str>, result: &mut UploadResult) -> PathBuf {
        let target_dir: PathBuf = self
            .config
            .base_path
            .components()
            .chain(storage::sub_directory(sub_path).components())
            .collect();

        result.path = target_dir.display().to_string();
        result.dir = self.relative(&target_dir);
        debug!(path = %result.path, dir = %result.dir, "target directory");

        if let Err(source) = storage::ensure_directory(&target_dir) {
            record_error(
                result,
                UploadError::DirectoryCreation {
                    path: target_dir.clone(),
                    source,
                },
            );
        }
        target_dir
    }

    /// Step 4: re-save the original and read back its properties.
    fn save_original(
        &self,
        file: &impl UploadedFile,
        target_dir: &Path,
        result: &mut UploadResult,
    ) -> Result<(), UploadError> {
        let target = target_dir.join(&result.filename);
        let saved = save_original(&self.backend, file.real_path(), &target, self.quality())
            .map_err(|source| UploadError::ImageProcessing {
                path: target.clone(),
                source,
            })?;

        result.original_width = saved.width;
        result.original_height = saved.height;
        result.original_filepath = target.display().to_string();
        result.original_filedir = self.relative(target_dir);

        if self.config.capture_exif {
            // Missing EXIF is not an upload failure
            match self.backend.read_exif(file.real_path()) {
                Ok(exif) => result.exif = exif,
                Err(err) => warn!(error = %err, "could not read EXIF"),
            }
        }
        Ok(())
    }

    /// Step 5: every configured thumbnail, skipping failures.
    fn create_thumbnails(&self, source: &Path, target_dir: &Path, result: &mut UploadResult) {
        let basename = result.basename.clone();
        let extension = result.original_extension.clone();

        for (key, spec) in &self.config.dimensions {
            match self.create_thumbnail(source, target_dir, key, spec, &basename, &extension) {
                Ok(thumb) => {
                    debug!(key = %key, filepath = %thumb.filepath, "thumbnail saved");
                    result.dimensions.insert(key.clone(), thumb);
                }
                Err(err) => {
                    warn!(key = %key, error = %err, "skipping thumbnail");
                    result.thumbnail_errors.insert(key.clone(), err.to_string());
                }
            }
        }
    }

    fn create_thumbnail(
        &self,
        source: &Path,
        target_dir: &Path,
        key: &str,
        spec: &DimensionSpec,
        basename: &str,
        extension: &str,
    ) -> Result<ThumbnailResult, UploadError> {
        let (dir, thumb_basename) = if self.config.suffix_thumbnails {
            (target_dir.to_path_buf(), format!("{basename}_{key}"))
        } else {
            (target_dir.join(key), basename.to_string())
        };

        storage::ensure_directory(&dir).map_err(|source| UploadError::DirectoryCreation {
            path: dir.clone(),
            source,
        })?;

        let filename = naming::filename(&thumb_basename, extension);
        let filepath = dir.join(&filename);

        let plan = plan_thumbnail(spec, source, &filepath, self.quality());
        let saved =
            create_thumbnail(&self.backend, &plan).map_err(|source| UploadError::ImageProcessing {
                path: filepath.clone(),
                source,
            })?;

        let relative_dir = self.relative(&dir);
        Ok(ThumbnailResult {
            path: dir.display().to_string(),
            dir: relative_dir.clone(),
            filename,
            filepath: filepath.display().to_string(),
            filedir: relative_dir,
            width: saved.width,
            height: saved.height,
            filesize: saved.filesize,
            is_squared: plan.is_squared(),
        })
    }
}

/// Step 2: properties read straight from the upload, no decoding.
fn capture_original_properties(file: &impl UploadedFile, result: &mut UploadResult) {
    result.original_filename = file.client_original_name().to_string();
    result.original_real_path = file.real_path().display().to_string();
    result.original_extension = file.client_original_extension();
    result.original_mime = file.mime_type().to_string();
    result.original_filesize = file.size();
    debug!(
        name = %result.original_filename,
        mime = %result.original_mime,
        size = result.original_filesize,
        real_path = %result.original_real_path,
        "captured upload properties"
    );
}

/// Keep the first failure in `error`; later ones are logged only.
fn record_error(result: &mut UploadResult, err: UploadError) {
    warn!(error = %err, "upload step failed");
    if result.error.is_none() {
        result.error = Some(err.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NamingScheme;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use crate::test_helpers::{config_in, jpeg_upload, write_bytes};
    use tempfile::TempDir;

    const TS: i64 = 1_700_000_000;

    /// Upload that only exists as metadata; the mock backend never reads it.
    struct FakeUpload {
        name: &'static str,
        path: PathBuf,
    }

    impl FakeUpload {
        fn new(name: &'static str) -> Self {
            Self {
                name,
                path: PathBuf::from("/tmp/phpA1b2C3"),
            }
        }
    }

    impl UploadedFile for FakeUpload {
        fn client_original_name(&self) -> &str {
            self.name
        }

        fn real_path(&self) -> &Path {
            &self.path
        }

        fn size(&self) -> u64 {
            4096
        }

        fn mime_type(&self) -> &str {
            "image/jpeg"
        }
    }

    fn uploader(config: UploadConfig, backend: MockBackend) -> Uploader<MockBackend> {
        Uploader::with_backend(config, backend).unwrap()
    }

    fn with_dimensions(mut config: UploadConfig, dims: &[(&str, DimensionSpec)]) -> UploadConfig {
        for (key, spec) in dims {
            config.dimensions.insert(key.to_string(), *spec);
        }
        config
    }

    // =========================================================================
    // Directory resolution
    // =========================================================================

    #[test]
    fn no_dimensions_no_error() {
        let tmp = TempDir::new().unwrap();
        let up = uploader(config_in(&tmp), MockBackend::new());

        let result = up.upload_at(&FakeUpload::new("photo.jpg"), None, None, TS);

        assert!(result.error.is_none());
        assert!(result.dimensions.is_empty());
        assert!(result.thumbnail_errors.is_empty());
        assert_eq!(result.dir, "uploads/images");
        assert!(tmp.path().join("public/uploads/images").is_dir());
    }

    #[test]
    fn sub_path_directory_is_appended() {
        let tmp = TempDir::new().unwrap();
        let up = uploader(config_in(&tmp), MockBackend::new());

        let result = up.upload_at(
            &FakeUpload::new("photo.jpg"),
            None,
            Some("/albums/2024/cover.jpg"),
            TS,
        );

        assert_eq!(result.dir, "uploads/images/albums/2024");
        assert!(tmp.path().join("public/uploads/images/albums/2024").is_dir());
        assert_eq!(
            result.original_filepath,
            tmp.path()
                .join("public/uploads/images/albums/2024/photo.jpg")
                .display()
                .to_string()
        );
        assert_eq!(result.original_filedir, "uploads/images/albums/2024");
    }

    #[test]
    fn directory_failure_is_recorded_not_raised() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("public");
        write_bytes(&blocker, b"not a directory");
        let up = uploader(config_in(&tmp), MockBackend::new());

        let result = up.upload_at(&FakeUpload::new("photo.jpg"), None, None, TS);

        let error = result.error.expect("directory error recorded");
        assert!(error.contains("failed to create directory"), "{error}");
        assert!(result.dimensions.is_empty());
        // Paths are still recorded
        assert_eq!(result.dir, "uploads/images");
    }

    // =========================================================================
    // Original properties and naming
    // =========================================================================

    #[test]
    fn original_properties_captured() {
        let tmp = TempDir::new().unwrap();
        let up = uploader(config_in(&tmp), MockBackend::with_dimensions(1024, 768));

        let result = up.upload_at(&FakeUpload::new("IMG_0001.JPG"), None, None, TS);

        assert_eq!(result.original_filename, "IMG_0001.JPG");
        assert_eq!(result.original_real_path, "/tmp/phpA1b2C3");
        assert_eq!(result.original_extension, "JPG");
        assert_eq!(result.original_mime, "image/jpeg");
        assert_eq!(result.original_filesize, 4096);
        assert_eq!((result.original_width, result.original_height), (1024, 768));
        assert_eq!(result.basename, "IMG_0001");
        assert_eq!(result.filename, "IMG_0001.JPG");
    }

    #[test]
    fn filename_is_basename_plus_extension_for_every_scheme() {
        let tmp = TempDir::new().unwrap();
        for scheme in [
            NamingScheme::Original,
            NamingScheme::Hash,
            NamingScheme::Random,
            NamingScheme::Timestamp,
            NamingScheme::Custom,
        ] {
            let config = UploadConfig {
                naming_strategy: scheme,
                ..config_in(&tmp)
            };
            let up = uploader(config, MockBackend::new());
            let result = up.upload_at(&FakeUpload::new("photo.png"), Some("hint"), None, TS);
            assert_eq!(
                result.filename,
                format!("{}.{}", result.basename, result.original_extension),
                "{scheme:?}"
            );
        }
    }

    #[test]
    fn custom_scheme_uses_hint_or_falls_back() {
        let tmp = TempDir::new().unwrap();
        let config = UploadConfig {
            naming_strategy: NamingScheme::Custom,
            ..config_in(&tmp)
        };
        let up = uploader(config, MockBackend::new());

        let named = up.upload_at(&FakeUpload::new("IMG_0001.jpg"), Some("avatar"), None, TS);
        assert_eq!(named.basename, "avatar");
        assert_eq!(named.filename, "avatar.jpg");

        let fallback = up.upload_at(&FakeUpload::new("IMG_0001.jpg"), Some(""), None, TS);
        assert_eq!(fallback.basename, "IMG_0001");
    }

    #[test]
    fn hash_scheme_differs_across_timestamps() {
        let tmp = TempDir::new().unwrap();
        let config = UploadConfig {
            naming_strategy: NamingScheme::Hash,
            ..config_in(&tmp)
        };
        let up = uploader(config, MockBackend::new());
        let file = FakeUpload::new("photo.jpg");

        let first = up.upload_at(&file, None, None, TS);
        let second = up.upload_at(&file, None, None, TS + 60);
        let again = up.upload_at(&file, None, None, TS);

        assert_ne!(first.basename, second.basename);
        assert_eq!(first.basename, again.basename);
    }

    // =========================================================================
    // Original save
    // =========================================================================

    #[test]
    fn original_saved_with_configured_quality() {
        let tmp = TempDir::new().unwrap();
        let config = UploadConfig {
            quality: 72,
            ..config_in(&tmp)
        };
        let backend = MockBackend::new();
        let up = uploader(config, backend);

        up.upload_at(&FakeUpload::new("photo.jpg"), None, None, TS);

        let ops = up.backend.get_operations();
        assert!(matches!(
            &ops[0],
            RecordedOp::Save { source, output, quality: 72 }
                if source == "/tmp/phpA1b2C3" && output.ends_with("uploads/images/photo.jpg")
        ));
    }

    #[test]
    fn failed_original_leaves_defaults() {
        let tmp = TempDir::new().unwrap();
        let up = uploader(config_in(&tmp), MockBackend::new().failing_on("photo.jpg"));

        let result = up.upload_at(&FakeUpload::new("photo.jpg"), None, None, TS);

        let error = result.error.expect("processing error recorded");
        assert!(error.contains("failed to process image"), "{error}");
        assert_eq!((result.original_width, result.original_height), (0, 0));
        assert!(result.original_filepath.is_empty());
        assert!(result.original_filedir.is_empty());
    }

    #[test]
    fn exif_captured_only_when_enabled() {
        let tmp = TempDir::new().unwrap();
        let backend = || MockBackend::new().with_exif(&[("Model", "X100V")]);

        let off = uploader(config_in(&tmp), backend());
        let result = off.upload_at(&FakeUpload::new("photo.jpg"), None, None, TS);
        assert!(result.exif.is_empty());
        assert!(
            !off.backend
                .get_operations()
                .iter()
                .any(|op| matches!(op, RecordedOp::ReadExif(_)))
        );

        let config = UploadConfig {
            capture_exif: true,
            ..config_in(&tmp)
        };
        let on = uploader(config, backend());
        let result = on.upload_at(&FakeUpload::new("photo.jpg"), None, None, TS);
        assert_eq!(result.exif.get("Model").map(String::as_str), Some("X100V"));
    }

    // =========================================================================
    // Thumbnails
    // =========================================================================

    #[test]
    fn suffixed_thumbnail_sits_next_to_original() {
        let tmp = TempDir::new().unwrap();
        let config = with_dimensions(
            config_in(&tmp),
            &[("thumb", DimensionSpec::new(100, None, false))],
        );
        let up = uploader(config, MockBackend::new());

        let result = up.upload_at(&FakeUpload::new("photo.jpg"), None, None, TS);

        let thumb = &result.dimensions["thumb"];
        assert_eq!(thumb.filename, "photo_thumb.jpg");
        assert_eq!(thumb.path, result.path);
        assert_eq!(thumb.dir, "uploads/images");
        assert_eq!(thumb.filedir, "uploads/images");
        assert_eq!(
            thumb.filepath,
            Path::new(&result.path).join("photo_thumb.jpg").display().to_string()
        );
    }

    #[test]
    fn unsuffixed_thumbnail_gets_subdirectory() {
        let tmp = TempDir::new().unwrap();
        let config = UploadConfig {
            suffix_thumbnails: false,
            ..with_dimensions(
                config_in(&tmp),
                &[("thumb", DimensionSpec::new(100, None, false))],
            )
        };
        let up = uploader(config, MockBackend::new());

        let result = up.upload_at(&FakeUpload::new("photo.jpg"), None, None, TS);

        let thumb = &result.dimensions["thumb"];
        assert_eq!(thumb.filename, "photo.jpg");
        assert_eq!(thumb.dir, "uploads/images/thumb");
        assert!(tmp.path().join("public/uploads/images/thumb").is_dir());
    }

    #[test]
    fn squared_thumbnail_clamps_to_shorter_edge() {
        let tmp = TempDir::new().unwrap();
        let config = with_dimensions(
            config_in(&tmp),
            &[("square", DimensionSpec::new(200, Some(100), true))],
        );
        let up = uploader(config, MockBackend::with_dimensions(800, 600));

        let result = up.upload_at(&FakeUpload::new("photo.jpg"), None, None, TS);

        let thumb = &result.dimensions["square"];
        assert_eq!((thumb.width, thumb.height), (100, 100));
        assert!(thumb.is_squared);
        assert!(up.backend.get_operations().iter().any(|op| matches!(
            op,
            RecordedOp::Fit {
                width: 100,
                height: 100,
                ..
            }
        )));
    }

    #[test]
    fn aspect_thumbnail_bounded_by_box() {
        let tmp = TempDir::new().unwrap();
        let config = with_dimensions(
            config_in(&tmp),
            &[("wide", DimensionSpec::new(200, Some(100), false))],
        );
        let up = uploader(config, MockBackend::with_dimensions(400, 400));

        let result = up.upload_at(&FakeUpload::new("photo.jpg"), None, None, TS);

        let thumb = &result.dimensions["wide"];
        assert_eq!((thumb.width, thumb.height), (100, 100));
        assert!(!thumb.is_squared);
    }

    #[test]
    fn failing_thumbnail_is_skipped_and_reported() {
        let tmp = TempDir::new().unwrap();
        let config = with_dimensions(
            config_in(&tmp),
            &[
                ("broken", DimensionSpec::new(100, None, false)),
                ("fine", DimensionSpec::new(50, None, true)),
            ],
        );
        let up = uploader(config, MockBackend::new().failing_on("_broken"));

        let result = up.upload_at(&FakeUpload::new("photo.jpg"), None, None, TS);

        assert!(result.error.is_none());
        assert!(!result.dimensions.contains_key("broken"));
        assert!(result.dimensions.contains_key("fine"));
        assert!(result.thumbnail_errors["broken"].contains("photo_broken.jpg"));
    }

    #[test]
    fn thumbnail_keys_match_config() {
        let tmp = TempDir::new().unwrap();
        let config = with_dimensions(
            config_in(&tmp),
            &[
                ("a", DimensionSpec::new(10, None, false)),
                ("b", DimensionSpec::new(20, Some(10), false)),
                ("c", DimensionSpec::new(30, None, true)),
            ],
        );
        let up = uploader(config, MockBackend::new());

        let result = up.upload_at(&FakeUpload::new("photo.jpg"), None, None, TS);

        let keys: Vec<&str> = result.dimensions.keys().map(String::as_str).collect();
        assert_eq!(keys, ["a", "b", "c"]);
    }

    // =========================================================================
    // Construction and real files
    // =========================================================================

    #[test]
    fn invalid_config_rejected() {
        let config = UploadConfig {
            quality: 300,
            ..UploadConfig::default()
        };
        assert!(Uploader::new(config).is_err());
    }

    #[test]
    fn local_file_sniffs_mime_from_content() {
        let tmp = TempDir::new().unwrap();
        let upload = jpeg_upload(&tmp, "scan.png", 8, 8);

        assert_eq!(upload.mime_type(), "image/jpeg");
        assert_eq!(upload.client_original_extension(), "png");
        assert!(upload.size() > 0);
    }

    #[test]
    fn local_file_unknown_content_falls_back_to_extension() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("upload.part");
        write_bytes(&path, b"garbage");

        let upload = LocalFile::with_client_name(&path, "photo.gif").unwrap();
        assert_eq!(upload.mime_type(), "image/gif");

        let upload = LocalFile::with_client_name(&path, "notes.txt").unwrap();
        assert_eq!(upload.mime_type(), "application/octet-stream");
    }

    #[test]
    fn local_file_rejects_directory() {
        let tmp = TempDir::new().unwrap();
        assert!(LocalFile::open(tmp.path()).is_err());
    }

    #[test]
    fn upload_without_extension_keeps_source_format() {
        let tmp = TempDir::new().unwrap();
        let file = jpeg_upload(&tmp, "photo", 64, 48);
        let config = with_dimensions(
            config_in(&tmp),
            &[("thumb", DimensionSpec::new(32, None, false))],
        );

        let up = Uploader::new(config).unwrap();
        let result = up.upload_at(&file, None, None, TS);

        assert!(result.is_complete(), "{result:?}");
        assert_eq!(result.original_extension, "");
        assert_eq!(result.filename, "photo.");
        assert_eq!((result.original_width, result.original_height), (64, 48));

        let stored = std::fs::read(&result.original_filepath).unwrap();
        assert_eq!(image::guess_format(&stored).unwrap(), ImageFormat::Jpeg);
        assert_eq!(result.dimensions["thumb"].filename, "photo_thumb.");
    }

    #[test]
    fn corrupt_upload_with_rust_backend() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("upload.part");
        write_bytes(&path, b"\xFF\xD8\xFF truncated jpeg");
        let file = LocalFile::with_client_name(&path, "photo.jpg").unwrap();

        let up = Uploader::new(config_in(&tmp)).unwrap();
        let result = up.upload_at(&file, None, None, TS);

        assert!(result.error.is_some());
        assert_eq!((result.original_width, result.original_height), (0, 0));
    }
}
