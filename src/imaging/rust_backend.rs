//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, GIF, WebP, TIFF, BMP) | `image::ImageReader` with content sniffing |
//! | Aspect resize | `DynamicImage::resize_exact` to [`calculate_bounded_dimensions`] |
//! | Fit crop | `DynamicImage::crop_imm` + `resize_exact` per [`calculate_fit_geometry`] |
//! | Encode JPEG | `image::codecs::jpeg::JpegEncoder` at the requested quality |
//! | Encode other formats | `DynamicImage::write_to` (lossless, quality ignored) |
//! | EXIF | `kamadak-exif`, primary IFD only |
//!
//! The output format follows the output path's extension. A path without
//! one keeps the format the source was decoded from.
//!
//! ## Library selector
//!
//! The `library` config value picks the resampling filter: `"imagick"` uses
//! Lanczos3, `"gd"` (and anything unknown) uses the cheaper bilinear
//! `Triangle` filter.

use super::backend::{BackendError, ExifData, ImageBackend, SavedImage};
use super::calculations::{calculate_bounded_dimensions, calculate_fit_geometry};
use super::params::{FitParams, ResizeParams, SaveParams};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::{debug, warn};

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend {
    filter: FilterType,
}

impl RustBackend {
    pub fn new() -> Self {
        Self::for_library("gd")
    }

    /// Build a backend for the configured library name.
    pub fn for_library(library: &str) -> Self {
        let filter = match library.to_ascii_lowercase().as_str() {
            "imagick" => FilterType::Lanczos3,
            "gd" => FilterType::Triangle,
            other => {
                warn!(library = other, "unknown image library, using gd resampling");
                FilterType::Triangle
            }
        };
        Self { filter }
    }

    pub fn filter(&self) -> FilterType {
        self.filter
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// A decoded source and the format its bytes were sniffed as.
struct LoadedImage {
    image: DynamicImage,
    format: Option<ImageFormat>,
}

/// Load and decode an image from disk.
///
/// Uploads usually sit at a temporary path without an extension, so the
/// format is sniffed from the content.
fn load_image(path: &Path) -> Result<LoadedImage, BackendError> {
    let reader = ImageReader::open(path)
        .map_err(BackendError::Io)?
        .with_guessed_format()
        .map_err(BackendError::Io)?;
    let format = reader.format();
    let image = reader.decode().map_err(|e| {
        BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
    })?;
    Ok(LoadedImage { image, format })
}

/// Save a DynamicImage to the given path, inferring format from extension.
///
/// A path without an extension (`photo.`) keeps `source_format`; an
/// extension the encoder does not know is an error.
fn save_image(
    img: &DynamicImage,
    path: &Path,
    quality: u32,
    source_format: Option<ImageFormat>,
) -> Result<SavedImage, BackendError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let format = if ext.is_empty() {
        source_format
    } else {
        ImageFormat::from_extension(&ext)
    }
    .ok_or_else(|| {
        BackendError::ProcessingFailed(format!("Unsupported output format: {}", ext))
    })?;

    let file = File::create(path).map_err(BackendError::Io)?;
    let mut writer = BufWriter::new(file);

    match format {
        ImageFormat::Jpeg => {
            // JPEG has no alpha channel
            let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
            let encoder =
                image::codecs::jpeg::JpegEncoder::new_with_quality(&mut writer, quality as u8);
            rgb.write_with_encoder(encoder)
        }
        ImageFormat::WebP => DynamicImage::ImageRgba8(img.to_rgba8()).write_to(&mut writer, format),
        _ => img.write_to(&mut writer, format),
    }
    .map_err(|e| {
        BackendError::ProcessingFailed(format!("Failed to encode {}: {}", path.display(), e))
    })?;
    writer.flush().map_err(BackendError::Io)?;

    let filesize = std::fs::metadata(path).map_err(BackendError::Io)?.len();
    Ok(SavedImage {
        width: img.width(),
        height: img.height(),
        filesize,
    })
}

impl ImageBackend for RustBackend {
    fn save(&self, params: &SaveParams) -> Result<SavedImage, BackendError> {
        let source = load_image(&params.source)?;
        save_image(
            &source.image,
            &params.output,
            params.quality.value(),
            source.format,
        )
    }

    fn resize(&self, params: &ResizeParams) -> Result<SavedImage, BackendError> {
        let source = load_image(&params.source)?;
        let img = &source.image;
        let (width, height) =
            calculate_bounded_dimensions((img.width(), img.height()), (params.width, params.height));
        let resized = img.resize_exact(width, height, self.filter);
        save_image(&resized, &params.output, params.quality.value(), source.format)
    }

    fn fit(&self, params: &FitParams) -> Result<SavedImage, BackendError> {
        let source = load_image(&params.source)?;
        let img = &source.image;
        let g = calculate_fit_geometry((img.width(), img.height()), (params.width, params.height));

        let cropped = img.crop_imm(g.crop_x, g.crop_y, g.crop_width, g.crop_height);
        let fitted = if (g.width, g.height) == (g.crop_width, g.crop_height) {
            cropped
        } else {
            cropped.resize_exact(g.width, g.height, self.filter)
        };

        save_image(&fitted, &params.output, params.quality.value(), source.format)
    }

    fn read_exif(&self, path: &Path) -> Result<ExifData, BackendError> {
        let file = File::open(path).map_err(BackendError::Io)?;
        let mut reader = BufReader::new(file);

        let exif = match exif::Reader::new().read_from_container(&mut reader) {
            Ok(exif) => exif,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "no readable EXIF data");
                return Ok(ExifData::new());
            }
        };

        Ok(exif
            .fields()
            .filter(|f| f.ifd_num == exif::In::PRIMARY)
            .map(|f| {
                (
                    f.tag.to_string(),
                    f.display_value().with_unit(&exif).to_string(),
                )
            })
            .collect())
    }
}
