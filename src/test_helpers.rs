//! Shared test utilities for the imageupload test suite.
//!
//! Provides synthetic image fixtures and a config rooted in a temp
//! directory, so tests never depend on files checked into the repo.
//!
//! # Usage
//!
//! ```text
//! use crate::test_helpers::*;
//!
//! let tmp = tempfile::TempDir::new().unwrap();
//! let upload = jpeg_upload(&tmp, "IMG_0001.jpg", 400, 300);
//! let config = config_in(&tmp);
//! ```

use crate::config::UploadConfig;
use crate::upload::LocalFile;
use image::{ImageEncoder, RgbImage};
use std::path::Path;
use tempfile::TempDir;

// =========================================================================
// Image fixtures
// =========================================================================

fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    })
}

/// Create a small valid JPEG file with the given dimensions.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    let img = gradient(width, height);
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}

/// Create a small valid PNG file with the given dimensions.
pub fn create_test_png(path: &Path, width: u32, height: u32) {
    gradient(width, height)
        .save_with_format(path, image::ImageFormat::Png)
        .unwrap();
}

/// Create a JPEG carrying an APP1 Exif segment with `Model` in IFD0 and
/// `ExposureTime` (`num/denom` seconds) in the Exif sub-IFD.
pub fn create_test_jpeg_with_exif(
    path: &Path,
    width: u32,
    height: u32,
    model: &str,
    exposure: (u32, u32),
) {
    create_test_jpeg(path, width, height);
    let jpeg = std::fs::read(path).unwrap();
    assert_eq!(&jpeg[..2], &[0xFF, 0xD8], "not a JPEG");

    let payload = exif_payload(model, exposure);
    let segment_len = u16::try_from(payload.len() + 2).unwrap();

    let mut out = Vec::with_capacity(jpeg.len() + payload.len() + 4);
    out.extend_from_slice(&[0xFF, 0xD8, 0xFF, 0xE1]);
    out.extend_from_slice(&segment_len.to_be_bytes());
    out.extend_from_slice(&payload);
    out.extend_from_slice(&jpeg[2..]);
    std::fs::write(path, out).unwrap();
}

/// `Exif\0\0` followed by a little-endian TIFF structure.
fn exif_payload(model: &str, exposure: (u32, u32)) -> Vec<u8> {
    const TYPE_ASCII: u16 = 2;
    const TYPE_LONG: u16 = 4;
    const TYPE_RATIONAL: u16 = 5;

    fn entry(out: &mut Vec<u8>, tag: u16, kind: u16, count: u32, value: u32) {
        out.extend_from_slice(&tag.to_le_bytes());
        out.extend_from_slice(&kind.to_le_bytes());
        out.extend_from_slice(&count.to_le_bytes());
        out.extend_from_slice(&value.to_le_bytes());
    }

    let mut model_bytes = model.as_bytes().to_vec();
    model_bytes.push(0);
    assert!(model_bytes.len() > 4, "model must not fit inline");
    let model_count = model_bytes.len() as u32;
    if model_bytes.len() % 2 == 1 {
        model_bytes.push(0);
    }

    // Offsets are relative to the TIFF header
    let ifd0_offset = 8u32;
    let model_offset = ifd0_offset + 2 + 2 * 12 + 4;
    let exif_ifd_offset = model_offset + model_bytes.len() as u32;
    let exposure_offset = exif_ifd_offset + 2 + 12 + 4;

    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"II");
    tiff.extend_from_slice(&42u16.to_le_bytes());
    tiff.extend_from_slice(&ifd0_offset.to_le_bytes());

    tiff.extend_from_slice(&2u16.to_le_bytes());
    entry(&mut tiff, 0x0110, TYPE_ASCII, model_count, model_offset);
    entry(&mut tiff, 0x8769, TYPE_LONG, 1, exif_ifd_offset);
    tiff.extend_from_slice(&0u32.to_le_bytes());
    tiff.extend_from_slice(&model_bytes);

    tiff.extend_from_slice(&1u16.to_le_bytes());
    entry(&mut tiff, 0x829A, TYPE_RATIONAL, 1, exposure_offset);
    tiff.extend_from_slice(&0u32.to_le_bytes());
    tiff.extend_from_slice(&exposure.0.to_le_bytes());
    tiff.extend_from_slice(&exposure.1.to_le_bytes());

    let mut payload = b"Exif\0\0".to_vec();
    payload.extend_from_slice(&tiff);
    payload
}

pub fn write_bytes(path: &Path, bytes: &[u8]) {
    std::fs::write(path, bytes).unwrap();
}

// =========================================================================
// Upload fixtures
// =========================================================================

/// Write a JPEG to a temp path under `incoming/` and wrap it as an upload
/// whose client name is `client_name`.
pub fn jpeg_upload(tmp: &TempDir, client_name: &str, width: u32, height: u32) -> LocalFile {
    let incoming = tmp.path().join("incoming");
    std::fs::create_dir_all(&incoming).unwrap();
    let path = incoming.join(format!("{client_name}.part"));
    create_test_jpeg(&path, width, height);
    LocalFile::with_client_name(&path, client_name).unwrap()
}

/// Config with `public_root` and `base_path` inside `tmp`.
pub fn config_in(tmp: &TempDir) -> UploadConfig {
    let public_root = tmp.path().join("public");
    UploadConfig {
        base_path: public_root.join("uploads/images"),
        public_root,
        ..UploadConfig::default()
    }
}
