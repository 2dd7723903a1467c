//! Upload configuration module.
//!
//! Handles loading, validating, and merging the `imageupload.toml` file.
//! Stock defaults are overridden by whatever keys the user file sets.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! library = "gd"                        # "gd" (bilinear) or "imagick" (Lanczos3)
//! quality = 90                          # Encoding quality (0-100)
//! base_path = "public/uploads/images"   # Where uploads are stored
//! public_root = "public"                # Relative paths are computed against this
//! naming_strategy = "original"          # original | hash | random | timestamp | custom
//! suffix_thumbnails = true              # photo_thumb.jpg vs. thumb/photo.jpg
//! capture_exif = false                  # Copy EXIF tags into the result
//!
//! [dimensions]
//! square = [100, 100, true]             # [width, height, squared]
//! small = { width = 200, height = 150 }
//! medium = [400]                        # height defaults to width
//! disabled = []                         # empty entries are skipped
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Upload configuration loaded from `imageupload.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UploadConfig {
    /// Image library selector, handed to the backend as is.
    pub library: String,
    /// Encoding quality for saved images (0 = worst, 100 = best).
    pub quality: u32,
    /// Filesystem root under which all uploads are stored.
    pub base_path: PathBuf,
    /// Root that `dir`/`filedir` result fields are relative to.
    pub public_root: PathBuf,
    /// How the stored file's basename is derived.
    pub naming_strategy: NamingScheme,
    /// `true`: thumbnails sit next to the original as `{basename}_{key}`.
    /// `false`: each key gets a subdirectory and keeps the basename.
    pub suffix_thumbnails: bool,
    /// Copy EXIF tags of the original into the result.
    pub capture_exif: bool,
    /// Thumbnail specs keyed by name.
    #[serde(deserialize_with = "deserialize_dimensions")]
    pub dimensions: BTreeMap<String, DimensionSpec>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            library: "gd".to_string(),
            quality: 90,
            base_path: PathBuf::from("public/uploads/images"),
            public_root: PathBuf::from("public"),
            naming_strategy: NamingScheme::default(),
            suffix_thumbnails: true,
            capture_exif: false,
            dimensions: BTreeMap::new(),
        }
    }
}

impl UploadConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.quality > 100 {
            return Err(ConfigError::Validation("quality must be 0-100".into()));
        }
        if self.base_path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "base_path must not be empty".into(),
            ));
        }
        for (key, spec) in &self.dimensions {
            if key.trim().is_empty() || key == "." || key == ".." || key.contains(['/', '\\']) {
                return Err(ConfigError::Validation(format!(
                    "dimensions key '{key}' must be a plain name (no path separators)"
                )));
            }
            if spec.width == 0 {
                return Err(ConfigError::Validation(format!(
                    "dimensions.{key}: width must be non-zero"
                )));
            }
            if spec.height == Some(0) {
                return Err(ConfigError::Validation(format!(
                    "dimensions.{key}: height must be non-zero when set"
                )));
            }
        }
        Ok(())
    }
}

/// Basename derivation scheme as written in config.
///
/// The per-call [`NamingStrategy`](crate::naming::NamingStrategy) is built
/// from this plus the caller's filename hint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamingScheme {
    /// Stem of the client-supplied filename.
    #[default]
    Original,
    /// SHA-256 of filename + upload timestamp.
    Hash,
    /// 16 random alphanumerics.
    Random,
    /// Unix timestamp of the upload.
    Timestamp,
    /// Caller-supplied hint, falling back to the original stem.
    Custom,
}

/// One thumbnail spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DimensionSpec {
    pub width: u32,
    /// Bounding height. `None` means same as `width`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Crop to an exact square instead of an aspect resize.
    pub squared: bool,
}

impl DimensionSpec {
    pub fn new(width: u32, height: Option<u32>, squared: bool) -> Self {
        Self {
            width,
            height,
            squared,
        }
    }

    pub fn target_height(&self) -> u32 {
        self.height.unwrap_or(self.width)
    }
}

/// A dimension entry as written in TOML: a table or a `[w, h?, squared?]` list.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawDimension {
    Table(RawDimensionTable),
    List(Vec<toml::Value>),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDimensionTable {
    width: u32,
    #[serde(default)]
    height: Option<u32>,
    #[serde(default)]
    squared: bool,
}

impl RawDimension {
    /// `Ok(None)` for an empty list, which disables the entry.
    fn into_spec(self) -> Result<Option<DimensionSpec>, String> {
        match self {
            RawDimension::Table(t) => Ok(Some(DimensionSpec::new(
                t.width,
                t.height.filter(|h| *h != 0),
                t.squared,
            ))),
            RawDimension::List(items) => {
                if items.len() > 3 {
                    return Err(format!(
                        "expected [width, height, squared], got {} items",
                        items.len()
                    ));
                }
                let mut items = items.into_iter();
                let Some(width) = items.next() else {
                    return Ok(None);
                };
                let width = list_u32(width, "width")?;
                let height = match items.next() {
                    Some(h) => Some(list_u32(h, "height")?).filter(|h| *h != 0),
                    None => None,
                };
                let squared = match items.next() {
                    Some(toml::Value::Boolean(b)) => b,
                    Some(other) => {
                        return Err(format!("squared must be a boolean, got {other}"));
                    }
                    None => false,
                };
                Ok(Some(DimensionSpec::new(width, height, squared)))
            }
        }
    }
}

fn list_u32(value: toml::Value, field: &str) -> Result<u32, String> {
    match value {
        toml::Value::Integer(n) => {
            u32::try_from(n).map_err(|_| format!("{field} out of range: {n}"))
        }
        other => Err(format!("{field} must be an integer, got {other}")),
    }
}

fn deserialize_dimensions<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<String, DimensionSpec>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, RawDimension>::deserialize(deserializer)?;
    let mut specs = BTreeMap::new();
    for (key, entry) in raw {
        match entry.into_spec() {
            Ok(Some(spec)) => {
                specs.insert(key, spec);
            }
            Ok(None) => {}
            Err(msg) => return Err(de::Error::custom(format!("dimensions.{key}: {msg}"))),
        }
    }
    Ok(specs)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(UploadConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<UploadConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: UploadConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from the given file.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result. A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<UploadConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `imageupload.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# imageupload configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# Image library. "gd" resamples with a bilinear filter, "imagick" with
# Lanczos3 (slower, sharper).
library = "gd"

# Encoding quality for the original and every thumbnail (0 = worst,
# 100 = best). Only lossy formats (JPEG) use it.
quality = 90

# Directory all uploads are stored under.
base_path = "public/uploads/images"

# Directory that relative paths in the upload result are computed against.
# Usually the web server's document root.
public_root = "public"

# How the stored filename is derived:
#   original  - the uploaded file's name (IMG_0001.jpg -> IMG_0001.jpg)
#   hash      - SHA-256 of the original name and the upload time
#   random    - 16 random letters and digits
#   timestamp - Unix time of the upload
#   custom    - the name passed by the caller, else the original name
naming_strategy = "original"

# true:  thumbnails are stored next to the original as photo_<key>.jpg
# false: thumbnails are stored as <key>/photo.jpg
suffix_thumbnails = true

# Copy the original's EXIF tags into the upload result.
capture_exif = false

# ---------------------------------------------------------------------------
# Thumbnails
# ---------------------------------------------------------------------------
# One entry per thumbnail, either [width, height, squared] or a table.
# height defaults to width; squared defaults to false.
# squared = true crops to a square of min(width, height), never enlarging.
# squared = false resizes to fit inside width x height, keeping the aspect.
# An empty list disables an entry.
[dimensions]
# square = [100, 100, true]
# small = { width = 200, height = 150 }
# medium = [400]
"##
}
