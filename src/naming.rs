//! Destination filename derivation.
//!
//! Every stored original gets a *basename* (filename without extension)
//! chosen by a [`NamingStrategy`]; the final filename is always
//! `{basename}.{original extension}`.
//!
//! | Strategy | Basename |
//! |---|---|
//! | `Original` | stem of the client filename (`IMG_0001.jpg` → `IMG_0001`) |
//! | `Hash` | SHA-256 hex of client filename + unix timestamp |
//! | `Random` | 16 random ASCII alphanumerics |
//! | `Timestamp` | unix timestamp |
//! | `Custom(hint)` | the hint, or the original stem when the hint is empty |
//!
//! The hash depends on name and time, not on file content: the same file
//! uploaded twice at different seconds gets two names.

use crate::config::NamingScheme;
use rand::Rng;
use rand::distr::Alphanumeric;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Length of basenames produced by [`NamingStrategy::Random`].
pub const RANDOM_NAME_LEN: usize = 16;

/// Per-upload naming strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamingStrategy {
    Original,
    Hash,
    Random,
    Timestamp,
    Custom(String),
}

impl NamingStrategy {
    /// Combine the configured scheme with the caller's filename hint.
    ///
    /// The hint only matters for [`NamingScheme::Custom`].
    pub fn from_scheme(scheme: NamingScheme, hint: Option<&str>) -> Self {
        match scheme {
            NamingScheme::Original => NamingStrategy::Original,
            NamingScheme::Hash => NamingStrategy::Hash,
            NamingScheme::Random => NamingStrategy::Random,
            NamingScheme::Timestamp => NamingStrategy::Timestamp,
            NamingScheme::Custom => NamingStrategy::Custom(hint.unwrap_or_default().to_string()),
        }
    }

    /// Derive the basename for an upload named `original_name` at `timestamp`
    /// (unix seconds).
    pub fn basename(&self, original_name: &str, timestamp: i64) -> String {
        match self {
            NamingStrategy::Original => file_stem(original_name),
            NamingStrategy::Hash => hash_name(original_name, timestamp),
            NamingStrategy::Random => random_name(RANDOM_NAME_LEN),
            NamingStrategy::Timestamp => timestamp.to_string(),
            NamingStrategy::Custom(hint) => match sanitize_hint(hint) {
                Some(name) => name,
                None => file_stem(original_name),
            },
        }
    }
}

/// Filename without directory or extension: `a/photo.tar.gz` → `photo.tar`.
pub fn file_stem(name: &str) -> String {
    Path::new(name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Final filename for a basename and extension.
pub fn filename(basename: &str, extension: &str) -> String {
    format!("{basename}.{extension}")
}

fn hash_name(original_name: &str, timestamp: i64) -> String {
    let digest = Sha256::digest(format!("{original_name}{timestamp}").as_bytes());
    format!("{:x}", digest)
}

fn random_name(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Keep only the last path component of a hint so a stored file cannot
/// land outside its target directory. `None` when nothing usable is left.
fn sanitize_hint(hint: &str) -> Option<String> {
    let hint = hint.trim();
    if hint.is_empty() {
        return None;
    }
    Path::new(hint)
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
}
