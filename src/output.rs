//! CLI output formatting for upload results.
//!
//! # Information-First Display
//!
//! The header line names what was stored and where it can be reached
//! (the public-relative path). Details follow as indented context lines:
//! the client-side source, the original's dimensions, one line per
//! thumbnail in config-key order, then anything that went wrong.
//!
//! ```text
//! IMG_0001.jpg → uploads/images/IMG_0001.jpg
//!     Source: IMG_0001.jpg (image/jpeg, 482133 bytes)
//!     Original: 4000x3000
//!     EXIF: 42 tags
//!     small: IMG_0001_small.jpg 200x150 (9823 bytes)
//!     square: IMG_0001_square.jpg 100x100 squared (4410 bytes)
//!     broken: skipped (failed to process image ...)
//! Error: failed to create directory ...
//! ```
//!
//! [`format_upload_result`] is pure (returns `Vec<String>`) for testability;
//! [`print_upload_output`] writes it to stdout.

use crate::types::UploadResult;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Join a relative directory and a filename for display.
fn public_path(dir: &str, filename: &str) -> String {
    if dir.is_empty() {
        filename.to_string()
    } else {
        format!("{}/{}", dir, filename)
    }
}

/// Format one upload result as display lines.
pub fn format_upload_result(result: &UploadResult) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push(format!(
        "{} \u{2192} {}",
        result.filename,
        public_path(&result.dir, &result.filename)
    ));
    lines.push(format!(
        "{}Source: {} ({}, {} bytes)",
        indent(1),
        result.original_filename,
        result.original_mime,
        result.original_filesize
    ));

    if result.original_width > 0 {
        lines.push(format!(
            "{}Original: {}x{}",
            indent(1),
            result.original_width,
            result.original_height
        ));
    }

    if !result.exif.is_empty() {
        lines.push(format!("{}EXIF: {} tags", indent(1), result.exif.len()));
    }

    for (key, thumb) in &result.dimensions {
        let squared = if thumb.is_squared { " squared" } else { "" };
        lines.push(format!(
            "{}{}: {} {}x{}{} ({} bytes)",
            indent(1),
            key,
            thumb.filename,
            thumb.width,
            thumb.height,
            squared,
            thumb.filesize
        ));
    }

    for (key, reason) in &result.thumbnail_errors {
        lines.push(format!("{}{}: skipped ({})", indent(1), key, reason));
    }

    if let Some(error) = &result.error {
        lines.push(format!("Error: {}", error));
    }

    lines
}

/// Print an upload result to stdout.
pub fn print_upload_output(result: &UploadResult) {
    for line in format_upload_result(result) {
        println!("{}", line);
    }
}
