//! Filesystem helpers: target directory preparation and relative paths.
//!
//! Directory creation is idempotent. Concurrent uploads racing to create the
//! same directory both succeed, since "already exists" counts as success.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// True if `path` is a directory the current process can create files in.
///
/// Mode bits alone say nothing about the current user, so this creates an
/// unnamed temp file there; it is removed when dropped.
pub fn is_writable_dir(path: &Path) -> bool {
    path.is_dir() && tempfile::tempfile_in(path).is_ok()
}

/// Make sure `path` exists as a writable directory, creating it and any
/// missing parents with mode 0777 (minus umask).
pub fn ensure_directory(path: &Path) -> io::Result<()> {
    if is_writable_dir(path) {
        return Ok(());
    }

    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o777);
    }
    builder.create(path)?;

    if is_writable_dir(path) {
        Ok(())
    } else {
        Err(io::Error::new(
            io::ErrorKind::PermissionDenied,
            format!("{} is not writable", path.display()),
        ))
    }
}

/// Directory portion of a caller-supplied sub path, reduced to plain
/// components.
///
/// `albums/2024/cover.jpg` → `albums/2024`. Root, `.` and `..` components
/// are dropped so the result always stays under the base directory.
pub fn sub_directory(sub_path: Option<&str>) -> PathBuf {
    let Some(sub_path) = sub_path else {
        return PathBuf::new();
    };
    Path::new(sub_path)
        .parent()
        .map(normal_components)
        .unwrap_or_default()
}

fn normal_components(path: &Path) -> PathBuf {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part),
            _ => None,
        })
        .collect()
}

/// `path` relative to `root`, `/`-separated, with no leading or trailing
/// separator and no `..`.
///
/// Paths outside `root` keep their own plain components instead.
pub fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    normal_components(relative)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
