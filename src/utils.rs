//! Utility functions for cross-platform path handling

use std::path::Path;

/// Convert a path to Git format (always forward slashes)
///
/// Git (and zip archive names) expect forward slashes, even on Windows.
pub fn path_to_git_format(path: &Path) -> String {
  #[cfg(target_os = "windows")]
  {
    path.to_string_lossy().replace('\\', "/")
  }
  #[cfg(not(target_os = "windows"))]
  {
    path.to_string_lossy().to_string()
  }
}

/// Render `path` relative to `root` for user-facing output, falling back to the full path
pub fn display_relative(path: &Path, root: &Path) -> String {
  path_to_git_format(path.strip_prefix(root).unwrap_or(path))
}
