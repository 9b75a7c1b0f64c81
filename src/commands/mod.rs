//! CLI commands for shift-release
//!
//! - **release** (default): interactive release or test build
//! - **changelog**: regenerate the changelog without releasing

pub mod changelog;
pub mod release;

pub use changelog::run_changelog;
pub use release::run_release;

use crate::core::config::ReleaseConfig;
use crate::core::error::{ReleaseResult, ResultExt};
use std::path::Path;

/// Resolve `root` and load its configuration
fn load_config(root: &Path) -> ReleaseResult<ReleaseConfig> {
  let root = root
    .canonicalize()
    .with_context(|| format!("Repository root not found: {}", root.display()))?;
  ReleaseConfig::load(&root)
}
