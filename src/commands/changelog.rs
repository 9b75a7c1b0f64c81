use crate::changelog::generate_changelog;
use crate::core::error::ReleaseResult;
use crate::core::vcs::SystemGit;
use crate::utils::display_relative;
use std::path::Path;

/// Regenerate the changelog from tags without touching anything else
pub fn run_changelog(root: &Path) -> ReleaseResult<()> {
  let config = super::load_config(root)?;
  let git = SystemGit::open(&config.root)?;

  let output = config.changelog_path();
  generate_changelog(&git, &config.manifest_path(), &output)?;
  println!("✅ Changelog written to {}", display_relative(&output, &config.root));
  Ok(())
}
