//! Changelog generation from git history
//!
//! Walks tags oldest to newest, collects the non-merge commits between each
//! pair, sorts them into Features / Fixes / Chore / Other by conventional
//! commit prefix and renders one markdown section per release, newest first.
//! The output file is rewritten from scratch every time.

pub mod commit;
pub mod history;

pub use commit::{Category, ClassifiedSummary, categorize, clean_summary};
pub use history::{Release, collect_releases};

use crate::core::error::{ReleaseResult, ResultExt};
use crate::core::vcs::SystemGit;
use crate::release::metadata::MetadataFile;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Placeholder line for an empty section
const EMPTY_SECTION: &str = "- _";

/// Render one release as a markdown section (no trailing newline)
pub fn format_release(release: &Release) -> String {
  let mut buckets: BTreeMap<Category, Vec<String>> = BTreeMap::new();
  for commit in &release.commits {
    let classified = ClassifiedSummary::new(&commit.summary);
    buckets
      .entry(classified.category)
      .or_default()
      .push(format!("- {} ({})", classified.text, commit.sha));
  }

  let mut lines = vec![
    format!("## {} - {}", release.label, release.date.format("%Y-%m-%d")),
    String::new(),
  ];
  for category in Category::ORDER {
    lines.push(format!("### {}", category));
    match buckets.get(&category) {
      Some(entries) => lines.extend(entries.iter().cloned()),
      None => lines.push(EMPTY_SECTION.to_string()),
    }
    lines.push(String::new());
  }

  lines.join("\n").trim_end().to_string()
}

/// Render the full changelog document
pub fn render(releases: &[Release]) -> String {
  let body = releases.iter().map(format_release).collect::<Vec<_>>().join("\n\n");
  format!("# Changelog\n\n{}\n", body)
}

/// Version recorded in the manifest, if the file and field exist
pub fn manifest_version(manifest_path: &Path) -> ReleaseResult<Option<String>> {
  if !manifest_path.exists() {
    return Ok(None);
  }
  let manifest = MetadataFile::load(manifest_path)?;
  Ok(manifest.version())
}

/// Regenerate `output_path` from the repository history
pub fn generate_changelog(git: &SystemGit, manifest_path: &Path, output_path: &Path) -> ReleaseResult<()> {
  let version = manifest_version(manifest_path)?;
  let releases = collect_releases(git, version.as_deref())?;

  tracing::info!(releases = releases.len(), path = %output_path.display(), "writing changelog");
  fs::write(output_path, render(&releases))
    .with_context(|| format!("Failed to write {}", output_path.display()))?;
  Ok(())
}
