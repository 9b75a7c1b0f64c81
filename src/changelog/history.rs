//! Release history: tags (plus an implicit HEAD) partitioned into commit ranges

use crate::core::error::{ReleaseError, ReleaseResult};
use crate::core::vcs::{Commit, SystemGit};
use chrono::NaiveDate;

/// Synthetic ref for work committed after the latest tag
pub const HEAD_REF: &str = "HEAD";

/// One changelog section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
  /// Version label (tag without a leading `v`, or the manifest version for HEAD)
  pub label: String,
  pub date: NaiveDate,
  /// Commits in `(previous ref, this ref]`, newest first
  pub commits: Vec<Commit>,
}

/// Tags in creation order, with HEAD appended when it is ahead of the latest tag
pub fn gather_refs(git: &SystemGit) -> ReleaseResult<Vec<String>> {
  let mut refs = git.tags_by_creation()?;
  let Some(latest) = refs.last() else {
    return Err(ReleaseError::with_help(
      "No git tags found.",
      "Tag previous releases (e.g. 'git tag 1.0 <commit>') before generating a release.",
    ));
  };

  let head = git.head_commit()?;
  let latest_commit = git.commit_of(latest)?;
  if head != latest_commit {
    refs.push(HEAD_REF.to_string());
  }

  Ok(refs)
}

/// Display label for a tag: `v1.2` becomes `1.2`, anything else is kept
pub fn tag_label(tag: &str) -> &str {
  match tag.strip_prefix('v') {
    Some(rest) if !rest.is_empty() => rest,
    _ => tag,
  }
}

/// Display label for any ref
///
/// HEAD shows the manifest version, marked `(unreleased)` when that version is
/// already tagged, or `Unreleased` when the manifest has no version.
pub fn derive_label(git_ref: &str, manifest_version: Option<&str>, latest_tag_label: Option<&str>) -> String {
  if git_ref != HEAD_REF {
    return tag_label(git_ref).to_string();
  }

  match manifest_version {
    Some(version) if Some(version) == latest_tag_label => format!("{} (unreleased)", version),
    Some(version) => version.to_string(),
    None => "Unreleased".to_string(),
  }
}

/// Revision range selecting the commits of `current` only
pub fn commit_range(current: &str, previous: Option<&str>) -> String {
  match previous {
    Some(prev) => format!("{}..{}", prev, current),
    None => current.to_string(),
  }
}

/// Build every release section, newest first
pub fn collect_releases(git: &SystemGit, manifest_version: Option<&str>) -> ReleaseResult<Vec<Release>> {
  let refs = gather_refs(git)?;

  let latest_tag_label = refs.iter().rev().find(|r| r.as_str() != HEAD_REF).map(|t| tag_label(t));

  let mut releases = Vec::with_capacity(refs.len());
  let mut previous: Option<&str> = None;
  for git_ref in &refs {
    let commits = git.log_commits(&commit_range(git_ref, previous))?;
    releases.push(Release {
      label: derive_label(git_ref, manifest_version, latest_tag_label),
      date: git.ref_date(git_ref)?,
      commits,
    });
    previous = Some(git_ref);
  }

  releases.reverse();
  Ok(releases)
}
